use super::{
    decode_lease_count, decode_links, BusConnector, BusError, LinkRecord, NetworkdBus,
    DHCP_SERVER_INTERFACE, LEASES_PROPERTY, LIST_LINKS_METHOD, MANAGER_INTERFACE,
    NETWORKD_PATH, NETWORKD_SERVICE, PROPERTIES_INTERFACE,
};
use async_trait::async_trait;
use zbus::{
    zvariant::{Array, ObjectPath, OwnedValue},
    Connection, Message,
};

/// Opens a fresh system bus connection for every collection cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBusConnector;

#[async_trait]
impl BusConnector for SystemBusConnector {
    async fn connect(&self) -> Result<Box<dyn NetworkdBus>, BusError> {
        let connection = Connection::system().await?;
        tracing::debug!("Connected to the system bus as {:?}", connection.unique_name());
        Ok(Box::new(SystemBus { connection }))
    }
}

/// A networkd client over an exclusively owned system bus connection.
///
/// Dropping it closes the connection.
pub struct SystemBus {
    connection: Connection,
}

#[async_trait]
impl NetworkdBus for SystemBus {
    async fn list_links(&self) -> Result<Vec<LinkRecord>, BusError> {
        let reply = self
            .connection
            .call_method(
                Some(NETWORKD_SERVICE),
                NETWORKD_PATH,
                Some(MANAGER_INTERFACE),
                LIST_LINKS_METHOD,
                &(),
            )
            .await?;

        links_from_reply(&reply)
    }

    async fn dhcp_server_leases(&self, path: &ObjectPath<'_>) -> Result<usize, BusError> {
        let reply = self
            .connection
            .call_method(
                Some(NETWORKD_SERVICE),
                path.as_str(),
                Some(PROPERTIES_INTERFACE),
                "Get",
                &(DHCP_SERVER_INTERFACE, LEASES_PROPERTY),
            )
            .await?;

        lease_count_from_reply(&reply)
    }
}

/// Decodes the `a(iso)` body of a `ListLinks` reply.
fn links_from_reply(reply: &Message) -> Result<Vec<LinkRecord>, BusError> {
    let body = reply.body();
    let entries: Array<'_> = body.deserialize()?;
    tracing::debug!("ListLinks returned {} entries", entries.len());
    Ok(decode_links(entries.iter()))
}

/// Decodes the `v` body of a `Properties.Get` reply for `Leases`.
fn lease_count_from_reply(reply: &Message) -> Result<usize, BusError> {
    let value: OwnedValue = reply.body().deserialize()?;
    decode_lease_count(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::Value;

    fn reply_builder() -> zbus::message::Builder<'static> {
        Message::method_call(NETWORKD_PATH, LIST_LINKS_METHOD).unwrap()
    }

    #[test]
    fn test_links_from_list_links_reply() {
        let links = vec![
            (
                1i32,
                "lo".to_string(),
                ObjectPath::try_from("/org/freedesktop/network1/link/_31").unwrap(),
            ),
            (
                3i32,
                "eth0".to_string(),
                ObjectPath::try_from("/org/freedesktop/network1/link/_33").unwrap(),
            ),
        ];
        let reply = reply_builder().build(&(links,)).unwrap();

        let decoded = links_from_reply(&reply).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].index, 1);
        assert_eq!(decoded[0].name, "lo");
        assert_eq!(decoded[1].name, "eth0");
        assert_eq!(
            decoded[1].path.as_str(),
            "/org/freedesktop/network1/link/_33"
        );
    }

    #[test]
    fn test_links_from_reply_with_wrong_body() {
        let reply = reply_builder().build(&("not a link list",)).unwrap();

        assert!(links_from_reply(&reply).is_err());
    }

    #[test]
    fn test_lease_count_from_properties_reply() {
        let leases = vec![
            (
                3u32,
                vec![0x01u8, 0x52, 0x54, 0x00, 0x12, 0x34, 0x56],
                vec![10u8, 0, 0, 10],
                vec![10u8, 0, 0, 1],
                vec![0x52u8, 0x54, 0x00, 0x12, 0x34, 0x56],
                3600u64,
            ),
            (
                3u32,
                vec![0x01u8, 0x52, 0x54, 0x00, 0x12, 0x34, 0x57],
                vec![10u8, 0, 0, 11],
                vec![10u8, 0, 0, 1],
                vec![0x52u8, 0x54, 0x00, 0x12, 0x34, 0x57],
                7200u64,
            ),
        ];
        let reply = reply_builder().build(&(Value::from(leases),)).unwrap();

        assert_eq!(lease_count_from_reply(&reply).unwrap(), 2);
    }

    #[test]
    fn test_lease_count_from_reply_rejects_non_records() {
        let reply = reply_builder()
            .build(&(Value::from(vec!["eth0", "eth1"]),))
            .unwrap();

        let err = lease_count_from_reply(&reply).unwrap_err();
        assert!(matches!(err, BusError::Decode { member: "Leases", .. }));
    }
}
