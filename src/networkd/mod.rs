//! systemd-networkd D-Bus interface
//!
//! This module contains the networkd-specific parts of the exporter:
//! - Well-known service, object and interface names
//! - The bus traits the collector drives (and tests replace with fakes)
//! - Schema decoding of the loosely-typed replies
//! - The system bus implementation backed by `zbus`

pub mod bus;
pub mod decode;

pub use bus::{SystemBus, SystemBusConnector};
pub use decode::{decode_lease_count, decode_links};

use async_trait::async_trait;
use thiserror::Error;
use zbus::zvariant::{ObjectPath, OwnedObjectPath};

pub const NETWORKD_SERVICE: &str = "org.freedesktop.network1";
pub const NETWORKD_PATH: &str = "/org/freedesktop/network1";
pub const MANAGER_INTERFACE: &str = "org.freedesktop.network1.Manager";
pub const DHCP_SERVER_INTERFACE: &str = "org.freedesktop.network1.DHCPServer";
pub const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";
pub const LIST_LINKS_METHOD: &str = "ListLinks";
pub const LEASES_PROPERTY: &str = "Leases";

/// Errors raised while talking to networkd over the bus.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("D-Bus call failed: {0}")]
    Call(#[from] zbus::Error),

    #[error("Unexpected reply for {member}: {reason}")]
    Decode {
        member: &'static str,
        reason: String,
    },
}

/// One link as reported by `ListLinks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub index: i32,
    pub name: String,
    pub path: OwnedObjectPath,
}

/// The two read-only calls the collector issues against networkd.
///
/// The connection is released when the value is dropped.
#[async_trait]
pub trait NetworkdBus: Send + Sync {
    /// Enumerate links in the order the daemon returns them.
    async fn list_links(&self) -> Result<Vec<LinkRecord>, BusError>;

    /// Number of DHCP server leases held by the link at `path`.
    async fn dhcp_server_leases(&self, path: &ObjectPath<'_>) -> Result<usize, BusError>;
}

/// Factory for per-cycle bus connections.
#[async_trait]
pub trait BusConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn NetworkdBus>, BusError>;
}
