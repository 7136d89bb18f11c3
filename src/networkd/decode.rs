//! Schema decoding for networkd replies
//!
//! `ListLinks` answers with `a(iso)` and the `Leases` property is a variant
//! holding an array of lease records. Both are decoded from dynamic
//! `zvariant::Value`s against a fixed field list so that a record of the
//! wrong shape is dropped instead of failing the whole reply.

use super::{BusError, LinkRecord, LEASES_PROPERTY};
use zbus::zvariant::{OwnedObjectPath, Value};

/// Decodes `ListLinks` entries, keeping the daemon's order.
///
/// Each entry must be a structure whose first three fields are
/// `(int32 index, string name, object path)`. Trailing fields are ignored.
/// Entries that do not match are skipped.
pub fn decode_links<'a, 'v: 'a, I>(entries: I) -> Vec<LinkRecord>
where
    I: IntoIterator<Item = &'a Value<'v>>,
{
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let record = decode_link(entry);
            if record.is_none() {
                tracing::warn!(
                    "Skipping undecodable ListLinks entry at position {}: {:?}",
                    position,
                    entry
                );
            }
            record
        })
        .collect()
}

fn decode_link(entry: &Value<'_>) -> Option<LinkRecord> {
    let Value::Structure(structure) = entry else {
        return None;
    };

    match structure.fields() {
        [Value::I32(index), Value::Str(name), Value::ObjectPath(path), ..] => Some(LinkRecord {
            index: *index,
            name: name.to_string(),
            path: OwnedObjectPath::from(path.clone()),
        }),
        _ => None,
    }
}

/// Returns the number of entries in a `Leases` property value.
///
/// Properties arrive wrapped in a variant; nested variants are unwrapped
/// before the check. Only an array of structures counts as a lease list.
pub fn decode_lease_count(value: &Value<'_>) -> Result<usize, BusError> {
    match value {
        Value::Array(leases) => {
            let element = leases.element_signature().to_string();
            if !element.starts_with('(') {
                return Err(BusError::Decode {
                    member: LEASES_PROPERTY,
                    reason: format!(
                        "expected an array of records, got element signature '{}'",
                        element
                    ),
                });
            }
            Ok(leases.len())
        }
        Value::Value(inner) => decode_lease_count(inner),
        other => Err(BusError::Decode {
            member: LEASES_PROPERTY,
            reason: format!("expected an array, got signature '{}'", other.value_signature()),
        }),
    }
}
