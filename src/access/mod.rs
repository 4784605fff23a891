//! Publication admission.
//!
//! Only identities whose numeric handle appears in the startup allow-list may
//! publish. The list is normalised once into [`AdminIds`]; there is no runtime
//! grant or revocation.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::identity::{Handle, Identity};

/// Normalised set of handles allowed to publish.
///
/// Accepts a single handle, a comma-separated string (`"42, 43"`), or a list
/// when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminIds(HashSet<Handle>);

impl AdminIds {
    pub fn new(handles: impl IntoIterator<Item = Handle>) -> Self {
        Self(handles.into_iter().collect())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.0.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Handles in ascending order.
    pub fn sorted(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.0.iter().copied().collect();
        handles.sort_unstable();
        handles
    }
}

impl FromStr for AdminIds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<Handle>()
                    .map_err(|_| format!("Invalid admin id '{}': expected an integer", part))
            })
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }
}

impl Serialize for AdminIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sorted().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AdminIds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AdminIdsVisitor;

        impl<'de> Visitor<'de> for AdminIdsVisitor {
            type Value = AdminIds;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer, a comma-separated string of integers, or a list")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AdminIds::new([v]))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Handle::try_from(v)
                    .map(|h| AdminIds::new([h]))
                    .map_err(|_| E::custom(format!("admin id {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut handles = HashSet::new();
                while let Some(handle) = seq.next_element::<Handle>()? {
                    handles.insert(handle);
                }
                Ok(AdminIds(handles))
            }
        }

        deserializer.deserialize_any(AdminIdsVisitor)
    }
}

/// Decides whether an identity may trigger publication.
#[derive(Debug, Clone)]
pub struct AccessGate {
    admins: AdminIds,
}

impl AccessGate {
    pub fn new(admins: AdminIds) -> Self {
        Self { admins }
    }

    /// Exact membership of the identity's handle in the allow-list.
    pub fn is_authorized(&self, identity: &Identity) -> bool {
        self.admins.contains(identity.handle)
    }
}
