//! Rule records scoped to a node.
//!
//! The payload fields hold JSON exactly as stored. A record with
//! `node_id == None` applies to every node.

use serde::{Deserialize, Serialize};

/// Domain/IP bypass rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bypass {
    pub id: u32,
    pub name: String,
    /// `true` = whitelist mode, `false` = blacklist mode.
    pub whitelist: bool,
    /// JSON array of matchers, e.g. `["*.example.com", "10.0.0.0/8"]`.
    pub matchers: String,
    pub node_id: Option<u32>,
}

/// Client address admission rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Admission {
    pub id: u32,
    pub name: String,
    pub whitelist: bool,
    /// JSON array of matchers, e.g. `["192.168.0.0/16"]`.
    pub matchers: String,
    pub node_id: Option<u32>,
}

/// Static host mappings (like `/etc/hosts`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMapping {
    pub id: u32,
    pub name: String,
    /// JSON array: `[{"hostname":"example.com","ip":"1.2.3.4","prefer":"ipv4"}]`.
    pub mappings: String,
    pub node_id: Option<u32>,
}

/// Reverse proxy routing by hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingress {
    pub id: u32,
    pub name: String,
    /// JSON array: `[{"hostname":"example.com","endpoint":"192.168.1.1:8080"}]`.
    pub rules: String,
    pub node_id: Option<u32>,
}

/// Common view over node-scoped records.
pub trait NodeScoped {
    fn scope(&self) -> Option<u32>;

    /// Whether this record applies to `node_id`.
    fn applies_to(&self, node_id: u32) -> bool {
        self.scope().is_none_or(|id| id == node_id)
    }
}

macro_rules! node_scoped {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NodeScoped for $ty {
                fn scope(&self) -> Option<u32> {
                    self.node_id
                }
            }
        )*
    };
}

node_scoped!(Bypass, Admission, HostMapping, Ingress);
