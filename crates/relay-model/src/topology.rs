//! Multi-node records: tunnels, proxy chains, node groups and port forwards.

use serde::{Deserialize, Serialize};

use relay_core::defaults::{
    DEFAULT_CLIENT_LOCAL_PORT, DEFAULT_GROUP_CHECK_INTERVAL_SECS, DEFAULT_GROUP_FAIL_TIMEOUT_SECS,
    DEFAULT_GROUP_MAX_FAILS, DEFAULT_MEMBER_WEIGHT, DEFAULT_TUNNEL_ENTRY_PORT,
};

use crate::default_true;
use crate::node::Node;

/// Reverse tunnel: entry node listener forwarding through the exit node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunnel {
    pub id: u32,
    pub name: String,
    pub entry_node_id: u32,
    pub entry_node: Option<Node>,
    pub entry_port: u16,
    /// `tcp`, `udp`, or `tcp+udp` for both on the same port.
    pub protocol: String,
    pub exit_node_id: u32,
    pub exit_node: Option<Node>,
    /// Target reachable from the exit node, e.g. `10.0.0.5:22`.
    pub target_addr: String,
    pub enabled: bool,
    /// Bytes per second (0 = unlimited).
    pub speed_limit: u64,
}

impl Default for Tunnel {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            entry_node_id: 0,
            entry_node: None,
            entry_port: DEFAULT_TUNNEL_ENTRY_PORT,
            protocol: String::new(),
            exit_node_id: 0,
            exit_node: None,
            target_addr: String::new(),
            enabled: true,
            speed_limit: 0,
        }
    }
}

/// Sequential multi-hop proxy chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyChain {
    pub id: u32,
    pub name: String,
    /// Listen address, e.g. `:1080`.
    pub listen_addr: String,
    /// socks5 / http / tcp / udp.
    pub listen_type: String,
    /// Final target for port-forward style chains.
    pub target_addr: String,
    pub enabled: bool,
}

impl Default for ProxyChain {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            listen_addr: String::new(),
            listen_type: String::new(),
            target_addr: String::new(),
            enabled: true,
        }
    }
}

/// One hop of a [`ProxyChain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyChainHop {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub chain_id: u32,
    pub node_id: u32,
    #[serde(default)]
    pub node: Option<Node>,
    /// 0 = first hop. Unique and ascending per chain.
    #[serde(default)]
    pub hop_order: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Load-balancing node group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeGroup {
    pub id: u32,
    pub name: String,
    /// round / random / fifo / hash (`round_robin` is accepted for round).
    pub strategy: String,
    /// Seconds a failed member stays out of rotation.
    pub fail_timeout: u32,
    pub max_fails: u32,
    pub health_check: bool,
    /// Health check interval in seconds.
    pub check_interval: u32,
}

impl Default for NodeGroup {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            strategy: String::new(),
            fail_timeout: DEFAULT_GROUP_FAIL_TIMEOUT_SECS,
            max_fails: DEFAULT_GROUP_MAX_FAILS,
            health_check: true,
            check_interval: DEFAULT_GROUP_CHECK_INTERVAL_SECS,
        }
    }
}

/// Member of a [`NodeGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupMember {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub group_id: u32,
    pub node_id: u32,
    #[serde(default)]
    pub node: Option<Node>,
    /// Selection weight; 0 is treated as 1.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Failover priority, higher values are tried first.
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_weight() -> u32 {
    DEFAULT_MEMBER_WEIGHT
}

/// Plain port forward on a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForward {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub node_id: u32,
    pub name: String,
    /// tcp / udp / rtcp / rudp.
    #[serde(rename = "type")]
    pub kind: String,
    pub local_addr: String,
    pub remote_addr: String,
    #[serde(default)]
    pub chain_id: Option<u32>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Agent running behind NAT that exposes a local socks5 proxy on its node
/// through a reverse tunnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub id: u32,
    pub name: String,
    pub node_id: u32,
    pub node: Option<Node>,
    /// Port of the socks5 service on the client host.
    pub local_port: u16,
    /// Port the node opens for the reverse tunnel.
    pub remote_port: u16,
    pub proxy_user: String,
    pub proxy_pass: String,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            node_id: 0,
            node: None,
            local_port: DEFAULT_CLIENT_LOCAL_PORT,
            remote_port: 0,
            proxy_user: String::new(),
            proxy_pass: String::new(),
        }
    }
}
