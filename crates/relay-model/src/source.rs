//! Record retrieval.
//!
//! The generator never talks to storage itself. Callers fetch fully
//! materialized records through a [`RecordSource`] and hand them over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::Node;
use crate::rules::{Admission, Bypass, HostMapping, Ingress, NodeScoped};
use crate::topology::{
    Client, NodeGroup, NodeGroupMember, PortForward, ProxyChain, ProxyChainHop, Tunnel,
};

/// Errors reported by a record backend.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("backend: {0}")]
    Backend(String),
}

/// Read-only access to domain records.
///
/// Return `Ok(None)` when a record does not exist. Cross references
/// (tunnel entry/exit node, hop node, member node, client node) are
/// resolved by the implementation so callers receive complete records.
pub trait RecordSource: Send + Sync {
    fn node(&self, id: u32) -> Result<Option<Node>, SourceError>;

    fn tunnel(&self, id: u32) -> Result<Option<Tunnel>, SourceError>;

    fn proxy_chain(&self, id: u32) -> Result<Option<ProxyChain>, SourceError>;

    /// Hops of a chain ordered by `hop_order`.
    fn proxy_chain_hops(&self, chain_id: u32) -> Result<Vec<ProxyChainHop>, SourceError>;

    fn node_group(&self, id: u32) -> Result<Option<NodeGroup>, SourceError>;

    fn node_group_members(&self, group_id: u32) -> Result<Vec<NodeGroupMember>, SourceError>;

    fn port_forward(&self, id: u32) -> Result<Option<PortForward>, SourceError>;

    fn client(&self, id: u32) -> Result<Option<Client>, SourceError>;

    /// Bypass records scoped to `node_id` plus global ones.
    fn bypasses_for_node(&self, node_id: u32) -> Result<Vec<Bypass>, SourceError>;

    fn admissions_for_node(&self, node_id: u32) -> Result<Vec<Admission>, SourceError>;

    fn host_mappings_for_node(&self, node_id: u32) -> Result<Vec<HostMapping>, SourceError>;

    fn ingresses_for_node(&self, node_id: u32) -> Result<Vec<Ingress>, SourceError>;
}

/// In-memory record bundle, typically loaded from a YAML/JSON/TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    pub nodes: Vec<Node>,
    pub tunnels: Vec<Tunnel>,
    pub proxy_chains: Vec<ProxyChain>,
    pub proxy_chain_hops: Vec<ProxyChainHop>,
    pub node_groups: Vec<NodeGroup>,
    pub node_group_members: Vec<NodeGroupMember>,
    pub port_forwards: Vec<PortForward>,
    pub clients: Vec<Client>,
    pub bypasses: Vec<Bypass>,
    pub admissions: Vec<Admission>,
    pub host_mappings: Vec<HostMapping>,
    pub ingresses: Vec<Ingress>,
}

impl RecordSet {
    fn find_node(&self, id: u32) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Keep an embedded node, otherwise look it up by id.
    fn resolve(&self, embedded: &Option<Node>, id: u32) -> Option<Node> {
        embedded.clone().or_else(|| self.find_node(id).cloned())
    }

    fn scoped<T: NodeScoped + Clone>(records: &[T], node_id: u32) -> Vec<T> {
        records
            .iter()
            .filter(|r| r.applies_to(node_id))
            .cloned()
            .collect()
    }
}

impl RecordSource for RecordSet {
    fn node(&self, id: u32) -> Result<Option<Node>, SourceError> {
        Ok(self.find_node(id).cloned())
    }

    fn tunnel(&self, id: u32) -> Result<Option<Tunnel>, SourceError> {
        Ok(self.tunnels.iter().find(|t| t.id == id).map(|t| {
            let mut tunnel = t.clone();
            tunnel.entry_node = self.resolve(&t.entry_node, t.entry_node_id);
            tunnel.exit_node = self.resolve(&t.exit_node, t.exit_node_id);
            tunnel
        }))
    }

    fn proxy_chain(&self, id: u32) -> Result<Option<ProxyChain>, SourceError> {
        Ok(self.proxy_chains.iter().find(|c| c.id == id).cloned())
    }

    fn proxy_chain_hops(&self, chain_id: u32) -> Result<Vec<ProxyChainHop>, SourceError> {
        let mut hops: Vec<ProxyChainHop> = self
            .proxy_chain_hops
            .iter()
            .filter(|h| h.chain_id == chain_id)
            .map(|h| {
                let mut hop = h.clone();
                hop.node = self.resolve(&h.node, h.node_id);
                hop
            })
            .collect();
        hops.sort_by_key(|h| h.hop_order);
        Ok(hops)
    }

    fn node_group(&self, id: u32) -> Result<Option<NodeGroup>, SourceError> {
        Ok(self.node_groups.iter().find(|g| g.id == id).cloned())
    }

    fn node_group_members(&self, group_id: u32) -> Result<Vec<NodeGroupMember>, SourceError> {
        Ok(self
            .node_group_members
            .iter()
            .filter(|m| m.group_id == group_id)
            .map(|m| {
                let mut member = m.clone();
                member.node = self.resolve(&m.node, m.node_id);
                member
            })
            .collect())
    }

    fn port_forward(&self, id: u32) -> Result<Option<PortForward>, SourceError> {
        Ok(self.port_forwards.iter().find(|p| p.id == id).cloned())
    }

    fn client(&self, id: u32) -> Result<Option<Client>, SourceError> {
        Ok(self.clients.iter().find(|c| c.id == id).map(|c| {
            let mut client = c.clone();
            client.node = self.resolve(&c.node, c.node_id);
            client
        }))
    }

    fn bypasses_for_node(&self, node_id: u32) -> Result<Vec<Bypass>, SourceError> {
        Ok(Self::scoped(&self.bypasses, node_id))
    }

    fn admissions_for_node(&self, node_id: u32) -> Result<Vec<Admission>, SourceError> {
        Ok(Self::scoped(&self.admissions, node_id))
    }

    fn host_mappings_for_node(&self, node_id: u32) -> Result<Vec<HostMapping>, SourceError> {
        Ok(Self::scoped(&self.host_mappings, node_id))
    }

    fn ingresses_for_node(&self, node_id: u32) -> Result<Vec<Ingress>, SourceError> {
        Ok(Self::scoped(&self.ingresses, node_id))
    }
}
