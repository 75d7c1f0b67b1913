//! Chain assembler: load-balancing groups and sequential proxy chains.

use relay_core::DEGRADE_MISSING_NODE;
use relay_model::{Node, NodeGroup, NodeGroupMember, ProxyChain, ProxyChainHop};
use tracing::debug;

use crate::document::{
    Auth, ChainConfig, ChainNodeConfig, ConnectorConfig, DialerConfig, Document,
    ForwarderConfig, HandlerConfig, HopConfig, ListenerConfig, NodeMetadata, SelectorConfig,
    ServiceConfig,
};
use crate::options::tls_config;
use crate::protocol::{CredentialKind, Protocol};
use crate::transport::Transport;

/// Node selection strategy of a group hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorStrategy {
    #[default]
    Round,
    Random,
    Fifo,
    Hash,
}

impl SelectorStrategy {
    /// Parse a stored strategy. `round_robin`, empty and unknown values
    /// are `round`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "random" => Self::Random,
            "fifo" => Self::Fifo,
            "hash" => Self::Hash,
            "round" | "round_robin" | "" => Self::Round,
            other => {
                debug!(strategy = other, "unknown selector strategy, using round");
                Self::Round
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Random => "random",
            Self::Fifo => "fifo",
            Self::Hash => "hash",
        }
    }
}

/// Outbound connector for a node.
///
/// Protocols with embedded secrets carry them the way their handler does;
/// everything else authenticates with the proxy user when one is set.
pub fn build_connector(node: &Node) -> ConnectorConfig {
    let protocol = Protocol::parse_logged(&node.protocol);
    let kind = protocol.map(Protocol::name).unwrap_or_default().to_string();
    let auth = match protocol.map(|p| p.shape().credentials) {
        Some(CredentialKind::Shadowsocks) => Some(Auth::new(&node.ss_method, &node.ss_password)),
        Some(CredentialKind::Trojan) => Some(Auth::password_only(&node.trojan_password)),
        Some(CredentialKind::Vmess) => Some(Auth::username_only(&node.vmess_uuid)),
        _ if !node.proxy_user.is_empty() => Some(Auth::new(&node.proxy_user, &node.proxy_pass)),
        _ => None,
    };
    ConnectorConfig { kind, auth }
}

/// Outbound dialer for a node. Composite transports dial as tcp.
pub fn build_dialer(node: &Node) -> DialerConfig {
    let transport = Transport::normalize(&node.transport);
    let shape = transport.shape();
    DialerConfig {
        kind: shape.kind.to_string(),
        tls: (node.tls_enabled || shape.requires_tls).then(|| tls_config(node)),
    }
}

/// One next-hop node descriptor.
pub fn build_chain_node(name: String, node: &Node, weight: Option<u32>) -> ChainNodeConfig {
    ChainNodeConfig {
        name,
        addr: node.addr(),
        connector: build_connector(node),
        dialer: build_dialer(node),
        metadata: weight.map(|weight| NodeMetadata { weight }),
    }
}

/// Single-hop chain `chain-{group}` over the group's enabled members.
///
/// Members are ordered by descending priority, ties keep input order.
pub fn generate_chain_config(group: &NodeGroup, members: &[NodeGroupMember]) -> ChainConfig {
    let mut enabled: Vec<&NodeGroupMember> = members.iter().filter(|m| m.enabled).collect();
    enabled.sort_by_key(|m| std::cmp::Reverse(m.priority));

    let nodes = enabled
        .into_iter()
        .filter_map(|member| {
            let Some(node) = member.node.as_ref() else {
                debug!(
                    kind = DEGRADE_MISSING_NODE,
                    group_id = group.id,
                    node_id = member.node_id,
                    "skipping group member without node"
                );
                return None;
            };
            Some(build_chain_node(
                format!("node-{}", node.id),
                node,
                Some(member.weight.max(1)),
            ))
        })
        .collect();

    ChainConfig {
        name: format!("chain-{}", group.id),
        hops: vec![HopConfig {
            name: "hop-0".to_string(),
            nodes,
            selector: Some(SelectorConfig {
                strategy: SelectorStrategy::from_name(&group.strategy).as_str().to_string(),
                max_fails: group.max_fails,
                fail_timeout: format!("{}s", group.fail_timeout),
            }),
        }],
    }
}

fn proxy_chain_name(chain: &ProxyChain) -> String {
    format!("tunnel-{}", chain.id)
}

/// Sequential chain `tunnel-{chain}` with one hop per enabled hop record.
///
/// Hops are named after their `hop_order`; disabled hops leave a gap.
pub fn generate_proxy_chain_config(chain: &ProxyChain, hops: &[ProxyChainHop]) -> ChainConfig {
    let mut ordered: Vec<&ProxyChainHop> = hops.iter().collect();
    ordered.sort_by_key(|h| h.hop_order);

    let hops = ordered
        .into_iter()
        .filter(|hop| hop.enabled)
        .filter_map(|hop| {
            let Some(node) = hop.node.as_ref() else {
                debug!(
                    kind = DEGRADE_MISSING_NODE,
                    chain_id = chain.id,
                    node_id = hop.node_id,
                    "skipping chain hop without node"
                );
                return None;
            };
            Some(HopConfig {
                name: format!("hop-{}", hop.hop_order),
                nodes: vec![build_chain_node(format!("node-{}", node.id), node, None)],
                selector: None,
            })
        })
        .collect();

    ChainConfig {
        name: proxy_chain_name(chain),
        hops,
    }
}

/// Chain plus the `tunnel-service-{chain}` entry service that uses it.
pub fn generate_proxy_chain_full_config(chain: &ProxyChain, hops: &[ProxyChainHop]) -> Document {
    let chain_config = generate_proxy_chain_config(chain, hops);

    let handler_type = if !chain.target_addr.is_empty() {
        Protocol::Tcp.name()
    } else if chain.listen_type.is_empty() {
        Protocol::Socks5.name()
    } else {
        chain.listen_type.as_str()
    };
    let handler = HandlerConfig {
        chain: Some(chain_config.name.clone()),
        ..HandlerConfig::of_type(handler_type)
    };

    let mut service = ServiceConfig::new(
        format!("tunnel-service-{}", chain.id),
        &chain.listen_addr,
        handler,
        ListenerConfig::of_type(Transport::Tcp.kind()),
    );
    if !chain.target_addr.is_empty() {
        service.forwarder = Some(ForwarderConfig::target(&chain.target_addr));
    }

    Document {
        services: vec![service],
        chains: vec![chain_config],
        ..Default::default()
    }
}
