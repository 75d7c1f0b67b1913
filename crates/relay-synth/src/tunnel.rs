//! Tunnel assembler: entry and exit documents of a reverse tunnel.

use relay_core::defaults::TUNNEL_LIMITER_NAME;
use relay_model::Tunnel;

use crate::chain::build_chain_node;
use crate::document::{
    ChainConfig, Document, ForwarderConfig, HandlerConfig, HopConfig, ListenerConfig,
    ServiceConfig,
};
use crate::limit::speed_limiter;
use crate::service::generate_node_config;

/// Transport served by one tunnel entry service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelProtocol {
    Tcp,
    Udp,
}

impl TunnelProtocol {
    /// Expand a tunnel's protocol selector. `tcp+udp` serves both on the
    /// same port; empty and unknown values are tcp.
    pub fn expand(selector: &str) -> &'static [TunnelProtocol] {
        match selector {
            "tcp+udp" | "udp+tcp" => &[Self::Tcp, Self::Udp],
            "udp" => &[Self::Udp],
            _ => &[Self::Tcp],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// Entry-side document: one service per protocol, all forwarding through
/// the single-hop chain to the exit node.
///
/// Returns `None` when the exit node is not set.
pub fn generate_tunnel_entry_config(tunnel: &Tunnel) -> Option<Document> {
    let exit = tunnel.exit_node.as_ref()?;

    let chain = ChainConfig {
        name: format!("tunnel-chain-{}", tunnel.id),
        hops: vec![HopConfig {
            name: "hop-0".to_string(),
            nodes: vec![build_chain_node(format!("exit-{}", exit.id), exit, None)],
            selector: None,
        }],
    };

    let addr = format!(":{}", tunnel.entry_port);
    let services = TunnelProtocol::expand(&tunnel.protocol)
        .iter()
        .map(|proto| {
            let handler = HandlerConfig {
                chain: Some(chain.name.clone()),
                ..HandlerConfig::of_type(proto.as_str())
            };
            let mut service = ServiceConfig::new(
                format!("tunnel-{}-{}", tunnel.id, proto.as_str()),
                addr.clone(),
                handler,
                ListenerConfig::of_type(proto.as_str()),
            );
            if !tunnel.target_addr.is_empty() {
                service.forwarder = Some(ForwarderConfig::target(&tunnel.target_addr));
            }
            if tunnel.speed_limit > 0 {
                service.limiter = Some(TUNNEL_LIMITER_NAME.to_string());
            }
            service
        })
        .collect();

    let limiters = if tunnel.speed_limit > 0 {
        vec![speed_limiter(TUNNEL_LIMITER_NAME, tunnel.speed_limit)]
    } else {
        Vec::new()
    };

    Some(Document {
        services,
        limiters,
        chains: vec![chain],
        ..Default::default()
    })
}

/// Exit-side document: the exit node's ordinary configuration without rule
/// blocks.
///
/// Returns `None` when the exit node is not set.
pub fn generate_tunnel_exit_config(tunnel: &Tunnel) -> Option<Document> {
    let exit = tunnel.exit_node.as_ref()?;
    Some(generate_node_config(exit, &[], &[], &[], &[]))
}
