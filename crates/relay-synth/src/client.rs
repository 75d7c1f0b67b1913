//! Client assembler: the document run by a client agent behind NAT.
//!
//! The client serves socks5 on its own host and exposes that port on its
//! node through `rtcp`/`rudp` reverse listeners dialed over the node's
//! socks5 service.

use relay_core::defaults::{CLIENT_AUTHER_NAME, CLIENT_CHAIN_NAME, CLIENT_SOCKS5_SERVICE_NAME};
use relay_model::Client;

use crate::document::{
    Auth, AutherConfig, ChainConfig, ChainNodeConfig, ConnectorConfig, DialerConfig, Document,
    ForwarderConfig, HandlerConfig, HandlerMetadata, HopConfig, ListenerConfig, ListenerMetadata,
    ServiceConfig,
};

const REVERSE_KINDS: [(&str, &str); 2] = [("rtcp-tunnel", "rtcp"), ("rudp-tunnel", "rudp")];

fn local_socks5(client: &Client) -> ServiceConfig {
    let addr = format!(":{}", client.local_port);
    let handler = HandlerConfig {
        auther: Some(CLIENT_AUTHER_NAME.to_string()),
        metadata: Some(HandlerMetadata::LocalSocks5 {
            udp: true,
            udp_addr: addr.clone(),
            ignore_chain: true,
        }),
        ..HandlerConfig::of_type("socks5")
    };
    ServiceConfig::new(
        CLIENT_SOCKS5_SERVICE_NAME,
        addr,
        handler,
        ListenerConfig::of_type("tcp"),
    )
}

fn reverse_service(client: &Client, name: &str, kind: &str) -> ServiceConfig {
    let listener = ListenerConfig {
        chain: Some(CLIENT_CHAIN_NAME.to_string()),
        metadata: Some(ListenerMetadata::Keepalive { keepalive: true }),
        ..ListenerConfig::of_type(kind)
    };
    let mut service = ServiceConfig::new(
        name,
        format!(":{}", client.remote_port),
        HandlerConfig::of_type(kind),
        listener,
    );
    service.forwarder = Some(ForwarderConfig::target(format!(
        "127.0.0.1:{}",
        client.local_port
    )));
    service
}

/// Client agent document.
///
/// The chain always dials the node's socks5 service over tcp, using the
/// node's proxy credentials when a user is set. Returns `None` when the
/// client has no node.
pub fn generate_client_config(client: &Client) -> Option<Document> {
    let node = client.node.as_ref()?;

    let mut services = vec![local_socks5(client)];
    services.extend(
        REVERSE_KINDS
            .iter()
            .map(|(name, kind)| reverse_service(client, name, kind)),
    );

    let chain = ChainConfig {
        name: CLIENT_CHAIN_NAME.to_string(),
        hops: vec![HopConfig {
            name: "hop-0".to_string(),
            nodes: vec![ChainNodeConfig {
                name: "node-0".to_string(),
                addr: node.addr(),
                connector: ConnectorConfig {
                    kind: "socks5".to_string(),
                    auth: (!node.proxy_user.is_empty())
                        .then(|| Auth::new(&node.proxy_user, &node.proxy_pass)),
                },
                dialer: DialerConfig {
                    kind: "tcp".to_string(),
                    tls: None,
                },
                metadata: None,
            }],
            selector: None,
        }],
    };

    Some(Document {
        services,
        authers: vec![AutherConfig {
            name: CLIENT_AUTHER_NAME.to_string(),
            auths: vec![Auth::new(&client.proxy_user, &client.proxy_pass)],
        }],
        chains: vec![chain],
        ..Default::default()
    })
}
