//! Service assembler: handler, listener and the full node document.

use relay_core::defaults::{
    CUSTOM_RESOLVER_NAME, MAIN_AUTHER_NAME, MAIN_SERVICE_NAME, METRICS_ADDR, RATE_LIMITER_NAME,
    RESOLVER_PREFER, SOCKS5_UDP_BUFFER_SIZE, SPEED_LIMITER_NAME, STATS_OBSERVER_NAME, TUN_NET,
};
use relay_model::{Admission, Bypass, HostMapping, Ingress, Node, PortForward};

use crate::document::{
    ApiConfig, Auth, AutherConfig, Document, ForwarderConfig, HandlerConfig, HandlerMetadata,
    ListenerConfig, MetricsConfig, NameserverConfig, ObserverConfig, PluginConfig,
    ResolverConfig, ServiceConfig,
};
use crate::limit::{rate_limiter, speed_limiter};
use crate::options::{kcp_metadata, tls_config, ws_metadata};
use crate::protocol::{CredentialKind, MetadataKind, Protocol};
use crate::rules::RuleBlocks;
use crate::transport::Transport;

/// Handler for the node's protocol and credentials.
///
/// Unknown protocols yield a handler with an empty type. The custom
/// resolver is referenced either way.
pub fn build_handler(node: &Node) -> HandlerConfig {
    let mut handler = Protocol::parse_logged(&node.protocol)
        .map(|protocol| protocol_handler(protocol, node))
        .unwrap_or_default();

    if !node.dns_server.is_empty() {
        handler.resolver = Some(CUSTOM_RESOLVER_NAME.to_string());
    }

    handler
}

fn protocol_handler(protocol: Protocol, node: &Node) -> HandlerConfig {
    let shape = protocol.shape();
    let mut handler = HandlerConfig::of_type(shape.handler_type);

    match shape.credentials {
        CredentialKind::None => {}
        CredentialKind::Auther => {
            if !node.proxy_user.is_empty() {
                handler.auther = Some(MAIN_AUTHER_NAME.to_string());
            }
        }
        CredentialKind::Shadowsocks => {
            handler.auth = Some(Auth::new(&node.ss_method, &node.ss_password));
        }
        CredentialKind::Trojan => {
            handler.auth = Some(Auth::password_only(&node.trojan_password));
        }
        CredentialKind::Vmess => {
            handler.auth = Some(Auth::username_only(&node.vmess_uuid));
        }
    }

    handler.metadata = match shape.metadata {
        MetadataKind::None => None,
        MetadataKind::Socks5Udp => Some(HandlerMetadata::Socks5 {
            bind: true,
            udp: true,
            udp_buffer_size: SOCKS5_UDP_BUFFER_SIZE,
        }),
        MetadataKind::VmessAlterId => Some(HandlerMetadata::Vmess {
            alter_id: node.vmess_alter_id,
        }),
        MetadataKind::TunNet => Some(HandlerMetadata::Tun {
            net: TUN_NET.to_string(),
        }),
    };

    handler
}

/// Listener for the node's transport.
///
/// sshd, redirect and tun protocols force their own listener type.
pub fn build_listener(node: &Node) -> ListenerConfig {
    if let Some(forced) = Protocol::from_name(&node.protocol)
        .and_then(|p| p.shape().forced_listener)
    {
        return ListenerConfig::of_type(forced);
    }

    let transport = Transport::normalize(&node.transport);
    let shape = transport.shape();
    let mut listener = ListenerConfig::of_type(shape.kind);

    if shape.requires_tls {
        listener.tls = Some(tls_config(node));
    }
    if shape.websocket {
        listener.metadata = ws_metadata(node);
    } else if shape.kcp {
        listener.metadata = Some(kcp_metadata(node));
    }

    listener
}

/// The node's `main-service` with limiter references.
fn main_service(node: &Node) -> ServiceConfig {
    let mut service = ServiceConfig::new(
        MAIN_SERVICE_NAME,
        format!(":{}", node.port),
        build_handler(node),
        build_listener(node),
    );
    service.observer = Some(STATS_OBSERVER_NAME.to_string());
    if node.speed_limit > 0 {
        service.limiter = Some(SPEED_LIMITER_NAME.to_string());
    }
    if node.conn_rate_limit > 0 {
        service.rlimiter = Some(RATE_LIMITER_NAME.to_string());
    }
    service
}

/// Complete relay-engine document for one node.
pub fn generate_node_config(
    node: &Node,
    bypasses: &[Bypass],
    admissions: &[Admission],
    host_mappings: &[HostMapping],
    ingresses: &[Ingress],
) -> Document {
    let mut doc = Document {
        api: Some(ApiConfig {
            addr: format!(":{}", node.api_port),
            auth: (!node.api_user.is_empty()).then(|| Auth::new(&node.api_user, &node.api_pass)),
        }),
        metrics: Some(MetricsConfig {
            addr: METRICS_ADDR.to_string(),
        }),
        observers: vec![ObserverConfig {
            name: STATS_OBSERVER_NAME.to_string(),
            plugin: PluginConfig {
                kind: "http".to_string(),
                addr: format!(
                    "http://127.0.0.1:{}/observers/{STATS_OBSERVER_NAME}",
                    node.api_port
                ),
            },
        }],
        ..Default::default()
    };

    let mut service = main_service(node);

    if !node.proxy_user.is_empty() {
        doc.authers.push(AutherConfig {
            name: MAIN_AUTHER_NAME.to_string(),
            auths: vec![Auth::new(&node.proxy_user, &node.proxy_pass)],
        });
    }
    if node.speed_limit > 0 {
        doc.limiters
            .push(speed_limiter(SPEED_LIMITER_NAME, node.speed_limit));
    }
    if node.conn_rate_limit > 0 {
        doc.rlimiters
            .push(rate_limiter(RATE_LIMITER_NAME, node.conn_rate_limit));
    }
    if !node.dns_server.is_empty() {
        doc.resolvers.push(ResolverConfig {
            name: CUSTOM_RESOLVER_NAME.to_string(),
            nameservers: vec![NameserverConfig {
                addr: node.dns_server.clone(),
                prefer: RESOLVER_PREFER.to_string(),
            }],
        });
    }

    RuleBlocks::merge(node.id, bypasses, admissions, host_mappings, ingresses)
        .attach(&mut doc, &mut service);
    doc.services.push(service);

    doc
}

/// Single-service document fragment for a plain port forward.
pub fn generate_port_forward_config(forward: &PortForward) -> ServiceConfig {
    let mut service = ServiceConfig::new(
        &forward.name,
        &forward.local_addr,
        HandlerConfig::of_type(&forward.kind),
        ListenerConfig::of_type(&forward.kind),
    );
    service.forwarder = Some(ForwarderConfig::target(&forward.remote_addr));
    service
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ListenerMetadata, TlsConfig};
    use serde_json::json;

    fn node(protocol: &str, transport: &str) -> Node {
        Node {
            id: 1,
            host: "198.51.100.7".into(),
            protocol: protocol.into(),
            transport: transport.into(),
            ..Default::default()
        }
    }

    #[test]
    fn handler_type_for_every_protocol() {
        for protocol in Protocol::ALL {
            let handler = build_handler(&node(protocol.name(), "tcp"));
            assert_eq!(handler.kind, protocol.name());
        }
        assert_eq!(build_handler(&node("", "")).kind, "socks5");
    }

    #[test]
    fn unknown_protocol_has_empty_type() {
        let handler = build_handler(&node("wireguard", "tcp"));
        assert_eq!(serde_json::to_value(&handler).unwrap(), json!({"type": ""}));
    }

    #[test]
    fn unknown_protocol_still_references_resolver() {
        let mut n = node("wireguard", "tcp");
        n.dns_server = "1.1.1.1:53".into();
        let doc = generate_node_config(&n, &[], &[], &[], &[]);
        let service = &doc.services[0];
        assert_eq!(service.handler.kind, "");
        assert_eq!(service.handler.resolver.as_deref(), Some("custom-resolver"));
        assert_eq!(doc.resolvers[0].name, "custom-resolver");
    }

    #[test]
    fn socks5_metadata_and_auther() {
        let mut n = node("socks5", "tcp");
        n.proxy_user = "alice".into();
        n.proxy_pass = "secret".into();
        assert_eq!(
            serde_json::to_value(build_handler(&n)).unwrap(),
            json!({
                "type": "socks5",
                "auther": "main-auth",
                "metadata": {"bind": true, "udp": true, "udpBufferSize": 4096}
            })
        );
    }

    #[test]
    fn auther_only_with_username() {
        assert!(build_handler(&node("http", "tcp")).auther.is_none());
        let mut n = node("sshd", "tcp");
        n.proxy_user = "ops".into();
        assert_eq!(build_handler(&n).auther.as_deref(), Some("main-auth"));
    }

    #[test]
    fn embedded_credentials() {
        let mut ss = node("ss", "tcp");
        ss.ss_method = "chacha20-ietf-poly1305".into();
        ss.ss_password = "pw".into();
        assert_eq!(
            serde_json::to_value(build_handler(&ss)).unwrap(),
            json!({"type": "ss", "auth": {"username": "chacha20-ietf-poly1305", "password": "pw"}})
        );

        let mut trojan = node("trojan", "tls");
        trojan.trojan_password = "tpw".into();
        assert_eq!(
            serde_json::to_value(build_handler(&trojan)).unwrap(),
            json!({"type": "trojan", "auth": {"password": "tpw"}})
        );

        let mut vmess = node("vmess", "ws");
        vmess.vmess_uuid = "b831381d-6324-4d53-ad4f-8cda48b30811".into();
        vmess.vmess_alter_id = 0;
        assert_eq!(
            serde_json::to_value(build_handler(&vmess)).unwrap(),
            json!({
                "type": "vmess",
                "auth": {"username": "b831381d-6324-4d53-ad4f-8cda48b30811"},
                "metadata": {"alterID": 0}
            })
        );
    }

    #[test]
    fn tun_net_and_resolver() {
        let mut n = node("tun", "");
        n.dns_server = "1.1.1.1:53".into();
        assert_eq!(
            serde_json::to_value(build_handler(&n)).unwrap(),
            json!({"type": "tun", "metadata": {"net": "198.18.0.0/15"}, "resolver": "custom-resolver"})
        );
    }

    #[test]
    fn listener_type_for_every_transport() {
        for transport in Transport::ALL {
            let name = if transport == Transport::TcpUdp { "tcp+udp" } else { transport.kind() };
            assert_eq!(build_listener(&node("socks5", name)).kind, transport.kind());
        }
        assert_eq!(build_listener(&node("socks5", "")).kind, "tcp");
        assert_eq!(build_listener(&node("socks5", "bogus")).kind, "tcp");
    }

    #[test]
    fn forced_listener_overrides_transport() {
        for protocol in ["sshd", "redirect", "tun"] {
            let listener = build_listener(&node(protocol, "wss"));
            assert_eq!(listener.kind, protocol);
            assert!(listener.tls.is_none());
            assert!(listener.metadata.is_none());
        }
    }

    #[test]
    fn tls_attached_even_when_empty() {
        let listener = build_listener(&node("http", "h2"));
        assert_eq!(listener.tls, Some(TlsConfig::default()));
        assert!(build_listener(&node("http", "h2c")).tls.is_none());
    }

    #[test]
    fn wss_has_tls_and_ws_metadata() {
        let mut n = node("vmess", "wss");
        n.ws_path = "/ray".into();
        n.tls_sni = "edge.example.com".into();
        assert_eq!(
            serde_json::to_value(build_listener(&n)).unwrap(),
            json!({
                "type": "wss",
                "tls": {"serverName": "edge.example.com"},
                "metadata": {"path": "/ray"}
            })
        );
    }

    #[test]
    fn kcp_listener_has_metadata() {
        let listener = build_listener(&node("socks5", "kcp"));
        assert!(matches!(listener.metadata, Some(ListenerMetadata::Kcp { .. })));
    }

    #[test]
    fn minimal_node_document() {
        let doc = generate_node_config(&node("", ""), &[], &[], &[], &[]);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "api": {"addr": ":18080"},
                "metrics": {"addr": ":9000"},
                "observers": [{
                    "name": "stats-observer",
                    "plugin": {"type": "http", "addr": "http://127.0.0.1:18080/observers/stats-observer"}
                }],
                "services": [{
                    "name": "main-service",
                    "addr": ":38567",
                    "observer": "stats-observer",
                    "handler": {
                        "type": "socks5",
                        "metadata": {"bind": true, "udp": true, "udpBufferSize": 4096}
                    },
                    "listener": {"type": "tcp"}
                }]
            })
        );
    }

    #[test]
    fn limits_auth_and_resolver_blocks() {
        let mut n = node("http", "tcp");
        n.api_user = "admin".into();
        n.api_pass = "apipw".into();
        n.proxy_user = "u".into();
        n.proxy_pass = "p".into();
        n.speed_limit = 1024;
        n.conn_rate_limit = 20;
        n.dns_server = "8.8.8.8:53".into();

        let value = serde_json::to_value(generate_node_config(&n, &[], &[], &[], &[])).unwrap();
        assert_eq!(value["api"]["auth"], json!({"username": "admin", "password": "apipw"}));
        assert_eq!(
            value["authers"],
            json!([{"name": "main-auth", "auths": [{"username": "u", "password": "p"}]}])
        );
        assert_eq!(value["limiters"], json!([{"name": "speed-limiter", "limits": ["$ 1.00KB"]}]));
        assert_eq!(value["rlimiters"], json!([{"name": "rate-limiter", "limits": ["$ 20/s"]}]));
        assert_eq!(
            value["resolvers"],
            json!([{"name": "custom-resolver", "nameservers": [{"addr": "8.8.8.8:53", "prefer": "ipv4"}]}])
        );
        let service = &value["services"][0];
        assert_eq!(service["limiter"], "speed-limiter");
        assert_eq!(service["rlimiter"], "rate-limiter");
        assert_eq!(service["handler"]["auther"], "main-auth");
        assert_eq!(service["handler"]["resolver"], "custom-resolver");
    }

    #[test]
    fn port_forward_service() {
        let pf = PortForward {
            id: 4,
            node_id: 1,
            name: "ssh-forward".into(),
            kind: "tcp".into(),
            local_addr: ":2222".into(),
            remote_addr: "10.0.0.2:22".into(),
            chain_id: None,
            enabled: true,
        };
        assert_eq!(
            serde_json::to_value(generate_port_forward_config(&pf)).unwrap(),
            json!({
                "name": "ssh-forward",
                "addr": ":2222",
                "handler": {"type": "tcp"},
                "listener": {"type": "tcp"},
                "forwarder": {"nodes": [{"name": "target", "addr": "10.0.0.2:22"}]}
            })
        );
    }
}
