//! Node record.

use serde::{Deserialize, Serialize};

use relay_core::defaults::{DEFAULT_API_PORT, DEFAULT_NODE_PORT};

/// A relay-engine node (one VPS running the relay engine).
///
/// Empty strings mean "unset" for every optional text field. An empty
/// `protocol` is socks5 and an empty `transport` is tcp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub id: u32,
    pub name: String,
    /// Public address or domain.
    pub host: String,
    /// Relay-engine service port.
    pub port: u16,
    /// Control API port.
    pub api_port: u16,
    pub api_user: String,
    pub api_pass: String,
    pub proxy_user: String,
    pub proxy_pass: String,

    /// socks5 / socks4 / http / ss / trojan / vmess / relay / tcp / udp / ...
    pub protocol: String,
    /// tcp / tls / ws / wss / h2 / quic / kcp / ... or `tcp+udp`.
    pub transport: String,
    /// Free-form transport options JSON, e.g. `{"kcp": {"mtu": 1400}}`.
    pub transport_opts: String,

    pub ss_method: String,
    pub ss_password: String,
    pub trojan_password: String,
    pub vmess_uuid: String,
    pub vmess_alter_id: u32,

    pub tls_enabled: bool,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub tls_sni: String,
    /// Comma-separated ALPN list.
    pub tls_alpn: String,

    pub ws_path: String,
    pub ws_host: String,

    /// Bandwidth limit in bytes per second (0 = unlimited).
    pub speed_limit: u64,
    /// New connections per second (0 = unlimited).
    pub conn_rate_limit: u32,

    /// Custom DNS server address.
    pub dns_server: String,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            host: String::new(),
            port: DEFAULT_NODE_PORT,
            api_port: DEFAULT_API_PORT,
            api_user: String::new(),
            api_pass: String::new(),
            proxy_user: String::new(),
            proxy_pass: String::new(),
            protocol: String::new(),
            transport: String::new(),
            transport_opts: String::new(),
            ss_method: String::new(),
            ss_password: String::new(),
            trojan_password: String::new(),
            vmess_uuid: String::new(),
            vmess_alter_id: 0,
            tls_enabled: false,
            tls_cert_file: String::new(),
            tls_key_file: String::new(),
            tls_sni: String::new(),
            tls_alpn: String::new(),
            ws_path: String::new(),
            ws_host: String::new(),
            speed_limit: 0,
            conn_rate_limit: 0,
            dns_server: String::new(),
        }
    }
}

impl Node {
    /// `host:port` of the node's relay-engine service.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_record_uses_defaults() {
        let node: Node = serde_yaml::from_str("id: 3\nhost: 203.0.113.9\n").unwrap();
        assert_eq!(node.id, 3);
        assert_eq!(node.port, DEFAULT_NODE_PORT);
        assert_eq!(node.api_port, DEFAULT_API_PORT);
        assert!(node.protocol.is_empty());
        assert_eq!(node.addr(), "203.0.113.9:38567");
    }
}
