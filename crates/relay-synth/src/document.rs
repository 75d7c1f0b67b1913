//! Typed model of the relay-engine configuration document.
//!
//! Field names and nesting follow the engine's config file format. Optional
//! parts are omitted when absent, never rendered as `null` or `[]`, and the
//! field order is fixed by declaration so identical input always encodes to
//! identical bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete configuration document for one relay-engine instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observers: Vec<ObserverConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authers: Vec<AutherConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub limiters: Vec<LimiterConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rlimiters: Vec<LimiterConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resolvers: Vec<ResolverConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bypasses: Vec<MatcherConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admissions: Vec<MatcherConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<HostsConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingresses: Vec<IngressConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chains: Vec<ChainConfig>,
}

/// Output encoding of a rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Encoding failure of a generated document.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode any generated fragment (document, chain, service).
pub fn encode<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, EncodeError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

impl Document {
    pub fn to_yaml(&self) -> Result<String, EncodeError> {
        encode(self, OutputFormat::Yaml)
    }

    pub fn to_json_pretty(&self) -> Result<String, EncodeError> {
        encode(self, OutputFormat::Json)
    }
}

// ── Shared ──

/// Username/password pair. Protocols that carry a single secret leave the
/// other half unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Auth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn username_only(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: None,
        }
    }

    pub fn password_only(password: impl Into<String>) -> Self {
        Self {
            username: None,
            password: Some(password.into()),
        }
    }
}

// ── Top-level blocks ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConfig {
    pub addr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsConfig {
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObserverConfig {
    pub name: String,
    pub plugin: PluginConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutherConfig {
    pub name: String,
    pub auths: Vec<Auth>,
}

/// Shared shape of `limiters` and `rlimiters` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimiterConfig {
    pub name: String,
    pub limits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverConfig {
    pub name: String,
    pub nameservers: Vec<NameserverConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameserverConfig {
    pub addr: String,
    pub prefer: String,
}

/// Shared shape of `bypasses` and `admissions` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatcherConfig {
    pub name: String,
    pub whitelist: bool,
    pub matchers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostsConfig {
    pub name: String,
    pub mappings: Vec<HostMappingEntry>,
}

/// One host mapping. Also the decoded form of a stored mapping record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMappingEntry {
    pub hostname: String,
    pub ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngressConfig {
    pub name: String,
    pub rules: Vec<IngressRule>,
}

/// One ingress route. Also the decoded form of a stored ingress record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressRule {
    pub hostname: String,
    pub endpoint: String,
}

// ── Services ──

/// One listening endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub addr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rlimiter: Option<String>,
    pub handler: HandlerConfig,
    pub listener: ListenerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarder: Option<ForwarderConfig>,
}

impl ServiceConfig {
    pub fn new(
        name: impl Into<String>,
        addr: impl Into<String>,
        handler: HandlerConfig,
        listener: ListenerConfig,
    ) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
            observer: None,
            admission: None,
            limiter: None,
            rlimiter: None,
            handler,
            listener,
            forwarder: None,
        }
    }
}

/// Protocol processor of a service. An empty `type` marks an unknown
/// protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HandlerConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auther: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HandlerMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bypass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<String>,
}

impl HandlerConfig {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HandlerMetadata {
    Socks5 {
        bind: bool,
        udp: bool,
        #[serde(rename = "udpBufferSize")]
        udp_buffer_size: u32,
    },
    Vmess {
        #[serde(rename = "alterID")]
        alter_id: u32,
    },
    Tun {
        net: String,
    },
    /// Local socks5 entry of a client that serves UDP itself and never
    /// routes through a chain.
    LocalSocks5 {
        udp: bool,
        #[serde(rename = "udpAddr")]
        udp_addr: String,
        #[serde(rename = "ignoreChain")]
        ignore_chain: bool,
    },
}

/// Transport acceptor of a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListenerConfig {
    #[serde(rename = "type")]
    pub kind: String,
    /// Chain used by reverse listeners (`rtcp`, `rudp`) to reach the
    /// remote side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListenerMetadata>,
}

impl ListenerConfig {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

/// TLS sub-document. Unset fields are left out, never filled with
/// placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListenerMetadata {
    WebSocket {
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        host: Option<String>,
    },
    Kcp {
        kcp: KcpConfig,
    },
    Keepalive {
        keepalive: bool,
    },
}

/// KCP tuning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KcpConfig {
    pub mtu: i64,
    pub sndwnd: i64,
    pub rcvwnd: i64,
    pub datashard: i64,
    pub parityshard: i64,
    pub dscp: i64,
    pub nodelay: i64,
    pub interval: i64,
    pub resend: i64,
    pub nc: i64,
    pub acknodelay: bool,
    pub smuxver: i64,
    pub smuxbuf: i64,
    pub streambuf: i64,
    pub keepalive: i64,
    pub snmpperiod: i64,
    pub tcp: bool,
    /// Engine KCP keys without a baseline value, e.g. `crypt` or `mode`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwarderConfig {
    pub nodes: Vec<ForwardNode>,
}

impl ForwarderConfig {
    /// Forwarder with a single `target` node.
    pub fn target(addr: impl Into<String>) -> Self {
        Self {
            nodes: vec![ForwardNode {
                name: relay_core::FORWARD_TARGET_NAME.to_string(),
                addr: addr.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardNode {
    pub name: String,
    pub addr: String,
}

// ── Chains ──

/// A named forwarding chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainConfig {
    pub name: String,
    pub hops: Vec<HopConfig>,
}

/// One stage of a chain; several nodes means load balancing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopConfig {
    pub name: String,
    pub nodes: Vec<ChainNodeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<SelectorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainNodeConfig {
    pub name: String,
    pub addr: String,
    pub connector: ConnectorConfig,
    pub dialer: DialerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectorConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialerConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeMetadata {
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorConfig {
    pub strategy: String,
    pub max_fails: u32,
    /// Duration string, e.g. `30s`.
    pub fail_timeout: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_parts_are_omitted() {
        let doc = Document {
            services: vec![ServiceConfig::new(
                "svc",
                ":1080",
                HandlerConfig::of_type("socks5"),
                ListenerConfig::of_type("tcp"),
            )],
            ..Default::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "services": [{
                    "name": "svc",
                    "addr": ":1080",
                    "handler": {"type": "socks5"},
                    "listener": {"type": "tcp"}
                }]
            })
        );
    }

    #[test]
    fn camel_case_keys() {
        let tls = TlsConfig {
            cert_file: Some("/etc/cert.pem".into()),
            key_file: None,
            server_name: Some("example.com".into()),
        };
        assert_eq!(
            serde_json::to_value(&tls).unwrap(),
            json!({"certFile": "/etc/cert.pem", "serverName": "example.com"})
        );

        let selector = SelectorConfig {
            strategy: "round".into(),
            max_fails: 3,
            fail_timeout: "30s".into(),
        };
        assert_eq!(
            serde_json::to_value(&selector).unwrap(),
            json!({"strategy": "round", "maxFails": 3, "failTimeout": "30s"})
        );
    }

    #[test]
    fn handler_metadata_is_flat() {
        let handler = HandlerConfig {
            metadata: Some(HandlerMetadata::Vmess { alter_id: 64 }),
            ..HandlerConfig::of_type("vmess")
        };
        assert_eq!(
            serde_json::to_value(&handler).unwrap(),
            json!({"type": "vmess", "metadata": {"alterID": 64}})
        );
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::from_name("yml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("toml"), None);
    }

    #[test]
    fn yaml_encoding_has_no_nulls() {
        let doc = Document {
            metrics: Some(MetricsConfig { addr: ":9000".into() }),
            ..Default::default()
        };
        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.starts_with("metrics:"));
        assert!(!yaml.contains("null"));
        assert!(!yaml.contains("services"));
    }
}
