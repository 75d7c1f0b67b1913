//! TLS, WebSocket and KCP option builders.

use relay_core::defaults::{
    KCP_ACKNODELAY, KCP_DATASHARD, KCP_DSCP, KCP_INTERVAL, KCP_KEEPALIVE, KCP_MTU, KCP_NC,
    KCP_NODELAY, KCP_PARITYSHARD, KCP_RCVWND, KCP_RESEND, KCP_SMUXBUF, KCP_SMUXVER,
    KCP_SNDWND, KCP_SNMPPERIOD, KCP_STREAMBUF, KCP_TCP,
};
use relay_core::DEGRADE_TRANSPORT_OPTS;
use relay_model::Node;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::document::{KcpConfig, ListenerMetadata, TlsConfig};

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// TLS sub-document from the node's certificate, key and SNI fields.
pub fn tls_config(node: &Node) -> TlsConfig {
    TlsConfig {
        cert_file: non_empty(&node.tls_cert_file),
        key_file: non_empty(&node.tls_key_file),
        server_name: non_empty(&node.tls_sni),
    }
}

/// WebSocket path/host metadata, or `None` when both are empty.
pub fn ws_metadata(node: &Node) -> Option<ListenerMetadata> {
    let path = non_empty(&node.ws_path);
    let host = non_empty(&node.ws_host);
    if path.is_none() && host.is_none() {
        return None;
    }
    Some(ListenerMetadata::WebSocket { path, host })
}

/// Decoded form of a node's free-form transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TransportOptions {
    /// Raw KCP entries, merged onto [`KcpConfig::BASELINE`] one key at a
    /// time.
    #[serde(default)]
    pub kcp: Option<Map<String, Value>>,
}

impl TransportOptions {
    /// Decode the stored options. Empty or malformed input yields no
    /// overrides.
    pub fn parse(node_id: u32, raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(opts) => opts,
            Err(e) => {
                debug!(
                    kind = DEGRADE_TRANSPORT_OPTS,
                    node_id,
                    error = %e,
                    "ignoring undecodable transport options"
                );
                Self::default()
            }
        }
    }
}

/// Integer view of a JSON number. Whole floats such as `1400.0` count.
fn as_int(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

impl KcpConfig {
    pub const BASELINE: KcpConfig = KcpConfig {
        mtu: KCP_MTU,
        sndwnd: KCP_SNDWND,
        rcvwnd: KCP_RCVWND,
        datashard: KCP_DATASHARD,
        parityshard: KCP_PARITYSHARD,
        dscp: KCP_DSCP,
        nodelay: KCP_NODELAY,
        interval: KCP_INTERVAL,
        resend: KCP_RESEND,
        nc: KCP_NC,
        acknodelay: KCP_ACKNODELAY,
        smuxver: KCP_SMUXVER,
        smuxbuf: KCP_SMUXBUF,
        streambuf: KCP_STREAMBUF,
        keepalive: KCP_KEEPALIVE,
        snmpperiod: KCP_SNMPPERIOD,
        tcp: KCP_TCP,
        extra: BTreeMap::new(),
    };

    /// Apply one override entry. Keys outside the baseline are passed
    /// through as-is; a baseline key with a value of the wrong type is
    /// rejected and the baseline value stays.
    pub fn apply(&mut self, key: &str, value: &Value) -> bool {
        let cfg = self;
        macro_rules! typed {
            ($conv:expr => $($field:ident),* $(,)?) => {
                $(if key == stringify!($field) {
                    return match $conv(value) {
                        Some(v) => {
                            cfg.$field = v;
                            true
                        }
                        None => false,
                    };
                })*
            };
        }
        typed!(as_int =>
            mtu, sndwnd, rcvwnd, datashard, parityshard, dscp, nodelay, interval, resend, nc,
            smuxver, smuxbuf, streambuf, keepalive, snmpperiod,
        );
        typed!(Value::as_bool => acknodelay, tcp);

        cfg.extra.insert(key.to_string(), value.clone());
        true
    }

    /// Baseline with every applicable override merged in.
    pub fn with_overrides(node_id: u32, overrides: Option<&Map<String, Value>>) -> Self {
        let mut cfg = Self::BASELINE;
        for (key, value) in overrides.into_iter().flatten() {
            if !cfg.apply(key, value) {
                debug!(
                    kind = DEGRADE_TRANSPORT_OPTS,
                    node_id,
                    key = %key,
                    value = %value,
                    "ignoring kcp override of the wrong type"
                );
            }
        }
        cfg
    }
}

/// KCP listener metadata for a node.
pub fn kcp_metadata(node: &Node) -> ListenerMetadata {
    let opts = TransportOptions::parse(node.id, &node.transport_opts);
    ListenerMetadata::Kcp {
        kcp: KcpConfig::with_overrides(node.id, opts.kcp.as_ref()),
    }
}
