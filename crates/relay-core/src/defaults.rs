//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Record Defaults
// ============================================================================

/// Default relay-engine service port of a node.
pub const DEFAULT_NODE_PORT: u16 = 38567;
/// Default relay-engine control API port of a node.
pub const DEFAULT_API_PORT: u16 = 18080;
/// Default tunnel entry listen port.
pub const DEFAULT_TUNNEL_ENTRY_PORT: u16 = 10000;
/// Default local socks5 port of a client.
pub const DEFAULT_CLIENT_LOCAL_PORT: u16 = 38777;
/// Default node group fail timeout in seconds.
pub const DEFAULT_GROUP_FAIL_TIMEOUT_SECS: u32 = 30;
/// Default node group max failures before a member is marked dead.
pub const DEFAULT_GROUP_MAX_FAILS: u32 = 3;
/// Default node group health check interval in seconds.
pub const DEFAULT_GROUP_CHECK_INTERVAL_SECS: u32 = 30;
/// Default node group member weight.
pub const DEFAULT_MEMBER_WEIGHT: u32 = 1;
/// Default shadowsocks cipher used in connection URIs.
pub const DEFAULT_SS_METHOD: &str = "aes-256-gcm";

// ============================================================================
// Generated Document Names
// ============================================================================

/// Metrics listen address of every generated node document.
pub const METRICS_ADDR: &str = ":9000";
/// Name of the node's main service.
pub const MAIN_SERVICE_NAME: &str = "main-service";
/// Name of the observer that reports back to the control API.
pub const STATS_OBSERVER_NAME: &str = "stats-observer";
/// Name of the auther holding the node's proxy credentials.
pub const MAIN_AUTHER_NAME: &str = "main-auth";
/// Name of the bandwidth limiter.
pub const SPEED_LIMITER_NAME: &str = "speed-limiter";
/// Name of the connection rate limiter.
pub const RATE_LIMITER_NAME: &str = "rate-limiter";
/// Name of the custom DNS resolver.
pub const CUSTOM_RESOLVER_NAME: &str = "custom-resolver";
/// Name of the limiter shared by the services of a tunnel entry.
pub const TUNNEL_LIMITER_NAME: &str = "tunnel-limiter";
/// Name of a forwarder's single target node.
pub const FORWARD_TARGET_NAME: &str = "target";
/// Name of a client's local socks5 service.
pub const CLIENT_SOCKS5_SERVICE_NAME: &str = "local-socks5";
/// Name of the auther guarding a client's local socks5 service.
pub const CLIENT_AUTHER_NAME: &str = "local-auth";
/// Name of the chain a client dials its node through.
pub const CLIENT_CHAIN_NAME: &str = "forward-chain";
/// IP family preference of the custom resolver's nameserver.
pub const RESOLVER_PREFER: &str = "ipv4";

// ============================================================================
// Handler Defaults
// ============================================================================

/// UDP buffer size of the socks5 handler.
pub const SOCKS5_UDP_BUFFER_SIZE: u32 = 4096;
/// Virtual network of the tun handler.
pub const TUN_NET: &str = "198.18.0.0/15";

// ============================================================================
// KCP Baseline
// ============================================================================

pub const KCP_MTU: i64 = 1350;
pub const KCP_SNDWND: i64 = 1024;
pub const KCP_RCVWND: i64 = 1024;
pub const KCP_DATASHARD: i64 = 10;
pub const KCP_PARITYSHARD: i64 = 3;
pub const KCP_DSCP: i64 = 0;
pub const KCP_NODELAY: i64 = 1;
pub const KCP_INTERVAL: i64 = 20;
pub const KCP_RESEND: i64 = 2;
pub const KCP_NC: i64 = 1;
pub const KCP_ACKNODELAY: bool = false;
pub const KCP_SMUXVER: i64 = 1;
/// Session multiplexer buffer (4 MiB).
pub const KCP_SMUXBUF: i64 = 4_194_304;
/// Per-stream buffer (2 MiB).
pub const KCP_STREAMBUF: i64 = 2_097_152;
/// Keep-alive interval in seconds.
pub const KCP_KEEPALIVE: i64 = 10;
/// SNMP collection period in seconds.
pub const KCP_SNMPPERIOD: i64 = 60;
pub const KCP_TCP: bool = false;

// ============================================================================
// Panel Settings Defaults
// ============================================================================

/// Default record bundle path.
pub const DEFAULT_RECORDS_PATH: &str = "records.yaml";
/// Default snapshot directory.
pub const DEFAULT_SNAPSHOT_DIR: &str = "snapshots";
/// Default number of config versions kept per node.
pub const DEFAULT_SNAPSHOT_RETENTION: usize = 20;
/// Default output format of rendered documents.
pub const DEFAULT_OUTPUT_FORMAT: &str = "yaml";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
