//! Classification constants for logging.
//!
//! Degraded inputs are logged with one of these kinds so operators can
//! grep for a stable token.

/// A rule record's JSON payload could not be decoded.
pub const DEGRADE_RULE_PAYLOAD: &str = "rule_payload";
/// A node's transport options JSON could not be decoded.
pub const DEGRADE_TRANSPORT_OPTS: &str = "transport_opts";
/// A protocol value is not in the protocol table.
pub const DEGRADE_UNKNOWN_PROTOCOL: &str = "unknown_protocol";
/// A transport value is not in the transport table.
pub const DEGRADE_UNKNOWN_TRANSPORT: &str = "unknown_transport";
/// A chain hop or group member has no resolvable node.
pub const DEGRADE_MISSING_NODE: &str = "missing_node";
