//! Domain records for relay-panel.
//!
//! Records are owned and mutated by the storage layer. Everything in this
//! crate is read-only input for the generator in `relay-synth`: nodes,
//! tunnels, proxy chains, node groups, port forwards, clients and the
//! per-node rule records (bypass, admission, host mapping, ingress).
//!
//! Enumerated fields (`protocol`, `transport`, `strategy`) are kept as the
//! strings the storage layer holds; they are parsed into closed enums at the
//! generator boundary.

pub mod node;
pub mod rules;
pub mod source;
pub mod topology;

pub use node::Node;
pub use rules::{Admission, Bypass, HostMapping, Ingress};
pub use source::{RecordSet, RecordSource, SourceError};
pub use topology::{
    Client, NodeGroup, NodeGroupMember, PortForward, ProxyChain, ProxyChainHop, Tunnel,
};

pub(crate) fn default_true() -> bool {
    true
}
