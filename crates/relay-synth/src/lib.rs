//! Configuration synthesis for relay-engine instances.
//!
//! Turns domain records from `relay-model` into typed configuration
//! documents:
//!
//! - [`generate_node_config`] for a node's main service and rule blocks
//! - [`generate_chain_config`] and [`generate_proxy_chain_config`] for
//!   load-balancing groups and multi-hop chains
//! - [`generate_tunnel_entry_config`] / [`generate_tunnel_exit_config`] for
//!   the two sides of a reverse tunnel
//! - [`generate_client_config`] for a client agent behind NAT
//! - [`generate_proxy_uri`] and [`generate_client_proxy_uri`] for
//!   connection strings
//!
//! Every generator is a pure function of its input. Unknown protocol and
//! transport values and undecodable JSON payloads degrade to defaults
//! instead of failing; the only "cannot generate" outcome is a tunnel
//! without an exit node (or a client without a node), reported as `None`.

pub mod chain;
pub mod client;
pub mod document;
pub mod limit;
pub mod options;
pub mod protocol;
pub mod render;
pub mod rules;
pub mod service;
pub mod transport;
pub mod tunnel;
pub mod uri;

pub use chain::{
    SelectorStrategy, generate_chain_config, generate_proxy_chain_config,
    generate_proxy_chain_full_config,
};
pub use client::generate_client_config;
pub use document::{ChainConfig, Document, EncodeError, OutputFormat, ServiceConfig, encode};
pub use limit::format_rate;
pub use protocol::Protocol;
pub use render::RenderError;
pub use service::{build_handler, build_listener, generate_node_config, generate_port_forward_config};
pub use transport::Transport;
pub use tunnel::{generate_tunnel_entry_config, generate_tunnel_exit_config};
pub use uri::{generate_client_proxy_uri, generate_proxy_uri};
