//! # relay-panel
//!
//! Configuration synthesis for a fleet of relay-engine nodes.
//!
//! ## Crates
//!
//! - [`relay_core`] - Default values and fixed block names
//! - [`relay_model`] - Domain records and record retrieval
//! - [`relay_synth`] - Document generators
//! - [`relay_config`] - Settings and record bundle loading
//! - [`relay_snapshot`] - Config-version snapshot store

pub mod cli;

pub use relay_config as config;
pub use relay_core as core;
pub use relay_model as model;
pub use relay_snapshot as snapshot;
pub use relay_synth as synth;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use relay_model::{Client, Node, RecordSet, RecordSource};
    pub use relay_snapshot::SnapshotStore;
    pub use relay_synth::{
        Document, OutputFormat, generate_chain_config, generate_client_config,
        generate_client_proxy_uri, generate_node_config, generate_proxy_chain_config,
        generate_proxy_uri, generate_tunnel_entry_config, generate_tunnel_exit_config,
    };
}
