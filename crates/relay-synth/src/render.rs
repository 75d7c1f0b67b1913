//! Record-source facade.
//!
//! Fetches records through a [`RecordSource`] and runs the matching
//! generator. This is where a missing record, a tunnel without an exit
//! node or a client without a node becomes an error for the caller.

use relay_model::{RecordSource, SourceError};
use thiserror::Error;
use tracing::debug;

use crate::chain::{generate_chain_config, generate_proxy_chain_full_config};
use crate::client::generate_client_config;
use crate::document::{ChainConfig, Document, ServiceConfig};
use crate::service::{generate_node_config, generate_port_forward_config};
use crate::tunnel::{generate_tunnel_entry_config, generate_tunnel_exit_config};
use crate::uri::{generate_client_proxy_uri, generate_proxy_uri};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u32 },

    #[error("tunnel {0} has no exit node")]
    TunnelExitMissing(u32),

    #[error("client {0} has no node")]
    ClientNodeMissing(u32),

    #[error("record source: {0}")]
    Source(String),
}

impl From<SourceError> for RenderError {
    fn from(e: SourceError) -> Self {
        RenderError::Source(e.to_string())
    }
}

fn found<T>(record: Option<T>, kind: &'static str, id: u32) -> Result<T, RenderError> {
    record.ok_or(RenderError::NotFound { kind, id })
}

pub fn render_node(source: &dyn RecordSource, node_id: u32) -> Result<Document, RenderError> {
    let node = found(source.node(node_id)?, "node", node_id)?;
    let bypasses = source.bypasses_for_node(node_id)?;
    let admissions = source.admissions_for_node(node_id)?;
    let host_mappings = source.host_mappings_for_node(node_id)?;
    let ingresses = source.ingresses_for_node(node_id)?;
    debug!(
        node_id,
        bypasses = bypasses.len(),
        admissions = admissions.len(),
        host_mappings = host_mappings.len(),
        ingresses = ingresses.len(),
        "rendering node"
    );
    Ok(generate_node_config(
        &node,
        &bypasses,
        &admissions,
        &host_mappings,
        &ingresses,
    ))
}

pub fn render_tunnel_entry(
    source: &dyn RecordSource,
    tunnel_id: u32,
) -> Result<Document, RenderError> {
    let tunnel = found(source.tunnel(tunnel_id)?, "tunnel", tunnel_id)?;
    generate_tunnel_entry_config(&tunnel).ok_or(RenderError::TunnelExitMissing(tunnel_id))
}

pub fn render_tunnel_exit(
    source: &dyn RecordSource,
    tunnel_id: u32,
) -> Result<Document, RenderError> {
    let tunnel = found(source.tunnel(tunnel_id)?, "tunnel", tunnel_id)?;
    generate_tunnel_exit_config(&tunnel).ok_or(RenderError::TunnelExitMissing(tunnel_id))
}

pub fn render_node_group(
    source: &dyn RecordSource,
    group_id: u32,
) -> Result<ChainConfig, RenderError> {
    let group = found(source.node_group(group_id)?, "node group", group_id)?;
    let members = source.node_group_members(group_id)?;
    Ok(generate_chain_config(&group, &members))
}

/// Full proxy chain document (entry service plus chain).
pub fn render_proxy_chain(
    source: &dyn RecordSource,
    chain_id: u32,
) -> Result<Document, RenderError> {
    let chain = found(source.proxy_chain(chain_id)?, "proxy chain", chain_id)?;
    let hops = source.proxy_chain_hops(chain_id)?;
    Ok(generate_proxy_chain_full_config(&chain, &hops))
}

pub fn render_port_forward(
    source: &dyn RecordSource,
    forward_id: u32,
) -> Result<ServiceConfig, RenderError> {
    let forward = found(source.port_forward(forward_id)?, "port forward", forward_id)?;
    Ok(generate_port_forward_config(&forward))
}

pub fn render_proxy_uri(source: &dyn RecordSource, node_id: u32) -> Result<String, RenderError> {
    let node = found(source.node(node_id)?, "node", node_id)?;
    Ok(generate_proxy_uri(&node))
}

pub fn render_client(
    source: &dyn RecordSource,
    client_id: u32,
) -> Result<Document, RenderError> {
    let client = found(source.client(client_id)?, "client", client_id)?;
    generate_client_config(&client).ok_or(RenderError::ClientNodeMissing(client_id))
}

pub fn render_client_uri(
    source: &dyn RecordSource,
    client_id: u32,
) -> Result<String, RenderError> {
    let client = found(source.client(client_id)?, "client", client_id)?;
    generate_client_proxy_uri(&client).ok_or(RenderError::ClientNodeMissing(client_id))
}
