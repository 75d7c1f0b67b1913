//! Rule injector.
//!
//! Bypass, admission, host-mapping and ingress records scoped to a node are
//! merged into at most one block each. Payloads are decoded here, at the
//! edge; a record whose JSON does not decode contributes nothing. A block
//! with no entries is not emitted, and nothing references a block that was
//! not emitted.

use relay_core::DEGRADE_RULE_PAYLOAD;
use relay_model::{Admission, Bypass, HostMapping, Ingress};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::document::{
    Document, HostMappingEntry, HostsConfig, IngressConfig, IngressRule, MatcherConfig,
    ServiceConfig,
};

fn decode_list<T: DeserializeOwned>(record: &'static str, id: u32, raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        debug!(
            kind = DEGRADE_RULE_PAYLOAD,
            record,
            id,
            error = %e,
            "skipping undecodable rule payload"
        );
        Vec::new()
    })
}

fn merge_matchers<'a>(
    name: String,
    record: &'static str,
    sets: impl Iterator<Item = (u32, bool, &'a str)>,
) -> Option<MatcherConfig> {
    let mut whitelist = false;
    let mut matchers = Vec::new();
    for (id, wl, raw) in sets {
        whitelist |= wl;
        matchers.extend(decode_list::<String>(record, id, raw));
    }
    if matchers.is_empty() {
        return None;
    }
    Some(MatcherConfig {
        name,
        whitelist,
        matchers,
    })
}

/// Merged `bypass-{node}` block.
pub fn merge_bypasses(node_id: u32, bypasses: &[Bypass]) -> Option<MatcherConfig> {
    merge_matchers(
        format!("bypass-{node_id}"),
        "bypass",
        bypasses
            .iter()
            .map(|b| (b.id, b.whitelist, b.matchers.as_str())),
    )
}

/// Merged `admission-{node}` block.
pub fn merge_admissions(node_id: u32, admissions: &[Admission]) -> Option<MatcherConfig> {
    merge_matchers(
        format!("admission-{node_id}"),
        "admission",
        admissions
            .iter()
            .map(|a| (a.id, a.whitelist, a.matchers.as_str())),
    )
}

/// Merged `hosts-{node}` block.
pub fn merge_host_mappings(node_id: u32, host_mappings: &[HostMapping]) -> Option<HostsConfig> {
    let mappings: Vec<HostMappingEntry> = host_mappings
        .iter()
        .flat_map(|hm| decode_list::<HostMappingEntry>("host_mapping", hm.id, &hm.mappings))
        .map(|mut entry| {
            entry.prefer = entry.prefer.filter(|p| !p.is_empty());
            entry
        })
        .collect();
    if mappings.is_empty() {
        return None;
    }
    Some(HostsConfig {
        name: format!("hosts-{node_id}"),
        mappings,
    })
}

/// Merged `ingress-{node}` block.
pub fn merge_ingresses(node_id: u32, ingresses: &[Ingress]) -> Option<IngressConfig> {
    let rules: Vec<IngressRule> = ingresses
        .iter()
        .flat_map(|ing| decode_list::<IngressRule>("ingress", ing.id, &ing.rules))
        .collect();
    if rules.is_empty() {
        return None;
    }
    Some(IngressConfig {
        name: format!("ingress-{node_id}"),
        rules,
    })
}

/// The rule blocks of one node, each present only if it has entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleBlocks {
    pub bypass: Option<MatcherConfig>,
    pub admission: Option<MatcherConfig>,
    pub hosts: Option<HostsConfig>,
    pub ingress: Option<IngressConfig>,
}

impl RuleBlocks {
    pub fn merge(
        node_id: u32,
        bypasses: &[Bypass],
        admissions: &[Admission],
        host_mappings: &[HostMapping],
        ingresses: &[Ingress],
    ) -> Self {
        Self {
            bypass: merge_bypasses(node_id, bypasses),
            admission: merge_admissions(node_id, admissions),
            hosts: merge_host_mappings(node_id, host_mappings),
            ingress: merge_ingresses(node_id, ingresses),
        }
    }

    /// Add the blocks to `doc` and reference them from `service`.
    ///
    /// Bypass and hosts are referenced by the handler, admission by the
    /// service. Ingress blocks are emitted without a reference.
    pub fn attach(self, doc: &mut Document, service: &mut ServiceConfig) {
        if let Some(bypass) = self.bypass {
            service.handler.bypass = Some(bypass.name.clone());
            doc.bypasses.push(bypass);
        }
        if let Some(admission) = self.admission {
            service.admission = Some(admission.name.clone());
            doc.admissions.push(admission);
        }
        if let Some(hosts) = self.hosts {
            service.handler.hosts = Some(hosts.name.clone());
            doc.hosts.push(hosts);
        }
        if let Some(ingress) = self.ingress {
            doc.ingresses.push(ingress);
        }
    }
}
