//! CLI override definitions and application logic.

use clap::Parser;

use crate::Settings;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override record bundle path
    #[arg(long, global = true)]
    pub records: Option<String>,
    /// Override snapshot directory
    #[arg(long, global = true)]
    pub snapshot_dir: Option<String>,
    /// Override number of snapshots kept per node
    #[arg(long, global = true)]
    pub retention: Option<usize>,
    /// Override output format (yaml, json)
    #[arg(long, global = true)]
    pub format: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(settings: &mut Settings, overrides: &CliOverrides) {
    if let Some(v) = &overrides.records {
        settings.records.path = v.clone();
    }
    if let Some(v) = &overrides.snapshot_dir {
        settings.snapshots.dir = v.clone();
    }
    if let Some(v) = overrides.retention {
        settings.snapshots.retention = v;
    }
    if let Some(v) = &overrides.format {
        settings.output.format = v.clone();
    }
    if let Some(v) = &overrides.log_level {
        settings.logging.level = v.clone();
    }
}
