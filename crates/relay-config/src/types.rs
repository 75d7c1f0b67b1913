//! Settings sections.

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Where the record bundle lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsConfig {
    #[serde(default = "default_records_path")]
    pub path: String,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            path: default_records_path(),
        }
    }
}

/// Config-version snapshot storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotsConfig {
    #[serde(default = "default_snapshot_dir")]
    pub dir: String,
    /// Versions kept per node; older ones are pruned on save.
    #[serde(default = "default_snapshot_retention")]
    pub retention: usize,
}

impl Default for SnapshotsConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
            retention: default_snapshot_retention(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `yaml` or `json`.
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace/debug/info/warn/error) or a full
    /// `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
