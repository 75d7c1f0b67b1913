//! Panel settings, record bundle loading and CLI overrides.
//!
//! Settings files may be TOML, YAML or JSON (comments allowed), chosen by
//! file extension. Every field has a default, so an absent settings file is
//! equivalent to an empty one.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

use serde::{Deserialize, Serialize};

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_records, load_settings};
pub use types::*;
pub use validate::validate_settings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub snapshots: SnapshotsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_toml_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "panel.toml",
            r#"
[records]
path = "/var/lib/relay/records.yaml"

[snapshots]
retention = 5

[output]
format = "json"
"#,
        );
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.records.path, "/var/lib/relay/records.yaml");
        assert_eq!(settings.snapshots.dir, "snapshots");
        assert_eq!(settings.snapshots.retention, 5);
        assert_eq!(settings.output.format, "json");
        assert_eq!(settings.logging.level, "info");
        validate_settings(&settings).unwrap();
    }

    #[test]
    fn load_json_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "panel.json",
            r#"{
  // where generated versions go
  "snapshots": {"dir": "/tmp/relay-snapshots"}
}"#,
        );
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.snapshots.dir, "/tmp/relay-snapshots");
        assert_eq!(settings.snapshots.retention, 20);
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "panel.ini", "records=1");
        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn load_yaml_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "records.yml",
            r#"
nodes:
  - id: 1
    host: 192.0.2.10
    protocol: ss
    ss_password: pw
node_groups:
  - id: 2
    strategy: round_robin
"#,
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records.nodes.len(), 1);
        assert_eq!(records.nodes[0].protocol, "ss");
        assert_eq!(records.node_groups[0].max_fails, 3);
        assert!(records.tunnels.is_empty());
    }

    #[test]
    fn overrides_win() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            format: Some("json".into()),
            retention: Some(3),
            ..Default::default()
        };
        apply_overrides(&mut settings, &overrides);
        assert_eq!(settings.output.format, "json");
        assert_eq!(settings.snapshots.retention, 3);
        assert_eq!(settings.records.path, "records.yaml");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut settings = Settings::default();
        validate_settings(&settings).unwrap();

        settings.snapshots.retention = 0;
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("snapshots.retention"));

        settings.snapshots.retention = 1;
        settings.output.format = "xml".into();
        assert!(matches!(
            validate_settings(&settings),
            Err(ConfigError::Validation(_))
        ));

        settings.output.format = "yaml".into();
        settings.records.path = "  ".into();
        assert!(validate_settings(&settings).is_err());
    }
}
