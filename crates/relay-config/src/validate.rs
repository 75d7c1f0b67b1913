//! Settings validation logic.

use crate::Settings;
use crate::loader::ConfigError;

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.records.path.trim().is_empty() {
        return Err(ConfigError::Validation("records.path is empty".into()));
    }
    if settings.snapshots.dir.trim().is_empty() {
        return Err(ConfigError::Validation("snapshots.dir is empty".into()));
    }
    if settings.snapshots.retention == 0 {
        return Err(ConfigError::Validation(
            "snapshots.retention must be > 0".into(),
        ));
    }
    let valid_formats = ["yaml", "yml", "json"];
    if !valid_formats.contains(&settings.output.format.as_str()) {
        return Err(ConfigError::Validation(format!(
            "output.format must be one of: {:?}",
            valid_formats
        )));
    }
    if settings.logging.level.trim().is_empty() {
        return Err(ConfigError::Validation("logging.level is empty".into()));
    }
    Ok(())
}
