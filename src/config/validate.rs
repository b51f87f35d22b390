// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PathwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PathwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.registry, raw.notifier, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_registry(cfg)?;
    validate_notifier(cfg)?;
    validate_watch_entries(cfg)?;
    Ok(())
}

fn validate_registry(cfg: &RawConfigFile) -> Result<()> {
    if cfg.registry.request_buffer == 0 {
        return Err(PathwatchError::ConfigError(
            "[registry].request_buffer must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.registry.max_concurrent_dispatch == Some(0) {
        return Err(PathwatchError::ConfigError(
            "[registry].max_concurrent_dispatch must be >= 1 when set (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_notifier(cfg: &RawConfigFile) -> Result<()> {
    // The backend kind is strongly typed and validated during deserialization.
    if cfg.notifier.poll_interval_ms == 0 {
        return Err(PathwatchError::ConfigError(
            "[notifier].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch_entries(cfg: &RawConfigFile) -> Result<()> {
    // Duplicate paths are fine: each entry becomes its own observer.
    for (idx, entry) in cfg.watch.iter().enumerate() {
        if entry.path.trim().is_empty() {
            return Err(PathwatchError::ConfigError(format!(
                "[[watch]] entry #{} has an empty `path`",
                idx + 1
            )));
        }
    }
    Ok(())
}
