//! Persistent application settings.
//!
//! Settings live in `config.toml` inside the data directory. Missing file or
//! missing keys fall back to defaults; present but invalid values are
//! rejected rather than silently corrected.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

fn default_check_interval() -> u64 {
    30
}

fn default_upcoming_threshold() -> i64 {
    30
}

fn default_reminders_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Seconds between reminder scans.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Minutes before the due time a task counts as upcoming.
    #[serde(default = "default_upcoming_threshold")]
    pub upcoming_threshold_mins: i64,

    #[serde(default = "default_reminders_enabled")]
    pub reminders_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            check_interval_secs: default_check_interval(),
            upcoming_threshold_mins: default_upcoming_threshold(),
            reminders_enabled: default_reminders_enabled(),
        }
    }
}

impl Config {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_interval_secs == 0 {
            return Err(Error::InvalidConfig("check_interval_secs must be positive".into()));
        }
        if self.upcoming_threshold_mins <= 0 {
            return Err(Error::InvalidConfig("upcoming_threshold_mins must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_interval_secs, 30);
        assert_eq!(config.upcoming_threshold_mins, 30);
        assert!(config.reminders_enabled);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "check_interval_secs = 10\n").unwrap();
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.check_interval_secs, 10);
        assert_eq!(config.upcoming_threshold_mins, 30);
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            check_interval_secs: 5,
            upcoming_threshold_mins: 90,
            reminders_enabled: false,
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load_or_default(&path).unwrap(), config);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "check_interval_secs = 0\n").unwrap();
        assert!(matches!(
            Config::load_or_default(&path),
            Err(Error::InvalidConfig(_))
        ));

        let bad = Config { upcoming_threshold_mins: -5, ..Config::default() };
        assert!(bad.validate().is_err());
    }
}
