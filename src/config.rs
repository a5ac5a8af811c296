//! Engine configuration file support.
//!
//! Runtime knobs for the availability engine: safety caps, the calendar
//! fetch timeout and the degradation policy. Read from a TOML file or
//! assembled from defaults; every field has a serde default so a partial
//! file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::models::constants::{MAX_DAYS_TO_PROCESS, MAX_SLOTS_PER_DAY};

/// What to do when the calendar collaborator cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegradationPolicy {
    /// Fail the whole slot query. The safe default: never silently
    /// overbook against a calendar we could not read.
    #[default]
    FailClosed,
    /// Ignore the calendar source and flag the response as degraded.
    FailOpen,
}

/// Engine configuration, TOML section `[engine]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_slots_per_day")]
    pub max_slots_per_day: usize,
    #[serde(default = "default_max_days_to_process")]
    pub max_days_to_process: i64,
    /// Bounded timeout for one busy-interval fetch, in milliseconds.
    #[serde(default = "default_calendar_timeout_ms")]
    pub calendar_timeout_ms: u64,
    #[serde(default)]
    pub calendar_degradation: DegradationPolicy,
}

fn default_max_slots_per_day() -> usize {
    MAX_SLOTS_PER_DAY
}

fn default_max_days_to_process() -> i64 {
    MAX_DAYS_TO_PROCESS
}

fn default_calendar_timeout_ms() -> u64 {
    5_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_slots_per_day: default_max_slots_per_day(),
            max_days_to_process: default_max_days_to_process(),
            calendar_timeout_ms: default_calendar_timeout_ms(),
            calendar_degradation: DegradationPolicy::default(),
        }
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: Option<EngineConfig>,
}

impl EngineConfig {
    /// Load from a TOML file; missing `[engine]` section yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let file: ConfigFile = toml::from_str(&text)?;
        Ok(file.engine.unwrap_or_default())
    }

    /// Load from `TIMETIDE_CONFIG` if set, otherwise defaults.
    pub fn from_env() -> Self {
        match std::env::var("TIMETIDE_CONFIG") {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("failed to read engine config {}: {}; using defaults", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn calendar_timeout(&self) -> Duration {
        Duration::from_millis(self.calendar_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_slots_per_day, 100);
        assert_eq!(config.max_days_to_process, 90);
        assert_eq!(config.calendar_degradation, DegradationPolicy::FailClosed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let file: ConfigFile =
            toml::from_str("[engine]\nmax_days_to_process = 30\n").unwrap();
        let config = file.engine.unwrap();
        assert_eq!(config.max_days_to_process, 30);
        assert_eq!(config.max_slots_per_day, 100);
    }

    #[test]
    fn test_degradation_policy_parses() {
        let file: ConfigFile =
            toml::from_str("[engine]\ncalendar_degradation = \"fail_open\"\n").unwrap();
        assert_eq!(
            file.engine.unwrap().calendar_degradation,
            DegradationPolicy::FailOpen
        );
    }
}
