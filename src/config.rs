use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings, read from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth_latency_ms: u64,
    pub save_latency_ms: u64,
    pub analysis_latency_ms: u64,
    /// Autosave period while composing; `None` disables autosave.
    pub autosave_interval_secs: Option<u64>,
    pub toast_duration_ms: u64,
    pub export_dir: PathBuf,
    pub sample_entries: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auth_latency_ms: 1500,
            save_latency_ms: 1000,
            analysis_latency_ms: 1500,
            autosave_interval_secs: None,
            toast_duration_ms: 3000,
            export_dir: PathBuf::from("."),
            sample_entries: false,
        }
    }
}

impl Config {
    /// Load from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn auth_latency(&self) -> Duration {
        Duration::from_millis(self.auth_latency_ms)
    }

    pub fn save_latency(&self) -> Duration {
        Duration::from_millis(self.save_latency_ms)
    }

    pub fn analysis_latency(&self) -> Duration {
        Duration::from_millis(self.analysis_latency_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn autosave_interval(&self) -> Option<Duration> {
        self.autosave_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// No simulated latency at all. Used by tests.
    #[cfg(test)]
    pub fn instant() -> Self {
        Config {
            auth_latency_ms: 0,
            save_latency_ms: 0,
            analysis_latency_ms: 0,
            ..Self::default()
        }
    }
}
