use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::models::AnalysisType;
use crate::sampling::SamplingConfig;
use crate::streaming::{PollingConfig, UndersizedPolicy};
use crate::synthesis::SynthesisConfig;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SamplingSettings {
    pub interval_secs: f64,
    pub classifier_timeout_ms: Option<u64>,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 0.5,
            classifier_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub history_capacity: usize,
    pub classifier_timeout_ms: Option<u64>,
    pub undersized: UndersizedPolicy,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            history_capacity: 10,
            classifier_timeout_ms: None,
            undersized: UndersizedPolicy::Minimal,
        }
    }
}

/// User-facing settings, stored as camelCase JSON. Every field is optional
/// in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub analysis_type: AnalysisType,
    pub sampling: SamplingSettings,
    pub polling: PollingSettings,
    pub synthesis: SynthesisConfig,
}

impl Settings {
    /// Read settings from `path`. A missing file gives defaults; an
    /// unparsable one is logged and also gives defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                log_warn!(
                    "settings at {} are invalid, using defaults: {err}",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }

    pub fn sampling_config(&self) -> SamplingConfig {
        SamplingConfig {
            interval_secs: self.sampling.interval_secs,
            analysis_type: self.analysis_type,
            classifier_timeout: self.sampling.classifier_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn polling_config(&self) -> PollingConfig {
        PollingConfig {
            interval: Duration::from_millis(self.polling.interval_ms),
            history_capacity: self.polling.history_capacity,
            analysis_type: self.analysis_type,
            classifier_timeout: self.polling.classifier_timeout_ms.map(Duration::from_millis),
            undersized: self.polling.undersized,
        }
    }

    pub fn synthesis_config(&self) -> SynthesisConfig {
        self.synthesis.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.polling_config(), PollingConfig::default());
        assert_eq!(settings.sampling_config(), SamplingConfig::default());
    }

    #[test]
    fn partial_file_fills_in_the_rest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "analysisType": "squat", "polling": { "intervalMs": 1000, "undersized": "discard" } }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        let polling = settings.polling_config();
        assert_eq!(polling.interval, Duration::from_millis(1000));
        assert_eq!(polling.undersized, UndersizedPolicy::Discard);
        assert_eq!(polling.history_capacity, 10);
        assert_eq!(settings.sampling_config().analysis_type, AnalysisType::Squat);
        assert_eq!(settings.synthesis_config().min_session_samples, 3);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.sampling.classifier_timeout_ms = Some(4000);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(
            loaded.sampling_config().classifier_timeout,
            Some(Duration::from_secs(4))
        );
    }
}
