use serde::{Deserialize, Serialize};

/// Fewest usable frames a live session needs before frequency and severity
/// statistics are computed. Below this the numbers are noise.
pub const MIN_SESSION_SAMPLES: usize = 3;

/// Tunables for report synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisConfig {
    /// Seconds between samples; used for the duration estimate.
    pub sampling_interval_secs: f64,

    /// Session reports below this many usable frames are minimal.
    pub min_session_samples: usize,

    /// How many recent issue occurrences a session report lists.
    pub recent_detection_limit: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            sampling_interval_secs: 0.5,
            min_session_samples: MIN_SESSION_SAMPLES,
            recent_detection_limit: 10,
        }
    }
}

impl SynthesisConfig {
    pub fn with_interval_secs(mut self, seconds: f64) -> Self {
        self.sampling_interval_secs = seconds;
        self
    }

    pub(crate) fn duration_for(&self, samples: usize) -> f64 {
        if self.sampling_interval_secs.is_finite() && self.sampling_interval_secs > 0.0 {
            samples as f64 * self.sampling_interval_secs
        } else {
            0.0
        }
    }
}
