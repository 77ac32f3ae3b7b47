use std::time::Duration;

use crate::models::AnalysisType;

/// Configuration for a seek-driven walk over a finite clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Gap between sampled instants, in media seconds
    pub interval_secs: f64,

    /// Hint forwarded to the classifier with every frame
    pub analysis_type: AnalysisType,

    /// Upper bound on a single classifier call; `None` waits indefinitely
    pub classifier_timeout: Option<Duration>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0.5,
            analysis_type: AnalysisType::Auto,
            classifier_timeout: None,
        }
    }
}
