use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::AnalysisType;

/// What `stop()` does with a session that collected too few usable frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum UndersizedPolicy {
    /// Emit a minimal report that asks for a longer session
    #[default]
    Minimal,
    /// Emit no report at all
    Discard,
}

/// Configuration for the live polling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollingConfig {
    /// Cadence between ticks
    pub interval: Duration,

    /// Capacity of the most-recent-first trend ring
    pub history_capacity: usize,

    /// Hint forwarded to the classifier on every tick
    pub analysis_type: AnalysisType,

    /// Upper bound on a single classifier call; `None` lets a hung call
    /// delay the next tick
    pub classifier_timeout: Option<Duration>,

    pub undersized: UndersizedPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            history_capacity: 10,
            analysis_type: AnalysisType::Auto,
            classifier_timeout: None,
            undersized: UndersizedPolicy::Minimal,
        }
    }
}

impl PollingConfig {
    /// Fast cadence for the live issues view.
    pub fn live_issues() -> Self {
        Self::default()
    }

    /// Slower cadence for the dashboard view.
    pub fn dashboard() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            ..Self::default()
        }
    }

    pub fn interval_secs(&self) -> f64 {
        self.interval.as_secs_f64()
    }
}
