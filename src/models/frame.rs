//! Frame-level classification results.
//!
//! A `FrameEvent` is produced by whichever controller is active and handed by
//! value to the synthesizer. It never outlives the report built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::Classification;

use super::issue::Issue;

/// Score the classifier reports for a frame with no detected problem.
pub const PERFECT_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Auto,
    Squat,
    Sitting,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Auto => "auto",
            AnalysisType::Squat => "squat",
            AnalysisType::Sitting => "sitting",
        }
    }
}

/// When a frame was sampled: an offset into a clip, or a wall-clock instant
/// during a live session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FrameTimestamp {
    MediaOffset(f64),
    WallClock(DateTime<Utc>),
}

impl FrameTimestamp {
    /// Seconds since `origin` (wall-clock) or since the start of the clip.
    pub fn seconds_from(&self, origin: Option<DateTime<Utc>>) -> f64 {
        match (self, origin) {
            (FrameTimestamp::MediaOffset(seconds), _) => *seconds,
            (FrameTimestamp::WallClock(at), Some(origin)) => {
                (*at - origin).num_milliseconds() as f64 / 1000.0
            }
            (FrameTimestamp::WallClock(_), None) => 0.0,
        }
    }

    /// `m:ss` display text. Wall-clock stamps are shown relative to `origin`.
    pub fn display(&self, origin: Option<DateTime<Utc>>) -> String {
        format_clock(self.seconds_from(origin))
    }
}

/// Formats seconds as `m:ss`, e.g. `75.9` -> `1:15`. Negative or non-finite
/// input shows as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEvent {
    pub frame_index: usize,
    pub timestamp: FrameTimestamp,
    pub issues: Vec<Issue>,
    pub score: u8,
    pub pose_detected: bool,
}

impl FrameEvent {
    pub fn from_classification(
        frame_index: usize,
        timestamp: FrameTimestamp,
        classification: &Classification,
    ) -> Self {
        Self {
            frame_index,
            timestamp,
            issues: classification.issues.clone(),
            score: classification.posture_score.min(PERFECT_SCORE),
            pose_detected: classification.pose_detected,
        }
    }

    /// Only frames where a pose was found contribute to aggregate statistics.
    pub fn is_scorable(&self) -> bool {
        self.pose_detected
    }

    pub fn effective_score(&self) -> u8 {
        self.score.min(PERFECT_SCORE)
    }
}
