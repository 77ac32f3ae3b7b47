//! Report data model: the immutable artifact handed to the presentation layer.

use serde::Serialize;

use crate::error::AnalysisError;

use super::frame::{FrameTimestamp, PERFECT_SCORE};
use super::issue::{Category, Issue, Severity};

pub const CONNECTION_ERROR_DESCRIPTION: &str =
    "Unable to connect to analysis backend. Please ensure the backend server is running.";
pub const CONNECTION_ERROR_SUMMARY: &str = "Analysis failed due to connection issues.";
pub const CONNECTION_ERROR_ADVICE: &str =
    "Check that the backend server is running on the configured API endpoint";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReportKind {
    Batch,
    Session,
    Snapshot,
    ConnectionError,
}

/// Per-category statistics for a live session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueBreakdown {
    pub category: Category,
    pub label: String,
    pub count: usize,
    /// `round(100 * count / sample_count)`; may exceed 100 when a frame
    /// reports the same category more than once (left and right knee).
    pub frequency_pct: u32,
    pub dominant_severity: Severity,
    pub mean_confidence_pct: u32,
    pub descriptions: Vec<String>,
    pub recommendations: Vec<String>,
}

/// First sighting of a category within a clip.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FirstOccurrence {
    pub issue: Issue,
    pub first_occurrence: FrameTimestamp,
    pub display_time: String,
}

/// One recent issue occurrence in a live session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub issue: Issue,
    pub frame_index: usize,
    pub occurred_at: FrameTimestamp,
    pub seconds_ago: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub sample_count: usize,
    pub frames_attempted: usize,
    pub duration_estimate_seconds: f64,
    pub average_score: u8,
    pub total_issues: usize,
    pub unique_category_count: usize,
    pub issue_breakdown: Vec<IssueBreakdown>,
    pub unique_issues: Vec<FirstOccurrence>,
    pub recent_detections: Vec<Detection>,
    pub summary_text: String,
    pub recommendations: Vec<String>,
    pub is_minimal: bool,
}

impl Report {
    pub(crate) fn empty(kind: ReportKind) -> Self {
        Self {
            kind,
            sample_count: 0,
            frames_attempted: 0,
            duration_estimate_seconds: 0.0,
            average_score: PERFECT_SCORE,
            total_issues: 0,
            unique_category_count: 0,
            issue_breakdown: Vec::new(),
            unique_issues: Vec::new(),
            recent_detections: Vec::new(),
            summary_text: String::new(),
            recommendations: Vec::new(),
            is_minimal: false,
        }
    }

    /// Terminal report shown when the classifier could not be reached before
    /// any sample was produced.
    pub fn connection_error() -> Self {
        let issue = Issue::new(
            Category::connection_error(),
            Severity::High,
            1.0,
            CONNECTION_ERROR_DESCRIPTION,
        );
        let first = FrameTimestamp::MediaOffset(0.0);

        Self {
            average_score: 0,
            total_issues: 1,
            unique_category_count: 1,
            unique_issues: vec![FirstOccurrence {
                issue,
                first_occurrence: first,
                display_time: first.display(None),
            }],
            summary_text: CONNECTION_ERROR_SUMMARY.to_string(),
            recommendations: vec![CONNECTION_ERROR_ADVICE.to_string()],
            ..Self::empty(ReportKind::ConnectionError)
        }
    }

    /// Report to show for a failed analysis, if the failure has one.
    /// Media load failures have none.
    pub fn for_failure(error: &AnalysisError) -> Option<Self> {
        error.is_connectivity().then(Self::connection_error)
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues > 0
    }
}
