//! Single-frame analysis: capture one still from a live source and report on it.

use crate::classifier::{ClassificationRequest, Classifier};
use crate::error::{AnalysisError, Result};
use crate::models::{AnalysisType, FirstOccurrence, FrameTimestamp, Report, ReportKind, PERFECT_SCORE};
use crate::streaming::LiveSource;
use crate::synthesis::collect_advice;
use crate::synthesis::summary::snapshot_summary;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub async fn analyze_snapshot(
    source: &dyn LiveSource,
    classifier: &dyn Classifier,
    analysis_type: AnalysisType,
) -> Result<Report> {
    let image = source
        .capture_still()
        .ok_or(AnalysisError::CaptureUnavailable)?;

    let classification = classifier
        .classify(ClassificationRequest::new(image, analysis_type))
        .await
        .map_err(|err| {
            log_error!("snapshot analysis failed: {err:?}");
            AnalysisError::ClassifierUnreachable {
                attempts: 1,
                last_error: format!("{err:#}"),
            }
        })?;

    let issues = if classification.pose_detected {
        classification.issues.clone()
    } else {
        Vec::new()
    };
    log_info!("snapshot analyzed: {} issue(s)", issues.len());

    let recommendations = if !classification.recommendations.is_empty() {
        classification.recommendations.clone()
    } else {
        collect_advice(issues.iter().map(|issue| &issue.category))
    };

    let at = FrameTimestamp::MediaOffset(0.0);
    let mut unique_categories: Vec<_> = issues.iter().map(|issue| &issue.category).collect();
    unique_categories.sort();
    unique_categories.dedup();

    Ok(Report {
        sample_count: usize::from(classification.pose_detected),
        frames_attempted: 1,
        average_score: if classification.pose_detected {
            classification.posture_score.min(PERFECT_SCORE)
        } else {
            PERFECT_SCORE
        },
        total_issues: issues.len(),
        unique_category_count: unique_categories.len(),
        summary_text: snapshot_summary(issues.len()),
        recommendations,
        unique_issues: issues
            .into_iter()
            .map(|issue| FirstOccurrence {
                issue,
                first_occurrence: at,
                display_time: at.display(None),
            })
            .collect(),
        ..Report::empty(ReportKind::Snapshot)
    })
}
