use std::collections::HashMap;

use crate::models::{
    Category, Detection, FrameEvent, FrameTimestamp, Issue, IssueBreakdown, Report, ReportKind,
    Severity,
};
use crate::synthesis::clock::Clock;
use crate::synthesis::config::SynthesisConfig;
use crate::synthesis::rules::collect_advice;
use crate::synthesis::summary::{session_summary, MINIMAL_SESSION_ADVICE, MINIMAL_SESSION_SUMMARY};

use super::{percent, rounded_mean_score};

/// Accumulated observations for one category.
#[derive(Debug)]
struct CategoryStats {
    category: Category,
    count: usize,
    severities: Vec<Severity>,
    confidences: Vec<f64>,
    descriptions: Vec<String>,
    recommendations: Vec<String>,
}

impl CategoryStats {
    fn new(category: Category) -> Self {
        Self {
            category,
            count: 0,
            severities: Vec::new(),
            confidences: Vec::new(),
            descriptions: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn observe(&mut self, issue: &Issue) {
        self.count += 1;
        self.severities.push(issue.severity);
        self.confidences.push(issue.confidence);
        push_unique(&mut self.descriptions, Some(issue.description.as_str()));
        push_unique(&mut self.recommendations, issue.recommendation.as_deref());
    }

    fn into_breakdown(self, sample_count: usize) -> IssueBreakdown {
        let mean_confidence = if self.confidences.is_empty() {
            0.0
        } else {
            self.confidences.iter().sum::<f64>() / self.confidences.len() as f64
        };

        IssueBreakdown {
            label: self.category.label(),
            dominant_severity: dominant_severity(&self.severities).unwrap_or_default(),
            frequency_pct: percent(self.count as f64 / sample_count as f64),
            mean_confidence_pct: percent(mean_confidence),
            category: self.category,
            count: self.count,
            descriptions: self.descriptions,
            recommendations: self.recommendations,
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Picks the severity that represents a category.
///
/// Severities are stably sorted by ascending occurrence count and the last
/// element wins. With a clear majority that is the majority value; on a tie
/// it is whichever tied value occurs last in the input, so
/// `[High, High, Moderate, Moderate]` resolves to `Moderate`.
pub fn dominant_severity(severities: &[Severity]) -> Option<Severity> {
    let occurrences = |severity: Severity| severities.iter().filter(|s| **s == severity).count();

    let mut ordered = severities.to_vec();
    ordered.sort_by_key(|severity| occurrences(*severity));
    ordered.pop()
}

/// Build a session report from the full event log of a live session.
///
/// Frames without a detected pose are excluded from every statistic but
/// still counted in `frames_attempted`. Below
/// [`SynthesisConfig::min_session_samples`] usable frames the report is minimal.
pub fn synthesize_session(
    events: &[FrameEvent],
    config: &SynthesisConfig,
    clock: &dyn Clock,
) -> Report {
    let scorable: Vec<&FrameEvent> = events.iter().filter(|e| e.is_scorable()).collect();
    let sample_count = scorable.len();

    if sample_count < config.min_session_samples.max(1) {
        return minimal_report(sample_count, events.len(), config);
    }

    // Step 1: fold every issue into per-category stats, keeping first-seen order
    let (stats, _) = scorable.iter().flat_map(|event| event.issues.iter()).fold(
        (Vec::<CategoryStats>::new(), HashMap::<Category, usize>::new()),
        |(mut stats, mut index), issue| {
            let slot = *index.entry(issue.category.clone()).or_insert_with(|| {
                stats.push(CategoryStats::new(issue.category.clone()));
                stats.len() - 1
            });
            stats[slot].observe(issue);
            (stats, index)
        },
    );

    let total_issues: usize = stats.iter().map(|s| s.count).sum();
    let average_score = rounded_mean_score(&scorable);

    // Step 2: advice from the rule table, independent of issue-level advice
    let recommendations = collect_advice(stats.iter().map(|s| &s.category));

    let issue_breakdown: Vec<IssueBreakdown> = stats
        .into_iter()
        .map(|s| s.into_breakdown(sample_count))
        .collect();

    Report {
        kind: ReportKind::Session,
        sample_count,
        frames_attempted: events.len(),
        duration_estimate_seconds: config.duration_for(sample_count),
        average_score,
        total_issues,
        unique_category_count: issue_breakdown.len(),
        recent_detections: recent_detections(&scorable, config.recent_detection_limit, clock),
        summary_text: session_summary(average_score, total_issues, sample_count),
        issue_breakdown,
        unique_issues: Vec::new(),
        recommendations,
        is_minimal: false,
    }
}

fn minimal_report(sample_count: usize, frames_attempted: usize, config: &SynthesisConfig) -> Report {
    Report {
        sample_count,
        frames_attempted,
        duration_estimate_seconds: config.duration_for(sample_count),
        summary_text: MINIMAL_SESSION_SUMMARY.to_string(),
        recommendations: vec![MINIMAL_SESSION_ADVICE.to_string()],
        is_minimal: true,
        ..Report::empty(ReportKind::Session)
    }
}

/// The `limit` most recent issue occurrences, newest first.
fn recent_detections(events: &[&FrameEvent], limit: usize, clock: &dyn Clock) -> Vec<Detection> {
    let now = clock.now();

    events
        .iter()
        .rev()
        .flat_map(|event| event.issues.iter().rev().map(move |issue| (*event, issue)))
        .take(limit)
        .map(|(event, issue)| Detection {
            issue: issue.clone(),
            frame_index: event.frame_index,
            occurred_at: event.timestamp,
            seconds_ago: match event.timestamp {
                FrameTimestamp::WallClock(at) => Some((now - at).num_seconds().max(0)),
                FrameTimestamp::MediaOffset(_) => None,
            },
        })
        .collect()
}
