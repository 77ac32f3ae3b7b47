use std::collections::HashSet;

use crate::models::{FirstOccurrence, FrameEvent, Report, ReportKind};
use crate::synthesis::config::SynthesisConfig;
use crate::synthesis::rules::collect_advice;
use crate::synthesis::summary::{clip_summary, CLEAN_CLIP_ADVICE, CLEAN_CLIP_SUMMARY};

use super::rounded_mean_score;

/// Build a clip report from the frames a sampling walk retained.
///
/// Each category is reported once, with the payload and timestamp of its
/// first occurrence. Later occurrences only matter for advice.
pub fn synthesize_batch(events: &[FrameEvent], config: &SynthesisConfig) -> Report {
    let scorable: Vec<&FrameEvent> = events.iter().filter(|e| e.is_scorable()).collect();

    // Edge case: nothing usable came back from the walk
    if scorable.is_empty() {
        return Report {
            frames_attempted: events.len(),
            summary_text: CLEAN_CLIP_SUMMARY.to_string(),
            recommendations: vec![CLEAN_CLIP_ADVICE.to_string()],
            ..Report::empty(ReportKind::Batch)
        };
    }

    // Step 1: first occurrence per category, chronological
    let unique_issues = first_occurrences(&scorable);

    // Step 2: advice for every category present
    let recommendations = collect_advice(
        scorable
            .iter()
            .flat_map(|event| event.issues.iter().map(|issue| &issue.category)),
    );

    let total_issues = scorable.iter().map(|e| e.issues.len()).sum();

    Report {
        sample_count: scorable.len(),
        frames_attempted: events.len(),
        duration_estimate_seconds: config.duration_for(scorable.len()),
        average_score: rounded_mean_score(&scorable),
        total_issues,
        unique_category_count: unique_issues.len(),
        summary_text: clip_summary(unique_issues.len(), scorable.len()),
        unique_issues,
        recommendations,
        ..Report::empty(ReportKind::Batch)
    }
}

fn first_occurrences(events: &[&FrameEvent]) -> Vec<FirstOccurrence> {
    let mut ordered: Vec<&FrameEvent> = events.to_vec();
    ordered.sort_by(|a, b| {
        a.timestamp
            .seconds_from(None)
            .total_cmp(&b.timestamp.seconds_from(None))
            .then(a.frame_index.cmp(&b.frame_index))
    });

    let mut seen = HashSet::new();
    ordered
        .into_iter()
        .flat_map(|event| event.issues.iter().map(move |issue| (event, issue)))
        .filter(|(_, issue)| seen.insert(issue.category.clone()))
        .map(|(event, issue)| FirstOccurrence {
            issue: issue.clone(),
            first_occurrence: event.timestamp,
            display_time: event.timestamp.display(None),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrameTimestamp, Issue, Severity};
    use crate::synthesis::rules::DEFAULT_ADVICE;

    fn event(index: usize, at: f64, score: u8, categories: &[&str]) -> FrameEvent {
        FrameEvent {
            frame_index: index,
            timestamp: FrameTimestamp::MediaOffset(at),
            issues: categories
                .iter()
                .map(|c| Issue::new(*c, Severity::Moderate, 0.7, format!("{c} at {at}")))
                .collect(),
            score,
            pose_detected: true,
        }
    }

    #[test]
    fn empty_walk_is_a_clean_report() {
        let report = synthesize_batch(&[], &SynthesisConfig::default());
        assert_eq!(report.average_score, 100);
        assert!(report.unique_issues.is_empty());
        assert_eq!(report.recommendations, vec![CLEAN_CLIP_ADVICE.to_string()]);
        assert_eq!(report.summary_text, CLEAN_CLIP_SUMMARY);
        assert!(!report.is_minimal);
    }

    #[test]
    fn repeated_category_keeps_first_occurrence() {
        let events = vec![
            event(0, 0.0, 75, &["knee_over_toe"]),
            event(1, 0.5, 85, &["forward_lean"]),
            event(2, 1.0, 60, &["knee_over_toe"]),
        ];
        let report = synthesize_batch(&events, &SynthesisConfig::default());

        assert_eq!(report.unique_issues.len(), 2);
        assert_eq!(report.unique_issues[0].issue.category.as_str(), "knee_over_toe");
        assert_eq!(report.unique_issues[0].issue.description, "knee_over_toe at 0");
        assert_eq!(report.unique_issues[0].first_occurrence, FrameTimestamp::MediaOffset(0.0));
        assert_eq!(report.unique_issues[1].issue.category.as_str(), "forward_lean");
        assert_eq!(report.unique_issues[1].display_time, "0:00");
        assert_eq!(report.total_issues, 3);
        assert_eq!(report.average_score, 73);
        assert_eq!(report.duration_estimate_seconds, 1.5);
        assert_eq!(
            report.summary_text,
            "Video analysis complete! 2 unique issue(s) detected across 3 analyzed frames."
        );
    }

    #[test]
    fn advice_covers_every_category_in_first_seen_order() {
        let events = vec![
            event(0, 0.0, 70, &["slouching"]),
            event(1, 0.5, 70, &["knee_over_toe", "slouching"]),
        ];
        let report = synthesize_batch(&events, &SynthesisConfig::default());
        assert_eq!(report.recommendations.len(), 3);
        assert!(report.recommendations[0].starts_with("Sit up straight"));
        assert!(report.recommendations[1].contains("knees aligned"));
    }

    #[test]
    fn unknown_categories_are_kept_with_default_advice() {
        let events = vec![event(0, 3.0, 80, &["hunched_back"])];
        let report = synthesize_batch(&events, &SynthesisConfig::default());
        assert_eq!(report.unique_issues[0].issue.category.as_str(), "hunched_back");
        assert_eq!(report.recommendations, vec![DEFAULT_ADVICE.to_string()]);
    }

    #[test]
    fn out_of_order_input_is_scanned_chronologically() {
        let events = vec![
            event(1, 1.5, 70, &["forward_lean"]),
            event(0, 0.5, 70, &["forward_lean"]),
        ];
        let report = synthesize_batch(&events, &SynthesisConfig::default());
        assert_eq!(report.unique_issues[0].first_occurrence, FrameTimestamp::MediaOffset(0.5));
    }

    #[test]
    fn frames_without_pose_do_not_count() {
        let mut lost = event(1, 0.5, 0, &["forward_lean"]);
        lost.pose_detected = false;
        let events = vec![event(0, 0.0, 90, &["slouching"]), lost];
        let report = synthesize_batch(&events, &SynthesisConfig::default());
        assert_eq!(report.sample_count, 1);
        assert_eq!(report.frames_attempted, 2);
        assert_eq!(report.average_score, 90);
        assert_eq!(report.unique_issues.len(), 1);
    }

    #[test]
    fn synthesis_is_idempotent() {
        let events = vec![
            event(0, 0.0, 61, &["knee_over_toe", "forward_lean"]),
            event(1, 0.5, 94, &["neck_bend"]),
        ];
        let config = SynthesisConfig::default();
        assert_eq!(synthesize_batch(&events, &config), synthesize_batch(&events, &config));
    }
}
