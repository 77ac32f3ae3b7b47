//! Natural-language verdicts.

use serde::Serialize;

/// Score bands for a session verdict. Cutoffs are inclusive lower bounds.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => ScoreBand::Excellent,
            70..=84 => ScoreBand::Good,
            50..=69 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

pub fn session_summary(average_score: u8, total_issues: usize, sample_count: usize) -> String {
    match ScoreBand::from_score(average_score) {
        ScoreBand::Excellent => {
            "Excellent session! You maintained good posture throughout most of the analysis."
                .to_string()
        }
        ScoreBand::Good => format!(
            "Good session with room for improvement. {total_issues} issues detected across {sample_count} frames."
        ),
        ScoreBand::Fair => {
            "Several posture issues detected. Focus on the recommendations to improve your form."
                .to_string()
        }
        ScoreBand::Poor => "Multiple posture concerns identified. Consider taking breaks and reviewing your posture frequently."
            .to_string(),
    }
}

pub const MINIMAL_SESSION_SUMMARY: &str = "Insufficient data collected. Please run the analysis for at least 2-3 seconds for meaningful results.";
pub const MINIMAL_SESSION_ADVICE: &str =
    "Run the analysis for a longer duration to get detailed insights";

pub const CLEAN_CLIP_SUMMARY: &str = "Video analysis complete! No posture issues detected.";
pub const CLEAN_CLIP_ADVICE: &str = "Keep up the good work!";

pub fn clip_summary(unique_categories: usize, sample_count: usize) -> String {
    format!(
        "Video analysis complete! {unique_categories} unique issue(s) detected across {sample_count} analyzed frames."
    )
}

pub fn snapshot_summary(issue_count: usize) -> String {
    if issue_count == 0 {
        "Great posture! No issues detected.".to_string()
    } else {
        format!("Analysis complete! {issue_count} posture issue(s) detected.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(85), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(84), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }

    #[test]
    fn good_band_reports_counts() {
        assert_eq!(
            session_summary(72, 9, 12),
            "Good session with room for improvement. 9 issues detected across 12 frames."
        );
        assert!(session_summary(40, 30, 12).starts_with("Multiple posture concerns"));
    }

    #[test]
    fn snapshot_summary_distinguishes_clean_frames() {
        assert_eq!(snapshot_summary(0), "Great posture! No issues detected.");
        assert_eq!(snapshot_summary(2), "Analysis complete! 2 posture issue(s) detected.");
    }
}
