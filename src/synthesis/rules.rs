//! Canned advice per issue category.
//!
//! The table is total over the categories the classifier is known to emit.
//! Anything else gets no advice here but still shows up in reports.

use std::collections::HashSet;

use crate::models::Category;

/// Fallback so a report never ships without a recommendation.
pub const DEFAULT_ADVICE: &str = "Continue maintaining good posture awareness";

const RULES: &[(&str, &[&str])] = &[
    (
        "knee_over_toe",
        &[
            "Keep your knees aligned over your ankles",
            "Widen your stance and engage your glutes",
        ],
    ),
    (
        "forward_lean",
        &[
            "Keep your chest up and maintain a neutral spine",
            "Engage your core muscles",
        ],
    ),
    (
        "forward_head",
        &["Pull your head back and align your ears over your shoulders"],
    ),
    (
        "forward_head_posture",
        &["Pull your head back and align your ears over your shoulders"],
    ),
    (
        "neck_bend",
        &["Keep your neck in a neutral position and avoid looking down at screens for long periods"],
    ),
    (
        "slouching",
        &["Sit up straight with your shoulders back and engage your core"],
    ),
    (
        "back_angle",
        &["Maintain a neutral spine and keep your chest up"],
    ),
];

/// Advice for one category; empty for categories the table does not know.
pub fn advice_for(category: &Category) -> &'static [&'static str] {
    RULES
        .iter()
        .find(|(key, _)| *key == category.as_str())
        .map(|(_, advice)| *advice)
        .unwrap_or(&[])
}

/// Advice for a sequence of categories, deduplicated in first-insertion
/// order, falling back to [`DEFAULT_ADVICE`] when nothing matched.
pub fn collect_advice<'a, I>(categories: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut seen = HashSet::new();
    let mut advice: Vec<String> = categories
        .into_iter()
        .flat_map(|category| advice_for(category).iter().copied())
        .filter(|line| seen.insert(*line))
        .map(|line| line.to_string())
        .collect();

    if advice.is_empty() {
        advice.push(DEFAULT_ADVICE.to_string());
    }
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knee_over_toe_has_two_cues() {
        let advice = advice_for(&Category::new("knee-over-toe"));
        assert_eq!(advice.len(), 2);
        assert!(advice[0].contains("knees aligned"));
    }

    #[test]
    fn unknown_category_contributes_nothing() {
        assert!(advice_for(&Category::new("hunched_back")).is_empty());
        assert_eq!(
            collect_advice(&[Category::new("hunched_back")]),
            vec![DEFAULT_ADVICE.to_string()]
        );
    }

    #[test]
    fn advice_is_deduplicated_in_insertion_order() {
        let categories = [
            Category::new("slouching"),
            Category::new("forward_head"),
            Category::new("forward_head_posture"),
            Category::new("slouching"),
        ];
        let advice = collect_advice(&categories);
        assert_eq!(
            advice,
            vec![
                "Sit up straight with your shoulders back and engage your core".to_string(),
                "Pull your head back and align your ears over your shoulders".to_string(),
            ]
        );
    }
}
