//! Issue data model.
//!
//! One detected posture problem in one classified frame. Categories form an
//! open set: the classifier may invent new ones at any time and everything
//! downstream has to treat them generically.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_CATEGORY: &str = "unknown";
pub const CONNECTION_ERROR_CATEGORY: &str = "connection_error";

/// Normalized issue tag such as `knee_over_toe` or `slouching`.
///
/// Spelling variants (`knee-over-toe`, `Knee Over Toe`) collapse onto the
/// same tag so they aggregate together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Category(String);

impl Category {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized: String = raw
            .as_ref()
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        if normalized.is_empty() {
            Self(UNKNOWN_CATEGORY.to_string())
        } else {
            Self(normalized)
        }
    }

    pub fn connection_error() -> Self {
        Self(CONNECTION_ERROR_CATEGORY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title-cased display text: `knee_over_toe` becomes `Knee Over Toe`.
    pub fn label(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for Category {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "moderate" | "medium" => Some(Severity::Moderate),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Moderate
    }
}

/// A single posture problem reported by the classifier.
///
/// `confidence` and `severity` are independent signals; neither is derived
/// from the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub category: Category,
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint: Option<String>,
}

impl Issue {
    pub fn new(
        category: impl Into<Category>,
        severity: Severity,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            confidence,
            severity,
            description: description.into(),
            recommendation: None,
            joint: None,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_joint(mut self, joint: impl Into<String>) -> Self {
        self.joint = Some(joint.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_spellings_collapse() {
        assert_eq!(Category::new("knee-over-toe"), Category::new("knee_over_toe"));
        assert_eq!(Category::new(" Forward Head "), Category::new("forward_head"));
        assert_eq!(Category::new("").as_str(), UNKNOWN_CATEGORY);
    }

    #[test]
    fn category_label_is_title_cased() {
        assert_eq!(Category::new("knee_over_toe").label(), "Knee Over Toe");
        assert_eq!(Category::new("slouching").label(), "Slouching");
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Moderate);
        assert!(Severity::Moderate < Severity::High);
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("medium"), Some(Severity::Moderate));
        assert_eq!(Severity::parse("extreme"), None);
    }

    #[test]
    fn issue_serializes_category_as_type() {
        let issue = Issue::new("forward-lean", Severity::High, 0.75, "Forward lean detected");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["type"], "forward_lean");
        assert_eq!(json["severity"], "high");
        assert!(json.get("recommendation").is_none());
    }
}
