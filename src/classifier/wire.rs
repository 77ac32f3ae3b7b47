//! Lenient decoding of classifier responses.
//!
//! The backend is an external service and its payloads drift: fields go
//! missing, spellings change between snake_case and camelCase, numbers arrive
//! as floats. Nothing in here fails on a missing field; absent values become
//! their neutral counterpart so a malformed frame aggregates as a zero-issue,
//! perfect-score frame instead of aborting synthesis.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{Category, Issue, Severity, StillImage, PERFECT_SCORE};

use super::Classification;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Confidence assumed when the classifier omits one.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawClassification {
    #[serde(alias = "poseDetected")]
    pose_detected: Option<bool>,
    issues: Option<Vec<Value>>,
    #[serde(alias = "postureScore")]
    posture_score: Option<Value>,
    recommendations: Option<Vec<Value>>,
    #[serde(alias = "jointAngles")]
    joint_angles: Option<Map<String, Value>>,
    #[serde(alias = "overlayImage")]
    pose_overlay: Option<String>,
    error: Option<String>,
}

/// Decode a response body.
pub fn decode_classification(body: &str) -> Result<Classification> {
    let value: Value =
        serde_json::from_str(body).context("classifier response is not valid JSON")?;
    decode_value(value)
}

/// Decode an already-parsed response. Fails only when the payload is not a
/// JSON object at all.
pub fn decode_value(value: Value) -> Result<Classification> {
    let raw: RawClassification = match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|err| {
            log_warn!("classifier response has unexpected field types, treating as empty: {err}");
            RawClassification::default()
        }),
        other => {
            return Err(anyhow::anyhow!(
                "classifier response must be a JSON object, got {}",
                type_name(&other)
            ))
        }
    };

    Ok(raw.into())
}

impl From<RawClassification> for Classification {
    fn from(raw: RawClassification) -> Self {
        if let Some(error) = raw.error.as_deref() {
            log_warn!("classifier reported an error, treating frame as no pose: {error}");
            return Classification::default();
        }

        let issues: Vec<Issue> = raw
            .issues
            .unwrap_or_default()
            .iter()
            .filter_map(decode_issue)
            .collect();

        let recommendations = raw
            .recommendations
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match value {
                Value::String(text) if !text.trim().is_empty() => Some(text),
                _ => None,
            })
            .collect();

        let joint_angles: BTreeMap<String, f64> = raw
            .joint_angles
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(joint, angle)| {
                angle
                    .as_f64()
                    .filter(|degrees| degrees.is_finite())
                    .map(|degrees| (joint, degrees))
            })
            .collect();

        let overlay_image = raw.pose_overlay.as_deref().and_then(|payload| {
            match StillImage::from_data_url(payload) {
                Ok(image) => Some(image),
                Err(err) => {
                    log_debug!("dropping undecodable overlay: {err}");
                    None
                }
            }
        });

        Classification {
            pose_detected: raw.pose_detected.unwrap_or(false),
            issues,
            posture_score: decode_score(raw.posture_score.as_ref()),
            recommendations,
            joint_angles,
            overlay_image,
        }
    }
}

fn decode_issue(value: &Value) -> Option<Issue> {
    let Value::Object(fields) = value else {
        log_debug!("skipping non-object issue entry");
        return None;
    };

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let category = text("type")
        .or_else(|| text("category"))
        .map(Category::new)
        .unwrap_or_else(|| Category::new(""));

    let severity = text("severity")
        .and_then(|raw| Severity::parse(&raw))
        .unwrap_or_default();

    let confidence = fields
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    Some(Issue {
        category,
        confidence,
        severity,
        description: text("description").unwrap_or_default(),
        recommendation: text("recommendation"),
        joint: text("joint"),
    })
}

fn decode_score(value: Option<&Value>) -> u8 {
    value
        .and_then(Value::as_f64)
        .filter(|score| score.is_finite())
        .map(|score| score.round().clamp(0.0, PERFECT_SCORE as f64) as u8)
        .unwrap_or(PERFECT_SCORE)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_response() {
        let classification = decode_value(json!({
            "pose_detected": true,
            "issues": [{
                "type": "knee_over_toe",
                "severity": "high",
                "confidence": 0.85,
                "description": "Left knee extends beyond toes",
                "joint": "left_knee"
            }],
            "posture_score": 75,
            "recommendations": ["Keep your knees aligned over your toes."],
            "joint_angles": {"left_knee": 92.5, "right_knee": 95.0},
            "pose_overlay": "AQID"
        }))
        .unwrap();

        assert!(classification.pose_detected);
        assert_eq!(classification.posture_score, 75);
        assert_eq!(classification.issues.len(), 1);
        let issue = &classification.issues[0];
        assert_eq!(issue.category.as_str(), "knee_over_toe");
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.joint.as_deref(), Some("left_knee"));
        assert_eq!(classification.joint_angles["left_knee"], 92.5);
        assert_eq!(classification.overlay_image.unwrap().bytes, vec![1, 2, 3]);
    }

    #[test]
    fn missing_fields_become_neutral() {
        let classification = decode_classification("{}").unwrap();
        assert_eq!(classification, Classification::default());
    }

    #[test]
    fn camel_case_spellings_are_accepted() {
        let classification = decode_value(json!({
            "poseDetected": true,
            "postureScore": 84.6,
            "issues": [{"category": "forward-head"}]
        }))
        .unwrap();

        assert!(classification.pose_detected);
        assert_eq!(classification.posture_score, 85);
        assert_eq!(classification.issues[0].category.as_str(), "forward_head");
    }

    #[test]
    fn malformed_issue_fields_are_neutralized() {
        let classification = decode_value(json!({
            "pose_detected": true,
            "posture_score": 340,
            "issues": [
                "not an issue",
                {"type": "slouching", "severity": "catastrophic", "confidence": 7.0},
                {"severity": "low"}
            ],
            "joint_angles": {"left_knee": "bent", "right_knee": 101.0},
            "pose_overlay": "%%%"
        }))
        .unwrap();

        assert_eq!(classification.posture_score, 100);
        assert_eq!(classification.issues.len(), 2);
        assert_eq!(classification.issues[0].severity, Severity::Moderate);
        assert_eq!(classification.issues[0].confidence, 1.0);
        assert_eq!(classification.issues[1].category.as_str(), "unknown");
        assert_eq!(classification.issues[1].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(classification.joint_angles.len(), 1);
        assert!(classification.overlay_image.is_none());
    }

    #[test]
    fn backend_error_payload_reads_as_no_pose() {
        let classification = decode_value(json!({
            "pose_detected": false,
            "issues": [],
            "error": "cvtColor failed"
        }))
        .unwrap();
        assert!(!classification.pose_detected);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(decode_value(json!([1, 2, 3])).is_err());
        assert!(decode_classification("not json").is_err());
    }
}
