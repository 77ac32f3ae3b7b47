//! The pose classifier seam.
//!
//! The classifier itself lives outside this crate. Controllers only see it as
//! a request/response service: one still image plus an analysis-type hint in,
//! zero or more issues and a score out.

pub mod wire;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::models::{AnalysisType, Issue, StillImage, PERFECT_SCORE};

pub use wire::{decode_classification, decode_value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRequest {
    pub image: StillImage,
    pub analysis_type: AnalysisType,
}

impl ClassificationRequest {
    pub fn new(image: StillImage, analysis_type: AnalysisType) -> Self {
        Self {
            image,
            analysis_type,
        }
    }

    /// Request body in the backend's wire format.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "image": self.image.to_data_url(),
            "analysis_type": self.analysis_type.as_str(),
        })
    }
}

/// Classifier response, already normalized: absent fields hold their
/// neutral value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub pose_detected: bool,
    pub issues: Vec<Issue>,
    pub posture_score: u8,
    pub recommendations: Vec<String>,
    pub joint_angles: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_image: Option<StillImage>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            pose_detected: false,
            issues: Vec::new(),
            posture_score: PERFECT_SCORE,
            recommendations: Vec::new(),
            joint_angles: BTreeMap::new(),
            overlay_image: None,
        }
    }
}

impl Classification {
    pub fn has_issues(&self) -> bool {
        self.pose_detected && !self.issues.is_empty()
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one still image.
    ///
    /// # Returns
    /// * `Ok(Classification)` - the backend answered (possibly with no pose)
    /// * `Err(_)` - the request failed; callers log it and skip the sample
    async fn classify(&self, request: ClassificationRequest) -> Result<Classification>;
}

#[async_trait]
impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    async fn classify(&self, request: ClassificationRequest) -> Result<Classification> {
        (**self).classify(request).await
    }
}

/// Runs one classifier call, bounded by `timeout` when the caller configured one.
pub async fn classify_with_timeout(
    classifier: &dyn Classifier,
    request: ClassificationRequest,
    timeout: Option<Duration>,
) -> Result<Classification> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, classifier.classify(request))
            .await
            .map_err(|_| anyhow!("classifier call timed out after {}ms", limit.as_millis()))?,
        None => classifier.classify(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalled;

    #[async_trait]
    impl Classifier for Stalled {
        async fn classify(&self, _request: ClassificationRequest) -> Result<Classification> {
            std::future::pending().await
        }
    }

    #[test]
    fn request_uses_backend_field_names() {
        let request =
            ClassificationRequest::new(StillImage::jpeg(vec![0xFF, 0xD8]), AnalysisType::Squat);
        let json = request.to_json();
        assert_eq!(json["analysis_type"], "squat");
        assert_eq!(json["image"], "data:image/jpeg;base64,/9g=");
    }

    #[test]
    fn default_classification_is_neutral() {
        let classification = Classification::default();
        assert!(!classification.pose_detected);
        assert_eq!(classification.posture_score, PERFECT_SCORE);
        assert!(!classification.has_issues());
    }

    #[tokio::test(start_paused = true)]
    async fn configured_timeout_bounds_a_hung_call() {
        let request = ClassificationRequest::new(StillImage::jpeg(vec![1]), AnalysisType::Auto);
        let err = classify_with_timeout(&Stalled, request, Some(Duration::from_millis(250)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out after 250ms"));
    }
}
