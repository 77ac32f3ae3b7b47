//! Error types that cross the engine boundary.
//!
//! Recoverable failures (a single frame that cannot be classified, a tick
//! where the camera has nothing to give) are absorbed inside the controllers
//! and only logged. What remains here is what a caller has to act on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The media could not be loaded or seeked at all; the walk never started.
    #[error("Media load failed: {0}")]
    MediaLoad(String),

    /// Sampling interval is zero, negative or not a number.
    #[error("Invalid sampling interval: {0}")]
    InvalidInterval(String),

    /// Every classifier call failed before a single sample was produced.
    #[error("Classifier unreachable after {attempts} attempt(s): {last_error}")]
    ClassifierUnreachable { attempts: usize, last_error: String },

    /// The live source had no still image to offer.
    #[error("Live capture unavailable")]
    CaptureUnavailable,

    /// Polling needs a running tokio runtime to host its timer task.
    #[error("No async runtime available: {0}")]
    NoRuntime(String),

    /// The polling task panicked or was aborted before it could hand back its log.
    #[error("Polling task failed to join: {0}")]
    Join(String),
}

impl AnalysisError {
    /// True for failures that mean the classifier backend is not answering.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AnalysisError::ClassifierUnreachable { .. })
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
