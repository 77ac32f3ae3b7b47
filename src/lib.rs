//! Posture report engine.
//!
//! Turns per-frame posture classifications into reports. Two controllers feed
//! the synthesizer: [`sampling::FrameSampler`] walks a finite clip at a fixed
//! interval, and [`streaming::SessionController`] polls a live source until
//! stopped. [`snapshot::analyze_snapshot`] covers the single-frame case.

pub mod classifier;
pub mod error;
pub mod models;
pub mod sampling;
pub mod settings;
pub mod snapshot;
pub mod streaming;
pub mod synthesis;
pub mod utils;

pub use classifier::{Classification, ClassificationRequest, Classifier};
pub use error::{AnalysisError, Result};
pub use models::{
    AnalysisType, Category, FrameEvent, FrameTimestamp, Issue, Report, ReportKind, Severity,
    StillImage,
};
pub use sampling::{FrameSampler, MediaMetadata, MediaSource, SamplingConfig};
pub use settings::Settings;
pub use snapshot::analyze_snapshot;
pub use streaming::{LiveSource, PollingConfig, SessionController, SessionReport};
pub use synthesis::{synthesize_batch, synthesize_session, SynthesisConfig};

/// Environment switch that raises the default log level to debug.
pub const DEBUG_ENV: &str = "POSTURE_COACH_DEBUG";

/// Install the `env_logger` backend. `RUST_LOG` still wins over the default
/// level; repeated calls are ignored.
pub fn init_logging() {
    let debug = std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
