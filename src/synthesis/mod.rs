//! Aggregation and report synthesis.
//!
//! Both synthesizers are pure: a report is a function of the events handed
//! in (plus the clock, for seconds-ago display only). Nothing is retained
//! between calls.

pub mod batch;
pub mod clock;
pub mod config;
pub mod rules;
pub mod session;
pub mod summary;

pub use batch::synthesize_batch;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{SynthesisConfig, MIN_SESSION_SAMPLES};
pub use rules::{advice_for, collect_advice, DEFAULT_ADVICE};
pub use session::{dominant_severity, synthesize_session};
pub use summary::ScoreBand;

use crate::models::{FrameEvent, PERFECT_SCORE};

/// Rounded mean of event scores; a perfect score for no events.
pub(crate) fn rounded_mean_score(events: &[&FrameEvent]) -> u8 {
    if events.is_empty() {
        return PERFECT_SCORE;
    }
    let total: u32 = events.iter().map(|e| u32::from(e.effective_score())).sum();
    (total as f64 / events.len() as f64).round() as u8
}

/// `round(100 * ratio)`, zero for a non-finite ratio.
pub(crate) fn percent(ratio: f64) -> u32 {
    if ratio.is_finite() && ratio > 0.0 {
        (ratio * 100.0).round() as u32
    } else {
        0
    }
}
