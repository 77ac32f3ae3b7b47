//! Offline replay of recorded classifier responses.
//!
//! **Usage:**
//! ```bash
//! posture-coach replay recording.json [--mode batch|session] [--settings settings.json]
//! ```
//!
//! The recording is a JSON array of classifier responses in wire format. Each
//! entry may carry a `timestamp` in seconds; entries without one are spaced by
//! the configured sampling interval.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use posture_coach_lib::classifier::decode_value;
use posture_coach_lib::models::{FrameEvent, FrameTimestamp, Report};
use posture_coach_lib::synthesis::{synthesize_batch, synthesize_session, FixedClock};
use posture_coach_lib::{init_logging, Settings};

#[derive(Parser, Debug)]
#[clap(name = "posture-coach")]
#[clap(about = "Build posture reports from recorded classifier output")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recording through the synthesizer and print the report
    Replay {
        /// JSON array of recorded classifier responses
        #[clap(value_name = "FILE")]
        recording: PathBuf,

        #[clap(long, value_enum, default_value = "batch")]
        mode: Mode,

        /// Settings file (camelCase JSON)
        #[clap(long, value_name = "FILE", env = "POSTURE_COACH_SETTINGS")]
        settings: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Clip report: first occurrence per category
    Batch,
    /// Session report: frequency and severity per category
    Session,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            recording,
            mode,
            settings,
        } => {
            let settings = match settings {
                Some(path) => Settings::load(&path)?,
                None => Settings::default(),
            };

            let contents = fs::read_to_string(&recording)
                .with_context(|| format!("Failed to read recording {}", recording.display()))?;
            let entries: Vec<Value> = serde_json::from_str(&contents)
                .with_context(|| format!("{} is not a JSON array", recording.display()))?;

            let report = replay(entries, mode, &settings, Utc::now())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn replay(entries: Vec<Value>, mode: Mode, settings: &Settings, origin: DateTime<Utc>) -> Result<Report> {
    let interval = match mode {
        Mode::Batch => settings.sampling.interval_secs,
        Mode::Session => settings.polling_config().interval_secs(),
    };
    if !interval.is_finite() || interval <= 0.0 {
        bail!("sampling interval must be positive, got {interval}");
    }

    let mut events = Vec::with_capacity(entries.len());
    let mut last_at = origin;

    for (frame_index, entry) in entries.into_iter().enumerate() {
        let offset = entry
            .get("timestamp")
            .and_then(Value::as_f64)
            .unwrap_or(frame_index as f64 * interval);

        let classification = decode_value(entry)
            .with_context(|| format!("entry {frame_index} is not a classifier response"))?;

        let timestamp = match mode {
            Mode::Batch => FrameTimestamp::MediaOffset(offset),
            Mode::Session => {
                last_at = offset_from(origin, offset)
                    .with_context(|| format!("entry {frame_index} has an unusable timestamp"))?;
                FrameTimestamp::WallClock(last_at)
            }
        };

        // A sampling walk only keeps frames that found something
        if mode == Mode::Batch && !classification.has_issues() {
            continue;
        }
        events.push(FrameEvent::from_classification(frame_index, timestamp, &classification));
    }

    let synthesis = settings.synthesis_config().with_interval_secs(interval);
    let report = match mode {
        Mode::Batch => synthesize_batch(&events, &synthesis),
        Mode::Session => {
            let clock = FixedClock(last_at);
            synthesize_session(&events, &synthesis, &clock)
        }
    };

    Ok(report)
}

fn offset_from(origin: DateTime<Utc>, seconds: f64) -> Result<DateTime<Utc>> {
    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        bail!("{seconds}s is out of range");
    }

    let delta = TimeDelta::try_milliseconds(millis as i64)
        .ok_or_else(|| anyhow!("{seconds}s is out of range"))?;
    origin
        .checked_add_signed(delta)
        .ok_or_else(|| anyhow!("{seconds}s past the session start overflows the calendar"))
}
