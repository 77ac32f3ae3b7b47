#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use posture_coach_lib::classifier::{Classification, ClassificationRequest, Classifier};
use posture_coach_lib::models::{Issue, Severity, StillImage};
use posture_coach_lib::sampling::{MediaMetadata, MediaSource};
use posture_coach_lib::streaming::LiveSource;

pub fn still() -> StillImage {
    StillImage::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0])
}

pub fn clean(score: u8) -> Classification {
    Classification {
        pose_detected: true,
        posture_score: score,
        ..Classification::default()
    }
}

pub fn with_issues(score: u8, categories: &[&str]) -> Classification {
    Classification {
        pose_detected: true,
        posture_score: score,
        issues: categories
            .iter()
            .map(|c| Issue::new(*c, Severity::Moderate, 0.75, format!("{c} detected")))
            .collect(),
        ..Classification::default()
    }
}

/// Answers from a fixed script, then fails once the script runs out.
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<Result<Classification, String>>>,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new(script: Vec<Result<Classification, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn always_failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _request: ClassificationRequest) -> Result<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(classification)) => Ok(classification),
            Some(Err(message)) => Err(anyhow!(message)),
            None => bail!("connection refused"),
        }
    }
}

/// Holds its first call until released, so a test can stop a session while
/// a classifier call is outstanding.
pub struct GatedClassifier {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    answer: Classification,
}

impl GatedClassifier {
    pub fn new(answer: Classification) -> Arc<Self> {
        Arc::new(Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            answer,
        })
    }
}

#[async_trait]
impl Classifier for GatedClassifier {
    async fn classify(&self, _request: ClassificationRequest) -> Result<Classification> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.answer.clone())
    }
}

/// A clip of fixed duration whose seeks land exactly where asked, clamped
/// to the end.
pub struct FakeClip {
    pub duration_secs: f64,
    pub fail_load: bool,
    pub failing_seeks: HashSet<u64>,
    pub seeks: Vec<f64>,
    pub renders: usize,
    /// Seeks never land past `duration_secs - short_by`, like a decoder
    /// snapping to its last frame
    pub short_by: f64,
    position: f64,
}

impl FakeClip {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            fail_load: false,
            failing_seeks: HashSet::new(),
            seeks: Vec::new(),
            renders: 0,
            short_by: 0.0,
            position: 0.0,
        }
    }

    /// Make the seek to `position_secs` fail.
    pub fn fail_seek_at(mut self, position_secs: f64) -> Self {
        self.failing_seeks.insert((position_secs * 1000.0).round() as u64);
        self
    }

    pub fn landing_short_by(mut self, seconds: f64) -> Self {
        self.short_by = seconds;
        self
    }
}

#[async_trait]
impl MediaSource for FakeClip {
    async fn load_metadata(&mut self) -> Result<MediaMetadata> {
        if self.fail_load {
            bail!("unsupported container");
        }
        Ok(MediaMetadata {
            duration_secs: self.duration_secs,
            width: 640,
            height: 480,
        })
    }

    async fn seek(&mut self, position_secs: f64) -> Result<f64> {
        self.seeks.push(position_secs);
        if self
            .failing_seeks
            .contains(&((position_secs * 1000.0).round() as u64))
        {
            bail!("seek to {position_secs} timed out");
        }
        if self.seeks.len() > 100 {
            bail!("seek budget exhausted");
        }
        self.position = position_secs.min(self.duration_secs - self.short_by);
        Ok(self.position)
    }

    fn render_frame(&mut self) -> Result<StillImage> {
        self.renders += 1;
        Ok(still())
    }
}

/// Live source that returns a frame on every tick except the listed ones.
pub struct FlakyCamera {
    captures: AtomicUsize,
    dark_ticks: HashSet<usize>,
}

impl FlakyCamera {
    pub fn always_on() -> Arc<Self> {
        Self::dark_on(&[])
    }

    pub fn dark_on(ticks: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            captures: AtomicUsize::new(0),
            dark_ticks: ticks.iter().copied().collect(),
        })
    }
}

impl LiveSource for FlakyCamera {
    fn capture_still(&self) -> Option<StillImage> {
        let tick = self.captures.fetch_add(1, Ordering::SeqCst);
        (!self.dark_ticks.contains(&tick)).then(still)
    }
}
