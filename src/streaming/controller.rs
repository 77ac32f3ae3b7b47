use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::error::{AnalysisError, Result};
use crate::models::{FrameEvent, Report};
use crate::synthesis::{synthesize_session, Clock, SynthesisConfig, SystemClock};

use super::config::{PollingConfig, UndersizedPolicy};
use super::loop_worker::{polling_loop, PollingContext};
use super::source::LiveSource;
use super::status::LiveStatus;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Owned handle to one running polling task.
///
/// The task's timer lives exactly as long as this handle: `stop()` cancels and
/// joins it, and dropping the handle cancels and aborts it.
pub struct PollingHandle {
    session_id: String,
    started_at: DateTime<Utc>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<Vec<FrameEvent>>>,
    status_rx: watch::Receiver<LiveStatus>,
}

impl PollingHandle {
    pub(crate) fn spawn(ctx: PollingContext, started_at: DateTime<Utc>) -> Self {
        let session_id = ctx.session_id.clone();
        let status_rx = ctx.status_tx.subscribe();
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(polling_loop(ctx, cancel_token.clone()));

        Self {
            session_id,
            started_at,
            cancel_token,
            handle: Some(handle),
            status_rx,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn status(&self) -> LiveStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveStatus> {
        self.status_rx.clone()
    }

    /// Cancel the loop and wait for it to hand back the event log. An
    /// in-flight classifier call is awaited and its result discarded.
    pub async fn stop(mut self) -> Result<Vec<FrameEvent>> {
        self.cancel_token.cancel();

        match self.handle.take() {
            Some(handle) => handle
                .await
                .map_err(|err| AnalysisError::Join(err.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            log_warn!("polling handle for session {} dropped while running", self.session_id);
            handle.abort();
        }
    }
}

/// Outcome of a stopped session.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub frames_attempted: usize,
    /// `None` only when the session was undersized and the policy discards it
    pub report: Option<Report>,
}

/// Starts and stops live polling sessions and turns each one into a report.
pub struct SessionController {
    source: Arc<dyn LiveSource>,
    classifier: Arc<dyn Classifier>,
    clock: Arc<dyn Clock>,
    config: PollingConfig,
    synthesis: SynthesisConfig,
    active: Option<PollingHandle>,
}

impl SessionController {
    pub fn new(
        source: Arc<dyn LiveSource>,
        classifier: Arc<dyn Classifier>,
        config: PollingConfig,
    ) -> Self {
        Self {
            source,
            classifier,
            clock: Arc::new(SystemClock),
            config,
            synthesis: SynthesisConfig::default(),
            active: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisConfig) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn config(&self) -> &PollingConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.active.as_ref().map(PollingHandle::session_id)
    }

    /// Snapshot of the running session's live status.
    pub fn status(&self) -> Option<LiveStatus> {
        self.active.as_ref().map(PollingHandle::status)
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<LiveStatus>> {
        self.active.as_ref().map(PollingHandle::subscribe)
    }

    /// Begin polling. Returns `Ok(false)` without side effects when a
    /// session is already running.
    pub fn start(&mut self) -> Result<bool> {
        if self.active.is_some() {
            return Ok(false);
        }

        if self.config.interval.is_zero() {
            return Err(AnalysisError::InvalidInterval(
                "polling interval must be greater than zero".to_string(),
            ));
        }

        tokio::runtime::Handle::try_current()
            .map_err(|err| AnalysisError::NoRuntime(err.to_string()))?;

        let session_id = Uuid::new_v4().to_string();
        let started_at = self.clock.now();
        let (status_tx, _) = watch::channel(LiveStatus::new(
            session_id.clone(),
            self.config.history_capacity,
        ));

        let ctx = PollingContext {
            session_id: session_id.clone(),
            source: Arc::clone(&self.source),
            classifier: Arc::clone(&self.classifier),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            status_tx,
        };

        log_info!(
            "starting session {} polling every {}ms",
            session_id,
            self.config.interval.as_millis()
        );
        self.active = Some(PollingHandle::spawn(ctx, started_at));
        Ok(true)
    }

    /// Halt polling and synthesize the session. Returns `Ok(None)` when no
    /// session is running.
    pub async fn stop(&mut self) -> Result<Option<SessionReport>> {
        let Some(handle) = self.active.take() else {
            return Ok(None);
        };

        let session_id = handle.session_id().to_string();
        let started_at = handle.started_at();
        let events = handle.stop().await?;
        let stopped_at = self.clock.now();

        let report = self.build_report(&events);
        log_info!(
            "session {} stopped: {} events logged, report {}",
            session_id,
            events.len(),
            match &report {
                Some(report) if report.is_minimal => "minimal",
                Some(_) => "full",
                None => "discarded",
            }
        );

        Ok(Some(SessionReport {
            session_id,
            started_at,
            stopped_at,
            frames_attempted: events.len(),
            report,
        }))
    }

    fn build_report(&self, events: &[FrameEvent]) -> Option<Report> {
        let synthesis = self
            .synthesis
            .clone()
            .with_interval_secs(self.config.interval_secs());

        let usable = events.iter().filter(|e| e.is_scorable()).count();
        if usable < synthesis.min_session_samples
            && self.config.undersized == UndersizedPolicy::Discard
        {
            return None;
        }

        Some(synthesize_session(events, &synthesis, self.clock.as_ref()))
    }
}
