use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::classifier::{classify_with_timeout, ClassificationRequest, Classifier};
use crate::models::{FrameEvent, FrameTimestamp};
use crate::synthesis::Clock;

use super::config::PollingConfig;
use super::source::LiveSource;
use super::status::{Connectivity, LiveStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything one polling task owns for the lifetime of a session.
pub(crate) struct PollingContext {
    pub session_id: String,
    pub source: Arc<dyn LiveSource>,
    pub classifier: Arc<dyn Classifier>,
    pub clock: Arc<dyn Clock>,
    pub config: PollingConfig,
    pub status_tx: watch::Sender<LiveStatus>,
}

/// Polls the live source until `cancel_token` fires and returns the event log.
///
/// Ticks never overlap: the next tick is only awaited once the current
/// classifier call has resolved. A call that resolves after cancellation is
/// dropped instead of logged.
pub(crate) async fn polling_loop(
    ctx: PollingContext,
    cancel_token: CancellationToken,
) -> Vec<FrameEvent> {
    let mut ticker = tokio::time::interval(ctx.config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut log: Vec<FrameEvent> = Vec::new();
    let mut tick_index = 0usize;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("polling loop shutting down for session {}", ctx.session_id);
                break;
            }
            _ = ticker.tick() => {
                let frame_index = tick_index;
                tick_index += 1;

                if let Some(event) = poll_once(&ctx, frame_index, &cancel_token).await {
                    log.push(event);
                }

                if cancel_token.is_cancelled() {
                    log_info!("polling loop shutting down for session {}", ctx.session_id);
                    break;
                }
            }
        }
    }

    log
}

async fn poll_once(
    ctx: &PollingContext,
    frame_index: usize,
    cancel_token: &CancellationToken,
) -> Option<FrameEvent> {
    ctx.status_tx.send_modify(|status| status.ticks += 1);

    let Some(image) = ctx.source.capture_still() else {
        log_debug!("tick {} skipped: no frame available", frame_index);
        ctx.status_tx.send_modify(|status| status.skipped_ticks += 1);
        return None;
    };

    let timestamp = ctx.clock.now();
    let request = ClassificationRequest::new(image, ctx.config.analysis_type);
    let result = classify_with_timeout(
        ctx.classifier.as_ref(),
        request,
        ctx.config.classifier_timeout,
    )
    .await;

    if cancel_token.is_cancelled() {
        log_warn!(
            "discarding tick {} result: session {} stopped while the call was in flight",
            frame_index,
            ctx.session_id
        );
        return None;
    }

    match result {
        Ok(classification) => {
            let event = FrameEvent::from_classification(
                frame_index,
                FrameTimestamp::WallClock(timestamp),
                &classification,
            );
            ctx.status_tx.send_modify(|status| {
                status.connectivity = Connectivity::Connected;
                status.events_logged += 1;
                status.recent.push(event.clone());
                status.latest = Some(classification);
            });
            Some(event)
        }
        Err(err) => {
            log_error!("tick {} analysis failed: {err:?}", frame_index);
            ctx.status_tx.send_modify(|status| {
                status.connectivity = Connectivity::Degraded;
                status.failed_ticks += 1;
            });
            None
        }
    }
}
