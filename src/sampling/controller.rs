use std::sync::Arc;

use crate::classifier::{classify_with_timeout, ClassificationRequest, Classifier};
use crate::error::{AnalysisError, Result};
use crate::models::{FrameEvent, FrameTimestamp, Report};
use crate::synthesis::{synthesize_batch, SynthesisConfig};

use super::config::SamplingConfig;
use super::source::MediaSource;
use super::state::SamplerState;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// What a completed walk produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplingRun {
    /// Frames where a pose was found with at least one issue
    pub events: Vec<FrameEvent>,
    /// Instants that were rendered and sent to the classifier
    pub frames_sampled: usize,
    /// Classifier calls that failed and were skipped
    pub classifier_failures: usize,
    /// Instants skipped because seeking or rendering failed
    pub skipped_frames: usize,
}

/// Walks a finite clip at a fixed interval, classifying one frame per instant.
///
/// Samples are strictly sequential: the next seek only starts once the
/// current classifier call has resolved.
pub struct FrameSampler {
    classifier: Arc<dyn Classifier>,
    config: SamplingConfig,
    state: SamplerState,
}

impl FrameSampler {
    pub fn new(classifier: Arc<dyn Classifier>, config: SamplingConfig) -> Self {
        Self {
            classifier,
            config,
            state: SamplerState::Idle,
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Walk the clip and turn the retained frames into a clip report.
    pub async fn analyze(&mut self, media: &mut dyn MediaSource) -> Result<Report> {
        let run = self.sample(media).await?;
        let synthesis = SynthesisConfig::default().with_interval_secs(self.config.interval_secs);
        Ok(synthesize_batch(&run.events, &synthesis))
    }

    /// Walk `t = 0, Δ, 2Δ, ...` until the playhead reaches the clip's end.
    ///
    /// Per-frame failures are logged and skipped. Only a clip that cannot be
    /// loaded or seeked at all, or a classifier that never answers, fails the walk.
    pub async fn sample(&mut self, media: &mut dyn MediaSource) -> Result<SamplingRun> {
        self.state = SamplerState::Idle;

        let interval = self.config.interval_secs;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(AnalysisError::InvalidInterval(format!(
                "{interval} is not a positive number of seconds"
            )));
        }

        let metadata = match media.load_metadata().await {
            Ok(metadata) => metadata,
            Err(err) => return Err(self.fail_load(format!("{err:#}"))),
        };

        let duration = metadata.duration_secs;
        if !duration.is_finite() || duration < 0.0 {
            return Err(self.fail_load(format!("clip reports an unusable duration of {duration}s")));
        }

        self.transition(SamplerState::MetadataReady);
        log_info!(
            "sampling {:.2}s clip ({}x{}) every {}s",
            duration,
            metadata.width,
            metadata.height,
            interval
        );

        let mut run = SamplingRun::default();
        let mut attempts = 0usize;
        let mut last_error: Option<String> = None;
        let mut step = 0usize;

        // A clip that cannot seek to its start never loaded
        let mut landed = match media.seek(0.0).await {
            Ok(position) => Some(position),
            Err(err) => return Err(self.fail_load(format!("initial seek failed: {err:#}"))),
        };

        loop {
            let target = (step as f64 * interval).min(duration);
            step += 1;
            self.transition(SamplerState::Seeking);

            let seeked = match landed.take() {
                Some(position) => Ok(position),
                None => media.seek(target).await,
            };

            let position = match seeked {
                Ok(position) => position,
                Err(err) => {
                    log_warn!("seek to {:.2}s failed, skipping instant: {err:#}", target);
                    run.skipped_frames += 1;
                    if target >= duration {
                        break;
                    }
                    continue;
                }
            };

            // Decoders may land short of the end; the requested instant decides.
            if target >= duration || position >= duration {
                break;
            }

            self.transition(SamplerState::Sampling);
            let frame_index = run.frames_sampled + run.skipped_frames;

            let image = match media.render_frame() {
                Ok(image) => image,
                Err(err) => {
                    log_warn!("render at {:.2}s failed, skipping instant: {err:#}", position);
                    run.skipped_frames += 1;
                    continue;
                }
            };

            run.frames_sampled += 1;
            attempts += 1;
            let request = ClassificationRequest::new(image, self.config.analysis_type);

            match classify_with_timeout(
                self.classifier.as_ref(),
                request,
                self.config.classifier_timeout,
            )
            .await
            {
                Ok(classification) if classification.has_issues() => {
                    run.events.push(FrameEvent::from_classification(
                        frame_index,
                        FrameTimestamp::MediaOffset(position),
                        &classification,
                    ));
                }
                Ok(_) => {
                    log_debug!("no issues at {:.2}s", position);
                }
                Err(err) => {
                    log_error!("frame analysis failed at {:.2}s: {err:?}", position);
                    run.classifier_failures += 1;
                    last_error = Some(format!("{err:#}"));
                }
            }
        }

        self.transition(SamplerState::Complete);
        log_info!(
            "sampling complete: {} frames sampled, {} with issues, {} failed, {} skipped",
            run.frames_sampled,
            run.events.len(),
            run.classifier_failures,
            run.skipped_frames
        );

        if attempts > 0 && run.classifier_failures == attempts {
            return Err(AnalysisError::ClassifierUnreachable {
                attempts,
                last_error: last_error.unwrap_or_default(),
            });
        }

        Ok(run)
    }

    fn transition(&mut self, next: SamplerState) {
        if !self.state.can_transition_to(next) {
            log_warn!("unexpected sampler transition {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn fail_load(&mut self, reason: String) -> AnalysisError {
        log_error!("media load failed: {reason}");
        self.transition(SamplerState::LoadError);
        AnalysisError::MediaLoad(reason)
    }
}
