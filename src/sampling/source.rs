use anyhow::Result;
use async_trait::async_trait;

use crate::models::StillImage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaMetadata {
    pub duration_secs: f64,
    pub width: u32,
    pub height: u32,
}

/// A finite, seekable clip such as an uploaded video.
#[async_trait]
pub trait MediaSource: Send {
    /// Resolves once the clip's metadata is known. Failing here is fatal to the walk.
    async fn load_metadata(&mut self) -> Result<MediaMetadata>;

    /// Moves the playhead and resolves with the position actually reached,
    /// which may be clamped to the clip's duration.
    async fn seek(&mut self, position_secs: f64) -> Result<f64>;

    /// Renders the frame under the playhead.
    fn render_frame(&mut self) -> Result<StillImage>;
}
