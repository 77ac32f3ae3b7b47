use crate::models::StillImage;

/// A live camera or screen feed.
pub trait LiveSource: Send + Sync {
    /// The current frame, or `None` when the feed has nothing to give
    /// (camera not ready, stream paused).
    fn capture_still(&self) -> Option<StillImage>;
}

impl<F> LiveSource for F
where
    F: Fn() -> Option<StillImage> + Send + Sync,
{
    fn capture_still(&self) -> Option<StillImage> {
        self()
    }
}
