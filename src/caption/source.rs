/*!
 * Caption acquisition capability.
 *
 * A video session gets its subtitles from exactly one `CaptionSource`.
 * `TrackListSource` fetches a published caption track; `LiveCaptionSource`
 * observes captions as the page renders them. Both end in the same
 * normalized `Subtitle` list.
 */

use async_trait::async_trait;

use super::Subtitle;
use crate::errors::CaptionError;

/// Common trait for caption acquisition strategies
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Acquire the subtitles for a video.
    ///
    /// # Returns
    /// * `Ok(subtitles)` ordered by start time (possibly empty)
    /// * `Err(CaptionError)` when no caption source could be reached
    async fn acquire(&self, video_id: &str) -> Result<Vec<Subtitle>, CaptionError>;

    /// Short name for logging
    fn name(&self) -> &str;
}
