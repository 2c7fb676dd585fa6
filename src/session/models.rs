/*!
 * Video session values.
 *
 * A session is an immutable snapshot of everything known about the video
 * being watched. Changes produce a new snapshot; the token identifies which
 * snapshot an in-flight operation started from.
 */

use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::timeline::{SubtitleTimeline, TranslatedTimeline};

/// Identity of one loaded video session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// A fresh, unique token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form for log lines
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of the current video session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Snapshot identity
    pub token: SessionToken,
    /// Video being watched, `None` before any video is loaded
    pub video_id: Option<String>,
    /// Parsed subtitles
    pub timeline: Arc<SubtitleTimeline>,
    /// Bilingual view, once the timeline has been translated
    pub translated: Option<Arc<TranslatedTimeline>>,
}

impl SessionState {
    /// The state before any video is loaded
    pub fn empty() -> Self {
        Self {
            token: SessionToken::new(),
            video_id: None,
            timeline: Arc::new(SubtitleTimeline::default()),
            translated: None,
        }
    }

    /// A fresh session for a video
    pub fn for_video(video_id: impl Into<String>, timeline: SubtitleTimeline) -> Self {
        Self {
            token: SessionToken::new(),
            video_id: Some(video_id.into()),
            timeline: Arc::new(timeline),
            translated: None,
        }
    }

    /// Same session with a bilingual view attached
    pub fn with_translations(&self, translated: TranslatedTimeline) -> Self {
        Self {
            token: self.token,
            video_id: self.video_id.clone(),
            timeline: self.timeline.clone(),
            translated: Some(Arc::new(translated)),
        }
    }
}
