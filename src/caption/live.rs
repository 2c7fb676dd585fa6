/*!
 * Caption acquisition from a live caption feed.
 *
 * The host page renders captions as the video plays; an injected stream
 * reports each rendered line with the playback time it appeared at.
 * Collection runs for a bounded window and keeps whatever arrived.
 */

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use log::{debug, warn};
use std::time::Duration;

use super::source::CaptionSource;
use super::text::{collapse_whitespace, strip_tags};
use super::Subtitle;
use crate::errors::CaptionError;

/// One rendered caption line
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionEvent {
    /// Raw rendered text (may contain markup)
    pub text: String,
    /// Playback time in seconds when the line appeared
    pub timestamp: f64,
}

impl CaptionEvent {
    /// Create a caption event
    pub fn new(text: impl Into<String>, timestamp: f64) -> Self {
        Self {
            text: text.into(),
            timestamp,
        }
    }
}

/// Opens the caption event stream for a video
pub type CaptionStreamFactory =
    Box<dyn Fn(&str) -> BoxStream<'static, CaptionEvent> + Send + Sync>;

/// Acquires captions by observing rendered caption lines
pub struct LiveCaptionSource {
    open_stream: CaptionStreamFactory,
    window: Duration,
    default_duration_secs: f64,
}

impl LiveCaptionSource {
    /// Create a live source collecting for `window`; the last line of a
    /// collection lasts `default_duration_secs`.
    pub fn new(open_stream: CaptionStreamFactory, window: Duration, default_duration_secs: f64) -> Self {
        Self {
            open_stream,
            window,
            default_duration_secs,
        }
    }

    /// Turn observed events into subtitles.
    ///
    /// Repeated renders of the same line and lines that grow word by word are
    /// merged into one subtitle; each subtitle ends where the next begins.
    pub fn events_to_subtitles(mut events: Vec<CaptionEvent>, default_duration_secs: f64) -> Vec<Subtitle> {
        events.retain(|e| e.timestamp.is_finite() && e.timestamp >= 0.0);
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let mut lines: Vec<(f64, String)> = Vec::new();
        for event in events {
            let text = collapse_whitespace(&strip_tags(&event.text));
            if text.is_empty() {
                continue;
            }
            match lines.last_mut() {
                Some((_, last)) if *last == text => {}
                Some((_, last)) if text.starts_with(last.as_str()) => *last = text,
                _ => lines.push((event.timestamp, text)),
            }
        }

        let mut subtitles = Vec::with_capacity(lines.len());
        for (i, (start, text)) in lines.iter().enumerate() {
            let end = lines
                .get(i + 1)
                .map(|(next_start, _)| *next_start)
                .unwrap_or(start + default_duration_secs);
            match Subtitle::new(*start, end, text.clone()) {
                Ok(subtitle) => subtitles.push(subtitle),
                Err(e) => warn!("Dropping live caption line: {}", e),
            }
        }
        subtitles
    }
}

#[async_trait]
impl CaptionSource for LiveCaptionSource {
    async fn acquire(&self, video_id: &str) -> Result<Vec<Subtitle>, CaptionError> {
        let mut stream = (self.open_stream)(video_id);
        let deadline = tokio::time::sleep(self.window);
        tokio::pin!(deadline);

        let mut events = Vec::new();
        loop {
            tokio::select! {
                _ = &mut deadline => {
                    debug!("Live caption window closed after {:?}", self.window);
                    break;
                }
                next = stream.next() => match next {
                    Some(event) => events.push(event),
                    None => break,
                },
            }
        }

        debug!("Collected {} live caption events for {}", events.len(), video_id);
        Ok(Self::events_to_subtitles(events, self.default_duration_secs))
    }

    fn name(&self) -> &str {
        "live"
    }
}
