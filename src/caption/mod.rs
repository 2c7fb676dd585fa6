/*!
 * Caption acquisition and parsing.
 *
 * - `parser`: format sniffing and the normalized parse entry point
 * - `webvtt`: cue-block payloads
 * - `timed_text`: timed XML payloads
 * - `source`: the `CaptionSource` capability and its two implementations
 */

use serde::Serialize;
use std::fmt;

use crate::errors::CaptionError;
use crate::time_codec;

pub mod live;
pub mod parser;
pub mod source;
pub mod text;
pub mod timed_text;
pub mod track_list;
pub mod webvtt;

pub use live::{CaptionEvent, LiveCaptionSource};
pub use parser::{detect_format, parse_captions, CaptionFormat};
pub use source::CaptionSource;
pub use track_list::{CaptionTrack, HttpPayloadFetcher, PayloadFetcher, TrackListSource};

/// One timed line of caption text
///
/// Fields are private so a subtitle can only exist in its validated form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subtitle {
    start: f64,
    end: f64,
    text: String,
}

impl Subtitle {
    /// Create a validated subtitle. Text is trimmed; empty text, negative or
    /// non-finite times and `end < start` are rejected.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Result<Self, CaptionError> {
        let text = text.into();
        let trimmed = text.trim();

        if !start.is_finite() || !end.is_finite() || start < 0.0 {
            return Err(CaptionError::InvalidCue {
                start,
                end,
                reason: "times must be finite and non-negative".to_string(),
            });
        }
        if end < start {
            return Err(CaptionError::InvalidCue {
                start,
                end,
                reason: "end precedes start".to_string(),
            });
        }
        if trimmed.is_empty() {
            return Err(CaptionError::InvalidCue {
                start,
                end,
                reason: "empty text".to_string(),
            });
        }

        Ok(Self {
            start,
            end,
            text: trimmed.to_string(),
        })
    }

    /// Start offset in seconds
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End offset in seconds
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Caption text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `t` falls inside `[start, end]`
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

impl fmt::Display for Subtitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {}  {}",
            time_codec::format(self.start),
            time_codec::format(self.end),
            self.text
        )
    }
}
