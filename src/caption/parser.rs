/*!
 * Format detection and the normalized caption parse entry point.
 */

use log::{debug, warn};
use std::fmt;

use super::timed_text::parse_timed_text;
use super::webvtt::parse_webvtt;
use super::Subtitle;

/// Marker token opening a cue-block payload
const WEBVTT_MARKER: &str = "WEBVTT";

/// Element tag used by timed XML payloads
const TIMED_TEXT_MARKER: &str = "<text";

/// Supported caption payload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    /// Cue blocks with `-->` timing lines
    WebVtt,
    /// `<text start dur>` elements
    TimedText,
}

impl fmt::Display for CaptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebVtt => write!(f, "webvtt"),
            Self::TimedText => write!(f, "timed-text"),
        }
    }
}

/// Sniff the payload format from its content
pub fn detect_format(content: &str) -> Option<CaptionFormat> {
    if content.contains(WEBVTT_MARKER) {
        Some(CaptionFormat::WebVtt)
    } else if content.contains(TIMED_TEXT_MARKER) {
        Some(CaptionFormat::TimedText)
    } else {
        None
    }
}

/// Parse a raw caption payload into subtitles ordered by start time.
///
/// Acquisition is best-effort: an unknown format or a malformed payload
/// yields an empty list and a log line, never an error.
pub fn parse_captions(content: &str) -> Vec<Subtitle> {
    let Some(format) = detect_format(content) else {
        warn!("Unrecognized caption payload ({} bytes), no subtitles parsed", content.len());
        return Vec::new();
    };

    let result = match format {
        CaptionFormat::WebVtt => parse_webvtt(content),
        CaptionFormat::TimedText => parse_timed_text(content),
    };

    match result {
        Ok(mut subtitles) => {
            // Stable sort keeps document order for equal starts
            subtitles.sort_by(|a, b| a.start().total_cmp(&b.start()));
            debug!("Parsed {} subtitles from {} payload", subtitles.len(), format);
            subtitles
        }
        Err(e) => {
            warn!("Failed to parse {} payload: {}", format, e);
            Vec::new()
        }
    }
}
