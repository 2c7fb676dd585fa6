/*!
 * Cue-block caption payloads (WebVTT style).
 *
 * A line containing `-->` opens a cue; following non-blank lines form its
 * text until a blank line or the next timing line closes it. Anything seen
 * outside a cue (header, cue identifiers, NOTE blocks) is ignored.
 */

use log::{debug, warn};

use super::text::{collapse_whitespace, strip_tags};
use super::Subtitle;
use crate::errors::CaptionError;
use crate::time_codec;

/// Timing separator between start and end timecodes
pub const ARROW: &str = "-->";

struct PendingCue {
    start: f64,
    end: f64,
    text: String,
}

/// Parse a cue-block payload into subtitles, in document order
pub fn parse_webvtt(content: &str) -> Result<Vec<Subtitle>, CaptionError> {
    let mut entries = Vec::new();
    let mut current: Option<PendingCue> = None;
    let mut timing_lines = 0usize;

    let finish = |cue: PendingCue, entries: &mut Vec<Subtitle>| {
        if cue.text.trim().is_empty() {
            debug!("Skipping empty cue at {}", time_codec::format(cue.start));
            return;
        }
        match Subtitle::new(cue.start, cue.end, cue.text) {
            Ok(subtitle) => entries.push(subtitle),
            Err(e) => warn!("Skipping invalid cue: {}", e),
        }
    };

    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if let Some(cue) = current.take() {
                finish(cue, &mut entries);
            }
            continue;
        }

        if trimmed.contains(ARROW) {
            if let Some(cue) = current.take() {
                finish(cue, &mut entries);
            }
            timing_lines += 1;

            let mut halves = trimmed.splitn(2, ARROW);
            let start_part = halves.next().unwrap_or_default().trim();
            // Cue settings ("align:start position:10%") trail the end timecode
            let end_part = halves
                .next()
                .and_then(|rest| rest.split_whitespace().next())
                .unwrap_or_default();

            debug!("Cue timing at line {}: {}", line_number + 1, trimmed);
            current = Some(PendingCue {
                start: time_codec::parse(start_part),
                end: time_codec::parse(end_part),
                text: String::new(),
            });
            continue;
        }

        if let Some(cue) = current.as_mut() {
            let clean = collapse_whitespace(&strip_tags(trimmed));
            if !clean.is_empty() {
                if !cue.text.is_empty() {
                    cue.text.push(' ');
                }
                cue.text.push_str(&clean);
            }
        }
    }

    if let Some(cue) = current.take() {
        finish(cue, &mut entries);
    }

    if timing_lines == 0 {
        return Err(CaptionError::Malformed(
            "cue-block payload has no timing lines".to_string(),
        ));
    }

    Ok(entries)
}
