/*!
 * Timed XML caption payloads.
 *
 * Each `<text start=".." dur="..">` element becomes one subtitle with
 * `end = start + dur`. Attribute values that cannot be read count as zero.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::text::{collapse_whitespace, decode_entities, strip_tags};
use super::Subtitle;
use crate::errors::CaptionError;

// @const: A <text ...>...</text> element, or a self-closing one
static TEXT_ELEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)"#).unwrap()
});

// @const: name="value" or name='value' attribute pairs
static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Parse a timed XML payload into subtitles, in document order
pub fn parse_timed_text(content: &str) -> Result<Vec<Subtitle>, CaptionError> {
    let mut entries = Vec::new();
    let mut elements = 0usize;

    for caps in TEXT_ELEMENT_REGEX.captures_iter(content) {
        elements += 1;
        let attributes = caps.get(1).map_or("", |m| m.as_str());
        let start = attribute_seconds(attributes, "start");
        let dur = attribute_seconds(attributes, "dur");

        let raw = caps.get(2).map_or("", |m| m.as_str());
        let text = clean_text(raw);
        if text.is_empty() {
            debug!("Skipping empty timed-text element at {:.3}s", start);
            continue;
        }

        match Subtitle::new(start, start + dur, text) {
            Ok(subtitle) => entries.push(subtitle),
            Err(e) => warn!("Skipping invalid timed-text element: {}", e),
        }
    }

    if elements == 0 {
        return Err(CaptionError::Malformed(
            "timed-text payload has no <text> elements".to_string(),
        ));
    }

    Ok(entries)
}

/// Strip inline tags, decode entities, strip tags the decoding revealed and
/// collapse whitespace
fn clean_text(raw: &str) -> String {
    let without_tags = strip_tags(raw);
    let decoded = decode_entities(&without_tags);
    collapse_whitespace(&strip_tags(&decoded))
}

fn attribute_seconds(attributes: &str, name: &str) -> f64 {
    ATTRIBUTE_REGEX
        .captures_iter(attributes)
        .find(|caps| caps.get(1).is_some_and(|m| m.as_str() == name))
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .and_then(|value| value.as_str().trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}
