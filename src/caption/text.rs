/*!
 * Text cleanup shared by the caption formats.
 */

use once_cell::sync::Lazy;
use regex::Regex;

// @const: Any markup tag
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// @const: Whitespace runs
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove inline markup tags such as `<i>`, `<c.colorE5E5E5>` or `<00:00:01.000>`
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Decode the handful of entities timed-text payloads use.
///
/// `&amp;` goes first so double-encoded sequences such as `&amp;#39;` resolve fully.
pub fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Collapse whitespace runs to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}
