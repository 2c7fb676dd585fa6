/*!
 * Conversion between textual timecodes and seconds.
 *
 * Caption sources are not always well-formed, so parsing is lenient:
 * anything that cannot be read as a timecode becomes `0.0`.
 */

/// Parse a timecode (`H:MM:SS.mmm`, `MM:SS.mmm` or a bare number) into seconds.
///
/// Malformed, negative or non-finite input yields `0.0`.
pub fn parse(timecode: &str) -> f64 {
    let parts: Vec<&str> = timecode.trim().split(':').collect();

    let seconds = match parts.as_slice() {
        [hours, minutes, seconds] => {
            match (parse_whole(hours), parse_whole(minutes), parse_fractional(seconds)) {
                (Some(h), Some(m), Some(s)) => h * 3600.0 + m * 60.0 + s,
                _ => return 0.0,
            }
        }
        [minutes, seconds] => match (parse_whole(minutes), parse_fractional(seconds)) {
            (Some(m), Some(s)) => m * 60.0 + s,
            _ => return 0.0,
        },
        [seconds] => match parse_fractional(seconds) {
            Some(s) => s,
            None => return 0.0,
        },
        _ => return 0.0,
    };

    if seconds.is_finite() && seconds >= 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Format seconds as `HH:MM:SS.mmm`
pub fn format(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
}

fn parse_whole(part: &str) -> Option<f64> {
    part.trim().parse::<u64>().ok().map(|v| v as f64)
}

fn parse_fractional(part: &str) -> Option<f64> {
    let value = part.trim().parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}
