//! Timestamp conversion for subtitle output

use crate::error::{ConvertError, Result};

/// Convert seconds to whole milliseconds, rounding half up
///
/// Negative, NaN and infinite inputs are rejected.
pub fn seconds_to_ms(secs: f64) -> Result<u64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConvertError::Format(format!("invalid timestamp: {}", secs)));
    }
    Ok((secs * 1000.0).round() as u64)
}

fn split_ms(ms: u64) -> (u64, u64, u64, u64) {
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    (hours, mins, secs, millis)
}

/// Format as `HH:MM:SS,mmm`
pub fn format_srt(ms: u64) -> String {
    let (hours, mins, secs, millis) = split_ms(ms);
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

/// Format as `HH:MM:SS.mmm`
pub fn format_vtt(ms: u64) -> String {
    let (hours, mins, secs, millis) = split_ms(ms);
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}
