//! Timecode strings and second/frame conversions.
//!
//! Timecodes are `HH:MM:SS:FF`, with `;` accepted anywhere in place of `:`
//! (drop-frame notation). The drop-frame distinction itself is not modelled:
//! seconds are scaled by the frame rate and frames added on top.

use super::error::ConfigError;

pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// Parse a timecode into a frame count. Returns 0 for anything unparseable.
pub fn parse_timecode(text: &str, fps: f64) -> u64 {
    try_parse_timecode(text, fps).unwrap_or(0)
}

pub fn try_parse_timecode(text: &str, fps: f64) -> Option<u64> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }

    let fields: Vec<&str> = text.split([':', ';']).collect();
    let [h, m, s, f] = fields.as_slice() else {
        return None;
    };

    let h = parse_field(h)?;
    let m = parse_field(m)?;
    let s = parse_field(s)?;
    let f = parse_field(f)?;

    let seconds = h as f64 * 3600.0 + m as f64 * 60.0 + s as f64;
    let frames = (seconds * fps).floor() as u64;
    Some(frames.saturating_add(f))
}

fn parse_field(field: &str) -> Option<u64> {
    field.trim().parse::<u64>().ok()
}

/// Render a frame count as `HH:MM:SS:FF` using the nearest integer rate.
pub fn format_timecode(frames: u64, fps: f64) -> String {
    let rate = if fps.is_finite() && fps >= 1.0 {
        fps.round() as u64
    } else {
        DEFAULT_FRAME_RATE as u64
    };
    let ff = frames % rate;
    let total_seconds = frames / rate;
    let ss = total_seconds % 60;
    let mm = (total_seconds / 60) % 60;
    let hh = total_seconds / 3600;
    format!("{hh:02}:{mm:02}:{ss:02}:{ff:02}")
}

fn checked_seconds(field: &'static str, seconds: f64) -> Result<f64, ConfigError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ConfigError::InvalidSeconds {
            field,
            value: seconds,
        });
    }
    Ok(seconds)
}

pub fn checked_frame_rate(fps: f64) -> Result<f64, ConfigError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::InvalidFrameRate(fps));
    }
    Ok(fps)
}

/// Segment bounds are truncated to whole frames.
pub fn segment_seconds_to_frames(
    field: &'static str,
    seconds: f64,
    fps: f64,
) -> Result<u64, ConfigError> {
    let seconds = checked_seconds(field, seconds)?;
    Ok((seconds * checked_frame_rate(fps)?).trunc() as u64)
}

/// Fixed fill durations are rounded to the nearest frame.
pub fn duration_seconds_to_frames(
    field: &'static str,
    seconds: f64,
    fps: f64,
) -> Result<u64, ConfigError> {
    let seconds = checked_seconds(field, seconds)?;
    Ok((seconds * checked_frame_rate(fps)?).round() as u64)
}
