//! Human-readable formatting helpers for CLI output

use humansize::{BINARY, format_size as humanize};

/// Format a byte count with binary units (KiB, MiB, ...).
#[must_use]
pub fn format_size(bytes: u64) -> String {
    humanize(bytes, BINARY)
}

/// Format an optional duration in seconds as `H:MM:SS` or `M:SS`.
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return "-".to_string();
    };

    let total = seconds.round().max(0.0) as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}
