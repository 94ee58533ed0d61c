//! Formatting utilities for file sizes and timestamps.

use chrono::{DateTime, NaiveDateTime};

/// Byte units, base 1024.
const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Timestamp layouts the backend is known to send, besides RFC 3339.
const TIMESTAMP_LAYOUTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Format a byte count for display (e.g., "0 B", "1.5 KB", "3.21 MB").
///
/// The value is rounded to two decimals with trailing zeros dropped.
/// Sizes past the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return format!("0 {}", SIZE_UNITS[0]);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Format a backend timestamp as `DD.MM.YYYY, HH:MM:SS`.
///
/// Values that cannot be parsed are returned unchanged so the user still
/// sees what the server sent.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%d.%m.%Y, %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Parse an RFC 3339 or SQLite-style timestamp.
///
/// RFC 3339 values keep their own wall-clock time; the offset is not applied.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}
