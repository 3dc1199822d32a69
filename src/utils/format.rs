//! Formatting utilities.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Format a number with thousand separators.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let bytes: Vec<_> = digits.bytes().rev().collect();
    let chunks: Vec<_> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();
    let grouped = chunks.into_iter().rev().collect::<Vec<_>>().join(",");

    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a change with an explicit sign (`+1,200`, `-5`, `+0`).
pub fn format_signed(n: i64) -> String {
    if n < 0 {
        format_number(n)
    } else {
        format!("+{}", format_number(n))
    }
}

/// Format an elapsed duration as `42s`, `3m 5s` or `1h 20m`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Truncate a string to max characters with ellipsis.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Values that don't parse are returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}
