//! Utility functions for text cleanup, date display, and logging.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization for feed text (arXiv wraps titles mid-line)
//! - Day formatting shared by the digest and the email subject
//! - String truncation for logging

use chrono::NaiveDate;

/// `strftime` pattern for the human-readable day, e.g. `15 Mar 2024`.
pub const DAY_FORMAT: &str = "%d %b %Y";

/// Format a date as `DD Mon YYYY`.
///
/// # Examples
///
/// ```ignore
/// let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(format_day(d), "15 Mar 2024");
/// ```
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Collapse every run of whitespace (including newlines) into one space and
/// trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
