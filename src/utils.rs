//! Utility functions for text cleanup, dates and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Time classification for edition naming
//! - HTML stripping and truncation of feed text
//! - Lenient parsing of the timestamps feeds publish
//! - Relative date labels for the rendered page
//! - File system validation for output directories

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Classify a local time of day into morning, afternoon, or evening.
///
/// The time boundaries are:
/// - **Morning**: 00:00 - 08:00
/// - **Afternoon**: 08:00 - 16:00
/// - **Evening**: 16:00 - 24:00
pub fn time_of_day(tod: NaiveTime) -> &'static str {
    let morning_high = NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN);
    let afternoon_high = NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN);

    if tod < morning_high {
        "morning"
    } else if tod < afternoon_high {
        "afternoon"
    } else {
        "evening"
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped characters appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Remove every HTML tag from `html`, keeping the text nodes.
///
/// Entities are decoded as a side effect of parsing.
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.to_string();
    }
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Shorten display text to `max` characters, appending `...` when cut.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_text("short", 10), "short");
/// assert_eq!(truncate_text("a long headline", 6), "a long...");
/// ```
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}...", head.trim())
}

/// Parse a feed timestamp.
///
/// Accepts RFC 3339, RFC 2822 (raw RSS `pubDate`) and the
/// `YYYY-MM-DD HH:MM:SS` form emitted by rss2json, which is UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Describe how long ago `published` was, relative to `now`.
///
/// Same-day items read "Just now" or "N hours ago", then "Yesterday",
/// "N days ago" for the rest of the week, and a plain date beyond that.
pub fn relative_date(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - published;
    let days = diff.num_days();
    let hours = diff.num_hours();

    if days <= 0 {
        if hours <= 0 {
            return "Just now".to_string();
        }
        return format!("{} hours ago", hours);
    }
    if days == 1 {
        return "Yesterday".to_string();
    }
    if days < 7 {
        return format!("{} days ago", days);
    }
    published.format("%-m/%-d/%Y").to_string()
}

/// Capitalize the first character of a string.
///
/// Used for edition names (e.g., "morning" -> "Morning").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 chars)"));
    }

    #[test]
    fn test_edition_boundaries() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(time_of_day(t(0, 0)), "morning");
        assert_eq!(time_of_day(t(7, 59)), "morning");
        assert_eq!(time_of_day(t(8, 0)), "afternoon");
        assert_eq!(time_of_day(t(15, 59)), "afternoon");
        assert_eq!(time_of_day(t(16, 0)), "evening");
        assert_eq!(time_of_day(t(23, 59)), "evening");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b>!</p>"), "Hello world!");
        assert_eq!(strip_html("plain text"), "plain text");
        assert_eq!(strip_html("Fish &amp; chips"), "Fish & chips");
        assert_eq!(
            strip_html(r#"<img src="x.jpg"/>Pride <a href="/p">march</a>"#),
            "Pride march"
        );
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a long headline", 7), "a long...");
    }

    #[test]
    fn test_parse_published_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 6, 12, 30, 0).unwrap();
        assert_eq!(parse_published("2025-05-06 12:30:00"), Some(expected));
        assert_eq!(parse_published("2025-05-06T12:30:00Z"), Some(expected));
        assert_eq!(
            parse_published("Tue, 06 May 2025 12:30:00 +0000"),
            Some(expected)
        );
        assert!(parse_published("2025-05-06").is_some());
        assert_eq!(parse_published("not a date"), None);
        assert_eq!(parse_published(""), None);
    }

    #[test]
    fn test_relative_date() {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_date(now - Duration::minutes(20), now), "Just now");
        assert_eq!(relative_date(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_date(now - Duration::hours(30), now), "Yesterday");
        assert_eq!(relative_date(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_date(now - Duration::days(9), now), "5/1/2025");
        assert_eq!(relative_date(now + Duration::hours(2), now), "Just now");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("morning"), "Morning");
        assert_eq!(upcase(""), "");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("shespeaks_probe_{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
