//! Clock utilities for dinepick
//!
//! Every time-sensitive decision (history dedup, recent-visit exclusion,
//! opening hours) reads the wall clock through [`now`].
//!
//! # Mock Time for Development
//!
//! In debug builds, the `DINEPICK_MOCK_TIME` environment variable can be set
//! to override the system time. This is useful for checking opening hours
//! against a fixed moment.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 12:30:00`)
//!
//! Example:
//! ```bash
//! DINEPICK_MOCK_TIME="2025-12-25 12:30:00" dinepick pick --lat 48.85 --lon 2.35
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;
use std::time::Duration;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "DINEPICK_MOCK_TIME";

/// Format accepted by `DINEPICK_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once at first use.
/// Mock time then advances at the real rate.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

/// Parse a `DINEPICK_MOCK_TIME` value as a local timestamp
pub fn parse_mock_time(value: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), MOCK_TIME_FORMAT).ok()?;
    // Ambiguous or skipped local times (DST changes) are rejected
    Local.from_local_datetime(&naive).single()
}

#[cfg(debug_assertions)]
fn mock_offset_from_env() -> Option<chrono::Duration> {
    let raw = std::env::var(MOCK_TIME_ENV_VAR).ok()?;
    match parse_mock_time(&raw) {
        Some(mocked) => {
            #[allow(clippy::disallowed_methods)]
            let offset = mocked.signed_duration_since(Local::now());
            tracing::info!(mock_time = %raw, offset_secs = offset.num_seconds(), "Mock time enabled");
            Some(offset)
        }
        None => {
            tracing::warn!(
                mock_time = %raw,
                expected_format = MOCK_TIME_FORMAT,
                "Ignoring unusable mock time"
            );
            None
        }
    }
}

#[cfg(not(debug_assertions))]
fn mock_offset_from_env() -> Option<chrono::Duration> {
    None
}

/// Whether `DINEPICK_MOCK_TIME` is shifting the clock
pub fn is_mock_time_active() -> bool {
    MOCK_TIME_OFFSET.get_or_init(mock_offset_from_env).is_some()
}

/// Current local time, shifted by the mock offset in debug builds
#[allow(clippy::disallowed_methods)] // Wraps Local::now()
pub fn now() -> DateTime<Local> {
    let offset = *MOCK_TIME_OFFSET.get_or_init(mock_offset_from_env);
    let real = Local::now();
    offset.map_or(real, |offset| real + offset)
}

/// Convert a window expressed in hours into a chrono duration.
pub fn hours(window_hours: u32) -> chrono::Duration {
    chrono::Duration::hours(i64::from(window_hours))
}

/// Full date and time, in the same layout `DINEPICK_MOCK_TIME` accepts
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format(MOCK_TIME_FORMAT).to_string()
}

/// Helper to format durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Describe how long ago `then` happened relative to `now`, e.g. `"3h 12m ago"`.
pub fn format_ago(then: &DateTime<Local>, now: &DateTime<Local>) -> String {
    match now.signed_duration_since(*then).to_std() {
        Ok(elapsed) => format!("{} ago", format_duration(elapsed)),
        Err(_) => "just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
        assert_eq!(format_duration(Duration::from_secs(90_000)), "1d 1h");
    }

    #[test]
    fn test_format_ago() {
        let now = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 0).unwrap();
        let then = Local.with_ymd_and_hms(2025, 12, 25, 12, 0, 0).unwrap();
        assert_eq!(format_ago(&then, &now), "2h 30m ago");

        // Timestamps from the future (clock skew) are not negative
        assert_eq!(format_ago(&now, &then), "just now");
    }

    #[test]
    fn test_format_datetime_full() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 30, 45).unwrap();
        assert_eq!(format_datetime_full(&dt), "2025-12-25 14:30:45");
    }

    #[test]
    fn test_hours_window() {
        assert_eq!(hours(24), chrono::Duration::seconds(86_400));
    }

    #[test]
    fn test_now_returns_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn test_parse_mock_time() {
        let parsed = parse_mock_time(" 2025-12-25 14:30:00 ").unwrap();
        assert_eq!(format_datetime_full(&parsed), "2025-12-25 14:30:00");

        assert!(parse_mock_time("2025-12-25T14:30:00").is_none());
        assert!(parse_mock_time("").is_none());
    }

    #[test]
    fn test_now_follows_mock_state() {
        // The offset is latched once per process, so only consistency is checked
        let active = is_mock_time_active();
        assert_eq!(active, is_mock_time_active());
    }
}
