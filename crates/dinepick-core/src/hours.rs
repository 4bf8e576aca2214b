//! Opening-hours heuristic
//!
//! Strings look like `Mo-Fr 12:00-14:00,19:00-22:00; Sa 19:00-22:00`. The
//! check is deliberately shallow: today's two-letter token is searched for
//! anywhere in the string, and if present every time range in the string is
//! tried. Ranges are not tied to their day segment, and a range that crosses
//! midnight only matches before midnight.
//!
//! One departure from the plain day-token rule: `24/7` carries no day token,
//! so that rule alone would report it closed. It is checked first and always
//! counts as open.

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

/// Day tokens indexed by days since Sunday
const DAY_TOKENS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const EVERY_DAY: &str = "Mo-Su";
const ALWAYS_OPEN: &str = "24/7";

static TIME_RANGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})-(\d{1,2}):(\d{2})").ok());

/// Whether a restaurant with the given hours is open at `at`.
///
/// Missing information counts as open.
pub fn is_open_at(hours: Option<&str>, at: NaiveDateTime) -> bool {
    let hours = match hours.map(str::trim) {
        None | Some("") => return true,
        Some(h) => h,
    };
    if hours.contains(ALWAYS_OPEN) {
        return true;
    }

    let today = DAY_TOKENS[at.weekday().num_days_from_sunday() as usize];
    if !hours.contains(today) && !hours.contains(EVERY_DAY) {
        return false;
    }

    let Some(pattern) = TIME_RANGE.as_ref() else {
        return true;
    };

    let current = at.hour() * 100 + at.minute();
    pattern.captures_iter(hours).any(|caps| {
        let part = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
        let open = part(1) * 100 + part(2);
        let close = part(3) * 100 + part(4);
        open <= current && current <= close
    })
}

/// [`is_open_at`] against the current local time
pub fn is_open_now(hours: Option<&str>) -> bool {
    is_open_at(hours, dinepick_util::now().naive_local())
}
