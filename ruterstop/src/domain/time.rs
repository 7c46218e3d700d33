//! Relative time arithmetic for departure boards.
//!
//! Departure times and "now" are both naive local wall-clock values; no time
//! zone conversion happens here.

use chrono::NaiveDateTime;

/// Display token for departures less than a minute away (Norwegian "now").
const NOW_TOKEN: &str = "naa";

/// Largest minute count shown on the board.
const MAX_DISPLAY_MINS: i64 = 99;

/// Whole minutes from `now` until `target`.
///
/// Returns -1 when `target` is already in the past.
pub fn minutes_until(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    if now > target {
        return -1;
    }
    target.signed_duration_since(now).num_seconds() / 60
}

/// Fixed-width (6 characters) countdown until `target`.
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use ruterstop::domain::human_delta;
///
/// let now = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
/// assert_eq!(human_delta(now + Duration::seconds(30), now), "   naa");
/// assert_eq!(human_delta(now + Duration::minutes(7), now), " 7 min");
/// assert_eq!(human_delta(now + Duration::hours(5), now), "99 min");
/// ```
pub fn human_delta(target: NaiveDateTime, now: NaiveDateTime) -> String {
    let mins = minutes_until(target, now).min(MAX_DISPLAY_MINS);
    if mins < 1 {
        return format!("{NOW_TOKEN:>6}");
    }
    format!("{mins:2} min")
}
