//! Time utilities: parsing HH:MM[:SS], duration arithmetic, HH:MM:SS formatting.

use chrono::{NaiveTime, Timelike};

pub const ZERO_DURATION: &str = "00:00:00";

/// Largest duration accepted from a cell (one million hours).
pub const MAX_DURATION_SECS: i64 = 1_000_000 * 3600;

/// Parse a time of day ("9:00", "09:00:00").
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

pub fn seconds_of_day(t: NaiveTime) -> i64 {
    t.num_seconds_from_midnight() as i64
}

/// Parse a duration "H:MM" or "H:MM:SS". Hours may exceed 24 ("160:00:00")
/// up to [`MAX_DURATION_SECS`]; anything larger is rejected.
pub fn parse_hms(s: &str) -> Option<i64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut nums = Vec::with_capacity(3);
    for p in &parts {
        if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        nums.push(p.parse::<i64>().ok()?);
    }

    let (h, m, s) = (nums[0], nums[1], nums.get(2).copied().unwrap_or(0));
    if m >= 60 || s >= 60 {
        return None;
    }
    let secs = h.checked_mul(3600)?.checked_add(m * 60 + s)?;
    (secs <= MAX_DURATION_SECS).then_some(secs)
}

/// `value * unit` rounded to whole seconds, `None` when negative, not finite
/// or above [`MAX_DURATION_SECS`].
pub fn scaled_secs(value: f64, unit: f64) -> Option<i64> {
    let secs = (value * unit).round();
    (secs.is_finite() && secs >= 0.0 && secs <= MAX_DURATION_SECS as f64).then_some(secs as i64)
}

/// Seconds → "HH:MM:SS". Negative values clamp to zero, hours never wrap.
pub fn format_hms(secs: i64) -> String {
    let secs = secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Seconds between two times of day, `None` when `end` precedes `start`.
pub fn seconds_between(start: NaiveTime, end: NaiveTime) -> Option<i64> {
    let diff = seconds_of_day(end) - seconds_of_day(start);
    (diff >= 0).then_some(diff)
}
