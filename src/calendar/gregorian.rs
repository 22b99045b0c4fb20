//! Gregorian calendar helpers shared by the interest and age engines.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Returns number of days in a given year/month.
///
/// Month 0 means December of the previous year, so callers can ask for
/// "the month before January" without special-casing it.
pub fn days_in_month(year: i32, month: i32) -> u32 {
    let (year, month) = if month == 0 { (year - 1, 12) } else { (year, month) };
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    u32::try_from(next_month)
        .ok()
        .and_then(|m| NaiveDate::from_ymd_opt(next_year, m, 1))
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

/// Elapsed days between two instants, rounded up.
pub fn ceil_days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let millis = (end - start).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}

/// Elapsed days between two instants, rounded down.
pub fn floor_days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}
