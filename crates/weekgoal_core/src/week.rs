//! Calendar week boundary resolver.
//!
//! # Responsibility
//! - Map an instant to the inclusive `[start, end]` bounds of its week.
//! - Provide the civil-date helper used for per-day grouping.
//!
//! # Invariants
//! - Resolution is pure: same `now_ms` and week-start day, same bounds.
//! - Both bounds are closed; `end_ms - start_ms` is exactly 7 days minus
//!   1 millisecond.
//! - All arithmetic is UTC; the engine has a single implicit locale.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MS_PER_DAY: i64 = 86_400_000;

/// Length of a closed week interval in milliseconds.
pub const WEEK_SPAN_MS: i64 = 7 * MS_PER_DAY - 1;

/// Error for instants outside the representable calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockError {
    /// The offending epoch-millisecond value.
    pub instant_ms: i64,
}

impl Display for ClockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "instant {} ms is outside the representable calendar range",
            self.instant_ms
        )
    }
}

impl Error for ClockError {}

/// Inclusive start/end instants of one calendar week, epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    /// 00:00:00.000 on the first day of the week.
    pub start_ms: i64,
    /// 23:59:59.999 on the last day of the week.
    pub end_ms: i64,
}

impl WeekBounds {
    /// Returns whether `instant_ms` falls inside the closed interval.
    pub fn contains(&self, instant_ms: i64) -> bool {
        instant_ms >= self.start_ms && instant_ms <= self.end_ms
    }
}

/// Resolves the week containing `now_ms` for the given week-start day.
///
/// # Contract
/// - `start_ms` is midnight on the most recent `week_start` weekday at or
///   before `now_ms`; an instant already on that midnight starts its own
///   week (inclusive lower bound).
/// - `end_ms = start_ms + 7 days - 1 ms` (inclusive upper bound).
///
/// # Errors
/// - `ClockError` when `now_ms` cannot be expressed as a calendar instant.
pub fn resolve_week(now_ms: i64, week_start: Weekday) -> Result<WeekBounds, ClockError> {
    let today = date_of(now_ms)?;

    let days_back = (today.weekday().num_days_from_monday() + 7
        - week_start.num_days_from_monday())
        % 7;
    let first_day = today
        .checked_sub_days(Days::new(u64::from(days_back)))
        .ok_or(ClockError { instant_ms: now_ms })?;

    let start_ms = first_day
        .and_hms_opt(0, 0, 0)
        .ok_or(ClockError { instant_ms: now_ms })?
        .and_utc()
        .timestamp_millis();
    let end_ms = start_ms
        .checked_add(WEEK_SPAN_MS)
        .ok_or(ClockError { instant_ms: now_ms })?;

    Ok(WeekBounds { start_ms, end_ms })
}

/// Returns the civil date containing `instant_ms`.
pub fn date_of(instant_ms: i64) -> Result<NaiveDate, ClockError> {
    Ok(instant_of(instant_ms)?.date_naive())
}

/// Converts epoch milliseconds to a UTC instant, rejecting out-of-range values.
pub fn instant_of(instant_ms: i64) -> Result<DateTime<Utc>, ClockError> {
    Utc.timestamp_millis_opt(instant_ms)
        .single()
        .ok_or(ClockError { instant_ms })
}

#[cfg(test)]
mod tests {
    use super::{resolve_week, ClockError, WEEK_SPAN_MS};
    use chrono::{TimeZone, Utc, Weekday};

    fn ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn sunday_week_contains_midweek_instant() {
        // 2024-09-11 is a Wednesday.
        let bounds = resolve_week(ms(2024, 9, 11, 15, 30, 0), Weekday::Sun).unwrap();
        assert_eq!(bounds.start_ms, ms(2024, 9, 8, 0, 0, 0));
        assert_eq!(bounds.end_ms, ms(2024, 9, 14, 23, 59, 59) + 999);
    }

    #[test]
    fn week_span_is_seven_days_minus_one_millisecond() {
        let bounds = resolve_week(ms(2024, 9, 11, 0, 0, 0), Weekday::Sun).unwrap();
        assert_eq!(bounds.end_ms - bounds.start_ms, WEEK_SPAN_MS);
    }

    #[test]
    fn instant_on_week_start_midnight_opens_its_own_week() {
        let sunday_midnight = ms(2024, 9, 8, 0, 0, 0);
        let bounds = resolve_week(sunday_midnight, Weekday::Sun).unwrap();
        assert_eq!(bounds.start_ms, sunday_midnight);
        assert!(bounds.contains(sunday_midnight));
    }

    #[test]
    fn instant_on_week_end_belongs_to_the_closing_week() {
        let saturday_last_ms = ms(2024, 9, 14, 23, 59, 59) + 999;
        let bounds = resolve_week(saturday_last_ms, Weekday::Sun).unwrap();
        assert_eq!(bounds.end_ms, saturday_last_ms);
        assert_eq!(bounds.start_ms, ms(2024, 9, 8, 0, 0, 0));
    }

    #[test]
    fn monday_start_convention_shifts_bounds() {
        let bounds = resolve_week(ms(2024, 9, 11, 12, 0, 0), Weekday::Mon).unwrap();
        assert_eq!(bounds.start_ms, ms(2024, 9, 9, 0, 0, 0));
        assert_eq!(bounds.end_ms, ms(2024, 9, 15, 23, 59, 59) + 999);
    }

    #[test]
    fn out_of_range_instant_is_rejected() {
        let err = resolve_week(i64::MAX, Weekday::Sun).unwrap_err();
        assert_eq!(err, ClockError { instant_ms: i64::MAX });
    }
}
