//! Departure time normalization.
//!
//! The live API encodes departure times in three textual forms: the literal
//! `"sofort"` for a vehicle leaving right now, a relative `"<N> min"`
//! countdown for the next few minutes, and an absolute `"H:MM"` wall-clock
//! time for everything further out. This module resolves all three into
//! absolute timestamps anchored to the moment of the query.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Error returned when a time string matches none of the known forms.
///
/// Carries the offending string so callers can report exactly what the
/// service sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized time format: {0:?}")]
pub struct UnrecognizedTimeFormat(pub String);

/// Resolve a departure time string against `now`.
///
/// The forms are tried in priority order; the first match wins:
///
/// 1. `"sofort"` — returns `now` unchanged.
/// 2. `"<N> min"` with a single digit 1-9 — returns `now + N minutes`.
///    The service sends a bare `"0"` instead of `"0 min"`; callers remap
///    that to `"sofort"` before calling here (see `kvv::convert`).
/// 3. `"<H>:<MM>"` with H 0-29 (one or two digits) and MM 00-59 — the next
///    occurrence of that clock time. Hours 24-29 are past-midnight trips
///    and resolve to `H - 24` on the following day.
///
/// Anything else fails with [`UnrecognizedTimeFormat`].
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use kvv_live::domain::normalize;
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(12, 0, 0)
///     .unwrap();
///
/// assert_eq!(normalize("sofort", now).unwrap(), now);
/// assert_eq!(normalize("5 min", now).unwrap(), now + Duration::minutes(5));
/// assert_eq!(
///     normalize("14:30", now).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 1)
///         .unwrap()
///         .and_hms_opt(14, 30, 0)
///         .unwrap()
/// );
/// assert!(normalize("later", now).is_err());
/// ```
pub fn normalize(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, UnrecognizedTimeFormat> {
    if raw == "sofort" {
        return Ok(now);
    }

    if let Some(minutes) = parse_countdown(raw) {
        return Ok(now + Duration::minutes(minutes));
    }

    if let Some((hour, minute)) = parse_wall_clock(raw) {
        return Ok(resolve_wall_clock(hour, minute, now));
    }

    Err(UnrecognizedTimeFormat(raw.to_string()))
}

/// Parse the `"<N> min"` form. N is exactly one digit 1-9.
fn parse_countdown(s: &str) -> Option<i64> {
    let digits = s.strip_suffix(" min")?;
    if digits.len() != 1 {
        return None;
    }

    let byte = digits.as_bytes()[0];
    if !(b'1'..=b'9').contains(&byte) {
        return None;
    }

    Some(i64::from(byte - b'0'))
}

/// Parse the `"<H>:<MM>"` form: H one or two digits 0-29, MM exactly two
/// digits 00-59.
fn parse_wall_clock(s: &str) -> Option<(u32, u32)> {
    let (hh, mm) = s.split_once(':')?;

    if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
        return None;
    }
    if !hh.bytes().all(|b| b.is_ascii_digit()) || !mm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour: u32 = hh.parse().ok()?;
    let minute: u32 = mm.parse().ok()?;

    if hour > 29 || minute > 59 {
        return None;
    }

    Some((hour, minute))
}

/// Resolve a wall-clock time to the next occurrence after `now`.
///
/// Seconds are kept from `now`, so a departure in the current minute
/// compares `>= now` and stays on today rather than rolling a day forward.
fn resolve_wall_clock(hour: u32, minute: u32, now: NaiveDateTime) -> NaiveDateTime {
    // Hours 24-29 encode past-midnight trips: "25:10" is 01:10 tomorrow.
    let (hour, next_day) = if hour >= 24 {
        (hour - 24, true)
    } else {
        (hour, false)
    };

    let today = now
        .with_hour(hour)
        .and_then(|t| t.with_minute(minute))
        .expect("hour and minute are range-checked by the pattern match");

    if next_day {
        today + Duration::days(1)
    } else if today < now {
        // The service always means the next occurrence of this clock time.
        today + Duration::days(1)
    } else {
        today
    }
}
