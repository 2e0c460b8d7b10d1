//! Timezone handling utilities
//!
//! Parses IANA zone identifiers and maps local wall-clock times to UTC
//! instants. Civil-time irregularities are resolved by a fixed policy:
//!
//! - DST gap (the local time does not exist): pushed forward by the gap's
//!   length, i.e. interpreted with the offset in force before the transition.
//! - DST overlap (the local time exists twice): the earlier instant, i.e. the
//!   pre-transition offset.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};

/// Parse an IANA timezone string (e.g., "Asia/Singapore", "Europe/London")
///
/// # Examples
///
/// ```
/// use cadence_core::timezone::parse_timezone;
///
/// let tz = parse_timezone("America/New_York").unwrap();
/// assert_eq!(tz.name(), "America/New_York");
/// ```
pub fn parse_timezone(tz_str: &str) -> RecurrenceResult<Tz> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| RecurrenceError::InvalidTimezone(tz_str.to_string()))
}

/// Convert a local wall-clock time in `tz` to a UTC instant
///
/// Gaps and overlaps resolve per the module policy. Returns `None` only when
/// the instant lies outside chrono's representable range.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cadence_core::timezone::{parse_timezone, to_utc};
///
/// let tz = parse_timezone("America/New_York").unwrap();
/// // 02:30 does not exist on this day; it lands on 03:30 EDT
/// let local = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(2, 30, 0).unwrap();
/// let utc = to_utc(local, &tz).unwrap();
/// assert_eq!(utc.to_rfc3339(), "2024-03-10T07:30:00+00:00");
/// ```
pub fn to_utc(local: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            let first = first.with_timezone(&Utc);
            let second = second.with_timezone(&Utc);
            tracing::debug!(%local, zone = tz.name(), "Ambiguous local time, using earlier offset");
            Some(first.min(second))
        }
        LocalResult::None => {
            let before = offset_before_gap(local, tz)?;
            tracing::debug!(%local, zone = tz.name(), "Non-existent local time, pushing forward");
            let utc = local.checked_sub_signed(before)?;
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

/// UTC offset in force shortly before a gap containing `local`
///
/// Reads the offset one day earlier; IANA zones never stack two transitions that close.
fn offset_before_gap(local: NaiveDateTime, tz: &Tz) -> Option<Duration> {
    let day_before = local.checked_sub_signed(Duration::days(1))?;
    let offset = tz.offset_from_utc_datetime(&day_before).fix();
    Some(Duration::seconds(i64::from(offset.local_minus_utc())))
}

/// Render a UTC instant as wall-clock time in `tz`
///
/// Returns `None` when the wall-clock time falls outside chrono's range.
pub fn to_local(utc: &DateTime<Utc>, tz: &Tz) -> Option<NaiveDateTime> {
    let naive = utc.naive_utc();
    let offset = tz.offset_from_utc_datetime(&naive).fix();
    naive.checked_add_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
}

/// Validate that a timezone string is valid
///
/// Returns `Ok(())` if valid, `Err` otherwise
pub fn validate_timezone(tz_str: &str) -> RecurrenceResult<()> {
    parse_timezone(tz_str)?;
    Ok(())
}

/// A validated IANA timezone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timezone(String);

impl Timezone {
    /// Create a new Timezone if valid
    pub fn new(tz: &str) -> RecurrenceResult<Self> {
        validate_timezone(tz)?;
        Ok(Self(tz.to_string()))
    }

    /// Resolve to a `chrono_tz` zone
    ///
    /// Deserialized values are not checked, so this can still fail.
    pub fn resolve(&self) -> RecurrenceResult<Tz> {
        parse_timezone(&self.0)
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
