//! Calendar arithmetic
//!
//! Month and year stepping with end-of-month clamping, and ordinal weekday
//! lookups ("the 2nd Tuesday", "the last Friday") within a month.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Position of a weekday within its month
///
/// A date is [`WeekdayOrdinal::Last`] whenever the same weekday a week later
/// falls in the next month, whether it is the 4th or the 5th such weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekdayOrdinal {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekdayOrdinal {
    /// English ordinal word ("second", "last")
    pub const fn as_word(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }

    const fn index(self) -> Option<u8> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

impl fmt::Display for WeekdayOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_word())
    }
}

/// Last day of `month` (1-12) in `year`
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Add `months` to `date`, clamping the day to the target month's length
///
/// Jan 31 + 1 month is Feb 28 (or 29), never Mar 2 or 3. Returns `None` past
/// the representable calendar range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Add `years` to `date`; Feb 29 becomes Feb 28 in non-leap years
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    add_months(date, years.checked_mul(12)?)
}

/// Add whole days
pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Ordinal position of `date`'s weekday within its month
pub fn weekday_ordinal(date: NaiveDate) -> WeekdayOrdinal {
    let a_week_later = date.checked_add_days(Days::new(7));
    if a_week_later.is_none_or(|next| next.month() != date.month()) {
        return WeekdayOrdinal::Last;
    }

    match (date.day() - 1) / 7 {
        0 => WeekdayOrdinal::First,
        1 => WeekdayOrdinal::Second,
        2 => WeekdayOrdinal::Third,
        _ => WeekdayOrdinal::Fourth,
    }
}

/// Last `weekday` of the given month
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last_day = last_day_of_month(year, month)?;
    let back = (7 + last_day.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last_day.checked_sub_days(Days::new(u64::from(back)))
}

/// The `ordinal` occurrence of `weekday` in the given month
///
/// First through Fourth always exist; Last resolves to the month's final
/// matching weekday.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: WeekdayOrdinal,
) -> Option<NaiveDate> {
    match ordinal.index() {
        Some(n) => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n),
        None => last_weekday_of_month(year, month, weekday),
    }
}

/// Monday of the ISO week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(back))).unwrap_or(date)
}
