//! Recurrence rule model
//!
//! [`RecurrenceRule`] is the loosely-shaped value callers build or deserialize.
//! [`ValidatedRule`] is what the validator hands to the expander: every field
//! combination it can hold is a legal one.

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// How often an event repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Never,
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Never => "NEVER",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Annually => "ANNUALLY",
        };
        f.write_str(name)
    }
}

/// Which day a monthly rule lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonthlyType {
    /// Same day of month as the anchor, clamped to the month's last day
    SameDay,
    /// Same ordinal weekday as the anchor ("2nd Tuesday", "last Friday")
    SameWeekday,
}

/// Termination policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationKind {
    Forever,
    UntilDate,
    NOccurrences,
}

/// Day of week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// English name, capitalized
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day: DayOfWeek) -> Self {
        match day {
            DayOfWeek::Monday => Self::Mon,
            DayOfWeek::Tuesday => Self::Tue,
            DayOfWeek::Wednesday => Self::Wed,
            DayOfWeek::Thursday => Self::Thu,
            DayOfWeek::Friday => Self::Fri,
            DayOfWeek::Saturday => Self::Sat,
            DayOfWeek::Sunday => Self::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recurrence rule as supplied by a caller
///
/// Nothing here is checked yet; run it through
/// [`validate_rule`](crate::validation::validate_rule) to get a [`ValidatedRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub frequency: Option<Frequency>,
    pub step: Option<u32>,
    pub weekly_days: Option<BTreeSet<DayOfWeek>>,
    pub monthly_type: Option<MonthlyType>,
    pub duration: Option<DurationKind>,
    pub until_date: Option<NaiveDate>,
    pub occurrence_count: Option<u32>,
}

impl RecurrenceRule {
    /// A one-off event
    pub fn never() -> Self {
        Self {
            frequency: Some(Frequency::Never),
            ..Self::default()
        }
    }

    /// Every `step` days, forever until a termination is chained on
    pub fn daily(step: u32) -> Self {
        Self::repeating(Frequency::Daily, step)
    }

    /// Every `step` weeks on the given weekdays
    pub fn weekly(step: u32, days: impl IntoIterator<Item = DayOfWeek>) -> Self {
        Self {
            weekly_days: Some(days.into_iter().collect()),
            ..Self::repeating(Frequency::Weekly, step)
        }
    }

    /// Every `step` months
    pub fn monthly(step: u32, monthly_type: MonthlyType) -> Self {
        Self {
            monthly_type: Some(monthly_type),
            ..Self::repeating(Frequency::Monthly, step)
        }
    }

    /// Every `step` years
    pub fn annually(step: u32) -> Self {
        Self::repeating(Frequency::Annually, step)
    }

    fn repeating(frequency: Frequency, step: u32) -> Self {
        Self {
            frequency: Some(frequency),
            step: Some(step),
            duration: Some(DurationKind::Forever),
            ..Self::default()
        }
    }

    /// Repeat with no end
    #[must_use]
    pub fn forever(self) -> Self {
        Self {
            duration: Some(DurationKind::Forever),
            until_date: None,
            occurrence_count: None,
            ..self
        }
    }

    /// Repeat up to and including `date`
    #[must_use]
    pub fn until(self, date: NaiveDate) -> Self {
        Self {
            duration: Some(DurationKind::UntilDate),
            until_date: Some(date),
            occurrence_count: None,
            ..self
        }
    }

    /// Repeat `count` more times after the anchor occurrence
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self {
            duration: Some(DurationKind::NOccurrences),
            until_date: None,
            occurrence_count: Some(count),
            ..self
        }
    }

    /// Returns a fully-determined copy of this rule.
    ///
    /// For NEVER every other field is cleared. For repeating rules a missing
    /// step becomes 1. The receiver is left untouched.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match self.frequency {
            Some(Frequency::Never) => Self::never(),
            Some(_) => Self {
                step: Some(self.step.unwrap_or(1)),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// What a repeating rule repeats on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Daily,
    /// Never empty, iterates in weekday order
    Weekly(BTreeSet<DayOfWeek>),
    Monthly(MonthlyType),
    Annually,
}

impl Pattern {
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily => Frequency::Daily,
            Self::Weekly(_) => Frequency::Weekly,
            Self::Monthly(_) => Frequency::Monthly,
            Self::Annually => Frequency::Annually,
        }
    }
}

/// When a repeating rule stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Forever,
    /// Inclusive bound on the local start date
    Until(NaiveDate),
    /// Occurrences after the anchor; total slots is `count + 1`
    Count(u32),
}

/// A rule that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRule {
    Never,
    Repeating {
        pattern: Pattern,
        step: NonZeroU32,
        termination: Termination,
    },
}

impl ValidatedRule {
    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Never => Frequency::Never,
            Self::Repeating { pattern, .. } => pattern.frequency(),
        }
    }
}
