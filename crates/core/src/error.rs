//! Error types for Cadence core engine logic

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::rule::{DayOfWeek, Frequency};

/// Specific reasons a rule or anchor is rejected before expansion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Recurrence frequency is required")]
    MissingFrequency,

    #[error("Field '{0}' must be absent when frequency is NEVER")]
    FieldNotAllowedForNever(&'static str),

    #[error("Step must be a positive integer")]
    ZeroStep,

    #[error("Weekly rules require at least one weekday")]
    MissingWeeklyDays,

    #[error("Anchor weekday {0} is not one of the rule's weekly days")]
    AnchorWeekdayNotIncluded(DayOfWeek),

    #[error("Weekly days are only allowed for WEEKLY rules, got {0}")]
    WeeklyDaysNotAllowed(Frequency),

    #[error("Monthly rules require a monthly type")]
    MissingMonthlyType,

    #[error("Monthly type is only allowed for MONTHLY rules, got {0}")]
    MonthlyTypeNotAllowed(Frequency),

    #[error("Repeating rules require a duration")]
    MissingDuration,

    #[error("Duration UNTIL_DATE requires an until date")]
    MissingUntilDate,

    #[error("Duration N_OCCURRENCES requires an occurrence count")]
    MissingOccurrenceCount,

    #[error("Until date is only allowed with duration UNTIL_DATE")]
    UntilDateNotAllowed,

    #[error("Occurrence count is only allowed with duration N_OCCURRENCES")]
    OccurrenceCountNotAllowed,

    #[error("Occurrence count must be a positive integer")]
    ZeroOccurrenceCount,

    #[error("Until date {until} precedes the anchor end date {anchor_end}")]
    UntilBeforeAnchorEnd {
        until: NaiveDate,
        anchor_end: NaiveDate,
    },

    #[error("Event must end after it starts")]
    EndNotAfterStart,

    #[error("Event must not span more than 24 hours, got {minutes} minutes")]
    SpanTooLong { minutes: i64 },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Local time {0} is outside the supported calendar range")]
    OutOfRange(NaiveDateTime),
}

/// Core recurrence engine errors
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(#[from] ValidationError),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Anchor time {0} is outside the supported calendar range")]
    AnchorOutOfRange(NaiveDateTime),

    #[error("Requested {requested} occurrences, maximum is {max}")]
    LimitExceeded { requested: usize, max: usize },
}

/// Result type alias for recurrence operations
pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidEnvVar { name: String, value: String },
}
