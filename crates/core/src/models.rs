//! Core domain models for Cadence
//!
//! The anchor describes an event's first occurrence; occurrences are the
//! concrete slots the expander derives from it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timezone::Timezone;

/// The first, defining occurrence of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TimeAnchor {
    /// Day event; `end` equals `start` for single-day events
    AllDay { start: NaiveDate, end: NaiveDate },
    /// Time event with independent start and end zones
    #[serde(rename_all = "camelCase")]
    Timed {
        start: NaiveDateTime,
        start_zone: Timezone,
        end: NaiveDateTime,
        end_zone: Timezone,
    },
}

impl TimeAnchor {
    pub const fn all_day(start: NaiveDate, end: NaiveDate) -> Self {
        Self::AllDay { start, end }
    }

    pub fn timed(
        start: NaiveDateTime,
        start_zone: Timezone,
        end: NaiveDateTime,
        end_zone: Timezone,
    ) -> Self {
        Self::Timed {
            start,
            start_zone,
            end,
            end_zone,
        }
    }

    /// Local start date, the date the sequencer steps from
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::AllDay { start, .. } => *start,
            Self::Timed { start, .. } => start.date(),
        }
    }

    /// Local end date in the end zone's wall-clock time
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::AllDay { end, .. } => *end,
            Self::Timed { end, .. } => end.date(),
        }
    }

    pub const fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay { .. })
    }
}

/// A timed slot, local and normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedOccurrence {
    /// Wall-clock start as scheduled in the start zone
    pub start_local: NaiveDateTime,
    /// Wall-clock end in the end zone
    pub end_local: NaiveDateTime,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

/// One generated slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Occurrence {
    AllDay { start: NaiveDate, end: NaiveDate },
    Timed(TimedOccurrence),
}

impl Occurrence {
    /// Local start date, the value termination policies compare against
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::AllDay { start, .. } => *start,
            Self::Timed(slot) => slot.start_local.date(),
        }
    }

    /// Normalized start instant; all-day slots have none
    pub const fn start_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::AllDay { .. } => None,
            Self::Timed(slot) => Some(slot.start_utc),
        }
    }

    pub const fn as_timed(&self) -> Option<&TimedOccurrence> {
        match self {
            Self::AllDay { .. } => None,
            Self::Timed(slot) => Some(slot),
        }
    }
}
