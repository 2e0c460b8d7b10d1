//! Recurring event expansion
//!
//! Combines the date sequencer with the civil time normalizer and applies the
//! rule's termination policy. This is the entry point external callers use.
//!
//! Expansion is all-or-nothing: every check that can fail (rule validation,
//! zone resolution) runs before the first occurrence is produced, and the
//! returned iterator itself never fails.

use std::iter::FusedIterator;

use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::calendar::add_days;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::models::{Occurrence, TimeAnchor, TimedOccurrence};
use crate::rule::{RecurrenceRule, Termination, ValidatedRule};
use crate::sequence::{OccurrenceDates, sequence};
use crate::timezone::{to_local, to_utc};
use crate::validation::validate_rule;

/// Expand `rule` from `anchor` into a lazy, ascending occurrence sequence
///
/// FOREVER rules yield an unbounded iterator; bound it with
/// [`Iterator::take`] or [`Occurrences::through`].
///
/// # Errors
///
/// - [`RecurrenceError::InvalidRule`](crate::RecurrenceError::InvalidRule)
///   when the rule fails validation against the anchor
/// - [`RecurrenceError::InvalidTimezone`](crate::RecurrenceError::InvalidTimezone)
///   when either anchor zone is not a known IANA identifier
/// - [`RecurrenceError::AnchorOutOfRange`](crate::RecurrenceError::AnchorOutOfRange)
///   when an anchor time has no UTC instant within chrono's range
pub fn expand(anchor: &TimeAnchor, rule: &RecurrenceRule) -> RecurrenceResult<Occurrences> {
    let validated = validate_rule(rule, anchor).inspect_err(|e| {
        tracing::warn!(reason = %e, "Rejected recurrence rule");
    })?;
    expand_validated(anchor, &validated)
}

/// Expand a rule that has already been validated against `anchor`
pub fn expand_validated(
    anchor: &TimeAnchor,
    rule: &ValidatedRule,
) -> RecurrenceResult<Occurrences> {
    let shape = SlotShape::from_anchor(anchor)?;

    tracing::debug!(
        frequency = %rule.frequency(),
        anchor = %anchor.start_date(),
        "Expanding recurrence"
    );

    let termination = match rule {
        ValidatedRule::Never => Termination::Count(0),
        ValidatedRule::Repeating { termination, .. } => *termination,
    };

    Ok(Occurrences {
        dates: sequence(anchor.start_date(), rule),
        termination,
        emitted: 0,
        shape,
        done: false,
    })
}

/// Expand and collect at most `limit` occurrences
pub fn expand_limited(
    anchor: &TimeAnchor,
    rule: &RecurrenceRule,
    limit: usize,
) -> RecurrenceResult<Vec<Occurrence>> {
    Ok(expand(anchor, rule)?.take(limit).collect())
}

/// How one local start date becomes a full slot
#[derive(Debug, Clone)]
enum SlotShape {
    AllDay {
        span_days: u64,
    },
    Timed {
        start_time: NaiveTime,
        start_tz: Tz,
        end_tz: Tz,
        /// Nominal length, fixed from the anchor
        length: Duration,
    },
}

impl SlotShape {
    fn from_anchor(anchor: &TimeAnchor) -> RecurrenceResult<Self> {
        match anchor {
            TimeAnchor::AllDay { start, end } => Ok(Self::AllDay {
                span_days: u64::try_from((*end - *start).num_days()).unwrap_or(0),
            }),
            TimeAnchor::Timed {
                start,
                start_zone,
                end,
                end_zone,
            } => {
                let start_tz = start_zone.resolve()?;
                let end_tz = end_zone.resolve()?;
                let start_utc =
                    to_utc(*start, &start_tz).ok_or(RecurrenceError::AnchorOutOfRange(*start))?;
                let end_utc =
                    to_utc(*end, &end_tz).ok_or(RecurrenceError::AnchorOutOfRange(*end))?;
                let minutes = (end_utc - start_utc).num_minutes();
                Ok(Self::Timed {
                    start_time: start.time(),
                    start_tz,
                    end_tz,
                    length: Duration::minutes(minutes),
                })
            }
        }
    }

    fn build(&self, date: NaiveDate) -> Option<Occurrence> {
        match self {
            Self::AllDay { span_days } => Some(Occurrence::AllDay {
                start: date,
                end: add_days(date, *span_days)?,
            }),
            Self::Timed {
                start_time,
                start_tz,
                end_tz,
                length,
            } => {
                let start_local = date.and_time(*start_time);
                let start_utc = to_utc(start_local, start_tz)?;
                let end_utc = start_utc.checked_add_signed(*length)?;
                Some(Occurrence::Timed(TimedOccurrence {
                    start_local,
                    end_local: to_local(&end_utc, end_tz)?,
                    start_utc,
                    end_utc,
                }))
            }
        }
    }
}

/// Lazy occurrence sequence returned by [`expand`]
///
/// `start_local` of a timed slot is the scheduled wall-clock time, even when
/// it falls in a DST gap; `start_utc` carries the resolved instant.
#[derive(Debug, Clone)]
pub struct Occurrences {
    dates: OccurrenceDates,
    termination: Termination,
    emitted: u64,
    shape: SlotShape,
    done: bool,
}

impl Occurrences {
    /// Stop after the last occurrence whose local start date is on or before `last`
    pub fn through(self, last: NaiveDate) -> impl Iterator<Item = Occurrence> {
        self.take_while(move |slot| slot.start_date() <= last)
    }

    /// Occurrences whose local start date lies in `first..=last`
    pub fn between(self, first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = Occurrence> {
        self.skip_while(move |slot| slot.start_date() < first)
            .take_while(move |slot| slot.start_date() <= last)
    }

    fn advance(&mut self) -> Option<Occurrence> {
        if let Termination::Count(count) = self.termination {
            if self.emitted > u64::from(count) {
                return None;
            }
        }

        let date = self.dates.next()?;
        if let Termination::Until(until) = self.termination {
            if date > until {
                return None;
            }
        }

        self.emitted += 1;
        // A slot that leaves the calendar range ends the sequence
        self.shape.build(date)
    }
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let slot = self.advance();
        if slot.is_none() {
            self.done = true;
        }
        slot
    }
}

impl FusedIterator for Occurrences {}
