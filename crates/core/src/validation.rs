//! Rule and anchor validation
//!
//! Stateless checks run before any expansion work. Each rejection carries a
//! specific [`ValidationError`] reason.

use std::num::NonZeroU32;

use chrono::{Datelike, Duration};

use crate::error::ValidationError;
use crate::models::TimeAnchor;
use crate::rule::{
    DayOfWeek, DurationKind, Frequency, Pattern, RecurrenceRule, Termination, ValidatedRule,
};
use crate::timezone::to_utc;

/// Maximum span of a timed event, start to end
pub const MAX_EVENT_SPAN_HOURS: i64 = 24;

/// Check `rule` against `anchor` and build its fully-determined form
///
/// A missing step on a repeating rule defaults to 1; an explicit 0 is an
/// error. Fields irrelevant to the frequency must be absent, not just
/// ignored; use [`RecurrenceRule::normalized`] first to clear them.
pub fn validate_rule(
    rule: &RecurrenceRule,
    anchor: &TimeAnchor,
) -> Result<ValidatedRule, ValidationError> {
    let frequency = rule.frequency.ok_or(ValidationError::MissingFrequency)?;

    if frequency == Frequency::Never {
        check_never_is_bare(rule)?;
        return Ok(ValidatedRule::Never);
    }

    let step = match rule.step {
        None => NonZeroU32::MIN,
        Some(step) => NonZeroU32::new(step).ok_or(ValidationError::ZeroStep)?,
    };

    if frequency != Frequency::Weekly && rule.weekly_days.is_some() {
        return Err(ValidationError::WeeklyDaysNotAllowed(frequency));
    }
    if frequency != Frequency::Monthly && rule.monthly_type.is_some() {
        return Err(ValidationError::MonthlyTypeNotAllowed(frequency));
    }

    let pattern = match frequency {
        Frequency::Weekly => {
            let days = rule
                .weekly_days
                .as_ref()
                .filter(|days| !days.is_empty())
                .ok_or(ValidationError::MissingWeeklyDays)?;
            let anchor_day = DayOfWeek::from(anchor.start_date().weekday());
            if !days.contains(&anchor_day) {
                return Err(ValidationError::AnchorWeekdayNotIncluded(anchor_day));
            }
            Pattern::Weekly(days.clone())
        }
        Frequency::Monthly => {
            Pattern::Monthly(rule.monthly_type.ok_or(ValidationError::MissingMonthlyType)?)
        }
        Frequency::Daily => Pattern::Daily,
        Frequency::Annually => Pattern::Annually,
        Frequency::Never => return Ok(ValidatedRule::Never),
    };

    let termination = validate_termination(rule, anchor)?;

    Ok(ValidatedRule::Repeating {
        pattern,
        step,
        termination,
    })
}

fn check_never_is_bare(rule: &RecurrenceRule) -> Result<(), ValidationError> {
    let present = [
        ("step", rule.step.is_some()),
        ("weeklyDays", rule.weekly_days.is_some()),
        ("monthlyType", rule.monthly_type.is_some()),
        ("duration", rule.duration.is_some()),
        ("untilDate", rule.until_date.is_some()),
        ("occurrenceCount", rule.occurrence_count.is_some()),
    ];
    match present.into_iter().find(|(_, set)| *set) {
        Some((field, _)) => Err(ValidationError::FieldNotAllowedForNever(field)),
        None => Ok(()),
    }
}

fn validate_termination(
    rule: &RecurrenceRule,
    anchor: &TimeAnchor,
) -> Result<Termination, ValidationError> {
    let duration = rule.duration.ok_or(ValidationError::MissingDuration)?;

    match duration {
        DurationKind::Forever => {
            if rule.until_date.is_some() {
                return Err(ValidationError::UntilDateNotAllowed);
            }
            if rule.occurrence_count.is_some() {
                return Err(ValidationError::OccurrenceCountNotAllowed);
            }
            Ok(Termination::Forever)
        }
        DurationKind::UntilDate => {
            if rule.occurrence_count.is_some() {
                return Err(ValidationError::OccurrenceCountNotAllowed);
            }
            let until = rule.until_date.ok_or(ValidationError::MissingUntilDate)?;
            let anchor_end = anchor.end_date();
            if until < anchor_end {
                return Err(ValidationError::UntilBeforeAnchorEnd { until, anchor_end });
            }
            Ok(Termination::Until(until))
        }
        DurationKind::NOccurrences => {
            if rule.until_date.is_some() {
                return Err(ValidationError::UntilDateNotAllowed);
            }
            match rule.occurrence_count {
                None => Err(ValidationError::MissingOccurrenceCount),
                Some(0) => Err(ValidationError::ZeroOccurrenceCount),
                Some(count) => Ok(Termination::Count(count)),
            }
        }
    }
}

/// Check that an anchor describes a well-formed first occurrence
///
/// Day events may not end before they start. Timed events must end strictly
/// after they start, once both ends are normalized in their own zones, and
/// may span at most [`MAX_EVENT_SPAN_HOURS`] exactly.
pub fn validate_anchor(anchor: &TimeAnchor) -> Result<(), ValidationError> {
    match anchor {
        TimeAnchor::AllDay { start, end } => {
            if end < start {
                return Err(ValidationError::EndNotAfterStart);
            }
            Ok(())
        }
        TimeAnchor::Timed {
            start,
            start_zone,
            end,
            end_zone,
        } => {
            let start_tz = start_zone
                .resolve()
                .map_err(|_| ValidationError::InvalidTimezone(start_zone.to_string()))?;
            let end_tz = end_zone
                .resolve()
                .map_err(|_| ValidationError::InvalidTimezone(end_zone.to_string()))?;

            let start_utc = to_utc(*start, &start_tz).ok_or(ValidationError::OutOfRange(*start))?;
            let end_utc = to_utc(*end, &end_tz).ok_or(ValidationError::OutOfRange(*end))?;
            let span = end_utc - start_utc;
            if span <= Duration::zero() {
                return Err(ValidationError::EndNotAfterStart);
            }
            if span > Duration::hours(MAX_EVENT_SPAN_HOURS) {
                return Err(ValidationError::SpanTooLong {
                    minutes: span.num_minutes(),
                });
            }
            Ok(())
        }
    }
}
