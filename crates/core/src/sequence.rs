//! Occurrence date sequencer
//!
//! Produces the ascending local start dates a validated rule describes,
//! beginning with the anchor itself. The sequence is lazy and unbounded for
//! repeating rules; termination policies are applied by the expander.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::{
    WeekdayOrdinal, add_days, add_months, add_years, first_of_month, nth_weekday_of_month,
    start_of_week, weekday_ordinal,
};
use crate::rule::{MonthlyType, Pattern, ValidatedRule};

/// Build the local date sequence for `rule` starting at `anchor`
///
/// Nothing is computed until the iterator is polled, and every call starts
/// over from the anchor.
pub fn sequence(anchor: NaiveDate, rule: &ValidatedRule) -> OccurrenceDates {
    let kind = match rule {
        ValidatedRule::Never => Kind::Once,
        ValidatedRule::Repeating { pattern, step, .. } => {
            let step = step.get();
            match pattern {
                Pattern::Daily => Kind::Daily { step },
                Pattern::Weekly(days) => Kind::Weekly {
                    step,
                    offsets: days
                        .iter()
                        .map(|day| Weekday::from(*day).num_days_from_monday())
                        .collect(),
                    week_start: start_of_week(anchor),
                    window: 0,
                    slot: 0,
                },
                Pattern::Monthly(MonthlyType::SameDay) => Kind::MonthlySameDay { step },
                Pattern::Monthly(MonthlyType::SameWeekday) => Kind::MonthlySameWeekday {
                    step,
                    month_start: first_of_month(anchor),
                    weekday: anchor.weekday(),
                    ordinal: weekday_ordinal(anchor),
                },
                Pattern::Annually => Kind::Annually { step },
            }
        }
    };

    OccurrenceDates {
        anchor,
        kind,
        index: 0,
        done: false,
    }
}

/// Iterator over local occurrence dates, see [`sequence`]
#[derive(Debug, Clone)]
pub struct OccurrenceDates {
    anchor: NaiveDate,
    kind: Kind,
    index: u32,
    done: bool,
}

#[derive(Debug, Clone)]
enum Kind {
    Once,
    Daily {
        step: u32,
    },
    Weekly {
        step: u32,
        /// Days from Monday, ascending
        offsets: Vec<u32>,
        week_start: NaiveDate,
        window: u32,
        slot: usize,
    },
    MonthlySameDay {
        step: u32,
    },
    MonthlySameWeekday {
        step: u32,
        month_start: NaiveDate,
        weekday: Weekday,
        ordinal: WeekdayOrdinal,
    },
    Annually {
        step: u32,
    },
}

impl OccurrenceDates {
    /// Compute the next date, or `None` once chrono's calendar range is exhausted
    fn advance(&mut self) -> Option<NaiveDate> {
        let anchor = self.anchor;
        let k = self.index;
        self.index = self.index.checked_add(1)?;

        match &mut self.kind {
            Kind::Once => (k == 0).then_some(anchor),
            Kind::Daily { step } => add_days(anchor, u64::from(k) * u64::from(*step)),
            Kind::MonthlySameDay { step } => add_months(anchor, k.checked_mul(*step)?),
            Kind::MonthlySameWeekday {
                step,
                month_start,
                weekday,
                ordinal,
            } => {
                let month = add_months(*month_start, k.checked_mul(*step)?)?;
                nth_weekday_of_month(month.year(), month.month(), *weekday, *ordinal)
            }
            Kind::Annually { step } => add_years(anchor, k.checked_mul(*step)?),
            Kind::Weekly {
                step,
                offsets,
                week_start,
                window,
                slot,
            } if !offsets.is_empty() => loop {
                if *slot >= offsets.len() {
                    *slot = 0;
                    *window = window.checked_add(1)?;
                }
                let weeks = u64::from(*window) * u64::from(*step);
                let window_start = add_days(*week_start, weeks * 7)?;
                let candidate = add_days(window_start, u64::from(offsets[*slot]))?;
                *slot += 1;
                // Days of the anchor's own week that come before it are skipped
                if candidate >= anchor {
                    break Some(candidate);
                }
            },
            Kind::Weekly { .. } => None,
        }
    }
}

impl Iterator for OccurrenceDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.advance();
        if next.is_none() {
            self.done = true;
        }
        next
    }
}

impl FusedIterator for OccurrenceDates {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{DayOfWeek, Termination};
    use std::num::NonZeroU32;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repeating(pattern: Pattern, step: u32) -> ValidatedRule {
        ValidatedRule::Repeating {
            pattern,
            step: NonZeroU32::new(step).unwrap(),
            termination: Termination::Forever,
        }
    }

    fn first(anchor: NaiveDate, rule: &ValidatedRule, n: usize) -> Vec<NaiveDate> {
        sequence(anchor, rule).take(n).collect()
    }

    #[test]
    fn test_never_yields_only_anchor() {
        let dates: Vec<_> = sequence(date(2024, 5, 1), &ValidatedRule::Never).collect();
        assert_eq!(dates, vec![date(2024, 5, 1)]);
    }

    #[test]
    fn test_daily_step() {
        let rule = repeating(Pattern::Daily, 3);
        assert_eq!(
            first(date(2024, 2, 26), &rule, 4),
            vec![
                date(2024, 2, 26),
                date(2024, 2, 29),
                date(2024, 3, 3),
                date(2024, 3, 6)
            ]
        );
    }

    #[test]
    fn test_weekly_skips_days_before_anchor_in_first_window() {
        let rule = repeating(
            Pattern::Weekly([DayOfWeek::Monday, DayOfWeek::Tuesday].into()),
            2,
        );
        assert_eq!(
            first(date(2024, 8, 20), &rule, 5),
            vec![
                date(2024, 8, 20),
                date(2024, 9, 2),
                date(2024, 9, 3),
                date(2024, 9, 16),
                date(2024, 9, 17)
            ]
        );
    }

    #[test]
    fn test_weekly_days_emitted_in_weekday_order() {
        let rule = repeating(
            Pattern::Weekly([DayOfWeek::Sunday, DayOfWeek::Wednesday, DayOfWeek::Monday].into()),
            1,
        );
        // Anchor on a Monday
        assert_eq!(
            first(date(2024, 8, 19), &rule, 6),
            vec![
                date(2024, 8, 19),
                date(2024, 8, 21),
                date(2024, 8, 25),
                date(2024, 8, 26),
                date(2024, 8, 28),
                date(2024, 9, 1)
            ]
        );
    }

    #[test]
    fn test_weekly_anchor_on_sunday() {
        let rule = repeating(
            Pattern::Weekly([DayOfWeek::Monday, DayOfWeek::Sunday].into()),
            3,
        );
        // Sunday is the last day of its Monday-based window
        assert_eq!(
            first(date(2024, 8, 25), &rule, 3),
            vec![date(2024, 8, 25), date(2024, 9, 9), date(2024, 9, 15)]
        );
    }

    #[test]
    fn test_monthly_same_day_clamps_without_drift() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameDay), 1);
        assert_eq!(
            first(date(2024, 8, 31), &rule, 5),
            vec![
                date(2024, 8, 31),
                date(2024, 9, 30),
                date(2024, 10, 31),
                date(2024, 11, 30),
                date(2024, 12, 31)
            ]
        );
    }

    #[test]
    fn test_monthly_same_day_february() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameDay), 12);
        assert_eq!(
            first(date(2023, 1, 30), &rule, 2),
            vec![date(2023, 1, 30), date(2024, 1, 30)]
        );
        let rule = repeating(Pattern::Monthly(MonthlyType::SameDay), 1);
        assert_eq!(
            first(date(2024, 1, 30), &rule, 3),
            vec![date(2024, 1, 30), date(2024, 2, 29), date(2024, 3, 30)]
        );
    }

    #[test]
    fn test_monthly_same_weekday_last() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameWeekday), 6);
        // Last Monday of September 2024
        assert_eq!(
            first(date(2024, 9, 30), &rule, 3),
            vec![date(2024, 9, 30), date(2025, 3, 31), date(2025, 9, 29)]
        );
    }

    #[test]
    fn test_monthly_same_weekday_fourth_is_not_last() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameWeekday), 1);
        // 2024-09-23 is the 4th Monday, September also has a 5th
        assert_eq!(
            first(date(2024, 9, 23), &rule, 3),
            vec![date(2024, 9, 23), date(2024, 10, 28), date(2024, 11, 25)]
        );
    }

    #[test]
    fn test_monthly_same_weekday_second_tuesday() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameWeekday), 3);
        assert_eq!(
            first(date(2024, 1, 9), &rule, 4),
            vec![
                date(2024, 1, 9),
                date(2024, 4, 9),
                date(2024, 7, 9),
                date(2024, 10, 8)
            ]
        );
    }

    #[test]
    fn test_annually_leap_day() {
        let rule = repeating(Pattern::Annually, 1);
        assert_eq!(
            first(date(2024, 2, 29), &rule, 5),
            vec![
                date(2024, 2, 29),
                date(2025, 2, 28),
                date(2026, 2, 28),
                date(2027, 2, 28),
                date(2028, 2, 29)
            ]
        );
    }

    #[test]
    fn test_sequence_is_restartable() {
        let rule = repeating(Pattern::Monthly(MonthlyType::SameWeekday), 1);
        let a = first(date(2024, 1, 31), &rule, 10);
        let b = first(date(2024, 1, 31), &rule, 10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sequence_ends_at_calendar_limit() {
        let rule = repeating(Pattern::Annually, 100_000);
        let dates: Vec<_> = sequence(date(2024, 1, 1), &rule).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(102_024, 1, 1), date(202_024, 1, 1)]);
    }

    #[test]
    fn test_sequence_strictly_ascending() {
        let rules = [
            repeating(Pattern::Daily, 2),
            repeating(Pattern::Weekly([DayOfWeek::Friday, DayOfWeek::Tuesday].into()), 1),
            repeating(Pattern::Monthly(MonthlyType::SameDay), 1),
            repeating(Pattern::Monthly(MonthlyType::SameWeekday), 1),
            repeating(Pattern::Annually, 1),
        ];
        for rule in &rules {
            let dates = first(date(2024, 1, 30), rule, 60);
            assert!(dates.windows(2).all(|w| w[0] < w[1]), "{rule:?}");
        }
    }
}
