//! Integration tests for the public expansion API
//!
//! Each test pins one observable property of `expand` against a spread of
//! rules and anchors.

use cadence_core::{
    DayOfWeek, MonthlyType, Occurrence, RecurrenceError, RecurrenceRule, TimeAnchor, Timezone,
    ValidationError, expand, validate_anchor, validate_rule,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn new_york(start: NaiveDateTime, minutes: i64) -> TimeAnchor {
    TimeAnchor::timed(
        start,
        Timezone::new("America/New_York").unwrap(),
        start + Duration::minutes(minutes),
        Timezone::new("America/New_York").unwrap(),
    )
}

fn all_day(d: NaiveDate) -> TimeAnchor {
    TimeAnchor::all_day(d, d)
}

fn start_dates(anchor: &TimeAnchor, rule: &RecurrenceRule) -> Vec<NaiveDate> {
    expand(anchor, rule)
        .unwrap()
        .map(|slot| slot.start_date())
        .collect()
}

/// Repeating patterns valid for an anchor on Tuesday 2024-01-30
fn patterns() -> Vec<RecurrenceRule> {
    vec![
        RecurrenceRule::daily(1),
        RecurrenceRule::daily(5),
        RecurrenceRule::weekly(1, [DayOfWeek::Tuesday, DayOfWeek::Thursday]),
        RecurrenceRule::weekly(3, [DayOfWeek::Monday, DayOfWeek::Tuesday, DayOfWeek::Sunday]),
        RecurrenceRule::monthly(1, MonthlyType::SameDay),
        RecurrenceRule::monthly(2, MonthlyType::SameWeekday),
        RecurrenceRule::annually(1),
    ]
}

#[test]
fn test_count_rules_yield_count_plus_one() {
    let anchor = all_day(date(2024, 1, 30));
    for pattern in patterns() {
        for count in [1, 2, 7, 30] {
            let rule = pattern.clone().times(count);
            let slots: Vec<_> = expand(&anchor, &rule).unwrap().collect();
            assert_eq!(slots.len(), count as usize + 1, "{rule:?}");
        }
    }
}

#[test]
fn test_until_rules_stop_at_bound() {
    let anchor = all_day(date(2024, 1, 30));
    let until = date(2025, 6, 15);
    for pattern in patterns() {
        let rule = pattern.clone().until(until);
        let dates = start_dates(&anchor, &rule);
        assert!(dates.iter().all(|d| *d <= until), "{rule:?}");

        // The first candidate the bounded run dropped lies past the bound
        let next = expand(&anchor, &pattern)
            .unwrap()
            .nth(dates.len())
            .map(|slot| slot.start_date());
        assert!(next.is_some_and(|d| d > until), "{rule:?}");
    }
}

#[test]
fn test_occurrences_strictly_ascending_by_utc() {
    let anchor = new_york(at(2024, 1, 30, 1, 30), 90);
    for pattern in patterns() {
        let starts: Vec<_> = expand(&anchor, &pattern)
            .unwrap()
            .take(400)
            .filter_map(|slot| slot.start_utc())
            .collect();
        assert_eq!(starts.len(), 400);
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "{pattern:?}");
    }
}

#[test]
fn test_never_yields_the_anchor() {
    let anchor = new_york(at(2024, 7, 4, 18, 0), 120);
    let slots: Vec<_> = expand(&anchor, &RecurrenceRule::never()).unwrap().collect();
    assert_eq!(slots.len(), 1);

    let slot = slots[0].as_timed().unwrap();
    assert_eq!(slot.start_local, at(2024, 7, 4, 18, 0));
    assert_eq!(slot.end_local, at(2024, 7, 4, 20, 0));
    assert_eq!(slot.start_utc, utc(2024, 7, 4, 22, 0));
    assert_eq!(slot.end_utc, utc(2024, 7, 5, 0, 0));

    let day = all_day(date(2024, 7, 4));
    let slots: Vec<_> = expand(&day, &RecurrenceRule::never()).unwrap().collect();
    assert_eq!(
        slots,
        vec![Occurrence::AllDay {
            start: date(2024, 7, 4),
            end: date(2024, 7, 4)
        }]
    );
}

#[test]
fn test_expansion_is_idempotent() {
    let anchor = new_york(at(2024, 3, 1, 2, 30), 45);
    let rule = RecurrenceRule::monthly(1, MonthlyType::SameWeekday).times(24);
    let first: Vec<_> = expand(&anchor, &rule).unwrap().collect();
    let second: Vec<_> = expand(&anchor, &rule).unwrap().collect();
    assert_eq!(first, second);
}

#[test]
fn test_dst_gap_start() {
    let anchor = new_york(at(2024, 3, 10, 2, 30), 60);
    let slots: Vec<_> = expand(&anchor, &RecurrenceRule::never()).unwrap().collect();
    assert_eq!(slots[0].start_utc(), Some(utc(2024, 3, 10, 7, 30)));
}

#[test]
fn test_dst_overlap_start() {
    let anchor = new_york(at(2024, 11, 3, 1, 30), 60);
    let slots: Vec<_> = expand(&anchor, &RecurrenceRule::never()).unwrap().collect();
    assert_eq!(slots[0].start_utc(), Some(utc(2024, 11, 3, 5, 30)));
}

#[test]
fn test_monthly_same_day_clamps_day_31() {
    let anchor = all_day(date(2024, 8, 31));
    let rule = RecurrenceRule::monthly(1, MonthlyType::SameDay).times(1);
    assert_eq!(
        start_dates(&anchor, &rule),
        vec![date(2024, 8, 31), date(2024, 9, 30)]
    );
}

#[test]
fn test_monthly_same_weekday_last_monday() {
    let anchor = all_day(date(2024, 9, 30));
    let rule = RecurrenceRule::monthly(6, MonthlyType::SameWeekday).times(1);
    assert_eq!(
        start_dates(&anchor, &rule),
        vec![date(2024, 9, 30), date(2025, 3, 31)]
    );
}

#[test]
fn test_weekly_every_other_week_until() {
    let anchor = all_day(date(2024, 8, 20));
    let rule =
        RecurrenceRule::weekly(2, [DayOfWeek::Monday, DayOfWeek::Tuesday]).until(date(2024, 9, 5));
    assert_eq!(
        start_dates(&anchor, &rule),
        vec![date(2024, 8, 20), date(2024, 9, 2), date(2024, 9, 3)]
    );
}

#[test]
fn test_annual_leap_day_clamps() {
    let anchor = all_day(date(2024, 2, 29));
    let rule = RecurrenceRule::annually(1).times(4);
    assert_eq!(
        start_dates(&anchor, &rule),
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
fn test_nominal_duration_is_reapplied_across_dst() {
    let anchor = new_york(at(2024, 11, 2, 0, 30), 120);
    let slots: Vec<_> = expand(&anchor, &RecurrenceRule::daily(1).times(1))
        .unwrap()
        .collect();
    for slot in &slots {
        let slot = slot.as_timed().unwrap();
        assert_eq!(slot.end_utc - slot.start_utc, Duration::hours(2));
    }
    // 00:30 EDT plus two elapsed hours crosses the fall-back and ends at 01:30 EST
    let second = slots[1].as_timed().unwrap();
    assert_eq!(second.start_utc, utc(2024, 11, 3, 4, 30));
    assert_eq!(second.end_utc, utc(2024, 11, 3, 6, 30));
    assert_eq!(second.end_local, at(2024, 11, 3, 1, 30));
}

#[test]
fn test_forever_is_lazy() {
    let anchor = all_day(date(2024, 1, 1));
    let mut slots = expand(&anchor, &RecurrenceRule::daily(1)).unwrap();
    assert_eq!(slots.nth(9_999).map(|s| s.start_date()), Some(date(2051, 5, 18)));
    assert!(slots.next().is_some());
}

#[test]
fn test_rejection_happens_before_expansion() {
    let anchor = all_day(date(2024, 8, 20));
    let rule = RecurrenceRule::weekly(1, [DayOfWeek::Wednesday]).times(3);
    match expand(&anchor, &rule) {
        Err(RecurrenceError::InvalidRule(ValidationError::AnchorWeekdayNotIncluded(day))) => {
            assert_eq!(day, DayOfWeek::Tuesday);
        }
        other => panic!("Expected rejection, got {other:?}"),
    }
}

#[test]
fn test_validation_entry_points_agree_with_expand() {
    let anchor = new_york(at(2024, 8, 20, 9, 0), 60);
    let rule = RecurrenceRule::daily(1).until(date(2024, 8, 19));
    assert!(validate_anchor(&anchor).is_ok());
    assert!(validate_rule(&rule, &anchor).is_err());
    assert!(expand(&anchor, &rule).is_err());
}
