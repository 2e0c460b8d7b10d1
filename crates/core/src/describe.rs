//! Human-readable rule descriptions
//!
//! Renders a validated rule as a short English phrase for notification
//! templates, e.g. "Every 3 months on the second Tuesday, from January 9,
//! 2024 to December 31, 2024" or "Daily, 10 times".

use chrono::{Datelike, NaiveDate};

use crate::calendar::weekday_ordinal;
use crate::models::TimeAnchor;
use crate::rule::{DayOfWeek, MonthlyType, Pattern, Termination, ValidatedRule};

const DATE_FORMAT: &str = "%B %-d, %Y";

/// Describe `rule` as repeated from `anchor`
pub fn describe_rule(rule: &ValidatedRule, anchor: &TimeAnchor) -> String {
    let start = anchor.start_date();

    let ValidatedRule::Repeating {
        pattern,
        step,
        termination,
    } = rule
    else {
        return format!("Once on {}", format_date(start));
    };

    let mut phrase = cadence(pattern, step.get());
    match pattern {
        Pattern::Daily => {}
        Pattern::Weekly(days) => {
            let names: Vec<&str> = days.iter().map(|day| day.name()).collect();
            phrase.push_str(&format!(" on {}", join_names(&names)));
        }
        Pattern::Monthly(MonthlyType::SameDay) => {
            phrase.push_str(&format!(" on day {}", start.day()));
        }
        Pattern::Monthly(MonthlyType::SameWeekday) => {
            phrase.push_str(&format!(
                " on the {} {}",
                weekday_ordinal(start),
                DayOfWeek::from(start.weekday())
            ));
        }
        Pattern::Annually => {
            phrase.push_str(&format!(" on {}", start.format("%B %-d")));
        }
    }

    match termination {
        Termination::Forever => {
            phrase.push_str(&format!(", from {}", format_date(start)));
        }
        Termination::Until(until) => {
            phrase.push_str(&format!(
                ", from {} to {}",
                format_date(start),
                format_date(*until)
            ));
        }
        Termination::Count(count) => {
            phrase.push_str(&format!(", {} times", u64::from(*count) + 1));
        }
    }

    phrase
}

/// "Daily" / "Every 3 days" and friends
fn cadence(pattern: &Pattern, step: u32) -> String {
    let (single, unit) = match pattern {
        Pattern::Daily => ("Daily", "days"),
        Pattern::Weekly(_) => ("Weekly", "weeks"),
        Pattern::Monthly(_) => ("Monthly", "months"),
        Pattern::Annually => ("Annually", "years"),
    };
    if step == 1 {
        single.to_string()
    } else {
        format!("Every {step} {unit}")
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// "A", "A and B", "A, B and C"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
