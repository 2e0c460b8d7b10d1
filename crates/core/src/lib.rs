//! Cadence Core - Recurring event occurrence engine
//!
//! This crate contains pure domain logic with no I/O operations.
//! Given an anchor occurrence and a recurrence rule it produces the ordered,
//! timezone-normalized sequence of concrete occurrences the event represents.
//!
//! ```
//! use chrono::NaiveDate;
//! use cadence_core::{RecurrenceRule, TimeAnchor, expand};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
//! let anchor = TimeAnchor::all_day(day, day);
//! let dates: Vec<_> = expand(&anchor, &RecurrenceRule::annually(1).times(1))
//!     .unwrap()
//!     .map(|slot| slot.start_date())
//!     .collect();
//! assert_eq!(dates, vec![day, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()]);
//! ```

pub mod calendar;
pub mod config;
pub mod describe;
pub mod error;
pub mod expand;
pub mod models;
pub mod rule;
pub mod sequence;
pub mod timezone;
pub mod validation;

pub use config::EngineConfig;
pub use describe::describe_rule;
pub use error::{ConfigError, RecurrenceError, RecurrenceResult, ValidationError};
pub use expand::{Occurrences, expand, expand_limited, expand_validated};
pub use models::{Occurrence, TimeAnchor, TimedOccurrence};
pub use rule::{DayOfWeek, DurationKind, Frequency, MonthlyType, RecurrenceRule, ValidatedRule};
pub use timezone::{Timezone, parse_timezone, to_utc, validate_timezone};
pub use validation::{validate_anchor, validate_rule};
