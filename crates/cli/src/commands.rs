//! Subcommand implementations
//!
//! Each command takes an already-loaded [`Request`] and writes its output to
//! the given writer, so they can be exercised without a process.

use std::io::Write;

use anyhow::{Context, Result};
use cadence_core::{
    EngineConfig, Occurrence, ValidatedRule, ValidationError, describe_rule, expand_validated,
    validate_anchor, validate_rule,
};
use chrono::NaiveDate;

use crate::request::Request;

/// Anchor and rule checks shared by every command
fn check(request: &Request) -> Result<ValidatedRule, ValidationError> {
    validate_anchor(&request.anchor)?;
    validate_rule(&request.rule, &request.anchor)
}

/// Print occurrences as JSON lines, returning how many were written
pub fn expand(
    request: &Request,
    config: &EngineConfig,
    limit: Option<usize>,
    through: Option<NaiveDate>,
    out: &mut impl Write,
) -> Result<usize> {
    let limit = config.resolve_limit(limit)?;
    let rule = check(request).context("Rejected request")?;
    let occurrences = expand_validated(&request.anchor, &rule)?;

    let slots: Box<dyn Iterator<Item = Occurrence>> = match through {
        Some(last) => Box::new(occurrences.through(last)),
        None => Box::new(occurrences),
    };

    let mut written = 0;
    for slot in slots.take(limit) {
        let line = serde_json::to_string(&slot).context("Failed to serialize occurrence")?;
        writeln!(out, "{line}")?;
        written += 1;
    }

    tracing::info!(written, limit, "Expanded occurrences");
    Ok(written)
}

/// Print `ok` or the rejection reason; returns whether the request is valid
pub fn validate(request: &Request, out: &mut impl Write) -> Result<bool> {
    match check(request) {
        Ok(_) => {
            writeln!(out, "ok")?;
            Ok(true)
        }
        Err(e) => {
            tracing::warn!(reason = %e, "Request rejected");
            writeln!(out, "{e}")?;
            Ok(false)
        }
    }
}

/// Print the rule's prose description
pub fn describe(request: &Request, out: &mut impl Write) -> Result<()> {
    let rule = check(request).context("Rejected request")?;
    writeln!(out, "{}", describe_rule(&rule, &request.anchor))?;
    Ok(())
}
