//! Input document read by every subcommand

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use cadence_core::{RecurrenceRule, TimeAnchor};
use serde::Deserialize;

/// `{ "anchor": ..., "rule": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    pub anchor: TimeAnchor,
    pub rule: RecurrenceRule,
}

impl Request {
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Failed to parse request JSON")
    }

    /// Read from `path`, or stdin when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let raw = match path {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read request from stdin")?;
                buf
            }
        };
        Self::parse(&raw)
    }

    /// Clear the extra fields of a NEVER rule and default a missing step
    pub fn normalized(self) -> Self {
        Self {
            rule: self.rule.normalized(),
            ..self
        }
    }
}
