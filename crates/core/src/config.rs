//! Engine configuration
//!
//! The engine itself never reads configuration. Callers load an
//! [`EngineConfig`] and use it to bound otherwise unbounded expansions.

use std::env;

use crate::error::{ConfigError, RecurrenceError, RecurrenceResult};

/// Default number of occurrences materialized when the caller gives no limit
pub const DEFAULT_LIMIT: usize = 100;

/// Default ceiling on caller-supplied limits
pub const DEFAULT_MAX_LIMIT: usize = 10_000;

/// Expansion bounds used by callers of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Prefix length materialized when no limit is requested (default: 100)
    pub default_limit: usize,

    /// Largest limit a caller may request (default: 10000)
    pub max_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// This will also initialize dotenv if it hasn't been done yet.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self {
            default_limit: parse_var("CADENCE_DEFAULT_LIMIT", DEFAULT_LIMIT)?,
            max_limit: parse_var("CADENCE_MAX_LIMIT", DEFAULT_MAX_LIMIT)?,
        })
    }

    /// Resolve the number of occurrences to materialize
    ///
    /// Falls back to the default when `requested` is `None` and rejects
    /// anything above the maximum.
    pub fn resolve_limit(&self, requested: Option<usize>) -> RecurrenceResult<usize> {
        let limit = requested.unwrap_or(self.default_limit);
        if limit > self.max_limit {
            return Err(RecurrenceError::LimitExceeded {
                requested: limit,
                max: self.max_limit,
            });
        }
        Ok(limit)
    }
}

fn parse_var(name: &str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
