// ⚙️ Engine Configuration
// Everything a run needs is passed in explicitly - no process-wide state.

use crate::error::ConfigError;
use crate::schema::AliasTable;
use std::fmt;

/// Six-digit return period, e.g. "072024".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReturnPeriod(String);

impl ReturnPeriod {
    /// Validate a raw period string. Surrounding whitespace is not accepted.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(ReturnPeriod(raw.to_string()))
        } else {
            Err(ConfigError::InvalidReturnPeriod(raw.to_string()))
        }
    }

    /// Same as `parse`, but treats an absent value as `MissingReturnPeriod`.
    pub fn from_optional(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw {
            None => Err(ConfigError::MissingReturnPeriod),
            Some(s) if s.is_empty() => Err(ConfigError::MissingReturnPeriod),
            Some(s) => Self::parse(s),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReturnPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-run configuration for the normalization pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub return_period: ReturnPeriod,
    pub aliases: AliasTable,
}

impl EngineConfig {
    /// Config with the standard alias table.
    pub fn new(return_period: ReturnPeriod) -> Self {
        EngineConfig {
            return_period,
            aliases: AliasTable::standard(),
        }
    }

    /// Builder: replace the alias table
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
