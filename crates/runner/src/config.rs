//! Configuration loading for the paper session runner
//!
//! Every section is optional in the JSON file; missing values take the
//! defaults below.

use meridian_reconciliation::DEFAULT_TOLERANCE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::guardrails::LiveTradingConfig;

/// Root configuration for a paper session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Sizing and turnover guardrails
    #[serde(default)]
    pub live: LiveTradingConfig,

    /// Break thresholds
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

impl RunnerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.live.validate()?;
        self.reconciliation.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    #[serde(default = "default_tolerance")]
    pub position_tolerance: Decimal,
    #[serde(default = "default_tolerance")]
    pub fill_tolerance: Decimal,
}

impl ReconciliationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("reconciliation.position_tolerance", self.position_tolerance),
            ("reconciliation.fill_tolerance", self.fill_tolerance),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("must not be negative, got {}", value),
                });
            }
        }
        Ok(())
    }
}

fn default_tolerance() -> Decimal {
    DEFAULT_TOLERANCE
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            position_tolerance: DEFAULT_TOLERANCE,
            fill_tolerance: DEFAULT_TOLERANCE,
        }
    }
}
