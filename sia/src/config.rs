//! Calculator configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scan::{DEFAULT_CANDIDATES, ERROR_DECIMALS};
use crate::validate;

/// Largest supported rounding precision for stored errors.
pub const MAX_DECIMALS: u32 = 12;

/// Assumed SIA for batch rows that leave the column empty.
pub const DEFAULT_ASSUMED_MAGNITUDE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Assumed-SIA magnitudes to scan, in diopters.
    pub candidates: Vec<f64>,
    /// Decimal places kept for stored error magnitudes.
    pub precision: u32,
    /// Used for batch rows without an assumed magnitude.
    pub default_assumed_magnitude: f64,
    /// Maximum number of batch rows evaluated in parallel at once.
    pub max_concurrent_rows: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
            precision: ERROR_DECIMALS,
            default_assumed_magnitude: DEFAULT_ASSUMED_MAGNITUDE,
            max_concurrent_rows: 64,
        }
    }
}

impl CalculatorConfig {
    pub fn validate(&self) -> Result<()> {
        validate::validate_candidates(&self.candidates)?;
        if self.precision > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "precision must be at most {MAX_DECIMALS}, got {}",
                self.precision
            )));
        }
        validate::validate_magnitude("default_assumed_magnitude", self.default_assumed_magnitude)?;
        if self.max_concurrent_rows == 0 {
            return Err(Error::Config("max_concurrent_rows must be > 0".to_string()));
        }
        Ok(())
    }

    /// Reads and validates a YAML, JSON or TOML configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Self = common::serde_format::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`CalculatorConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
