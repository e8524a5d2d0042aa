//! Calibration settings.

use homscore_core::{HomscoreError, Result};

/// Settings for calibrating filter thresholds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationConfig {
    /// Fraction of wanted instances the filter must keep, in `[0, 1]`.
    pub sensitivity_fraction: f64,
    /// Fail instead of warning when a threshold falls short of
    /// `sensitivity_fraction` over the whole population.
    pub strict: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            sensitivity_fraction: 0.9,
            strict: false,
        }
    }
}

impl CalibrationConfig {
    /// Check that `sensitivity_fraction` is within `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        validate_sensitivity(self.sensitivity_fraction)
    }
}

pub(crate) fn validate_sensitivity(sensitivity_fraction: f64) -> Result<()> {
    if (0.0..=1.0).contains(&sensitivity_fraction) {
        Ok(())
    } else {
        Err(HomscoreError::InvalidInput(format!(
            "sensitivity fraction {} is not in [0, 1]",
            sensitivity_fraction
        )))
    }
}
