//! Quality gate thresholds.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QaError, Result};

/// Fixed pass/fail thresholds for one validation run.
///
/// Injected into the engine once; each analyzer receives only the value
/// it gates on and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Maximum tolerated source similarity (0..1, exclusive gate)
    pub regurgitation_max: f64,

    /// Minimum SMART compliance (0..1)
    pub smart_criteria_min: f64,

    /// Minimum professional term occurrences
    pub professional_terms_min: usize,

    /// Minimum specificity (0..1)
    pub specificity_min: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            regurgitation_max: 0.10,
            smart_criteria_min: 0.90,
            professional_terms_min: 15,
            specificity_min: 0.70,
        }
    }
}

impl QualityThresholds {
    /// Check that every ratio is usable by the score mappings.
    pub fn validate(&self) -> Result<()> {
        if !(self.regurgitation_max > 0.0 && self.regurgitation_max <= 1.0) {
            return Err(QaError::InvalidThresholds(format!(
                "regurgitation_max must be in (0, 1], got {}",
                self.regurgitation_max
            )));
        }
        if !(self.smart_criteria_min > 0.0 && self.smart_criteria_min <= 1.0) {
            return Err(QaError::InvalidThresholds(format!(
                "smart_criteria_min must be in (0, 1], got {}",
                self.smart_criteria_min
            )));
        }
        // The passing specificity score divides by (1 - threshold).
        if !(self.specificity_min >= 0.0 && self.specificity_min < 1.0) {
            return Err(QaError::InvalidThresholds(format!(
                "specificity_min must be in [0, 1), got {}",
                self.specificity_min
            )));
        }
        Ok(())
    }

    /// Parse and validate thresholds from JSON. Missing fields use defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let thresholds: Self = serde_json::from_str(json)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Load and validate thresholds from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
