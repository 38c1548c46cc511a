//! Synthesis parameters.

use declist_types::ErrorCategory;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid synthesis parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    #[error("invalid synthesis config: {0}")]
    InvalidConfig(String),
}

impl SynthError {
    /// Configuration errors are caller contract violations.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Precondition
    }
}

/// Shape of a synthesized program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Number of variables, named `var1..=varN`.
    pub variables: usize,
    /// Number of decision lists.
    pub lists: usize,
    /// Upper bound on guarded nodes per list; the default node comes on top.
    pub max_list_length: usize,
    /// Probability that a guard compares against the variable's current
    /// value instead of a fresh random value.
    pub resolved_constant_ratio: f64,
    /// Admit `&&`/`||` over Integer and Float operands. Such guards are
    /// well-formed but always fail evaluation with a type mismatch.
    pub allow_numeric_logical: bool,
    /// Fixed seed for reproducible programs; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            variables: 100,
            lists: 1000,
            max_list_length: 3,
            resolved_constant_ratio: 0.3,
            allow_numeric_logical: false,
            seed: None,
        }
    }
}

impl SynthConfig {
    /// Parse a JSON object; absent fields take their defaults. Call
    /// [`SynthConfig::validate`] (or [`crate::Synthesizer::new`]) afterwards.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reject parameters the generator cannot honor.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.variables == 0 {
            return Err(SynthError::InvalidConfig(
                "at least one variable is required".into(),
            ));
        }
        if self.max_list_length == 0 {
            return Err(SynthError::InvalidConfig(
                "max_list_length must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.resolved_constant_ratio) {
            return Err(SynthError::InvalidConfig(format!(
                "resolved_constant_ratio {} is outside [0, 1]",
                self.resolved_constant_ratio
            )));
        }
        Ok(())
    }
}
