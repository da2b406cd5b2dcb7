//! Error types for the risk engine
//!
//! Sub-model failures (PCE, PREVENT) are reported as error records inside
//! their own results and never abort the rest of an assessment. Only a
//! baseline-mortality failure aborts the all-cause calculation, since every
//! downstream cause split and adjustment depends on it.

use thiserror::Error;

/// Errors produced by the risk computation core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Input rejected before any computation (out-of-range value, bad enum)
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// Time horizon string not one of 6_month / 1_year / 5_year
    #[error("unsupported time horizon: {0}")]
    InvalidHorizon(String),

    /// Reference table missing, or age outside the table's domain
    #[error("reference data unavailable: {0}")]
    DataUnavailable(String),

    /// No cause-allocation band covers the requested age
    #[error("age {age} not covered by any cause-allocation band")]
    NoMatchingAgeBand { age: u8 },

    /// Age outside a model's validated range (PCE: 40-79, PREVENT: 30-79)
    #[error("age {age} outside validated range {min}-{max} for {model}")]
    AgeOutOfRange {
        model: &'static str,
        age: u8,
        min: u8,
        max: u8,
    },

    /// No coefficient set exists for the requested sex/race combination
    #[error("no coefficient set for population: {0}")]
    UnsupportedPopulation(String),

    /// Required predictors missing or out of range for a sub-model
    #[error("model not applicable: {0}")]
    ModelNotApplicable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RiskError::AgeOutOfRange {
            model: "PCE",
            age: 30,
            min: 40,
            max: 79,
        };
        assert_eq!(
            err.to_string(),
            "age 30 outside validated range 40-79 for PCE"
        );

        let err = RiskError::NoMatchingAgeBand { age: 120 };
        assert!(err.to_string().contains("120"));
    }
}
