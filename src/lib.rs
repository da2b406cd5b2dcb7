//! Mortality Engine - Evidence-based mortality and cardiovascular risk engine
//!
//! This library provides:
//! - Baseline mortality from period life tables (6-month, 1-year, 5-year horizons)
//! - Cause-of-death allocation and multiplicative risk-factor adjustment
//! - PCE and PREVENT cardiovascular risk models
//! - Counterfactual intervention modeling
//! - Risk-adjusted life expectancy

pub mod cardio;
pub mod engine;
pub mod error;
pub mod person;
pub mod tables;

// Re-export commonly used types
pub use engine::{AdjustedRisk, RiskAssessment, RiskEngine, RiskLevel};
pub use error::RiskError;
pub use person::{Demographic, Horizon, RiskFactorSet, Sex};
pub use tables::{Cause, LifeTable, ReferenceData, RelativeRiskTable};
