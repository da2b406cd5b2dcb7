//! Per-factor relative-risk multipliers and their cause mapping
//!
//! Each present risk factor produces one multiplier; absent factors produce
//! none and leave the baseline untouched. Multipliers compose multiplicatively
//! per cause: smoking and fitness scale every cause, blood pressure and
//! alcohol scale heart disease and stroke, BMI scales heart disease, stroke,
//! and diabetes.

use serde::{Deserialize, Serialize};

use crate::person::{AlcoholPattern, FitnessLevel, RiskFactorSet, SmokingStatus};
use crate::tables::{Cause, RelativeRiskTable};

/// Optimal systolic blood pressure; no excess risk below this
const OPTIMAL_SBP: f64 = 120.0;

/// BMI with minimal all-cause mortality; risk rises symmetrically around it
const OPTIMAL_BMI: f64 = 22.0;

/// Multipliers computed from one person's risk factors
///
/// `None` means the factor was not reported, not that it is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FactorAdjustments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<f64>,
}

impl FactorAdjustments {
    /// Compute all multipliers for the reported factors
    pub fn from_factors(factors: &RiskFactorSet, risks: &RelativeRiskTable) -> Self {
        Self {
            smoking: factors.smoking_status.map(|status| {
                smoking_multiplier(status, factors.years_since_quit.unwrap_or(0.0), risks)
            }),
            blood_pressure: factors.systolic_bp.map(|sbp| {
                bp_multiplier(sbp, factors.bp_treated.unwrap_or(false), risks)
            }),
            bmi: factors.bmi.map(|bmi| bmi_multiplier(bmi, risks)),
            fitness: factors.fitness_level.map(|level| fitness_multiplier(level, risks)),
            alcohol: factors
                .alcohol_pattern
                .map(|pattern| alcohol_multiplier(pattern, risks)),
        }
    }

    /// Combined multiplier for one cause of death
    pub fn cause_multiplier(&self, cause: Cause) -> f64 {
        let mut multiplier = 1.0;

        if let Some(rr) = self.smoking {
            multiplier *= rr;
        }
        if let Some(rr) = self.fitness {
            multiplier *= rr;
        }

        let cardiovascular = matches!(cause, Cause::HeartDisease | Cause::Stroke);
        if cardiovascular {
            if let Some(rr) = self.blood_pressure {
                multiplier *= rr;
            }
            if let Some(rr) = self.alcohol {
                multiplier *= rr;
            }
        }
        if cardiovascular || cause == Cause::Diabetes {
            if let Some(rr) = self.bmi {
                multiplier *= rr;
            }
        }

        multiplier
    }
}

/// Current smokers carry the full published RR; former smokers decay linearly
/// from the former-smoker RR toward 1.0 over the years-to-never window
fn smoking_multiplier(
    status: SmokingStatus,
    years_since_quit: f64,
    risks: &RelativeRiskTable,
) -> f64 {
    match status {
        SmokingStatus::Current => risks.smoking.current_vs_never.value,
        SmokingStatus::Former => {
            let max_rr = risks.smoking.former_vs_never.value;
            let years_to_never = risks.smoking.years_to_never_equivalent.value;
            let recovered = (years_since_quit / years_to_never).min(1.0);
            1.0 + (max_rr - 1.0) * (1.0 - recovered)
        }
        SmokingStatus::Never => 1.0,
    }
}

/// RR^((sbp - 120)/20) above optimal, 1.0 at or below; treatment applies a
/// further multiplicative reduction
fn bp_multiplier(sbp: f64, treated: bool, risks: &RelativeRiskTable) -> f64 {
    let excess = (sbp - OPTIMAL_SBP).max(0.0);
    let mut rr = risks.blood_pressure.per_20mmhg_sbp.value.powf(excess / 20.0);
    if treated {
        rr *= risks.blood_pressure.treatment_reduction.value;
    }
    rr
}

/// RR^(|bmi - 22|/5), symmetric around the optimum
fn bmi_multiplier(bmi: f64, risks: &RelativeRiskTable) -> f64 {
    let deviation = (bmi - OPTIMAL_BMI).abs();
    risks.bmi.per_5_units.value.powf(deviation / 5.0)
}

/// Sedentary carries the published RR, moderate is the 1.0 reference, high
/// activity gets the inverse square root of the sedentary RR
fn fitness_multiplier(level: FitnessLevel, risks: &RelativeRiskTable) -> f64 {
    let sedentary_rr = risks.fitness.sedentary_vs_active.value;
    match level {
        FitnessLevel::Sedentary => sedentary_rr,
        FitnessLevel::Moderate => 1.0,
        FitnessLevel::High => 1.0 / sedentary_rr.sqrt(),
    }
}

fn alcohol_multiplier(pattern: AlcoholPattern, risks: &RelativeRiskTable) -> f64 {
    match pattern {
        AlcoholPattern::None => 1.0,
        AlcoholPattern::Moderate => risks.alcohol.moderate_vs_none.value,
        AlcoholPattern::Heavy => risks.alcohol.heavy_vs_none.value,
        AlcoholPattern::Binge => risks.alcohol.binge_vs_none.value,
    }
}
