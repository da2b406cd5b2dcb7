//! All-cause mortality risk pipeline
//!
//! `RiskEngine` owns the reference data and coefficient sets and exposes the
//! full assessment: baseline mortality, cause allocation, risk-factor
//! adjustment, the two cardiovascular sub-models, and life expectancy. The
//! cardiovascular models and life expectancy are independent of the all-cause
//! path; their failures are recorded on the assessment, not propagated.

pub mod adjustment;
pub mod intervention;
pub mod life_expectancy;

pub use adjustment::FactorAdjustments;
pub use intervention::{model_interventions, InterventionOutcome, InterventionPlan};
pub use life_expectancy::{adjusted_life_expectancy, LifeExpectancy};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cardio::{pce, prevent};
use crate::cardio::{PceCoefficientSet, PceResult, PreventCoefficientSet, PreventResult};
use crate::error::RiskError;
use crate::person::{Demographic, Horizon, RiskFactorSet, Sex};
use crate::tables::{Cause, CauseAllocationTable, ReferenceData};

/// Overall mortality risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    /// Classify an adjusted total risk for the requested horizon
    pub fn classify(total_risk: f64) -> Self {
        if total_risk < 0.01 {
            RiskLevel::Low
        } else if total_risk < 0.05 {
            RiskLevel::Moderate
        } else if total_risk < 0.15 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

/// One cause's share of the adjusted risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CauseContribution {
    pub cause: Cause,
    pub risk: f64,
    /// Share of the adjusted total, as a percentage
    pub percentage: f64,
}

/// Adjusted all-cause mortality risk for one person and horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedRisk {
    pub baseline_risk: f64,
    pub adjusted_total_risk: f64,
    pub cause_risks: BTreeMap<Cause, f64>,
    pub adjustments: FactorAdjustments,
    pub horizon: Horizon,
    pub risk_level: RiskLevel,
    pub top_causes: Vec<CauseContribution>,
}

impl AdjustedRisk {
    /// Leading causes ranked by adjusted risk
    fn rank_causes(cause_risks: &BTreeMap<Cause, f64>, n: usize) -> Vec<CauseContribution> {
        let total: f64 = cause_risks.values().sum();
        let mut ranked: Vec<_> = cause_risks
            .iter()
            .map(|(&cause, &risk)| CauseContribution {
                cause,
                risk,
                percentage: if total > 0.0 { risk / total * 100.0 } else { 0.0 },
            })
            .collect();
        ranked.sort_by(|a, b| b.risk.total_cmp(&a.risk));
        ranked.truncate(n);
        ranked
    }
}

/// Full multi-model assessment for one person
///
/// Sub-model fields are `None` when that model could not run; the reason is
/// appended to `errors`. Only input validation fails the whole call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub demographic: Demographic,
    pub horizon: Horizon,
    pub mortality: Option<AdjustedRisk>,
    pub pce: Option<PceResult>,
    pub prevent: Option<PreventResult>,
    pub life_expectancy: Option<LifeExpectancy>,
    pub errors: Vec<String>,
}

/// The risk engine: reference data plus model coefficients, immutable after
/// construction
pub struct RiskEngine {
    data: ReferenceData,
    pce_coefficients: PceCoefficientSet,
    prevent_coefficients: PreventCoefficientSet,
}

impl RiskEngine {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            data,
            pce_coefficients: PceCoefficientSet::goff_2013(),
            prevent_coefficients: PreventCoefficientSet::khan_2024(),
        }
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.data
    }

    /// Baseline mortality probability over the requested horizon
    pub fn baseline_mortality(
        &self,
        age: u8,
        sex: Sex,
        horizon: Horizon,
    ) -> Result<f64, RiskError> {
        let qx = self.data.life_table.qx(age, sex)?;
        Ok(match horizon {
            Horizon::SixMonth => 1.0 - (1.0 - qx).powf(0.5),
            Horizon::OneYear => qx,
            Horizon::FiveYear => 1.0 - (1.0 - qx).powi(5),
        })
    }

    /// Split a baseline probability across causes of death
    pub fn allocate_causes(
        &self,
        age: u8,
        baseline: f64,
    ) -> Result<BTreeMap<Cause, f64>, RiskError> {
        match &self.data.cause_table {
            Some(table) => table.allocate(age, baseline),
            None => Ok(CauseAllocationTable::fallback_allocate(age, baseline)),
        }
    }

    /// Risk-factor-adjusted mortality risk with per-cause detail
    pub fn adjusted_risk(
        &self,
        age: u8,
        sex: Sex,
        factors: &RiskFactorSet,
        horizon: Horizon,
    ) -> Result<AdjustedRisk, RiskError> {
        let baseline_risk = self.baseline_mortality(age, sex, horizon)?;
        let base_causes = self.allocate_causes(age, baseline_risk)?;
        let adjustments = FactorAdjustments::from_factors(factors, &self.data.relative_risks);

        let mut cause_risks = BTreeMap::new();
        let mut adjusted_total_risk = 0.0;
        for (&cause, &risk) in &base_causes {
            let adjusted = risk * adjustments.cause_multiplier(cause);
            adjusted_total_risk += adjusted;
            cause_risks.insert(cause, adjusted);
        }

        log::debug!(
            "adjusted risk age={} sex={:?} horizon={}: baseline={:.6} adjusted={:.6}",
            age,
            sex,
            horizon,
            baseline_risk,
            adjusted_total_risk
        );

        let top_causes = AdjustedRisk::rank_causes(&cause_risks, 3);
        Ok(AdjustedRisk {
            baseline_risk,
            adjusted_total_risk,
            cause_risks,
            adjustments,
            horizon,
            risk_level: RiskLevel::classify(adjusted_total_risk),
            top_causes,
        })
    }

    /// Run every model for one person
    ///
    /// Input validation errors fail the call; each sub-model's own failure is
    /// recorded in `errors` and leaves its field `None`.
    pub fn assess(
        &self,
        demographic: &Demographic,
        factors: &RiskFactorSet,
        horizon: Horizon,
    ) -> Result<RiskAssessment, RiskError> {
        demographic.validate()?;
        factors.validate()?;

        let mut errors = Vec::new();

        let mortality = match self.adjusted_risk(demographic.age, demographic.sex, factors, horizon)
        {
            Ok(result) => Some(result),
            Err(err) => {
                errors.push(format!("mortality: {}", err));
                None
            }
        };

        let pce_input = pce::PceInput::from_profile(demographic, factors);
        let pce = match pce::ten_year_risk(&self.pce_coefficients, &pce_input) {
            Ok(result) => Some(result),
            Err(err) => {
                errors.push(format!("pce: {}", err));
                None
            }
        };

        let prevent_input = prevent::PreventInput::from_profile(demographic, factors);
        let prevent = match prevent::assess(&self.prevent_coefficients, &prevent_input) {
            Ok(result) => Some(result),
            Err(err) => {
                errors.push(format!("prevent: {}", err));
                None
            }
        };

        // Life expectancy always works from the one-year adjusted risk,
        // whatever horizon the caller asked for
        let life_expectancy = match self.adjusted_risk(
            demographic.age,
            demographic.sex,
            factors,
            Horizon::OneYear,
        ) {
            Ok(one_year) => Some(adjusted_life_expectancy(
                &self.data.life_table,
                demographic.age,
                demographic.sex,
                one_year.adjusted_total_risk,
            )),
            Err(_) => Some(adjusted_life_expectancy(
                &self.data.life_table,
                demographic.age,
                demographic.sex,
                0.0,
            )),
        };

        Ok(RiskAssessment {
            demographic: *demographic,
            horizon,
            mortality,
            pce,
            prevent,
            life_expectancy,
            errors,
        })
    }
}
