//! Pooled Cohort Equations (PCE) 10-year ASCVD risk
//!
//! Coefficients from Goff et al. 2013, Table A (2013 ACC/AHA Guideline on the
//! Assessment of Cardiovascular Risk). Groups differ in which interaction
//! terms exist; an absent term contributes zero and is never substituted.
//!
//! Risk = 1 - S10^exp(sum_of_products - group_mean_sum)

use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::person::{Demographic, Race, RiskFactorSet, Sex};

/// Validated age range for the equations
pub const PCE_MIN_AGE: u8 = 40;
pub const PCE_MAX_AGE: u8 = 79;

/// Race/sex population group for coefficient lookup
///
/// The published equations cover white and black cohorts; other races map to
/// the white coefficient group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PcePopulation {
    WhiteMale,
    WhiteFemale,
    BlackMale,
    BlackFemale,
}

impl PcePopulation {
    pub fn from_demographics(race: Race, sex: Sex) -> Self {
        let race = match race {
            Race::Black => Race::Black,
            // White coefficients stand in for unsupported races
            Race::White | Race::Other => Race::White,
        };
        match (race, sex) {
            (Race::White, Sex::Male) => PcePopulation::WhiteMale,
            (Race::White, Sex::Female) => PcePopulation::WhiteFemale,
            (Race::Black, Sex::Male) => PcePopulation::BlackMale,
            (Race::Black, Sex::Female) => PcePopulation::BlackFemale,
            _ => unreachable!(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PcePopulation::WhiteMale => "white_male",
            PcePopulation::WhiteFemale => "white_female",
            PcePopulation::BlackMale => "black_male",
            PcePopulation::BlackFemale => "black_female",
        }
    }
}

/// Coefficients for one population group
///
/// Sparse by design: `None` means the group's published equation has no such
/// term, and evaluation adds nothing for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PceGroup {
    pub ln_age: f64,
    pub ln_age_squared: Option<f64>,
    pub ln_total_chol: f64,
    pub ln_age_x_ln_total_chol: Option<f64>,
    pub ln_hdl: f64,
    pub ln_age_x_ln_hdl: Option<f64>,
    pub ln_sbp_treated: f64,
    pub ln_age_x_ln_sbp_treated: Option<f64>,
    pub ln_sbp_untreated: f64,
    pub ln_age_x_ln_sbp_untreated: Option<f64>,
    pub smoker: f64,
    pub ln_age_x_smoker: Option<f64>,
    pub diabetes: f64,

    /// Race/sex-specific mean of the coefficient sum
    pub mean_coefficient_sum: f64,
    /// Baseline 10-year survival S10
    pub baseline_survival: f64,
}

/// Coefficient sets keyed by population group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PceCoefficientSet {
    groups: Vec<(PcePopulation, PceGroup)>,
}

impl PceCoefficientSet {
    /// Published coefficients from Goff et al. 2013, Table A
    pub fn goff_2013() -> Self {
        Self {
            groups: vec![
                (
                    PcePopulation::WhiteMale,
                    PceGroup {
                        ln_age: 12.344,
                        ln_age_squared: None,
                        ln_total_chol: 11.853,
                        ln_age_x_ln_total_chol: Some(-2.664),
                        ln_hdl: -7.990,
                        ln_age_x_ln_hdl: Some(1.769),
                        ln_sbp_treated: 1.797,
                        ln_age_x_ln_sbp_treated: None,
                        ln_sbp_untreated: 1.764,
                        ln_age_x_ln_sbp_untreated: None,
                        smoker: 7.837,
                        ln_age_x_smoker: Some(-1.795),
                        diabetes: 0.658,
                        mean_coefficient_sum: 61.18,
                        baseline_survival: 0.9144,
                    },
                ),
                (
                    PcePopulation::WhiteFemale,
                    PceGroup {
                        ln_age: -29.799,
                        ln_age_squared: Some(4.884),
                        ln_total_chol: 13.540,
                        ln_age_x_ln_total_chol: Some(-3.114),
                        ln_hdl: -13.578,
                        ln_age_x_ln_hdl: Some(3.149),
                        ln_sbp_treated: 2.019,
                        ln_age_x_ln_sbp_treated: None,
                        ln_sbp_untreated: 1.957,
                        ln_age_x_ln_sbp_untreated: None,
                        smoker: 7.574,
                        ln_age_x_smoker: Some(-1.665),
                        diabetes: 0.661,
                        mean_coefficient_sum: -29.18,
                        baseline_survival: 0.9665,
                    },
                ),
                (
                    PcePopulation::BlackMale,
                    PceGroup {
                        ln_age: 2.469,
                        ln_age_squared: None,
                        ln_total_chol: 0.302,
                        ln_age_x_ln_total_chol: None,
                        ln_hdl: -0.307,
                        ln_age_x_ln_hdl: None,
                        ln_sbp_treated: 1.916,
                        ln_age_x_ln_sbp_treated: None,
                        ln_sbp_untreated: 1.809,
                        ln_age_x_ln_sbp_untreated: None,
                        smoker: 0.549,
                        ln_age_x_smoker: None,
                        diabetes: 0.645,
                        mean_coefficient_sum: 19.54,
                        baseline_survival: 0.8954,
                    },
                ),
                (
                    PcePopulation::BlackFemale,
                    PceGroup {
                        ln_age: 17.114,
                        ln_age_squared: None,
                        ln_total_chol: 0.940,
                        ln_age_x_ln_total_chol: None,
                        ln_hdl: -18.920,
                        ln_age_x_ln_hdl: Some(4.475),
                        ln_sbp_treated: 29.291,
                        ln_age_x_ln_sbp_treated: Some(-6.432),
                        ln_sbp_untreated: 27.820,
                        ln_age_x_ln_sbp_untreated: Some(-6.087),
                        smoker: 0.691,
                        ln_age_x_smoker: None,
                        diabetes: 0.874,
                        mean_coefficient_sum: 86.61,
                        baseline_survival: 0.9533,
                    },
                ),
            ],
        }
    }

    /// Coefficients for a population group
    pub fn group(&self, population: PcePopulation) -> Result<&PceGroup, RiskError> {
        self.groups
            .iter()
            .find(|(pop, _)| *pop == population)
            .map(|(_, group)| group)
            .ok_or_else(|| RiskError::UnsupportedPopulation(population.as_str().to_string()))
    }
}

/// Inputs to the PCE calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PceInput {
    pub age: u8,
    pub sex: Sex,
    pub race: Race,
    /// Total cholesterol in mg/dL
    pub total_cholesterol: f64,
    /// HDL cholesterol in mg/dL
    pub hdl_cholesterol: f64,
    /// Systolic blood pressure in mmHg
    pub systolic_bp: f64,
    pub bp_treated: bool,
    pub smoker: bool,
    pub diabetes: bool,
}

impl PceInput {
    /// Assemble from a demographic plus risk factors, filling unset fields
    /// with the model's defaults (TC 200, HDL 50, SBP 120, untreated)
    pub fn from_profile(demographic: &Demographic, factors: &RiskFactorSet) -> Self {
        Self {
            age: demographic.age,
            sex: demographic.sex,
            race: demographic.race,
            total_cholesterol: factors.total_cholesterol.unwrap_or(200.0),
            hdl_cholesterol: factors.hdl_cholesterol.unwrap_or(50.0),
            systolic_bp: factors.systolic_bp.unwrap_or(120.0),
            bp_treated: factors.bp_treated.unwrap_or(false),
            // PCE counts former smokers as smokers, unlike PREVENT
            smoker: factors.is_ever_smoker(),
            diabetes: factors.diabetes.unwrap_or(false),
        }
    }
}

/// PCE risk classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PceRiskLevel {
    /// 10-year risk below 7.5%
    Low,
    /// 7.5% to 20%
    Borderline,
    /// 20% and above
    High,
}

/// PCE calculation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PceResult {
    pub risk_10_year: f64,
    /// 0.6 x 10-year risk; a fixed-fraction approximation, not independently
    /// modeled (kept for compatibility with the source equations' consumers)
    pub risk_5_year: f64,
    /// 0.1 x 10-year risk; same approximation
    pub risk_1_year: f64,
    pub risk_level: PceRiskLevel,
    pub population: PcePopulation,
}

/// Compute 10-year ASCVD risk for one person
///
/// Returns an error record for ages outside 40-79 or a missing coefficient
/// group; callers treat that as a failed sub-model, not a failed request.
pub fn ten_year_risk(
    coefficients: &PceCoefficientSet,
    input: &PceInput,
) -> Result<PceResult, RiskError> {
    if input.age < PCE_MIN_AGE || input.age > PCE_MAX_AGE {
        return Err(RiskError::AgeOutOfRange {
            model: "PCE",
            age: input.age,
            min: PCE_MIN_AGE,
            max: PCE_MAX_AGE,
        });
    }

    let population = PcePopulation::from_demographics(input.race, input.sex);
    let group = coefficients.group(population)?;

    let ln_age = f64::from(input.age).ln();
    let ln_tc = input.total_cholesterol.ln();
    let ln_hdl = input.hdl_cholesterol.ln();
    let ln_sbp = input.systolic_bp.ln();
    let smoker = if input.smoker { 1.0 } else { 0.0 };
    let diabetes = if input.diabetes { 1.0 } else { 0.0 };

    let mut sum = group.ln_age * ln_age;
    if let Some(coef) = group.ln_age_squared {
        sum += coef * ln_age * ln_age;
    }

    sum += group.ln_total_chol * ln_tc;
    sum += group.ln_hdl * ln_hdl;
    if let Some(coef) = group.ln_age_x_ln_total_chol {
        sum += coef * ln_age * ln_tc;
    }
    if let Some(coef) = group.ln_age_x_ln_hdl {
        sum += coef * ln_age * ln_hdl;
    }

    // SBP term selected by treatment status, each with its own optional
    // age interaction
    if input.bp_treated {
        sum += group.ln_sbp_treated * ln_sbp;
        if let Some(coef) = group.ln_age_x_ln_sbp_treated {
            sum += coef * ln_age * ln_sbp;
        }
    } else {
        sum += group.ln_sbp_untreated * ln_sbp;
        if let Some(coef) = group.ln_age_x_ln_sbp_untreated {
            sum += coef * ln_age * ln_sbp;
        }
    }

    sum += group.smoker * smoker;
    if let Some(coef) = group.ln_age_x_smoker {
        sum += coef * ln_age * smoker;
    }

    sum += group.diabetes * diabetes;

    let risk_10_year =
        1.0 - group.baseline_survival.powf((sum - group.mean_coefficient_sum).exp());

    let risk_level = if risk_10_year < 0.075 {
        PceRiskLevel::Low
    } else if risk_10_year < 0.20 {
        PceRiskLevel::Borderline
    } else {
        PceRiskLevel::High
    };

    Ok(PceResult {
        risk_10_year,
        risk_5_year: risk_10_year * 0.6,
        risk_1_year: risk_10_year * 0.1,
        risk_level,
        population,
    })
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn baseline_input() -> PceInput {
        // Worked example from the 2013 guideline: 55-year-old white male,
        // TC 213, HDL 50, SBP 120 untreated, non-smoker, non-diabetic
        PceInput {
            age: 55,
            sex: Sex::Male,
            race: Race::White,
            total_cholesterol: 213.0,
            hdl_cholesterol: 50.0,
            systolic_bp: 120.0,
            bp_treated: false,
            smoker: false,
            diabetes: false,
        }
    }

    #[test]
    fn test_guideline_worked_example() {
        let coefficients = PceCoefficientSet::goff_2013();
        let result = ten_year_risk(&coefficients, &baseline_input()).unwrap();

        // Paper reports 5.3% for this profile
        assert_abs_diff_eq!(result.risk_10_year, 0.053, epsilon = 0.01);
        assert_eq!(result.population, PcePopulation::WhiteMale);
        assert_eq!(result.risk_level, PceRiskLevel::Low);
    }

    #[test]
    fn test_fixed_fraction_horizons() {
        let coefficients = PceCoefficientSet::goff_2013();
        let result = ten_year_risk(&coefficients, &baseline_input()).unwrap();
        assert_relative_eq!(result.risk_5_year, result.risk_10_year * 0.6);
        assert_relative_eq!(result.risk_1_year, result.risk_10_year * 0.1);
    }

    #[test]
    fn test_age_gate() {
        let coefficients = PceCoefficientSet::goff_2013();
        let mut input = baseline_input();

        input.age = 39;
        assert!(matches!(
            ten_year_risk(&coefficients, &input),
            Err(RiskError::AgeOutOfRange { model: "PCE", .. })
        ));

        input.age = 80;
        assert!(ten_year_risk(&coefficients, &input).is_err());

        input.age = 40;
        assert!(ten_year_risk(&coefficients, &input).is_ok());
        input.age = 79;
        assert!(ten_year_risk(&coefficients, &input).is_ok());
    }

    #[test]
    fn test_other_race_uses_white_coefficients() {
        let coefficients = PceCoefficientSet::goff_2013();
        let mut input = baseline_input();
        let white = ten_year_risk(&coefficients, &input).unwrap();

        input.race = Race::Other;
        let other = ten_year_risk(&coefficients, &input).unwrap();

        assert_eq!(other.population, PcePopulation::WhiteMale);
        assert!((white.risk_10_year - other.risk_10_year).abs() < 1e-15);
    }

    #[test]
    fn test_sparse_groups_differ() {
        // Black female carries treated/untreated SBP age interactions that
        // white male lacks; treatment status must move her risk more than a
        // plain coefficient swap would
        let coefficients = PceCoefficientSet::goff_2013();
        let input = PceInput {
            age: 60,
            sex: Sex::Female,
            race: Race::Black,
            total_cholesterol: 220.0,
            hdl_cholesterol: 45.0,
            systolic_bp: 150.0,
            bp_treated: false,
            smoker: false,
            diabetes: false,
        };
        let untreated = ten_year_risk(&coefficients, &input).unwrap();

        let treated = ten_year_risk(
            &coefficients,
            &PceInput {
                bp_treated: true,
                ..input
            },
        )
        .unwrap();

        assert_eq!(untreated.population, PcePopulation::BlackFemale);
        assert!(untreated.risk_10_year > 0.0 && untreated.risk_10_year < 1.0);
        assert!(treated.risk_10_year != untreated.risk_10_year);
    }

    #[test]
    fn test_smoking_and_diabetes_raise_risk() {
        let coefficients = PceCoefficientSet::goff_2013();
        let base = ten_year_risk(&coefficients, &baseline_input()).unwrap();

        let smoker = ten_year_risk(
            &coefficients,
            &PceInput {
                smoker: true,
                ..baseline_input()
            },
        )
        .unwrap();
        assert!(smoker.risk_10_year > base.risk_10_year);

        let diabetic = ten_year_risk(
            &coefficients,
            &PceInput {
                diabetes: true,
                ..baseline_input()
            },
        )
        .unwrap();
        assert!(diabetic.risk_10_year > base.risk_10_year);
    }

    #[test]
    fn test_former_smoker_carries_smoker_term() {
        use crate::person::SmokingStatus;

        let demographic = Demographic::new(55, Sex::Male, Race::White);
        let factors = |status| RiskFactorSet {
            smoking_status: Some(status),
            years_since_quit: Some(1.0),
            total_cholesterol: Some(213.0),
            hdl_cholesterol: Some(50.0),
            systolic_bp: Some(120.0),
            ..Default::default()
        };

        let never = PceInput::from_profile(&demographic, &factors(SmokingStatus::Never));
        let former = PceInput::from_profile(&demographic, &factors(SmokingStatus::Former));
        let current = PceInput::from_profile(&demographic, &factors(SmokingStatus::Current));

        assert!(!never.smoker);
        assert!(former.smoker);
        assert!(current.smoker);

        // The smoker coefficient must move the risk for former smokers too
        let coefficients = PceCoefficientSet::goff_2013();
        let never_risk = ten_year_risk(&coefficients, &never).unwrap().risk_10_year;
        let former_risk = ten_year_risk(&coefficients, &former).unwrap().risk_10_year;
        assert!(former_risk > never_risk);
    }

    #[test]
    fn test_missing_group_unsupported_population() {
        let coefficients = PceCoefficientSet { groups: vec![] };
        let err = ten_year_risk(&coefficients, &baseline_input()).unwrap_err();
        assert!(matches!(err, RiskError::UnsupportedPopulation(_)));
    }
}
