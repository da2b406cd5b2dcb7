//! AHA PREVENT cardiovascular risk equations
//!
//! Khan et al. 2024, Circulation 149(6):430-449. Base model: sex-specific
//! logistic equations for 10- and 30-year risk of total CVD, ASCVD, and heart
//! failure. Predictors are piecewise-linear spline terms clamped at published
//! knots; risks are reported as percentages rounded to three decimals.
//!
//! Cholesterol inputs gate only the CVD/ASCVD outcomes and BMI gates only the
//! HF outcomes, so a profile with out-of-range lipids still gets HF risks and
//! vice versa. 30-year risks are not reported above age 59.

use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::person::{Demographic, RiskFactorSet, Sex};

pub const PREVENT_MIN_AGE: u8 = 30;
pub const PREVENT_MAX_AGE: u8 = 79;

/// Oldest age at which 30-year risks are reported
pub const PREVENT_MAX_AGE_30YR: u8 = 59;

const MG_DL_TO_MMOL_L: f64 = 0.02586;

/// Coefficients for one CVD or ASCVD outcome equation
///
/// The non-HDL and HDL terms multiply centered predictors
/// (non_hdl_mmol - 3.5 and (hdl_mmol - 1.3) / 0.3 respectively);
/// `age_squared` exists only in the 30-year equations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LipidOutcomeCoefficients {
    pub intercept: f64,
    pub age: f64,
    pub age_squared: Option<f64>,
    pub non_hdl: f64,
    pub hdl: f64,
    pub sbp_low: f64,
    pub sbp_high: f64,
    pub diabetes: f64,
    pub smoking: f64,
    pub egfr_low: f64,
    pub egfr_high: f64,
    pub bp_treated: f64,
    pub statin: f64,
    pub bp_treated_x_sbp_high: f64,
    pub statin_x_non_hdl: f64,
    pub age_x_non_hdl: f64,
    pub age_x_hdl: f64,
    pub age_x_sbp_high: f64,
    pub age_x_diabetes: f64,
    pub age_x_smoking: f64,
    pub age_x_egfr_low: f64,
}

/// Coefficients for one heart-failure outcome equation
///
/// HF equations use BMI splines in place of the cholesterol terms and carry
/// no statin term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HfOutcomeCoefficients {
    pub intercept: f64,
    pub age: f64,
    pub age_squared: Option<f64>,
    pub sbp_low: f64,
    pub sbp_high: f64,
    pub diabetes: f64,
    pub smoking: f64,
    pub bmi_low: f64,
    pub bmi_high: f64,
    pub egfr_low: f64,
    pub egfr_high: f64,
    pub bp_treated: f64,
    pub bp_treated_x_sbp_high: f64,
    pub age_x_sbp_high: f64,
    pub age_x_diabetes: f64,
    pub age_x_smoking: f64,
    pub age_x_bmi_high: f64,
    pub age_x_egfr_low: f64,
}

/// All six outcome equations for one sex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreventSexCoefficients {
    pub cvd_10yr: LipidOutcomeCoefficients,
    pub cvd_30yr: LipidOutcomeCoefficients,
    pub ascvd_10yr: LipidOutcomeCoefficients,
    pub ascvd_30yr: LipidOutcomeCoefficients,
    pub hf_10yr: HfOutcomeCoefficients,
    pub hf_30yr: HfOutcomeCoefficients,
}

/// Sex-specific PREVENT base-model coefficient set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreventCoefficientSet {
    pub male: PreventSexCoefficients,
    pub female: PreventSexCoefficients,
}

impl PreventCoefficientSet {
    pub fn for_sex(&self, sex: Sex) -> &PreventSexCoefficients {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    /// Published base-model coefficients from Khan et al. 2024
    pub fn khan_2024() -> Self {
        Self {
            female: PreventSexCoefficients {
                cvd_10yr: LipidOutcomeCoefficients {
                    intercept: -3.307728,
                    age: 0.7939329,
                    age_squared: None,
                    non_hdl: 0.0305239,
                    hdl: -0.1606857,
                    sbp_low: -0.2394003,
                    sbp_high: 0.360078,
                    diabetes: 0.8667604,
                    smoking: 0.5360739,
                    egfr_low: 0.6045917,
                    egfr_high: 0.0433769,
                    bp_treated: 0.3151672,
                    statin: -0.1477655,
                    bp_treated_x_sbp_high: -0.0663612,
                    statin_x_non_hdl: 0.1197879,
                    age_x_non_hdl: -0.0819715,
                    age_x_hdl: 0.0306769,
                    age_x_sbp_high: -0.0946348,
                    age_x_diabetes: -0.27057,
                    age_x_smoking: -0.078715,
                    age_x_egfr_low: -0.1637806,
                },
                cvd_30yr: LipidOutcomeCoefficients {
                    intercept: -1.318827,
                    age: 0.5503079,
                    age_squared: Some(-0.0928369),
                    non_hdl: 0.0409794,
                    hdl: -0.1663306,
                    sbp_low: -0.1628654,
                    sbp_high: 0.3299505,
                    diabetes: 0.6793894,
                    smoking: 0.3196112,
                    egfr_low: 0.1857101,
                    egfr_high: 0.0553528,
                    bp_treated: 0.2894,
                    statin: -0.075688,
                    bp_treated_x_sbp_high: -0.056367,
                    statin_x_non_hdl: 0.1071019,
                    age_x_non_hdl: -0.0751438,
                    age_x_hdl: 0.0301786,
                    age_x_sbp_high: -0.0998776,
                    age_x_diabetes: -0.3206166,
                    age_x_smoking: -0.1607862,
                    age_x_egfr_low: -0.1450788,
                },
                ascvd_10yr: LipidOutcomeCoefficients {
                    intercept: -3.819975,
                    age: 0.719883,
                    age_squared: None,
                    non_hdl: 0.1176967,
                    hdl: -0.151185,
                    sbp_low: -0.0835358,
                    sbp_high: 0.3592852,
                    diabetes: 0.8348585,
                    smoking: 0.4831078,
                    egfr_low: 0.4864619,
                    egfr_high: 0.0397779,
                    bp_treated: 0.2265309,
                    statin: -0.0592374,
                    bp_treated_x_sbp_high: -0.0395762,
                    statin_x_non_hdl: 0.0844423,
                    age_x_non_hdl: -0.0567839,
                    age_x_hdl: 0.0325692,
                    age_x_sbp_high: -0.1035985,
                    age_x_diabetes: -0.2417542,
                    age_x_smoking: -0.0791142,
                    age_x_egfr_low: -0.1671492,
                },
                ascvd_30yr: LipidOutcomeCoefficients {
                    intercept: -1.974074,
                    age: 0.4669202,
                    age_squared: Some(-0.0893118),
                    non_hdl: 0.1256901,
                    hdl: -0.1542255,
                    sbp_low: -0.0018093,
                    sbp_high: 0.322949,
                    diabetes: 0.6296707,
                    smoking: 0.268292,
                    egfr_low: 0.100106,
                    egfr_high: 0.0499663,
                    bp_treated: 0.1875292,
                    statin: 0.0152476,
                    bp_treated_x_sbp_high: -0.0276123,
                    statin_x_non_hdl: 0.0736147,
                    age_x_non_hdl: -0.0521962,
                    age_x_hdl: 0.0316918,
                    age_x_sbp_high: -0.1046101,
                    age_x_diabetes: -0.2727793,
                    age_x_smoking: -0.1530907,
                    age_x_egfr_low: -0.1299149,
                },
                hf_10yr: HfOutcomeCoefficients {
                    intercept: -4.310409,
                    age: 0.8998235,
                    age_squared: None,
                    sbp_low: -0.4559771,
                    sbp_high: 0.3576505,
                    diabetes: 1.038346,
                    smoking: 0.583916,
                    bmi_low: -0.0072294,
                    bmi_high: 0.2997706,
                    egfr_low: 0.7451638,
                    egfr_high: 0.0557087,
                    bp_treated: 0.3534442,
                    bp_treated_x_sbp_high: -0.0981511,
                    age_x_sbp_high: -0.0946663,
                    age_x_diabetes: -0.3581041,
                    age_x_smoking: -0.1159453,
                    age_x_bmi_high: -0.003878,
                    age_x_egfr_low: -0.1884289,
                },
                hf_30yr: HfOutcomeCoefficients {
                    intercept: -2.205379,
                    age: 0.6254374,
                    age_squared: Some(-0.0983038),
                    sbp_low: -0.3919241,
                    sbp_high: 0.3142295,
                    diabetes: 0.8330787,
                    smoking: 0.3438651,
                    bmi_low: 0.0594874,
                    bmi_high: 0.2525536,
                    egfr_low: 0.2981642,
                    egfr_high: 0.0667159,
                    bp_treated: 0.333921,
                    bp_treated_x_sbp_high: -0.0893177,
                    age_x_sbp_high: -0.0974299,
                    age_x_diabetes: -0.404855,
                    age_x_smoking: -0.1982991,
                    age_x_bmi_high: -0.0035619,
                    age_x_egfr_low: -0.1564215,
                },
            },
            male: PreventSexCoefficients {
                cvd_10yr: LipidOutcomeCoefficients {
                    intercept: -3.031168,
                    age: 0.7688528,
                    age_squared: None,
                    non_hdl: 0.0736174,
                    hdl: -0.0954431,
                    sbp_low: -0.4347345,
                    sbp_high: 0.3362658,
                    diabetes: 0.7692857,
                    smoking: 0.4386871,
                    egfr_low: 0.5378979,
                    egfr_high: 0.0164827,
                    bp_treated: 0.288879,
                    statin: -0.1337349,
                    bp_treated_x_sbp_high: -0.0475924,
                    statin_x_non_hdl: 0.150273,
                    age_x_non_hdl: -0.0517874,
                    age_x_hdl: 0.0191169,
                    age_x_sbp_high: -0.1049477,
                    age_x_diabetes: -0.2251948,
                    age_x_smoking: -0.0895067,
                    age_x_egfr_low: -0.1543702,
                },
                cvd_30yr: LipidOutcomeCoefficients {
                    intercept: -1.148204,
                    age: 0.4627309,
                    age_squared: Some(-0.0984281),
                    non_hdl: 0.0836088,
                    hdl: -0.1029824,
                    sbp_low: -0.2140352,
                    sbp_high: 0.2904325,
                    diabetes: 0.5331276,
                    smoking: 0.2141914,
                    egfr_low: 0.1155556,
                    egfr_high: 0.0603775,
                    bp_treated: 0.232714,
                    statin: -0.0272112,
                    bp_treated_x_sbp_high: -0.0384488,
                    statin_x_non_hdl: 0.134192,
                    age_x_non_hdl: -0.0511759,
                    age_x_hdl: 0.0165865,
                    age_x_sbp_high: -0.1101437,
                    age_x_diabetes: -0.2585943,
                    age_x_smoking: -0.1566406,
                    age_x_egfr_low: -0.1166776,
                },
                ascvd_10yr: LipidOutcomeCoefficients {
                    intercept: -3.500655,
                    age: 0.7099847,
                    age_squared: None,
                    non_hdl: 0.1658663,
                    hdl: -0.1144285,
                    sbp_low: -0.2837212,
                    sbp_high: 0.3239977,
                    diabetes: 0.7189597,
                    smoking: 0.3956973,
                    egfr_low: 0.3690075,
                    egfr_high: 0.0203619,
                    bp_treated: 0.2036522,
                    statin: -0.0865581,
                    bp_treated_x_sbp_high: -0.0322916,
                    statin_x_non_hdl: 0.114563,
                    age_x_non_hdl: -0.0300005,
                    age_x_hdl: 0.0232747,
                    age_x_sbp_high: -0.0927024,
                    age_x_diabetes: -0.2018525,
                    age_x_smoking: -0.0970527,
                    age_x_egfr_low: -0.1217081,
                },
                ascvd_30yr: LipidOutcomeCoefficients {
                    intercept: -1.736444,
                    age: 0.3994099,
                    age_squared: Some(-0.0937484),
                    non_hdl: 0.1744643,
                    hdl: -0.120203,
                    sbp_low: -0.0665117,
                    sbp_high: 0.2753037,
                    diabetes: 0.4790257,
                    smoking: 0.1782635,
                    egfr_low: -0.0218789,
                    egfr_high: 0.0602553,
                    bp_treated: 0.1421182,
                    statin: 0.0135996,
                    bp_treated_x_sbp_high: -0.0218265,
                    statin_x_non_hdl: 0.1013148,
                    age_x_non_hdl: -0.0312619,
                    age_x_hdl: 0.020673,
                    age_x_sbp_high: -0.0920935,
                    age_x_diabetes: -0.2159947,
                    age_x_smoking: -0.1548811,
                    age_x_egfr_low: -0.0712547,
                },
                hf_10yr: HfOutcomeCoefficients {
                    intercept: -3.946391,
                    age: 0.8972642,
                    age_squared: None,
                    sbp_low: -0.6811466,
                    sbp_high: 0.3634461,
                    diabetes: 0.923776,
                    smoking: 0.5023736,
                    bmi_low: -0.0485841,
                    bmi_high: 0.3726929,
                    egfr_low: 0.6926917,
                    egfr_high: 0.0251827,
                    bp_treated: 0.2980922,
                    bp_treated_x_sbp_high: -0.0497731,
                    age_x_sbp_high: -0.1289201,
                    age_x_diabetes: -0.3040924,
                    age_x_smoking: -0.1401688,
                    age_x_bmi_high: 0.0068126,
                    age_x_egfr_low: -0.1797778,
                },
                hf_30yr: HfOutcomeCoefficients {
                    intercept: -1.95751,
                    age: 0.5681541,
                    age_squared: Some(-0.1048388),
                    sbp_low: -0.4761564,
                    sbp_high: 0.30324,
                    diabetes: 0.6840338,
                    smoking: 0.2656273,
                    bmi_low: 0.0833107,
                    bmi_high: 0.26999,
                    egfr_low: 0.2541805,
                    egfr_high: 0.0638923,
                    bp_treated: 0.2583631,
                    bp_treated_x_sbp_high: -0.0391938,
                    age_x_sbp_high: -0.1269124,
                    age_x_diabetes: -0.3273572,
                    age_x_smoking: -0.2043019,
                    age_x_bmi_high: -0.0182831,
                    age_x_egfr_low: -0.1342618,
                },
            },
        }
    }
}

/// Inputs to the PREVENT calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreventInput {
    pub age: u8,
    pub sex: Sex,
    /// Systolic blood pressure in mmHg (90-200)
    pub systolic_bp: f64,
    pub diabetes: bool,
    pub smoker: bool,
    /// Estimated GFR in mL/min/1.73m^2; required, no default is substituted
    pub egfr: Option<f64>,
    pub bp_treated: bool,
    /// Total cholesterol in mg/dL; gates CVD/ASCVD outcomes
    pub total_cholesterol: Option<f64>,
    /// HDL cholesterol in mg/dL; gates CVD/ASCVD outcomes
    pub hdl_cholesterol: Option<f64>,
    pub statin: bool,
    /// BMI in kg/m^2; gates HF outcomes
    pub bmi: Option<f64>,
}

impl PreventInput {
    pub fn from_profile(demographic: &Demographic, factors: &RiskFactorSet) -> Self {
        Self {
            age: demographic.age,
            sex: demographic.sex,
            systolic_bp: factors.systolic_bp.unwrap_or(120.0),
            diabetes: factors.diabetes.unwrap_or(false),
            smoker: factors.is_current_smoker(),
            egfr: factors.egfr,
            bp_treated: factors.bp_treated.unwrap_or(false),
            total_cholesterol: factors.total_cholesterol,
            hdl_cholesterol: factors.hdl_cholesterol,
            statin: factors.statin.unwrap_or(false),
            bmi: factors.bmi,
        }
    }
}

/// PREVENT calculation output
///
/// Risks are percentages rounded to three decimals. An outcome is `None` when
/// its inputs failed validation or the 30-year age restriction applies; the
/// reason appears in `notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreventResult {
    pub risk_10yr_cvd: Option<f64>,
    pub risk_10yr_ascvd: Option<f64>,
    pub risk_10yr_hf: Option<f64>,
    pub risk_30yr_cvd: Option<f64>,
    pub risk_30yr_ascvd: Option<f64>,
    pub risk_30yr_hf: Option<f64>,
    pub notes: Vec<String>,
}

/// Spline predictor terms shared by all outcome equations
struct Predictors {
    age_term: f64,
    sbp_low: f64,
    sbp_high: f64,
    egfr_low: f64,
    egfr_high: f64,
    diabetes: f64,
    smoking: f64,
    bp_treated: f64,
}

/// Compute PREVENT risks for one person
///
/// Age outside 30-79, SBP outside 90-200, or a missing/non-positive eGFR
/// fails the whole call. Lipid and BMI problems only suppress their outcome
/// family.
pub fn assess(
    coefficients: &PreventCoefficientSet,
    input: &PreventInput,
) -> Result<PreventResult, RiskError> {
    if input.age < PREVENT_MIN_AGE || input.age > PREVENT_MAX_AGE {
        return Err(RiskError::AgeOutOfRange {
            model: "PREVENT",
            age: input.age,
            min: PREVENT_MIN_AGE,
            max: PREVENT_MAX_AGE,
        });
    }
    if !(90.0..=200.0).contains(&input.systolic_bp) {
        return Err(RiskError::InputValidation(format!(
            "systolic_bp {} outside 90-200 mmHg",
            input.systolic_bp
        )));
    }
    let egfr = match input.egfr {
        Some(egfr) if egfr > 0.0 => egfr,
        Some(egfr) => {
            return Err(RiskError::InputValidation(format!(
                "egfr {} must be positive",
                egfr
            )))
        }
        None => {
            return Err(RiskError::ModelNotApplicable(
                "PREVENT requires egfr".to_string(),
            ))
        }
    };

    let mut notes = Vec::new();

    // Lipids gate CVD/ASCVD only
    let lipids = match (input.total_cholesterol, input.hdl_cholesterol) {
        (Some(tc), Some(hdl)) => {
            let mut ok = true;
            if !(130.0..=320.0).contains(&tc) {
                notes.push(format!(
                    "total_cholesterol {} outside 130-320 mg/dL; CVD/ASCVD unavailable",
                    tc
                ));
                ok = false;
            }
            if !(20.0..=100.0).contains(&hdl) {
                notes.push(format!(
                    "hdl_cholesterol {} outside 20-100 mg/dL; CVD/ASCVD unavailable",
                    hdl
                ));
                ok = false;
            }
            ok.then_some((tc, hdl))
        }
        _ => {
            notes.push("cholesterol panel missing; CVD/ASCVD unavailable".to_string());
            None
        }
    };

    // BMI gates HF only
    let bmi = match input.bmi {
        Some(bmi) if (18.5..40.0).contains(&bmi) => Some(bmi),
        Some(bmi) => {
            notes.push(format!(
                "bmi {} outside 18.5-39.9 kg/m^2; heart failure risk unavailable",
                bmi
            ));
            None
        }
        None => {
            notes.push("bmi missing; heart failure risk unavailable".to_string());
            None
        }
    };

    let age = f64::from(input.age);
    let sbp = input.systolic_bp;
    let predictors = Predictors {
        age_term: (age - 55.0) / 10.0,
        sbp_low: (sbp.min(110.0) - 110.0) / 20.0,
        sbp_high: (sbp.max(110.0) - 130.0) / 20.0,
        egfr_low: (egfr.min(60.0) - 60.0) / -15.0,
        egfr_high: (egfr.max(60.0) - 90.0) / -15.0,
        diabetes: if input.diabetes { 1.0 } else { 0.0 },
        smoking: if input.smoker { 1.0 } else { 0.0 },
        bp_treated: if input.bp_treated { 1.0 } else { 0.0 },
    };

    let sex_coefficients = coefficients.for_sex(input.sex);
    let statin = if input.statin { 1.0 } else { 0.0 };

    let mut result = PreventResult {
        risk_10yr_cvd: None,
        risk_10yr_ascvd: None,
        risk_10yr_hf: None,
        risk_30yr_cvd: None,
        risk_30yr_ascvd: None,
        risk_30yr_hf: None,
        notes: Vec::new(),
    };

    if let Some((tc, hdl)) = lipids {
        let non_hdl_centered = MG_DL_TO_MMOL_L * (tc - hdl) - 3.5;
        let hdl_centered = (MG_DL_TO_MMOL_L * hdl - 1.3) / 0.3;

        let lipid_risk = |coef: &LipidOutcomeCoefficients| {
            let p = &predictors;
            let mut log_odds = coef.intercept
                + coef.age * p.age_term
                + coef.non_hdl * non_hdl_centered
                + coef.hdl * hdl_centered
                + coef.sbp_low * p.sbp_low
                + coef.sbp_high * p.sbp_high
                + coef.diabetes * p.diabetes
                + coef.smoking * p.smoking
                + coef.egfr_low * p.egfr_low
                + coef.egfr_high * p.egfr_high
                + coef.bp_treated * p.bp_treated
                + coef.statin * statin
                + coef.bp_treated_x_sbp_high * p.bp_treated * p.sbp_high
                + coef.statin_x_non_hdl * statin * non_hdl_centered
                + coef.age_x_non_hdl * p.age_term * non_hdl_centered
                + coef.age_x_hdl * p.age_term * hdl_centered
                + coef.age_x_sbp_high * p.age_term * p.sbp_high
                + coef.age_x_diabetes * p.age_term * p.diabetes
                + coef.age_x_smoking * p.age_term * p.smoking
                + coef.age_x_egfr_low * p.age_term * p.egfr_low;
            if let Some(age_squared) = coef.age_squared {
                log_odds += age_squared * p.age_term * p.age_term;
            }
            logistic_percent(log_odds)
        };

        result.risk_10yr_cvd = Some(lipid_risk(&sex_coefficients.cvd_10yr));
        result.risk_10yr_ascvd = Some(lipid_risk(&sex_coefficients.ascvd_10yr));
        result.risk_30yr_cvd = Some(lipid_risk(&sex_coefficients.cvd_30yr));
        result.risk_30yr_ascvd = Some(lipid_risk(&sex_coefficients.ascvd_30yr));
    }

    if let Some(bmi) = bmi {
        let bmi_low = (bmi.min(30.0) - 25.0) / 5.0;
        let bmi_high = (bmi.max(30.0) - 30.0) / 5.0;

        let hf_risk = |coef: &HfOutcomeCoefficients| {
            let p = &predictors;
            let mut log_odds = coef.intercept
                + coef.age * p.age_term
                + coef.sbp_low * p.sbp_low
                + coef.sbp_high * p.sbp_high
                + coef.diabetes * p.diabetes
                + coef.smoking * p.smoking
                + coef.bmi_low * bmi_low
                + coef.bmi_high * bmi_high
                + coef.egfr_low * p.egfr_low
                + coef.egfr_high * p.egfr_high
                + coef.bp_treated * p.bp_treated
                + coef.bp_treated_x_sbp_high * p.bp_treated * p.sbp_high
                + coef.age_x_sbp_high * p.age_term * p.sbp_high
                + coef.age_x_diabetes * p.age_term * p.diabetes
                + coef.age_x_smoking * p.age_term * p.smoking
                + coef.age_x_bmi_high * p.age_term * bmi_high
                + coef.age_x_egfr_low * p.age_term * p.egfr_low;
            if let Some(age_squared) = coef.age_squared {
                log_odds += age_squared * p.age_term * p.age_term;
            }
            logistic_percent(log_odds)
        };

        result.risk_10yr_hf = Some(hf_risk(&sex_coefficients.hf_10yr));
        result.risk_30yr_hf = Some(hf_risk(&sex_coefficients.hf_30yr));
    }

    // 30-year horizon is not validated beyond age 59
    if input.age > PREVENT_MAX_AGE_30YR {
        result.risk_30yr_cvd = None;
        result.risk_30yr_ascvd = None;
        result.risk_30yr_hf = None;
        notes.push("30-year risks unavailable for age > 59".to_string());
    }

    result.notes = notes;
    Ok(result)
}

/// Log-odds to percent probability, rounded to three decimals
fn logistic_percent(log_odds: f64) -> f64 {
    let percent = 100.0 * log_odds.exp() / (1.0 + log_odds.exp());
    (percent * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_risk(actual: Option<f64>, expected: f64) {
        let actual = actual.unwrap();
        assert!(
            (actual - expected).abs() < 2e-3,
            "risk {} differs from published value {}",
            actual,
            expected
        );
    }

    fn input_45yo_female_diabetic() -> PreventInput {
        PreventInput {
            age: 45,
            sex: Sex::Female,
            systolic_bp: 120.0,
            diabetes: true,
            smoker: false,
            egfr: Some(95.0),
            bp_treated: false,
            total_cholesterol: Some(200.0),
            hdl_cholesterol: Some(60.0),
            statin: false,
            bmi: Some(25.0),
        }
    }

    #[test]
    fn test_reference_values_female() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let result = assess(&coefficients, &input_45yo_female_diabetic()).unwrap();

        assert_risk(result.risk_10yr_cvd, 3.379);
        assert_risk(result.risk_10yr_ascvd, 2.102);
        assert_risk(result.risk_10yr_hf, 1.698);
        assert_risk(result.risk_30yr_cvd, 20.65);
        assert_risk(result.risk_30yr_ascvd, 11.996);
        assert_risk(result.risk_30yr_hf, 12.794);
        assert!(result.notes.is_empty());
    }

    #[test]
    fn test_reference_values_male() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let input = PreventInput {
            age: 50,
            sex: Sex::Male,
            systolic_bp: 140.0,
            diabetes: false,
            smoker: true,
            egfr: Some(70.0),
            bp_treated: true,
            total_cholesterol: Some(220.0),
            hdl_cholesterol: Some(45.0),
            statin: true,
            bmi: Some(31.0),
        };
        let result = assess(&coefficients, &input).unwrap();

        assert_risk(result.risk_10yr_cvd, 9.274);
        assert_risk(result.risk_10yr_ascvd, 6.077);
        assert_risk(result.risk_10yr_hf, 3.638);
        assert_risk(result.risk_30yr_cvd, 40.806);
        assert_risk(result.risk_30yr_ascvd, 27.69);
        assert_risk(result.risk_30yr_hf, 22.208);
    }

    #[test]
    fn test_30_year_suppressed_above_59() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let input = PreventInput {
            age: 65,
            sex: Sex::Male,
            systolic_bp: 130.0,
            diabetes: false,
            smoker: false,
            egfr: Some(80.0),
            bp_treated: false,
            total_cholesterol: Some(200.0),
            hdl_cholesterol: Some(50.0),
            statin: false,
            bmi: Some(26.0),
        };
        let result = assess(&coefficients, &input).unwrap();

        assert_risk(result.risk_10yr_cvd, 9.61);
        assert_risk(result.risk_10yr_ascvd, 6.16);
        assert_risk(result.risk_10yr_hf, 4.556);
        assert_eq!(result.risk_30yr_cvd, None);
        assert_eq!(result.risk_30yr_ascvd, None);
        assert_eq!(result.risk_30yr_hf, None);
        assert!(result
            .notes
            .iter()
            .any(|note| note.contains("30-year risks unavailable")));

        // Same suppression for the other sex
        let mut input = input;
        input.sex = Sex::Female;
        let result = assess(&coefficients, &input).unwrap();
        assert!(result.risk_10yr_cvd.is_some());
        assert_eq!(result.risk_30yr_cvd, None);
        assert_eq!(result.risk_30yr_hf, None);
    }

    #[test]
    fn test_whole_call_validation() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let base = input_45yo_female_diabetic();

        let mut input = base;
        input.age = 29;
        assert!(matches!(
            assess(&coefficients, &input),
            Err(RiskError::AgeOutOfRange {
                model: "PREVENT",
                ..
            })
        ));

        let mut input = base;
        input.systolic_bp = 210.0;
        assert!(matches!(
            assess(&coefficients, &input),
            Err(RiskError::InputValidation(_))
        ));

        let mut input = base;
        input.egfr = None;
        assert!(assess(&coefficients, &input).is_err());

        let mut input = base;
        input.egfr = Some(0.0);
        assert!(assess(&coefficients, &input).is_err());
    }

    #[test]
    fn test_lipid_gate_independent_of_hf() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let mut input = input_45yo_female_diabetic();
        input.total_cholesterol = Some(350.0);

        let result = assess(&coefficients, &input).unwrap();
        assert_eq!(result.risk_10yr_cvd, None);
        assert_eq!(result.risk_10yr_ascvd, None);
        assert_eq!(result.risk_30yr_cvd, None);
        assert!(result.risk_10yr_hf.is_some());
        assert!(result.risk_30yr_hf.is_some());
        assert!(result
            .notes
            .iter()
            .any(|note| note.contains("CVD/ASCVD unavailable")));
    }

    #[test]
    fn test_bmi_gate_independent_of_lipids() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let mut input = input_45yo_female_diabetic();
        input.bmi = Some(45.0);

        let result = assess(&coefficients, &input).unwrap();
        assert!(result.risk_10yr_cvd.is_some());
        assert_eq!(result.risk_10yr_hf, None);
        assert_eq!(result.risk_30yr_hf, None);
        assert!(result
            .notes
            .iter()
            .any(|note| note.contains("heart failure risk unavailable")));
    }

    #[test]
    fn test_missing_lipids_still_yields_hf() {
        let coefficients = PreventCoefficientSet::khan_2024();
        let mut input = input_45yo_female_diabetic();
        input.total_cholesterol = None;
        input.hdl_cholesterol = None;

        let result = assess(&coefficients, &input).unwrap();
        assert_eq!(result.risk_10yr_cvd, None);
        assert!(result.risk_10yr_hf.is_some());
    }

    #[test]
    fn test_sbp_spline_knots() {
        // Below 110 only the low spline moves; above only the high spline
        let coefficients = PreventCoefficientSet::khan_2024();
        let mut low = input_45yo_female_diabetic();
        low.systolic_bp = 100.0;
        let mut high = low;
        high.systolic_bp = 160.0;

        let low_result = assess(&coefficients, &low).unwrap();
        let high_result = assess(&coefficients, &high).unwrap();
        let low_cvd = low_result.risk_10yr_cvd.unwrap();
        let high_cvd = high_result.risk_10yr_cvd.unwrap();
        assert!(high_cvd > low_cvd);
    }
}
