//! Demographic and risk-factor input structures
//!
//! Every field of `RiskFactorSet` is optional. Absent fields take
//! model-specific defaults (e.g. SBP 120, total cholesterol 200 for PCE) or
//! disqualify a sub-model (e.g. missing eGFR invalidates PREVENT).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Biological sex for life-table and coefficient lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// Race category for PCE coefficient-group selection
///
/// The published equations carry coefficients for white and black cohorts
/// only; `Other` maps to the white coefficient group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    White,
    Black,
    Other,
}

/// Smoking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

/// Physical activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Sedentary,
    Moderate,
    High,
}

/// Alcohol consumption pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholPattern {
    None,
    Moderate,
    Heavy,
    Binge,
}

/// Primary transportation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Car,
    Motorcycle,
    PublicTransit,
    Bicycle,
    Walking,
}

/// Occupational risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupationRisk {
    Low,
    Moderate,
    High,
}

/// Time horizon for mortality probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    /// 6-month probability: 1 - (1 - qx)^0.5
    #[serde(rename = "6_month")]
    SixMonth,
    /// 1-year probability: qx as tabulated
    #[serde(rename = "1_year")]
    OneYear,
    /// 5-year probability: 1 - (1 - qx)^5
    #[serde(rename = "5_year")]
    FiveYear,
}

impl Horizon {
    /// Wire-format name, matching the request layer's horizon strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::SixMonth => "6_month",
            Horizon::OneYear => "1_year",
            Horizon::FiveYear => "5_year",
        }
    }
}

impl FromStr for Horizon {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6_month" => Ok(Horizon::SixMonth),
            "1_year" => Ok(Horizon::OneYear),
            "5_year" => Ok(Horizon::FiveYear),
            other => Err(RiskError::InvalidHorizon(other.to_string())),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable per-request demographic record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demographic {
    /// Age in completed years
    pub age: u8,

    /// Biological sex
    pub sex: Sex,

    /// Race category (defaults to Other, which maps to white coefficients)
    #[serde(default = "default_race")]
    pub race: Race,
}

fn default_race() -> Race {
    Race::Other
}

impl Demographic {
    pub fn new(age: u8, sex: Sex, race: Race) -> Self {
        Self { age, sex, race }
    }

    /// Reject ages no model or table can serve
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.age > 120 {
            return Err(RiskError::InputValidation(format!(
                "age must be 0-120, got {}",
                self.age
            )));
        }
        Ok(())
    }
}

/// Optional lifestyle and clinical risk factors
///
/// Fields with no published relative-risk coefficient (`transport_mode`,
/// `occupation_risk`, `firearm_in_home`) are accepted and carried through for
/// the request layer but drive no multiplier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFactorSet {
    #[serde(default)]
    pub smoking_status: Option<SmokingStatus>,

    /// Years since quitting, for former smokers
    #[serde(default)]
    pub years_since_quit: Option<f64>,

    /// Systolic blood pressure in mmHg
    #[serde(default)]
    pub systolic_bp: Option<f64>,

    /// Whether blood pressure is treated with medication
    #[serde(default)]
    pub bp_treated: Option<bool>,

    /// Body mass index in kg/m^2
    #[serde(default)]
    pub bmi: Option<f64>,

    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,

    #[serde(default)]
    pub alcohol_pattern: Option<AlcoholPattern>,

    /// Diagnosed diabetes (type 1 or 2)
    #[serde(default)]
    pub diabetes: Option<bool>,

    /// Total cholesterol in mg/dL
    #[serde(default)]
    pub total_cholesterol: Option<f64>,

    /// HDL cholesterol in mg/dL
    #[serde(default)]
    pub hdl_cholesterol: Option<f64>,

    /// Estimated glomerular filtration rate in mL/min/1.73m^2
    #[serde(default)]
    pub egfr: Option<f64>,

    /// On statin therapy
    #[serde(default)]
    pub statin: Option<bool>,

    #[serde(default)]
    pub transport_mode: Option<TransportMode>,

    #[serde(default)]
    pub occupation_risk: Option<OccupationRisk>,

    #[serde(default)]
    pub firearm_in_home: Option<bool>,
}

impl RiskFactorSet {
    /// Validate ranges for the fields that carry them
    pub fn validate(&self) -> Result<(), RiskError> {
        if let Some(sbp) = self.systolic_bp {
            if !(80.0..=250.0).contains(&sbp) {
                return Err(RiskError::InputValidation(format!(
                    "systolic_bp must be 80-250 mmHg, got {sbp}"
                )));
            }
        }
        if let Some(bmi) = self.bmi {
            if !(15.0..=60.0).contains(&bmi) {
                return Err(RiskError::InputValidation(format!(
                    "bmi must be 15-60 kg/m^2, got {bmi}"
                )));
            }
        }
        if let Some(tc) = self.total_cholesterol {
            if !(100.0..=500.0).contains(&tc) {
                return Err(RiskError::InputValidation(format!(
                    "total_cholesterol must be 100-500 mg/dL, got {tc}"
                )));
            }
        }
        if let Some(hdl) = self.hdl_cholesterol {
            if !(20.0..=150.0).contains(&hdl) {
                return Err(RiskError::InputValidation(format!(
                    "hdl_cholesterol must be 20-150 mg/dL, got {hdl}"
                )));
            }
        }
        if let Some(years) = self.years_since_quit {
            if years < 0.0 {
                return Err(RiskError::InputValidation(format!(
                    "years_since_quit must be non-negative, got {years}"
                )));
            }
        }
        Ok(())
    }

    /// Current smoker flag, as PREVENT defines smoking
    pub fn is_current_smoker(&self) -> bool {
        matches!(self.smoking_status, Some(SmokingStatus::Current))
    }

    /// Ever-smoker flag, as PCE defines smoking: anything but never counts
    pub fn is_ever_smoker(&self) -> bool {
        matches!(
            self.smoking_status,
            Some(SmokingStatus::Current) | Some(SmokingStatus::Former)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_parsing() {
        assert_eq!("6_month".parse::<Horizon>().unwrap(), Horizon::SixMonth);
        assert_eq!("1_year".parse::<Horizon>().unwrap(), Horizon::OneYear);
        assert_eq!("5_year".parse::<Horizon>().unwrap(), Horizon::FiveYear);

        let err = "2_year".parse::<Horizon>().unwrap_err();
        assert_eq!(err, RiskError::InvalidHorizon("2_year".to_string()));
    }

    #[test]
    fn test_demographic_validation() {
        assert!(Demographic::new(55, Sex::Male, Race::White).validate().is_ok());
        assert!(Demographic::new(121, Sex::Male, Race::White).validate().is_err());
    }

    #[test]
    fn test_risk_factor_ranges() {
        let mut factors = RiskFactorSet::default();
        assert!(factors.validate().is_ok());

        factors.systolic_bp = Some(300.0);
        assert!(factors.validate().is_err());

        factors.systolic_bp = Some(140.0);
        factors.bmi = Some(10.0);
        assert!(factors.validate().is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = r#"{
            "smoking_status": "former",
            "years_since_quit": 5,
            "systolic_bp": 135,
            "bp_treated": true
        }"#;
        let factors: RiskFactorSet = serde_json::from_str(json).unwrap();
        assert_eq!(factors.smoking_status, Some(SmokingStatus::Former));
        assert_eq!(factors.years_since_quit, Some(5.0));
        assert_eq!(factors.bmi, None);
    }
}
