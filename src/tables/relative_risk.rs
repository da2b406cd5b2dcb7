//! Relative-risk coefficients from published meta-analyses
//!
//! Each estimate carries its source citation and confidence interval. The
//! metadata is passed through to output for the request layer; only `value`
//! enters any computation.

use serde::Serialize;

/// A single published relative-risk estimate
///
/// Serialize-only: the citation fields are static strings and these structs
/// are never read back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEstimate {
    pub value: f64,
    pub source: &'static str,
    pub confidence_interval: &'static str,
}

impl RiskEstimate {
    const fn new(value: f64, source: &'static str, ci: &'static str) -> Self {
        Self {
            value,
            source,
            confidence_interval: ci,
        }
    }
}

/// Smoking relative risks on all-cause mortality
#[derive(Debug, Clone, Serialize)]
pub struct SmokingRisks {
    /// Current smoker vs never smoker
    pub current_vs_never: RiskEstimate,
    /// Former smoker vs never smoker (maximum, immediately after quitting)
    pub former_vs_never: RiskEstimate,
    /// Years after quitting until never-smoker risk levels
    pub years_to_never_equivalent: RiskEstimate,
}

/// Systolic blood pressure relative risks
#[derive(Debug, Clone, Serialize)]
pub struct BloodPressureRisks {
    /// Per 20 mmHg increase above 120
    pub per_20mmhg_sbp: RiskEstimate,
    /// Multiplicative reduction from antihypertensive treatment
    pub treatment_reduction: RiskEstimate,
}

/// BMI relative risks, symmetric around an optimal BMI of 22
#[derive(Debug, Clone, Serialize)]
pub struct BmiRisks {
    /// Per 5-unit deviation from optimal
    pub per_5_units: RiskEstimate,
}

/// Cardiorespiratory fitness relative risks
#[derive(Debug, Clone, Serialize)]
pub struct FitnessRisks {
    /// Sedentary vs active lifestyle
    pub sedentary_vs_active: RiskEstimate,
}

/// Alcohol pattern relative risks
#[derive(Debug, Clone, Serialize)]
pub struct AlcoholRisks {
    pub moderate_vs_none: RiskEstimate,
    pub heavy_vs_none: RiskEstimate,
    pub binge_vs_none: RiskEstimate,
}

/// Effect sizes for lifestyle interventions (multiplicative, < 1.0 = benefit)
#[derive(Debug, Clone, Serialize)]
pub struct InterventionEffects {
    /// Immediate reduction upon quitting smoking
    pub quit_smoking: RiskEstimate,
    /// Per 10 mmHg SBP reduction
    pub reduce_bp_10mmhg: RiskEstimate,
    /// Fitness improvement to high activity
    pub improve_fitness: RiskEstimate,
    /// Per 5 BMI units lost
    pub lose_weight_5bmi: RiskEstimate,
}

/// All relative-risk coefficient sets used by the adjustment model
#[derive(Debug, Clone, Serialize)]
pub struct RelativeRiskTable {
    pub smoking: SmokingRisks,
    pub blood_pressure: BloodPressureRisks,
    pub bmi: BmiRisks,
    pub fitness: FitnessRisks,
    pub alcohol: AlcoholRisks,
    pub interventions: InterventionEffects,
}

impl Default for RelativeRiskTable {
    fn default() -> Self {
        Self {
            smoking: SmokingRisks {
                current_vs_never: RiskEstimate::new(
                    2.3,
                    "Jha et al. 2013, NEJM (216,917 U.S. adults)",
                    "2.1-2.5",
                ),
                former_vs_never: RiskEstimate::new(
                    1.2,
                    "Doll & Peto 2005, BMJ (34,439 British doctors)",
                    "1.1-1.3",
                ),
                years_to_never_equivalent: RiskEstimate::new(
                    15.0,
                    "Jha et al. 2013, NEJM",
                    "12-18",
                ),
            },
            blood_pressure: BloodPressureRisks {
                per_20mmhg_sbp: RiskEstimate::new(
                    1.8,
                    "Lewington et al. 2002, Lancet (1M adults, 61 cohorts)",
                    "1.7-1.9",
                ),
                treatment_reduction: RiskEstimate::new(
                    0.7,
                    "BP Lowering Treatment Trialists' Collaboration 2016, Lancet",
                    "0.65-0.75",
                ),
            },
            bmi: BmiRisks {
                per_5_units: RiskEstimate::new(
                    1.15,
                    "Global BMI Mortality Collaboration 2016, Lancet (10.6M adults)",
                    "1.13-1.17",
                ),
            },
            fitness: FitnessRisks {
                sedentary_vs_active: RiskEstimate::new(
                    1.4,
                    "Warburton et al. 2006, CMAJ",
                    "1.3-1.5",
                ),
            },
            alcohol: AlcoholRisks {
                moderate_vs_none: RiskEstimate::new(
                    1.0,
                    "GBD 2016 Alcohol Collaborators 2018, Lancet",
                    "0.95-1.05",
                ),
                heavy_vs_none: RiskEstimate::new(
                    1.3,
                    "Di Castelnuovo et al. 2006, Arch Intern Med",
                    "1.2-1.4",
                ),
                binge_vs_none: RiskEstimate::new(
                    1.2,
                    "Roerecke & Rehm 2010, Am J Epidemiol",
                    "1.1-1.3",
                ),
            },
            interventions: InterventionEffects {
                quit_smoking: RiskEstimate::new(
                    0.8,
                    "Doll & Peto 2005, BMJ",
                    "0.75-0.85",
                ),
                reduce_bp_10mmhg: RiskEstimate::new(
                    0.85,
                    "BP Lowering Treatment Trialists' Collaboration 2016, Lancet",
                    "0.80-0.90",
                ),
                improve_fitness: RiskEstimate::new(
                    0.9,
                    "Kodama et al. 2009, JAMA",
                    "0.85-0.95",
                ),
                lose_weight_5bmi: RiskEstimate::new(
                    0.9,
                    "Global BMI Mortality Collaboration 2016, Lancet",
                    "0.85-0.95",
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let table = RelativeRiskTable::default();
        assert!((table.smoking.current_vs_never.value - 2.3).abs() < 1e-12);
        assert!((table.blood_pressure.per_20mmhg_sbp.value - 1.8).abs() < 1e-12);
        assert!((table.bmi.per_5_units.value - 1.15).abs() < 1e-12);
        assert!((table.fitness.sedentary_vs_active.value - 1.4).abs() < 1e-12);
        assert!((table.interventions.quit_smoking.value - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_metadata_carried() {
        let table = RelativeRiskTable::default();
        assert!(table.smoking.current_vs_never.source.contains("Jha"));
        assert_eq!(table.smoking.current_vs_never.confidence_interval, "2.1-2.5");
    }

    #[test]
    fn test_serializes_for_output() {
        let table = RelativeRiskTable::default();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["smoking"]["current_vs_never"]["value"], 2.3);
        assert!(json["blood_pressure"]["treatment_reduction"]["source"]
            .as_str()
            .unwrap()
            .contains("Lancet"));
    }
}
