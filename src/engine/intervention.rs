//! Counterfactual intervention modeling
//!
//! Each intervention applies a multiplicative effect to the current adjusted
//! risk; the combined effect assumes independence and is the product of the
//! individual effects.

use serde::{Deserialize, Serialize};

use crate::person::{AlcoholPattern, FitnessLevel};
use crate::tables::RelativeRiskTable;

/// Requested interventions; unset entries are not modeled
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InterventionPlan {
    /// Quit smoking (only meaningful for current smokers)
    #[serde(default)]
    pub quit_smoking: bool,

    /// Reduce systolic blood pressure by this many mmHg
    #[serde(default)]
    pub reduce_bp_mmhg: Option<f64>,

    /// Improve fitness to this target level
    #[serde(default)]
    pub improve_fitness_to: Option<FitnessLevel>,

    /// Lose this many BMI units
    #[serde(default)]
    pub lose_bmi_units: Option<f64>,

    /// Reduce alcohol consumption to this target pattern
    #[serde(default)]
    pub reduce_alcohol_to: Option<AlcoholPattern>,
}

/// Modeled effect of one intervention
///
/// Serialize-only: the name and citation are static strings and outcomes are
/// never read back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionEffect {
    pub name: &'static str,

    /// False when the requested value cannot be modeled (e.g. a zero BP
    /// reduction or a sedentary fitness target); the effect is then neutral
    pub applicable: bool,

    /// Multiplicative effect on risk; < 1.0 is a benefit
    pub relative_effect: f64,

    /// Absolute risk removed by this intervention alone
    pub risk_reduction: f64,

    pub source: &'static str,
}

/// Combined outcome of an intervention plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterventionOutcome {
    pub effects: Vec<InterventionEffect>,

    /// Risk after applying every applicable effect
    pub new_risk: f64,

    pub absolute_reduction: f64,

    /// Product of the applicable relative effects
    pub combined_relative_effect: f64,
}

/// Model an intervention plan against a current adjusted risk
pub fn model_interventions(
    current_risk: f64,
    plan: &InterventionPlan,
    risks: &RelativeRiskTable,
) -> InterventionOutcome {
    let mut effects = Vec::new();
    let effect = |name, applicable, relative_effect: f64, source| InterventionEffect {
        name,
        applicable,
        relative_effect: if applicable { relative_effect } else { 1.0 },
        risk_reduction: if applicable {
            current_risk * (1.0 - relative_effect)
        } else {
            0.0
        },
        source,
    };

    if plan.quit_smoking {
        effects.push(effect(
            "quit_smoking",
            true,
            risks.interventions.quit_smoking.value,
            risks.interventions.quit_smoking.source,
        ));
    }

    if let Some(mmhg) = plan.reduce_bp_mmhg {
        let per_10 = risks.interventions.reduce_bp_10mmhg.value;
        effects.push(effect(
            "reduce_bp",
            mmhg > 0.0,
            per_10.powf(mmhg / 10.0),
            risks.interventions.reduce_bp_10mmhg.source,
        ));
    }

    if let Some(target) = plan.improve_fitness_to {
        // Sedentary-to-moderate inverts the sedentary RR; reaching high
        // activity uses the published improvement effect
        let (applicable, relative_effect) = match target {
            FitnessLevel::Moderate => (true, 1.0 / risks.fitness.sedentary_vs_active.value),
            FitnessLevel::High => (true, risks.interventions.improve_fitness.value),
            FitnessLevel::Sedentary => (false, 1.0),
        };
        effects.push(effect(
            "improve_fitness",
            applicable,
            relative_effect,
            risks.interventions.improve_fitness.source,
        ));
    }

    if let Some(units) = plan.lose_bmi_units {
        let per_5 = risks.interventions.lose_weight_5bmi.value;
        effects.push(effect(
            "lose_weight",
            units > 0.0,
            per_5.powf(units / 5.0),
            risks.interventions.lose_weight_5bmi.source,
        ));
    }

    if let Some(target) = plan.reduce_alcohol_to {
        // Heavy-to-moderate removes the heavy excess down to the moderate RR;
        // stopping moderate drinking carries no additional benefit
        let (applicable, relative_effect) = match target {
            AlcoholPattern::Moderate => (true, risks.alcohol.moderate_vs_none.value),
            AlcoholPattern::None => (true, 1.0),
            AlcoholPattern::Heavy | AlcoholPattern::Binge => (false, 1.0),
        };
        effects.push(effect(
            "reduce_alcohol",
            applicable,
            relative_effect,
            risks.alcohol.moderate_vs_none.source,
        ));
    }

    let combined_relative_effect: f64 = effects
        .iter()
        .filter(|e| e.applicable)
        .map(|e| e.relative_effect)
        .product();

    let new_risk = current_risk * combined_relative_effect;

    InterventionOutcome {
        effects,
        new_risk,
        absolute_reduction: current_risk - new_risk,
        combined_relative_effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risks() -> RelativeRiskTable {
        RelativeRiskTable::default()
    }

    #[test]
    fn test_single_interventions() {
        let plan = InterventionPlan {
            quit_smoking: true,
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &plan, &risks());
        assert!((outcome.new_risk - 0.08).abs() < 1e-12);
        assert!((outcome.absolute_reduction - 0.02).abs() < 1e-12);

        let plan = InterventionPlan {
            reduce_bp_mmhg: Some(20.0),
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &plan, &risks());
        assert!((outcome.combined_relative_effect - 0.85_f64.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_combined_effect_is_product() {
        let plan = InterventionPlan {
            quit_smoking: true,
            reduce_bp_mmhg: Some(10.0),
            improve_fitness_to: Some(FitnessLevel::High),
            lose_bmi_units: Some(5.0),
            ..Default::default()
        };
        let outcome = model_interventions(0.20, &plan, &risks());

        let expected = 0.8 * 0.85 * 0.9 * 0.9;
        assert!((outcome.combined_relative_effect - expected).abs() < 1e-12);
        assert!((outcome.new_risk - 0.20 * expected).abs() < 1e-12);

        // Combined is never the sum of individual reductions
        let summed: f64 = outcome.effects.iter().map(|e| e.risk_reduction).sum();
        assert!(outcome.absolute_reduction < summed);
    }

    #[test]
    fn test_inapplicable_entries_are_neutral() {
        let plan = InterventionPlan {
            reduce_bp_mmhg: Some(0.0),
            improve_fitness_to: Some(FitnessLevel::Sedentary),
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &plan, &risks());

        assert_eq!(outcome.effects.len(), 2);
        assert!(outcome.effects.iter().all(|e| !e.applicable));
        assert!((outcome.new_risk - 0.10).abs() < 1e-12);
        assert!((outcome.combined_relative_effect - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_alcohol_reduction_targets() {
        let to_moderate = InterventionPlan {
            reduce_alcohol_to: Some(AlcoholPattern::Moderate),
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &to_moderate, &risks());
        // Moderate-vs-none RR is 1.0, so the modeled benefit is neutral
        assert!((outcome.new_risk - 0.10).abs() < 1e-12);
        assert!(outcome.effects[0].applicable);

        let to_heavy = InterventionPlan {
            reduce_alcohol_to: Some(AlcoholPattern::Heavy),
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &to_heavy, &risks());
        assert!(!outcome.effects[0].applicable);
    }

    #[test]
    fn test_outcome_serializes_for_output() {
        let plan = InterventionPlan {
            quit_smoking: true,
            ..Default::default()
        };
        let outcome = model_interventions(0.10, &plan, &risks());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["effects"][0]["name"], "quit_smoking");
        assert!(json["effects"][0]["source"]
            .as_str()
            .unwrap()
            .contains("Doll"));
    }

    #[test]
    fn test_empty_plan() {
        let outcome = model_interventions(0.10, &InterventionPlan::default(), &risks());
        assert!(outcome.effects.is_empty());
        assert!((outcome.new_risk - 0.10).abs() < 1e-12);
    }
}
