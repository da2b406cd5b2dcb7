//! Mortality Engine CLI
//!
//! Assess one person from command-line arguments and print the full report

use clap::{Parser, ValueEnum};
use mortality_engine::engine::{model_interventions, InterventionPlan};
use mortality_engine::person::{
    AlcoholPattern, FitnessLevel, Race, RiskFactorSet, SmokingStatus,
};
use mortality_engine::{Demographic, Horizon, ReferenceData, RiskEngine, Sex};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SexArg {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RaceArg {
    White,
    Black,
    Other,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SmokingArg {
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FitnessArg {
    Sedentary,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlcoholArg {
    None,
    Moderate,
    Heavy,
    Binge,
}

/// Evidence-based mortality and cardiovascular risk assessment
#[derive(Debug, Parser)]
#[command(name = "mortality_engine", version)]
struct Args {
    /// Age in completed years
    #[arg(long)]
    age: u8,

    #[arg(long, value_enum)]
    sex: SexArg,

    #[arg(long, value_enum, default_value = "other")]
    race: RaceArg,

    /// Time horizon: 6_month, 1_year, or 5_year
    #[arg(long, default_value = "1_year")]
    horizon: String,

    #[arg(long, value_enum)]
    smoking: Option<SmokingArg>,

    /// Years since quitting, for former smokers
    #[arg(long)]
    years_since_quit: Option<f64>,

    /// Systolic blood pressure in mmHg
    #[arg(long)]
    sbp: Option<f64>,

    /// On blood pressure medication
    #[arg(long)]
    bp_treated: bool,

    #[arg(long)]
    bmi: Option<f64>,

    #[arg(long, value_enum)]
    fitness: Option<FitnessArg>,

    #[arg(long, value_enum)]
    alcohol: Option<AlcoholArg>,

    /// Diagnosed diabetes
    #[arg(long)]
    diabetes: bool,

    /// Total cholesterol in mg/dL
    #[arg(long)]
    total_cholesterol: Option<f64>,

    /// HDL cholesterol in mg/dL
    #[arg(long)]
    hdl: Option<f64>,

    /// Estimated GFR in mL/min/1.73m^2
    #[arg(long)]
    egfr: Option<f64>,

    /// On statin therapy
    #[arg(long)]
    statin: bool,

    /// Also model quitting smoking
    #[arg(long)]
    model_quit_smoking: bool,

    /// Also model reducing SBP by this many mmHg
    #[arg(long)]
    model_reduce_bp: Option<f64>,

    /// Emit the assessment as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

impl Args {
    fn demographic(&self) -> Demographic {
        let sex = match self.sex {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        };
        let race = match self.race {
            RaceArg::White => Race::White,
            RaceArg::Black => Race::Black,
            RaceArg::Other => Race::Other,
        };
        Demographic::new(self.age, sex, race)
    }

    fn risk_factors(&self) -> RiskFactorSet {
        RiskFactorSet {
            smoking_status: self.smoking.map(|s| match s {
                SmokingArg::Never => SmokingStatus::Never,
                SmokingArg::Former => SmokingStatus::Former,
                SmokingArg::Current => SmokingStatus::Current,
            }),
            years_since_quit: self.years_since_quit,
            systolic_bp: self.sbp,
            bp_treated: self.bp_treated.then_some(true),
            bmi: self.bmi,
            fitness_level: self.fitness.map(|f| match f {
                FitnessArg::Sedentary => FitnessLevel::Sedentary,
                FitnessArg::Moderate => FitnessLevel::Moderate,
                FitnessArg::High => FitnessLevel::High,
            }),
            alcohol_pattern: self.alcohol.map(|a| match a {
                AlcoholArg::None => AlcoholPattern::None,
                AlcoholArg::Moderate => AlcoholPattern::Moderate,
                AlcoholArg::Heavy => AlcoholPattern::Heavy,
                AlcoholArg::Binge => AlcoholPattern::Binge,
            }),
            diabetes: self.diabetes.then_some(true),
            total_cholesterol: self.total_cholesterol,
            hdl_cholesterol: self.hdl,
            egfr: self.egfr,
            statin: self.statin.then_some(true),
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let horizon: Horizon = args.horizon.parse()?;
    let demographic = args.demographic();
    let factors = args.risk_factors();

    let engine = RiskEngine::new(ReferenceData::bundled());
    let assessment = engine.assess(&demographic, &factors, horizon)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("Mortality Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("=====================\n");
    println!(
        "Subject: age {}, {:?}, horizon {}",
        demographic.age, demographic.sex, horizon
    );
    println!();

    if let Some(mortality) = &assessment.mortality {
        println!("All-cause mortality ({}):", horizon);
        println!("  Baseline risk:  {:.4}%", mortality.baseline_risk * 100.0);
        println!(
            "  Adjusted risk:  {:.4}%  [{}]",
            mortality.adjusted_total_risk * 100.0,
            mortality.risk_level.as_str()
        );
        println!("  Top causes:");
        for contribution in &mortality.top_causes {
            println!(
                "    {:<14} {:.4}%  ({:.1}% of total)",
                contribution.cause.as_str(),
                contribution.risk * 100.0,
                contribution.percentage
            );
        }
        println!();
    }

    if let Some(pce) = &assessment.pce {
        println!("PCE 10-year ASCVD risk: {:.1}%", pce.risk_10_year * 100.0);
    }
    if let Some(prevent) = &assessment.prevent {
        println!("PREVENT risks:");
        let outcomes = [
            ("10-year CVD", prevent.risk_10yr_cvd),
            ("10-year ASCVD", prevent.risk_10yr_ascvd),
            ("10-year HF", prevent.risk_10yr_hf),
            ("30-year CVD", prevent.risk_30yr_cvd),
            ("30-year ASCVD", prevent.risk_30yr_ascvd),
            ("30-year HF", prevent.risk_30yr_hf),
        ];
        for (label, risk) in outcomes {
            match risk {
                Some(risk) => println!("  {:<14} {:.3}%", label, risk),
                None => println!("  {:<14} n/a", label),
            }
        }
        for note in &prevent.notes {
            println!("  note: {}", note);
        }
    }

    if let Some(life_expectancy) = &assessment.life_expectancy {
        println!(
            "\nLife expectancy: {:.1} years (baseline {:.1}, multiplier {:.2}{})",
            life_expectancy.years,
            life_expectancy.baseline_years,
            life_expectancy.risk_multiplier,
            if life_expectancy.degraded {
                ", degraded"
            } else {
                ""
            }
        );
    }

    for error in &assessment.errors {
        println!("\nunavailable: {}", error);
    }

    // Optional counterfactuals against the adjusted risk
    let plan = InterventionPlan {
        quit_smoking: args.model_quit_smoking,
        reduce_bp_mmhg: args.model_reduce_bp,
        ..Default::default()
    };
    if plan != InterventionPlan::default() {
        if let Some(mortality) = &assessment.mortality {
            let outcome = model_interventions(
                mortality.adjusted_total_risk,
                &plan,
                &engine.reference_data().relative_risks,
            );
            println!("\nInterventions:");
            for effect in &outcome.effects {
                println!(
                    "  {:<16} x{:.3}  (-{:.4}%)  [{}]",
                    effect.name,
                    effect.relative_effect,
                    effect.risk_reduction * 100.0,
                    effect.source
                );
            }
            println!(
                "  combined: risk {:.4}% -> {:.4}%",
                mortality.adjusted_total_risk * 100.0,
                outcome.new_risk * 100.0
            );
        }
    }

    Ok(())
}
