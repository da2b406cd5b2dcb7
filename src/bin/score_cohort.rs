//! Score an entire cohort from a CSV file
//!
//! Runs the full assessment for every row in parallel and writes a flat
//! results CSV plus summary statistics to stdout.

use clap::Parser;
use mortality_engine::engine::RiskAssessment;
use mortality_engine::person::{load_cohort, CohortMember};
use mortality_engine::{Horizon, ReferenceData, RiskEngine};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// Batch cohort scorer
#[derive(Debug, Parser)]
#[command(name = "score_cohort", version)]
struct Args {
    /// Input cohort CSV
    input: String,

    /// Output results CSV
    #[arg(long, default_value = "cohort_scores.csv")]
    output: String,

    /// Time horizon: 6_month, 1_year, or 5_year
    #[arg(long, default_value = "1_year")]
    horizon: String,

    /// Directory with life_table.csv (and optionally cause_of_death.csv);
    /// bundled tables are used when absent
    #[arg(long)]
    tables: Option<String>,
}

struct ScoredMember {
    person_id: u32,
    result: Result<RiskAssessment, String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let horizon: Horizon = args.horizon.parse()?;

    let start = Instant::now();
    println!("Loading cohort from {}...", args.input);
    let cohort = load_cohort(&args.input).map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("Loaded {} members in {:?}", cohort.len(), start.elapsed());

    let data = match &args.tables {
        Some(dir) => ReferenceData::from_csv_path(std::path::Path::new(dir))
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        None => ReferenceData::bundled(),
    };
    let engine = RiskEngine::new(data);

    println!("Scoring...");
    let score_start = Instant::now();
    let scored: Vec<ScoredMember> = cohort
        .par_iter()
        .map(|member: &CohortMember| ScoredMember {
            person_id: member.person_id,
            result: engine
                .assess(&member.demographic, &member.risk_factors, horizon)
                .map_err(|e| e.to_string()),
        })
        .collect();
    println!("Scored {} members in {:?}", scored.len(), score_start.elapsed());

    let mut file = File::create(&args.output)?;
    writeln!(
        file,
        "PersonID,Age,Sex,BaselineRisk,AdjustedRisk,RiskLevel,TopCause,PCE10yr,Prevent10yrCVD,LifeExpectancy,Errors"
    )?;

    let mut failed = 0usize;
    let mut level_counts = [0usize; 4];
    let mut total_adjusted = 0.0;
    let mut assessed = 0usize;

    for (member, scored) in cohort.iter().zip(&scored) {
        match &scored.result {
            Ok(assessment) => {
                let (baseline, adjusted, level, top_cause) = match &assessment.mortality {
                    Some(m) => {
                        let idx = match m.risk_level {
                            mortality_engine::RiskLevel::Low => 0,
                            mortality_engine::RiskLevel::Moderate => 1,
                            mortality_engine::RiskLevel::High => 2,
                            mortality_engine::RiskLevel::VeryHigh => 3,
                        };
                        level_counts[idx] += 1;
                        total_adjusted += m.adjusted_total_risk;
                        assessed += 1;
                        (
                            format!("{:.8}", m.baseline_risk),
                            format!("{:.8}", m.adjusted_total_risk),
                            m.risk_level.as_str().to_string(),
                            m.top_causes
                                .first()
                                .map(|c| c.cause.as_str())
                                .unwrap_or("")
                                .to_string(),
                        )
                    }
                    None => (String::new(), String::new(), String::new(), String::new()),
                };

                let pce = assessment
                    .pce
                    .as_ref()
                    .map(|p| format!("{:.6}", p.risk_10_year))
                    .unwrap_or_default();
                let prevent = assessment
                    .prevent
                    .as_ref()
                    .and_then(|p| p.risk_10yr_cvd)
                    .map(|r| format!("{:.3}", r))
                    .unwrap_or_default();
                let life_expectancy = assessment
                    .life_expectancy
                    .as_ref()
                    .map(|le| format!("{:.2}", le.years))
                    .unwrap_or_default();

                writeln!(
                    file,
                    "{},{},{:?},{},{},{},{},{},{},{},{}",
                    scored.person_id,
                    member.demographic.age,
                    member.demographic.sex,
                    baseline,
                    adjusted,
                    level,
                    top_cause,
                    pce,
                    prevent,
                    life_expectancy,
                    assessment.errors.join("; ")
                )?;
            }
            Err(message) => {
                failed += 1;
                writeln!(
                    file,
                    "{},{},{:?},,,,,,,,{}",
                    scored.person_id, member.demographic.age, member.demographic.sex, message
                )?;
            }
        }
    }

    println!("\nResults written to: {}", args.output);
    println!("\nSummary:");
    println!("  Scored:   {}", scored.len() - failed);
    println!("  Rejected: {}", failed);
    if assessed > 0 {
        println!(
            "  Mean adjusted {} risk: {:.4}%",
            horizon,
            total_adjusted / assessed as f64 * 100.0
        );
        for (label, count) in ["Low", "Moderate", "High", "Very High"]
            .iter()
            .zip(level_counts)
        {
            println!("  {:<10} {}", label, count);
        }
    }

    Ok(())
}
