//! Load cohort member records from CSV
//!
//! Column format mirrors the request layer's flat field names; empty cells
//! mean "not provided" and leave the corresponding risk factor unset.

use super::{
    AlcoholPattern, Demographic, FitnessLevel, Race, RiskFactorSet, Sex, SmokingStatus,
};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// One person to score: demographics plus whatever risk factors are known
#[derive(Debug, Clone)]
pub struct CohortMember {
    pub person_id: u32,
    pub demographic: Demographic,
    pub risk_factors: RiskFactorSet,
}

/// Raw CSV row; optional columns deserialize as None when empty
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PersonID")]
    person_id: u32,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Race", default)]
    race: Option<String>,
    #[serde(rename = "SmokingStatus", default)]
    smoking_status: Option<String>,
    #[serde(rename = "YearsSinceQuit", default)]
    years_since_quit: Option<f64>,
    #[serde(rename = "SystolicBP", default)]
    systolic_bp: Option<f64>,
    #[serde(rename = "BPTreated", default)]
    bp_treated: Option<bool>,
    #[serde(rename = "BMI", default)]
    bmi: Option<f64>,
    #[serde(rename = "FitnessLevel", default)]
    fitness_level: Option<String>,
    #[serde(rename = "AlcoholPattern", default)]
    alcohol_pattern: Option<String>,
    #[serde(rename = "Diabetes", default)]
    diabetes: Option<bool>,
    #[serde(rename = "TotalCholesterol", default)]
    total_cholesterol: Option<f64>,
    #[serde(rename = "HDLCholesterol", default)]
    hdl_cholesterol: Option<f64>,
    #[serde(rename = "eGFR", default)]
    egfr: Option<f64>,
    #[serde(rename = "Statin", default)]
    statin: Option<bool>,
}

impl CsvRow {
    fn to_member(self) -> Result<CohortMember, Box<dyn Error>> {
        let sex = match self.sex.as_str() {
            "male" | "Male" => Sex::Male,
            "female" | "Female" => Sex::Female,
            other => return Err(format!("Unknown Sex: {}", other).into()),
        };

        let race = match self.race.as_deref() {
            None | Some("") => Race::Other,
            Some("white") | Some("White") => Race::White,
            Some("black") | Some("Black") => Race::Black,
            Some("other") | Some("Other") => Race::Other,
            Some(other) => return Err(format!("Unknown Race: {}", other).into()),
        };

        let smoking_status = match self.smoking_status.as_deref() {
            None | Some("") => None,
            Some("never") => Some(SmokingStatus::Never),
            Some("former") => Some(SmokingStatus::Former),
            Some("current") => Some(SmokingStatus::Current),
            Some(other) => return Err(format!("Unknown SmokingStatus: {}", other).into()),
        };

        let fitness_level = match self.fitness_level.as_deref() {
            None | Some("") => None,
            Some("sedentary") => Some(FitnessLevel::Sedentary),
            Some("moderate") => Some(FitnessLevel::Moderate),
            Some("high") => Some(FitnessLevel::High),
            Some(other) => return Err(format!("Unknown FitnessLevel: {}", other).into()),
        };

        let alcohol_pattern = match self.alcohol_pattern.as_deref() {
            None | Some("") => None,
            Some("none") => Some(AlcoholPattern::None),
            Some("moderate") => Some(AlcoholPattern::Moderate),
            Some("heavy") => Some(AlcoholPattern::Heavy),
            Some("binge") => Some(AlcoholPattern::Binge),
            Some(other) => return Err(format!("Unknown AlcoholPattern: {}", other).into()),
        };

        Ok(CohortMember {
            person_id: self.person_id,
            demographic: Demographic::new(self.age, sex, race),
            risk_factors: RiskFactorSet {
                smoking_status,
                years_since_quit: self.years_since_quit,
                systolic_bp: self.systolic_bp,
                bp_treated: self.bp_treated,
                bmi: self.bmi,
                fitness_level,
                alcohol_pattern,
                diabetes: self.diabetes,
                total_cholesterol: self.total_cholesterol,
                hdl_cholesterol: self.hdl_cholesterol,
                egfr: self.egfr,
                statin: self.statin,
                transport_mode: None,
                occupation_risk: None,
                firearm_in_home: None,
            },
        })
    }
}

/// Load a cohort from a CSV file
pub fn load_cohort<P: AsRef<Path>>(path: P) -> Result<Vec<CohortMember>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut members = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        members.push(row.to_member()?);
    }

    Ok(members)
}

/// Load a cohort from any reader (e.g., string buffer)
pub fn load_cohort_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<CohortMember>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut members = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        members.push(row.to_member()?);
    }

    Ok(members)
}
