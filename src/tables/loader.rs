//! CSV-based reference table loaders
//!
//! File formats match the acquisition layer's exports:
//! - life_table.csv: age,male_qx,female_qx
//! - cause_of_death.csv: age_group,heart_disease_pct,cancer_pct,accidents_pct,stroke_pct,diabetes_pct
//!   where age_group is "start-end" or "85+"

use std::error::Error;
use std::fs::File;
use std::path::Path;

use super::cause_table::{AgeBand, Cause, CauseAllocationTable};
use super::life_table::LifeTable;

/// Default path to reference tables
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

/// Load a life table from CSV
pub fn load_life_table(path: &Path) -> Result<LifeTable, Box<dyn Error>> {
    let file = File::open(path.join("life_table.csv"))?;
    load_life_table_from_reader(file)
}

/// Load a life table from any reader
pub fn load_life_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<LifeTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut rates: Vec<(u8, f64, f64)> = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let age: u8 = record[0].parse()?;
        let male: f64 = record[1].parse()?;
        let female: f64 = record[2].parse()?;
        rates.push((age, male, female));
    }

    if rates.is_empty() {
        return Err("life_table.csv contains no rows".into());
    }

    // Table must be dense from age 0; a gap would silently shift lookups
    rates.sort_by_key(|&(age, _, _)| age);
    let mut dense = Vec::with_capacity(rates.len());
    for (expected, &(age, male, female)) in rates.iter().enumerate() {
        if age as usize != expected {
            return Err(format!("life_table.csv missing age {}", expected).into());
        }
        dense.push((male, female));
    }

    Ok(LifeTable::new(dense))
}

/// Load a cause-allocation table from CSV
pub fn load_cause_table(path: &Path) -> Result<CauseAllocationTable, Box<dyn Error>> {
    let file = File::open(path.join("cause_of_death.csv"))?;
    load_cause_table_from_reader(file)
}

/// Load a cause-allocation table from any reader
pub fn load_cause_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<CauseAllocationTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut bands = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let (start, end) = parse_age_group(&record[0])?;
        bands.push(AgeBand {
            start,
            end,
            percentages: vec![
                (Cause::HeartDisease, record[1].parse()?),
                (Cause::Cancer, record[2].parse()?),
                (Cause::Accidents, record[3].parse()?),
                (Cause::Stroke, record[4].parse()?),
                (Cause::Diabetes, record[5].parse()?),
            ],
        });
    }

    if bands.is_empty() {
        return Err("cause_of_death.csv contains no rows".into());
    }

    Ok(CauseAllocationTable::new(bands))
}

/// Parse "start-end" or "N+" band labels
fn parse_age_group(label: &str) -> Result<(u8, Option<u8>), Box<dyn Error>> {
    if let Some(start) = label.strip_suffix('+') {
        return Ok((start.parse()?, None));
    }
    match label.split_once('-') {
        Some((start, end)) => Ok((start.parse()?, Some(end.parse()?))),
        None => Err(format!("unrecognized age_group label: {}", label).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::person::Sex;

    #[test]
    fn test_load_life_table() {
        let csv = "\
age,male_qx,female_qx
0,0.00582,0.00488
1,0.00043,0.00035
2,0.00033,0.00027";
        let table = load_life_table_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.max_age(), 2);
        assert!((table.qx(1, Sex::Male).unwrap() - 0.00043).abs() < 1e-12);
        assert!(table.qx(3, Sex::Male).is_err());
    }

    #[test]
    fn test_life_table_gap_rejected() {
        let csv = "\
age,male_qx,female_qx
0,0.00582,0.00488
2,0.00033,0.00027";
        assert!(load_life_table_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_cause_table() {
        let csv = "\
age_group,heart_disease_pct,cancer_pct,accidents_pct,stroke_pct,diabetes_pct
25-64,25.0,24.0,12.0,4.0,3.5
65-84,24.0,20.0,2.5,6.0,3.5
85+,29.0,12.0,2.0,7.5,2.5";
        let table = load_cause_table_from_reader(csv.as_bytes()).unwrap();

        let risks = table.allocate(90, 0.2).unwrap();
        assert!((risks[&Cause::HeartDisease] - 0.2 * 0.29).abs() < 1e-12);

        // Ages below the first band have no match
        assert!(table.allocate(20, 0.01).is_err());
    }

    #[test]
    fn test_bad_age_group_label() {
        let csv = "\
age_group,heart_disease_pct,cancer_pct,accidents_pct,stroke_pct,diabetes_pct
adults,25.0,24.0,12.0,4.0,3.5";
        assert!(load_cause_table_from_reader(csv.as_bytes()).is_err());
    }
}
