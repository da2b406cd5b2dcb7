//! Immutable reference tables: life table, cause allocation, relative risks
//!
//! Reference data is assembled once at process start and treated as read-only
//! for the lifetime of the process. The engine borrows it; nothing mutates it
//! after construction.

mod cause_table;
mod life_table;
mod relative_risk;
pub mod loader;

pub use cause_table::{AgeBand, Cause, CauseAllocationTable};
pub use life_table::LifeTable;
pub use relative_risk::{
    AlcoholRisks, BloodPressureRisks, BmiRisks, FitnessRisks, InterventionEffects,
    RelativeRiskTable, RiskEstimate, SmokingRisks,
};

use std::error::Error;
use std::path::Path;

/// Container for all reference data the engine computes over
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub life_table: LifeTable,

    /// Cause table is optional; without one the fixed tier fallback is used
    pub cause_table: Option<CauseAllocationTable>,

    pub relative_risks: RelativeRiskTable,
}

impl ReferenceData {
    /// Bundled tables: U.S. period life table, CDC-style cause bands,
    /// literature relative risks
    pub fn bundled() -> Self {
        Self {
            life_table: LifeTable::bundled_us(),
            cause_table: Some(CauseAllocationTable::bundled_us()),
            relative_risks: RelativeRiskTable::default(),
        }
    }

    /// Bundled life table and relative risks but no cause table, forcing the
    /// fixed tier fallback
    pub fn bundled_without_cause_table() -> Self {
        Self {
            cause_table: None,
            ..Self::bundled()
        }
    }

    /// Load life and cause tables from CSV files in a directory; the
    /// cause table is optional and skipped if the file is absent
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let life_table = loader::load_life_table(path)?;
        let cause_table = if path.join("cause_of_death.csv").exists() {
            Some(loader::load_cause_table(path)?)
        } else {
            None
        };
        Ok(Self {
            life_table,
            cause_table,
            relative_risks: RelativeRiskTable::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_container() {
        let data = ReferenceData::bundled();
        assert!(data.cause_table.is_some());
        assert_eq!(data.life_table.max_age(), 119);

        let no_causes = ReferenceData::bundled_without_cause_table();
        assert!(no_causes.cause_table.is_none());
    }
}
