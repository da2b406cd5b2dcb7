//! Cause-of-death allocation by age band
//!
//! When a cause table is configured, baseline risk is split by each band's
//! percentages and the unallocated remainder is assigned to `Other`. Without
//! a table, a fixed three-tier allocation is used whose fractions sum to
//! exactly 1.0, so that path never produces a residual.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Named cause of death
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    HeartDisease,
    Cancer,
    Accidents,
    Stroke,
    Diabetes,
    Other,
}

impl Cause {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::HeartDisease => "heart_disease",
            Cause::Cancer => "cancer",
            Cause::Accidents => "accidents",
            Cause::Stroke => "stroke",
            Cause::Diabetes => "diabetes",
            Cause::Other => "other",
        }
    }
}

/// One age band of the cause table
///
/// `end = None` means the band is open-ended (the "85+" band).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeBand {
    pub start: u8,
    pub end: Option<u8>,

    /// Percentage of deaths (0-100) per cause; causes absent here fall into
    /// the residual `Other` bucket
    pub percentages: Vec<(Cause, f64)>,
}

impl AgeBand {
    fn matches(&self, age: u8) -> bool {
        match self.end {
            Some(end) => age >= self.start && age <= end,
            None => age >= self.start,
        }
    }
}

/// Cause-of-death allocation table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseAllocationTable {
    bands: Vec<AgeBand>,
}

impl CauseAllocationTable {
    pub fn new(bands: Vec<AgeBand>) -> Self {
        Self { bands }
    }

    /// Bundled allocation table with CDC-style age bands
    ///
    /// Percentages per band cover the five tracked causes and sum below 100,
    /// leaving a positive residual for `Other`.
    pub fn bundled_us() -> Self {
        use Cause::*;
        let band = |start: u8, end: Option<u8>, pcts: [f64; 5]| AgeBand {
            start,
            end,
            percentages: vec![
                (HeartDisease, pcts[0]),
                (Cancer, pcts[1]),
                (Accidents, pcts[2]),
                (Stroke, pcts[3]),
                (Diabetes, pcts[4]),
            ],
        };
        Self {
            bands: vec![
                band(0, Some(4), [2.5, 4.5, 22.0, 1.0, 0.3]),
                band(5, Some(14), [3.0, 11.0, 30.0, 1.2, 0.5]),
                band(15, Some(24), [3.5, 5.0, 42.0, 0.7, 0.7]),
                band(25, Some(34), [6.5, 7.0, 40.0, 1.0, 1.5]),
                band(35, Some(44), [12.0, 12.5, 29.0, 2.0, 3.0]),
                band(45, Some(54), [19.0, 21.5, 14.0, 3.0, 4.0]),
                band(55, Some(64), [22.0, 27.0, 6.5, 3.5, 4.5]),
                band(65, Some(74), [22.5, 26.5, 3.0, 4.5, 4.0]),
                band(75, Some(84), [24.0, 19.5, 2.0, 6.0, 3.5]),
                band(85, None, [29.5, 11.5, 2.0, 7.5, 2.5]),
            ],
        }
    }

    /// Split a baseline probability across causes for the band covering `age`
    ///
    /// The remainder after the band's listed causes goes to `Other`. A table
    /// whose percentages exceed 100 produces a negative `Other` bucket; that
    /// is surfaced rather than clamped so cause risks always sum back to the
    /// baseline.
    pub fn allocate(&self, age: u8, baseline: f64) -> Result<BTreeMap<Cause, f64>, RiskError> {
        let band = self
            .bands
            .iter()
            .find(|b| b.matches(age))
            .ok_or(RiskError::NoMatchingAgeBand { age })?;

        let mut risks = BTreeMap::new();
        let mut allocated = 0.0;
        for &(cause, pct) in &band.percentages {
            let risk = baseline * pct / 100.0;
            allocated += risk;
            risks.insert(cause, risk);
        }
        risks.insert(Cause::Other, baseline - allocated);
        Ok(risks)
    }

    /// Fixed three-tier allocation used when no cause table is configured
    ///
    /// Each tier's fractions sum to exactly 1.0, so the allocated causes sum
    /// to the input baseline with no residual.
    pub fn fallback_allocate(age: u8, baseline: f64) -> BTreeMap<Cause, f64> {
        use Cause::*;
        let fractions: [(Cause, f64); 6] = if age < 25 {
            // Young adults: dominated by accidents
            [
                (Accidents, 0.40),
                (HeartDisease, 0.10),
                (Cancer, 0.20),
                (Stroke, 0.05),
                (Diabetes, 0.05),
                (Other, 0.20),
            ]
        } else if age < 65 {
            // Middle age: heart disease, cancer, accidents
            [
                (HeartDisease, 0.30),
                (Cancer, 0.25),
                (Accidents, 0.15),
                (Stroke, 0.10),
                (Diabetes, 0.10),
                (Other, 0.10),
            ]
        } else {
            // Older adults: heart disease, cancer, stroke
            [
                (HeartDisease, 0.40),
                (Cancer, 0.25),
                (Stroke, 0.15),
                (Diabetes, 0.10),
                (Accidents, 0.05),
                (Other, 0.05),
            ]
        };

        fractions
            .iter()
            .map(|&(cause, frac)| (cause, baseline * frac))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_matching() {
        let table = CauseAllocationTable::bundled_us();

        // Band edges are inclusive
        let at_64 = table.allocate(64, 0.01).unwrap();
        let at_65 = table.allocate(65, 0.01).unwrap();
        assert!((at_64[&Cause::Cancer] - 0.01 * 0.27).abs() < 1e-12);
        assert!((at_65[&Cause::Cancer] - 0.01 * 0.265).abs() < 1e-12);

        // Open-ended 85+ band
        let at_100 = table.allocate(100, 0.3).unwrap();
        assert!((at_100[&Cause::HeartDisease] - 0.3 * 0.295).abs() < 1e-12);
    }

    #[test]
    fn test_no_matching_band() {
        let table = CauseAllocationTable::new(vec![AgeBand {
            start: 25,
            end: Some(64),
            percentages: vec![(Cause::Cancer, 25.0)],
        }]);
        assert_eq!(
            table.allocate(20, 0.01).unwrap_err(),
            RiskError::NoMatchingAgeBand { age: 20 }
        );
    }

    #[test]
    fn test_allocation_sums_to_baseline() {
        let table = CauseAllocationTable::bundled_us();
        for &age in &[10u8, 30, 50, 70, 90] {
            let risks = table.allocate(age, 0.02).unwrap();
            let total: f64 = risks.values().sum();
            assert!((total - 0.02).abs() < 1e-12, "age {}: total {}", age, total);
            assert!(risks[&Cause::Other] > 0.0);
        }
    }

    #[test]
    fn test_over_allocated_table_surfaces_negative_other() {
        // Percentages above 100 are not clamped; the residual goes negative
        let table = CauseAllocationTable::new(vec![AgeBand {
            start: 0,
            end: None,
            percentages: vec![(Cause::HeartDisease, 70.0), (Cause::Cancer, 40.0)],
        }]);
        let risks = table.allocate(50, 0.1).unwrap();
        assert!(risks[&Cause::Other] < 0.0);
        let total: f64 = risks.values().sum();
        assert!((total - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_fallback_tiers_exact() {
        for &age in &[10u8, 24, 25, 64, 65, 90] {
            let risks = CauseAllocationTable::fallback_allocate(age, 0.05);
            let total: f64 = risks.values().sum();
            assert!(
                (total - 0.05).abs() < 1e-12,
                "age {}: fallback total {}",
                age,
                total
            );
        }

        // Tier boundaries select the expected mix
        let young = CauseAllocationTable::fallback_allocate(20, 1.0);
        assert!((young[&Cause::Accidents] - 0.40).abs() < 1e-12);
        let old = CauseAllocationTable::fallback_allocate(80, 1.0);
        assert!((old[&Cause::HeartDisease] - 0.40).abs() < 1e-12);
    }
}
