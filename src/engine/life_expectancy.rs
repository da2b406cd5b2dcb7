//! Risk-adjusted life expectancy
//!
//! Baseline expectancy comes from the life table; the adjustment divides it
//! by the ratio of adjusted to baseline one-year risk and floors the result
//! at one year. When the table cannot serve the age a crude linear
//! approximation takes over and the result is flagged as degraded.

use serde::{Deserialize, Serialize};

use crate::person::Sex;
use crate::tables::LifeTable;

/// Life-expectancy estimate for one person
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeExpectancy {
    /// Risk-adjusted remaining years, floored at 1.0
    pub years: f64,

    /// Unadjusted remaining years from the table (or the approximation when
    /// degraded)
    pub baseline_years: f64,

    /// Ratio of adjusted to baseline one-year risk; 1.0 when either is zero
    pub risk_multiplier: f64,

    /// True when the table could not serve this age and the linear
    /// approximation was used instead
    pub degraded: bool,
}

/// Compute adjusted life expectancy from the life table, falling back to a
/// linear approximation when the table has no row for the age
pub fn adjusted_life_expectancy(
    table: &LifeTable,
    age: u8,
    sex: Sex,
    adjusted_one_year_risk: f64,
) -> LifeExpectancy {
    let from_table = table
        .life_expectancy(age, sex)
        .and_then(|baseline_years| Ok((baseline_years, table.qx(age, sex)?)));

    match from_table {
        Ok((baseline_years, baseline_risk)) => {
            let risk_multiplier = if baseline_risk > 0.0 && adjusted_one_year_risk > 0.0 {
                adjusted_one_year_risk / baseline_risk
            } else {
                1.0
            };
            LifeExpectancy {
                years: (baseline_years / risk_multiplier).max(1.0),
                baseline_years,
                risk_multiplier,
                degraded: false,
            }
        }
        Err(err) => {
            log::warn!(
                "life table unavailable for age {}: {}; using linear approximation",
                age,
                err
            );
            let crude_limit: f64 = match sex {
                Sex::Male => 85.0,
                Sex::Female => 88.0,
            };
            let years = (crude_limit - f64::from(age)).max(1.0);
            LifeExpectancy {
                years,
                baseline_years: years,
                risk_multiplier: 1.0,
                degraded: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unadjusted_at_baseline_risk() {
        let table = LifeTable::bundled_us();
        let baseline_qx = table.qx(55, Sex::Male).unwrap();

        let result = adjusted_life_expectancy(&table, 55, Sex::Male, baseline_qx);
        assert!(!result.degraded);
        assert!((result.risk_multiplier - 1.0).abs() < 1e-12);
        assert!((result.years - result.baseline_years).abs() < 1e-9);
    }

    #[test]
    fn test_higher_risk_shortens_expectancy() {
        let table = LifeTable::bundled_us();
        let baseline_qx = table.qx(55, Sex::Male).unwrap();

        let at_baseline = adjusted_life_expectancy(&table, 55, Sex::Male, baseline_qx);
        let doubled = adjusted_life_expectancy(&table, 55, Sex::Male, baseline_qx * 2.0);
        let halved = adjusted_life_expectancy(&table, 55, Sex::Male, baseline_qx * 0.5);

        assert!(doubled.years < at_baseline.years);
        assert!(halved.years > at_baseline.years);
        assert!((doubled.risk_multiplier - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_floor_at_one_year() {
        let table = LifeTable::bundled_us();
        let baseline_qx = table.qx(100, Sex::Female).unwrap();

        let extreme = adjusted_life_expectancy(&table, 100, Sex::Female, baseline_qx * 1000.0);
        assert!((extreme.years - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degraded_fallback() {
        let table = LifeTable::bundled_us();

        // Age 120 passes input validation but has no table row
        let male = adjusted_life_expectancy(&table, 120, Sex::Male, 0.5);
        assert!(male.degraded);
        assert!((male.years - 1.0).abs() < 1e-12);

        let female = adjusted_life_expectancy(&table, 120, Sex::Female, 0.5);
        assert!(female.degraded);
        assert!((female.years - 1.0).abs() < 1e-12);

        // Short table exercises the sexed limits away from the floor
        let short = LifeTable::new(vec![(0.01, 0.008); 60]);
        let male = adjusted_life_expectancy(&short, 70, Sex::Male, 0.02);
        assert!(male.degraded);
        assert!((male.years - 15.0).abs() < 1e-12);
        let female = adjusted_life_expectancy(&short, 70, Sex::Female, 0.02);
        assert!((female.years - 18.0).abs() < 1e-12);
    }
}
