//! Baseline mortality from a period life table
//!
//! The life table stores the probability of death within one year (`qx`) by
//! age and sex. The bundled table is a smoothed U.S. period table spanning
//! ages 0-119. Horizon conversion and risk adjustment live in the engine;
//! this module only answers lookups and expectancy sums over raw qx.

use crate::error::RiskError;
use crate::person::Sex;

/// Life table with 1-year death probabilities by age
///
/// Rows are stored as (male_qx, female_qx), indexed by age. Monotonicity with
/// age is expected of a real table but not enforced here: a garbage table
/// passes through unchanged.
#[derive(Debug, Clone)]
pub struct LifeTable {
    /// (male_qx, female_qx) indexed by age
    rates: Vec<(f64, f64)>,
}

impl LifeTable {
    /// Bundled U.S. period life table (ages 0-119)
    pub fn bundled_us() -> Self {
        Self {
            rates: Self::us_period_rates(),
        }
    }

    /// Create from explicit rates, e.g. loaded from CSV
    pub fn new(rates: Vec<(f64, f64)>) -> Self {
        Self { rates }
    }

    /// Highest age the table covers
    pub fn max_age(&self) -> u8 {
        self.rates.len().saturating_sub(1) as u8
    }

    /// 1-year death probability for (age, sex)
    pub fn qx(&self, age: u8, sex: Sex) -> Result<f64, RiskError> {
        let (male, female) = *self.rates.get(age as usize).ok_or_else(|| {
            RiskError::DataUnavailable(format!(
                "age {} outside life table range 0-{}",
                age,
                self.max_age()
            ))
        })?;
        Ok(match sex {
            Sex::Male => male,
            Sex::Female => female,
        })
    }

    /// Complete life expectancy at (age, sex), in years
    ///
    /// Curtate expectation from the table's qx column plus the standard
    /// half-year continuity correction.
    pub fn life_expectancy(&self, age: u8, sex: Sex) -> Result<f64, RiskError> {
        // Fails the same way qx does when age is outside the table
        self.qx(age, sex)?;

        let mut survival = 1.0;
        let mut expectancy = 0.0;
        for a in age as usize..self.rates.len() {
            let (male, female) = self.rates[a];
            let qx = match sex {
                Sex::Male => male,
                Sex::Female => female,
            };
            survival *= 1.0 - qx;
            expectancy += survival;
        }
        Ok(expectancy + 0.5)
    }

    /// Smoothed U.S. period life table, (male_qx, female_qx) by age
    fn us_period_rates() -> Vec<(f64, f64)> {
        vec![
            // Age 0-9
            (0.00582, 0.00488), (0.00043, 0.00035), (0.00033, 0.000268),
            (0.000254, 0.000205), (0.000195, 0.000157), (0.00015, 0.00012),
            (0.000141, 0.000116), (0.000132, 0.000112), (0.000125, 0.000108),
            (0.000117, 0.000104),
            // Age 10-19
            (0.00011, 0.0001), (0.000149, 0.000117), (0.000202, 0.000137),
            (0.000273, 0.00016), (0.000369, 0.000188), (0.0005, 0.00022),
            (0.000606, 0.000257), (0.000735, 0.000301), (0.000891, 0.000351),
            (0.00108, 0.000411),
            // Age 20-29
            (0.00131, 0.00048), (0.001375, 0.000507), (0.001444, 0.000535),
            (0.001515, 0.000565), (0.001591, 0.000597), (0.00167, 0.00063),
            (0.001738, 0.000687), (0.001809, 0.000749), (0.001883, 0.000816),
            (0.00196, 0.00089),
            // Age 30-39
            (0.00204, 0.00097), (0.00212, 0.001029), (0.002202, 0.001091),
            (0.002288, 0.001156), (0.002377, 0.001226), (0.00247, 0.0013),
            (0.002571, 0.001373), (0.002677, 0.001451), (0.002787, 0.001532),
            (0.002901, 0.001619),
            // Age 40-49
            (0.00302, 0.00171), (0.003178, 0.001813), (0.003345, 0.001922),
            (0.003521, 0.002038), (0.003706, 0.00216), (0.0039, 0.00229),
            (0.00421, 0.00247), (0.004546, 0.002663), (0.004908, 0.002872),
            (0.005298, 0.003097),
            // Age 50-59
            (0.00572, 0.00334), (0.006183, 0.003606), (0.006683, 0.003893),
            (0.007224, 0.004204), (0.007808, 0.004538), (0.00844, 0.0049),
            (0.009066, 0.005294), (0.009738, 0.005719), (0.010461, 0.006178),
            (0.011237, 0.006674),
            // Age 60-69
            (0.01207, 0.00721), (0.01295, 0.007788), (0.013894, 0.008412),
            (0.014907, 0.009086), (0.015994, 0.009814), (0.01716, 0.0106),
            (0.01847, 0.011543), (0.01988, 0.012569), (0.021398, 0.013687),
            (0.023032, 0.014904),
            // Age 70-79
            (0.02479, 0.01623), (0.027009, 0.017762), (0.029428, 0.019439),
            (0.032062, 0.021274), (0.034933, 0.023282), (0.03806, 0.02548),
            (0.041828, 0.028358), (0.04597, 0.031561), (0.050521, 0.035126),
            (0.055523, 0.039094),
            // Age 80-89
            (0.06102, 0.04351), (0.067629, 0.048885), (0.074953, 0.054925),
            (0.083071, 0.06171), (0.092068, 0.069334), (0.10204, 0.0779),
            (0.112808, 0.086648), (0.124713, 0.096378), (0.137874, 0.107201),
            (0.152424, 0.11924),
            // Age 90-99
            (0.16851, 0.13263), (0.183923, 0.146366), (0.200745, 0.161525),
            (0.219106, 0.178255), (0.239147, 0.196716), (0.26102, 0.21709),
            (0.28096, 0.234932), (0.302423, 0.254241), (0.325525, 0.275136),
            (0.350393, 0.297749),
            // Age 100-109
            (0.37716, 0.32222), (0.397989, 0.343682), (0.419968, 0.366574),
            (0.443161, 0.39099), (0.467635, 0.417033), (0.49346, 0.44481),
            (0.510482, 0.464977), (0.528092, 0.486057), (0.546309, 0.508094),
            (0.565154, 0.53113),
            // Age 110-119
            (0.58465, 0.55521), (0.595323, 0.567602), (0.606191, 0.580271),
            (0.617257, 0.593223), (0.628526, 0.606464), (0.64, 0.62),
            (0.649774, 0.632139), (0.659697, 0.644515), (0.669772, 0.657134),
            (0.68, 0.67),        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qx_lookup() {
        let table = LifeTable::bundled_us();

        let q55_m = table.qx(55, Sex::Male).unwrap();
        let q55_f = table.qx(55, Sex::Female).unwrap();
        assert!((q55_m - 0.00844).abs() < 1e-9);
        assert!((q55_f - 0.0049).abs() < 1e-9);

        // Male mortality exceeds female mortality at every adult age
        for age in 20..=110 {
            let m = table.qx(age, Sex::Male).unwrap();
            let f = table.qx(age, Sex::Female).unwrap();
            assert!(m > f, "age {}: male {} <= female {}", age, m, f);
        }
    }

    #[test]
    fn test_age_outside_table() {
        let table = LifeTable::bundled_us();
        assert_eq!(table.max_age(), 119);
        assert!(table.qx(120, Sex::Male).is_err());
        assert!(table.life_expectancy(120, Sex::Female).is_err());
    }

    #[test]
    fn test_life_expectancy_plausible() {
        let table = LifeTable::bundled_us();

        let e0_m = table.life_expectancy(0, Sex::Male).unwrap();
        let e0_f = table.life_expectancy(0, Sex::Female).unwrap();
        assert!((70.0..80.0).contains(&e0_m), "e0 male: {}", e0_m);
        assert!((76.0..86.0).contains(&e0_f), "e0 female: {}", e0_f);
        assert!(e0_f > e0_m);

        let e65_m = table.life_expectancy(65, Sex::Male).unwrap();
        assert!((14.0..21.0).contains(&e65_m), "e65 male: {}", e65_m);
    }

    #[test]
    fn test_life_expectancy_decreases_with_age() {
        let table = LifeTable::bundled_us();
        let mut prev = table.life_expectancy(0, Sex::Female).unwrap();
        for age in (10..=110).step_by(10) {
            let ex = table.life_expectancy(age, Sex::Female).unwrap();
            assert!(ex < prev, "expectancy rose at age {}", age);
            prev = ex;
        }
    }
}
