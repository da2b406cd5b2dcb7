//! Request-scoped input types: demographics, risk factors, cohort loading

mod data;
pub mod loader;

pub use data::{
    AlcoholPattern, Demographic, FitnessLevel, Horizon, OccupationRisk, Race, RiskFactorSet,
    Sex, SmokingStatus, TransportMode,
};
pub use loader::{load_cohort, load_cohort_from_reader, CohortMember};
