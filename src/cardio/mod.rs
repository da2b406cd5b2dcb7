//! Cardiovascular risk models: PCE and PREVENT
//!
//! Both models run alongside the all-cause mortality adjustment; a failure in
//! either is recorded on the assessment rather than failing the request.

pub mod pce;
pub mod prevent;

pub use pce::{PceCoefficientSet, PceInput, PceResult, PceRiskLevel};
pub use prevent::{PreventCoefficientSet, PreventInput, PreventResult};
