//! Gas safety module.
//!
//! Classifies a fresh gas flow configuration (O₂, N₂O, air, volatile agent)
//! and layers patient-specific advisories on top. Exposed as HTTP endpoints
//! and as plain functions.

pub mod analyzer;
pub mod clinical;
pub mod findings;
pub mod models;
mod routes;

pub use analyzer::{analyze, evaluate, ValidationError};
pub use clinical::adjust;
pub use findings::{Finding, FindingKind};
pub use models::{AnalysisResult, AsaClass, Category, FlowInputs, Metrics, PatientProfile, Status};
pub use routes::router;
