//! Fresh gas mixture analysis.

use chrono::Utc;
use thiserror::Error;

use super::clinical;
use super::findings::{Finding, FindingKind};
use super::models::{AnalysisResult, Category, FlowInputs, Metrics, PatientProfile, Status};

/// Fractional oxygen content of medical air.
pub const AIR_O2_FRACTION: f64 = 0.21;
/// FiO₂ (%) below which a mixture is hypoxic.
pub const HYPOXIC_FIO2_PERCENT: f64 = 25.0;
/// Total flow (L/min) below which CO₂ rebreathing is a risk.
pub const LOW_FLOW_L_MIN: f64 = 0.5;
/// Agent concentration (vol %) above which the dose is flagged.
pub const HIGH_AGENT_PERCENT: f64 = 8.0;

/// Input rejection reasons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NonFiniteInput { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    NegativeInput { field: &'static str, value: f64 },
    #[error("patient weight must be at least 1 kg (got {0})")]
    InvalidWeight(u32),
    #[error("ASA class must be 1, 2, 3 or 4 (got {0})")]
    InvalidAsaClass(u8),
}

/// Classify a fresh gas configuration.
///
/// Never fails; a configuration that cannot be ventilated safely comes back
/// as `FAIL`/`CRITICAL`. Inputs are not range-checked here, see
/// [`FlowInputs::validate`].
pub fn analyze(o2: f64, n2o: f64, air: f64, agent_percent: f64) -> AnalysisResult {
    let total_flow = o2 + n2o + air;

    if total_flow == 0.0 {
        return AnalysisResult {
            status: Status::Fail,
            category: Category::Critical,
            metrics: Metrics {
                fio2: 0.0,
                total_flow: 0.0,
            },
            alerts: vec![Finding::new(FindingKind::NoFreshGasFlow)],
            warnings: vec![],
            timestamp: Utc::now(),
        };
    }

    let oxygen_volume = o2 + air * AIR_O2_FRACTION;
    let fio2 = oxygen_volume / total_flow * 100.0;

    let mut status = Status::Pass;
    let mut category = Category::Safe;
    let mut alerts = Vec::new();
    let mut warnings = Vec::new();

    if fio2 < HYPOXIC_FIO2_PERCENT {
        status = Status::Fail;
        category.escalate(Category::Critical);
        alerts.push(Finding::new(FindingKind::HypoxicMixture { fio2 }));
    }

    if total_flow < LOW_FLOW_L_MIN {
        category.escalate(Category::Warning);
        warnings.push(Finding::new(FindingKind::LowFreshGasFlow { total_flow }));
    }

    if agent_percent > HIGH_AGENT_PERCENT {
        category.escalate(Category::Warning);
        warnings.push(Finding::new(FindingKind::HighAgentConcentration {
            agent_percent,
        }));
    }

    AnalysisResult {
        status,
        category,
        metrics: Metrics { fio2, total_flow },
        alerts,
        warnings,
        timestamp: Utc::now(),
    }
}

/// Validate, analyze the mixture, then append patient-specific warnings.
pub fn evaluate(
    flows: &FlowInputs,
    patient: &PatientProfile,
) -> Result<AnalysisResult, ValidationError> {
    flows.validate()?;
    patient.validate()?;

    let mut result = analyze(flows.o2, flows.n2o, flows.air, flows.agent_percent);
    let clinical_warnings = clinical::adjust(result.metrics.fio2, flows.agent_percent, patient);
    result.extend_warnings(clinical_warnings);

    Ok(result)
}
