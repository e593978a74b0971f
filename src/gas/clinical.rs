//! Patient-specific adjustments layered on top of the mixture analysis.
//!
//! These rules only add advisory warnings. They never touch the status or
//! category produced by the analyzer.

use super::findings::{Finding, FindingKind};
use super::models::{AsaClass, PatientProfile};

/// Default minimum FiO₂ (%).
pub const BASE_FIO2_FLOOR: f64 = 25.0;
/// Minimum FiO₂ (%) for infants, the elderly and ASA III or worse.
pub const RAISED_FIO2_FLOOR: f64 = 30.0;
/// Age (years) above which a patient counts as elderly.
pub const ELDERLY_AGE: u32 = 65;
/// Age (years) below which a patient counts as an infant.
pub const INFANT_AGE: u32 = 1;
/// Weight (kg) below which a patient counts as low-weight.
pub const LOW_WEIGHT_KG: u32 = 50;
/// Agent concentration (vol %) that sensitive patients should not exceed.
pub const SENSITIVE_AGENT_PERCENT: f64 = 6.0;
/// Compliance (mL/cmH₂O) below which airway pressure needs watching.
pub const LOW_COMPLIANCE: u32 = 30;

/// Minimum FiO₂ recommended for this patient.
pub fn recommended_fio2(patient: &PatientProfile) -> f64 {
    let mut floor = BASE_FIO2_FLOOR;
    if patient.age < INFANT_AGE || patient.age > ELDERLY_AGE {
        floor = RAISED_FIO2_FLOOR;
    }
    if patient.asa_class >= AsaClass::III {
        floor = RAISED_FIO2_FLOOR;
    }
    floor
}

/// Patient-specific warnings, in the order: FiO₂ floor, agent sensitivity,
/// lung compliance.
pub fn adjust(fio2: f64, agent_percent: f64, patient: &PatientProfile) -> Vec<Finding> {
    let mut warnings = Vec::new();

    let recommended = recommended_fio2(patient);
    if fio2 < recommended {
        warnings.push(Finding::new(FindingKind::Fio2BelowPatientFloor {
            fio2,
            recommended,
        }));
    }

    let sensitive = patient.age > ELDERLY_AGE || patient.weight < LOW_WEIGHT_KG;
    if sensitive && agent_percent > SENSITIVE_AGENT_PERCENT {
        warnings.push(Finding::new(FindingKind::AgentSensitivity { agent_percent }));
    }

    if patient.compliance < LOW_COMPLIANCE {
        warnings.push(Finding::new(FindingKind::LowLungCompliance {
            compliance: patient.compliance,
        }));
    }

    warnings
}
