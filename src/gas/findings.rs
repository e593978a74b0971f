//! Structured alerts and warnings.
//!
//! Each finding carries the numbers that triggered it; `Display` produces
//! the operator-facing text.

use std::fmt;

use serde::{Serialize, Serializer};

use super::models::Category;

/// What was detected, with its triggering values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    NoFreshGasFlow,
    HypoxicMixture { fio2: f64 },
    LowFreshGasFlow { total_flow: f64 },
    HighAgentConcentration { agent_percent: f64 },
    Fio2BelowPatientFloor { fio2: f64, recommended: f64 },
    AgentSensitivity { agent_percent: f64 },
    LowLungCompliance { compliance: u32 },
}

impl FindingKind {
    pub fn severity(&self) -> Category {
        match self {
            Self::NoFreshGasFlow | Self::HypoxicMixture { .. } => Category::Critical,
            _ => Category::Warning,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFreshGasFlow => write!(f, "CRITICAL: No fresh gas flow detected."),
            Self::HypoxicMixture { fio2 } => {
                write!(f, "Hypoxic mixture detected: FiO₂ = {fio2:.1}% (< 25%).")
            }
            Self::LowFreshGasFlow { .. } => write!(
                f,
                "Low fresh gas flow (< 0.5 L/min). Risk of CO₂ rebreathing."
            ),
            Self::HighAgentConcentration { agent_percent } => write!(
                f,
                "High anesthetic concentration ({}%).",
                decimal(*agent_percent)
            ),
            Self::Fio2BelowPatientFloor { recommended, .. } => write!(
                f,
                "Patient-specific FiO₂ recommendation: ≥ {recommended:.1}%."
            ),
            Self::AgentSensitivity { .. } => write!(
                f,
                "Elderly / low-weight patient may be sensitive to high anesthetic dose."
            ),
            Self::LowLungCompliance { .. } => write!(
                f,
                "Low lung compliance. Monitor airway pressure closely."
            ),
        }
    }
}

/// Plain decimal that always shows a fractional part (`9.0`, `8.5`).
pub fn decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// A single alert or warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Category,
}

impl Finding {
    pub fn new(kind: FindingKind) -> Self {
        Self {
            severity: kind.severity(),
            kind,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            #[serde(flatten)]
            kind: &'a FindingKind,
            severity: Category,
            message: String,
        }

        Wire {
            kind: &self.kind,
            severity: self.severity,
            message: self.kind.to_string(),
        }
        .serialize(serializer)
    }
}
