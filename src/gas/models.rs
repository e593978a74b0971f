//! Data types for gas-safety evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analyzer::ValidationError;
use super::findings::Finding;

/// Fresh gas flow settings and vaporizer dial.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FlowInputs {
    /// Oxygen flow in L/min
    pub o2: f64,
    /// Nitrous oxide flow in L/min
    pub n2o: f64,
    /// Medical air flow in L/min
    pub air: f64,
    /// Volatile agent concentration in volume %
    pub agent_percent: f64,
}

impl FlowInputs {
    pub fn new(o2: f64, n2o: f64, air: f64, agent_percent: f64) -> Self {
        Self {
            o2,
            n2o,
            air,
            agent_percent,
        }
    }

    /// Reject NaN, infinite and negative settings.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("o2", self.o2),
            ("n2o", self.n2o),
            ("air", self.air),
            ("agent_percent", self.agent_percent),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteInput { field });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeInput { field, value });
            }
        }
        Ok(())
    }
}

/// ASA physical-status class, used as an ordinal risk proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AsaClass {
    I = 1,
    II = 2,
    III = 3,
    IV = 4,
}

impl AsaClass {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AsaClass {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::I),
            2 => Ok(Self::II),
            3 => Ok(Self::III),
            4 => Ok(Self::IV),
            other => Err(ValidationError::InvalidAsaClass(other)),
        }
    }
}

impl From<AsaClass> for u8 {
    fn from(class: AsaClass) -> Self {
        class.number()
    }
}

/// Patient parameters used by the clinical rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PatientProfile {
    /// Age in years
    pub age: u32,
    /// Weight in kg
    pub weight: u32,
    /// Lung compliance in mL/cmH₂O
    pub compliance: u32,
    /// ASA physical-status class
    #[serde(rename = "asa")]
    pub asa_class: AsaClass,
}

impl PatientProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.weight == 0 {
            return Err(ValidationError::InvalidWeight(self.weight));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pass,
    Fail,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Severity category, ordered `Safe < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Safe,
    Warning,
    Critical,
}

impl Category {
    /// Raise to `level` if it is more severe. Never lowers.
    pub fn escalate(&mut self, level: Category) {
        if level > *self {
            *self = level;
        }
    }

    /// Banner color used by the monitor page.
    pub fn color(self) -> &'static str {
        match self {
            Self::Safe => "green",
            Self::Warning => "orange",
            Self::Critical => "red",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Inspired oxygen fraction in percent
    pub fio2: f64,
    /// Total fresh gas flow in L/min
    pub total_flow: f64,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub status: Status,
    pub category: Category,
    pub metrics: Metrics,
    pub alerts: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Append advisory findings after the existing warnings.
    ///
    /// Status and category are left alone.
    pub fn extend_warnings(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.warnings.extend(findings);
    }

    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// True when nothing was flagged at all.
    pub fn is_clear(&self) -> bool {
        self.alerts.is_empty() && self.warnings.is_empty()
    }
}
