//! Monitor page route handler

use askama::Template;
use axum::{extract::Query, response::Html};
use serde::Deserialize;

use crate::error::Result;
use crate::gas::{self, analyzer, clinical, findings, AsaClass, FlowInputs, PatientProfile};

/// Flow slider range upper bound in L/min, used to scale the bars.
const FLOW_SCALE_L_MIN: f64 = 10.0;

/// Control values; defaults match the workstation's power-on settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MonitorQuery {
    o2: f64,
    n2o: f64,
    air: f64,
    agent: f64,
    age: u32,
    weight: u32,
    compliance: u32,
    asa: u8,
}

impl Default for MonitorQuery {
    fn default() -> Self {
        Self {
            o2: 2.0,
            n2o: 2.0,
            air: 0.0,
            agent: 2.0,
            age: 30,
            weight: 70,
            compliance: 50,
            asa: 1,
        }
    }
}

/// One bar of the gas composition chart
#[derive(Debug)]
struct GasBar {
    name: &'static str,
    flow: f64,
    width_percent: f64,
}

#[derive(Debug)]
struct AsaOption {
    value: u8,
    selected: bool,
}

#[derive(Template)]
#[template(path = "monitor.html")]
struct MonitorTemplate {
    status: String,
    category: String,
    color: &'static str,
    fio2: f64,
    total_flow: f64,
    agent: String,
    clear: bool,
    alerts: Vec<String>,
    warnings: Vec<String>,
    bars: Vec<GasBar>,
    asa_options: Vec<AsaOption>,
    hypoxic_fio2: f64,
    low_flow: f64,
    high_agent: f64,
    raised_fio2_floor: f64,
    elderly_age: u32,
    sensitive_agent: f64,
    low_compliance: u32,
    controls: MonitorQuery,
}

fn composition(flows: &FlowInputs) -> Vec<GasBar> {
    let scale = [flows.o2, flows.n2o, flows.air]
        .into_iter()
        .fold(FLOW_SCALE_L_MIN, f64::max);

    [("Oxygen", flows.o2), ("Nitrous Oxide", flows.n2o), ("Air", flows.air)]
        .into_iter()
        .map(|(name, flow)| GasBar {
            name,
            flow,
            width_percent: flow / scale * 100.0,
        })
        .collect()
}

/// Monitor page handler
pub async fn show(Query(query): Query<MonitorQuery>) -> Result<Html<String>> {
    let flows = FlowInputs::new(query.o2, query.n2o, query.air, query.agent);
    let patient = PatientProfile {
        age: query.age,
        weight: query.weight,
        compliance: query.compliance,
        asa_class: AsaClass::try_from(query.asa)?,
    };

    let result = gas::evaluate(&flows, &patient)?;
    tracing::debug!(
        category = %result.category,
        fio2 = result.metrics.fio2,
        "Rendering monitor page"
    );

    let template = MonitorTemplate {
        status: result.status.to_string(),
        category: result.category.to_string(),
        color: result.category.color(),
        fio2: result.metrics.fio2,
        total_flow: result.metrics.total_flow,
        agent: findings::decimal(flows.agent_percent),
        clear: result.is_clear(),
        alerts: result.alert_messages(),
        warnings: result.warning_messages(),
        bars: composition(&flows),
        asa_options: (1..=4)
            .map(|value| AsaOption {
                value,
                selected: value == patient.asa_class.number(),
            })
            .collect(),
        hypoxic_fio2: analyzer::HYPOXIC_FIO2_PERCENT,
        low_flow: analyzer::LOW_FLOW_L_MIN,
        high_agent: analyzer::HIGH_AGENT_PERCENT,
        raised_fio2_floor: clinical::RAISED_FIO2_FLOOR,
        elderly_age: clinical::ELDERLY_AGE,
        sensitive_agent: clinical::SENSITIVE_AGENT_PERCENT,
        low_compliance: clinical::LOW_COMPLIANCE,
        controls: query,
    };

    Ok(Html(template.render()?))
}
