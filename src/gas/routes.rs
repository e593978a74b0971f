//! HTTP route handlers for the gas safety API.

use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::analyzer::{self, ValidationError};
use super::clinical;
use super::models::{AnalysisResult, FlowInputs, PatientProfile};

const TOOL: &str = "anesthesia-gas-monitor";
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Request payload for a combined technical and clinical evaluation.
#[derive(Debug, Deserialize, Serialize)]
pub struct EvaluateRequest {
    pub flows: FlowInputs,
    pub patient: PatientProfile,
}

/// Analysis result tagged with the tool and a fingerprint of the request.
#[derive(Debug, Serialize)]
pub struct GasReport {
    pub tool: &'static str,
    pub tool_version: &'static str,
    /// SHA256 hash of the request body
    pub input_hash: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

/// Create the gas router with all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/limits", get(limits))
        .route("/analyze", post(analyze))
        .route("/evaluate", post(evaluate))
}

/// Compute SHA256 hash of input string.
fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let digest = hasher.finalize();
    format!("sha256:{}", hex::encode(digest))
}

fn report<T: Serialize>(request: &T, result: AnalysisResult) -> GasReport {
    let input_json = serde_json::to_string(request).unwrap_or_default();
    GasReport {
        tool: TOOL,
        tool_version: TOOL_VERSION,
        input_hash: sha256_hex(&input_json),
        result,
    }
}

fn rejection(error: ValidationError) -> ApiError {
    tracing::warn!("Rejected gas configuration: {}", error);
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({
            "error": error.to_string(),
            "tool": TOOL,
            "tool_version": TOOL_VERSION
        })),
    )
}

fn log_result(result: &AnalysisResult) {
    tracing::info!(
        status = %result.status,
        category = %result.category,
        fio2 = result.metrics.fio2,
        total_flow = result.metrics.total_flow,
        alerts = result.alerts.len(),
        warnings = result.warnings.len(),
        "Gas configuration evaluated"
    );
}

/// Health check for the evaluation engine.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "gas-safety",
        "version": TOOL_VERSION
    }))
}

/// Fixed thresholds applied by the analyzer and the clinical rules.
async fn limits() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "technical": {
            "air_o2_fraction": analyzer::AIR_O2_FRACTION,
            "hypoxic_fio2_percent": analyzer::HYPOXIC_FIO2_PERCENT,
            "low_flow_l_min": analyzer::LOW_FLOW_L_MIN,
            "high_agent_percent": analyzer::HIGH_AGENT_PERCENT
        },
        "clinical": {
            "base_fio2_floor": clinical::BASE_FIO2_FLOOR,
            "raised_fio2_floor": clinical::RAISED_FIO2_FLOOR,
            "infant_age": clinical::INFANT_AGE,
            "elderly_age": clinical::ELDERLY_AGE,
            "raised_floor_asa_class": 3,
            "low_weight_kg": clinical::LOW_WEIGHT_KG,
            "sensitive_agent_percent": clinical::SENSITIVE_AGENT_PERCENT,
            "low_compliance": clinical::LOW_COMPLIANCE
        }
    }))
}

/// Classify a fresh gas configuration without patient data.
async fn analyze(Json(request): Json<FlowInputs>) -> Result<Json<GasReport>, ApiError> {
    request.validate().map_err(rejection)?;

    let result = analyzer::analyze(request.o2, request.n2o, request.air, request.agent_percent);
    log_result(&result);

    Ok(Json(report(&request, result)))
}

/// Classify a configuration and add patient-specific warnings.
async fn evaluate(Json(request): Json<EvaluateRequest>) -> Result<Json<GasReport>, ApiError> {
    let result = analyzer::evaluate(&request.flows, &request.patient).map_err(rejection)?;
    log_result(&result);

    Ok(Json(report(&request, result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_input_hash() {
        let hash = sha256_hex(r#"{"test": true}"#);
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), 7 + 64); // "sha256:" + 64 hex chars
    }

    #[tokio::test]
    async fn test_analyze_safe_mix() {
        let (status, body) = post_json(
            "/analyze",
            serde_json::json!({"o2": 2.0, "n2o": 2.0, "air": 0.0, "agent_percent": 2.0}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PASS");
        assert_eq!(body["category"], "SAFE");
        assert_eq!(body["metrics"]["fio2"], 50.0);
        assert_eq!(body["metrics"]["total_flow"], 4.0);
        assert_eq!(body["tool"], TOOL);
        assert!(body["input_hash"].as_str().unwrap().starts_with("sha256:"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_analyze_no_flow() {
        let (status, body) = post_json(
            "/analyze",
            serde_json::json!({"o2": 0.0, "n2o": 0.0, "air": 0.0, "agent_percent": 0.0}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "FAIL");
        assert_eq!(body["category"], "CRITICAL");
        assert_eq!(body["alerts"][0]["kind"], "no_fresh_gas_flow");
        assert_eq!(
            body["alerts"][0]["message"],
            "CRITICAL: No fresh gas flow detected."
        );
        assert_eq!(body["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_analyze_rejects_negative_flow() {
        let (status, body) = post_json(
            "/analyze",
            serde_json::json!({"o2": -1.0, "n2o": 2.0, "air": 0.0, "agent_percent": 2.0}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("o2"));
    }

    #[tokio::test]
    async fn test_evaluate_merges_warnings() {
        let (status, body) = post_json(
            "/evaluate",
            serde_json::json!({
                "flows": {"o2": 2.0, "n2o": 0.0, "air": 0.0, "agent_percent": 9.0},
                "patient": {"age": 70, "weight": 45, "compliance": 20, "asa": 3}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "WARNING");
        let kinds: Vec<&str> = body["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["kind"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "high_agent_concentration",
                "agent_sensitivity",
                "low_lung_compliance"
            ]
        );
    }

    #[tokio::test]
    async fn test_evaluate_rejects_unknown_asa_class() {
        let request = Request::builder()
            .method("POST")
            .uri("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "flows": {"o2": 2.0, "n2o": 2.0, "air": 0.0, "agent_percent": 2.0},
                    "patient": {"age": 30, "weight": 70, "compliance": 50, "asa": 6}
                })
                .to_string(),
            ))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_limits() {
        let request = Request::builder()
            .uri("/limits")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["technical"]["hypoxic_fio2_percent"], 25.0);
        assert_eq!(body["clinical"]["elderly_age"], 65);
    }
}
