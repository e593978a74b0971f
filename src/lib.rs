//! Anesthesia Gas Monitor
//!
//! Decision-support calculator for anesthesia workstation gas settings.
//! Classifies fresh gas flow and vaporizer settings, adds patient-specific
//! advisories, and serves both as a JSON API and a monitor page.

use axum::{response::Json, routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

mod error;
pub mod gas;
mod routes;

/// Build the application router.
pub fn app() -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Gas safety API
        .nest("/api/gas", gas::router())
        // Monitor page
        .route("/", get(routes::monitor::show))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "anesthesia-gas-monitor",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_page(uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_page("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("healthy"));
    }

    #[tokio::test]
    async fn test_monitor_defaults_are_safe() {
        let (status, body) = get_page("/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SYSTEM STATUS: PASS (SAFE)"));
        assert!(body.contains("color: green;"));
        assert!(body.contains("50.0"));
        assert!(body.contains("System operating within safe clinical limits."));
    }

    #[tokio::test]
    async fn test_monitor_agent_metric_keeps_dial_value() {
        let (_, body) = get_page("/?agent=2").await;
        assert!(body.contains(r#"<div class="value">2.0</div>"#));

        let (_, body) = get_page("/?agent=2.25").await;
        assert!(body.contains(r#"<div class="value">2.25</div>"#));
    }

    #[tokio::test]
    async fn test_monitor_logic_summary_thresholds() {
        let (_, body) = get_page("/").await;

        assert!(body.contains("FiO₂ &lt; 25% → CRITICAL"));
        assert!(body.contains("Low flow &lt; 0.5 L/min → WARNING"));
        assert!(body.contains("Agent &gt; 8% → WARNING"));
        assert!(body.contains("FiO₂ floor raised to 30% for infants, age &gt; 65 or ASA ≥ 3"));
        assert!(body.contains("Agent &gt; 6% flagged"));
        assert!(body.contains("Compliance &lt; 30 mL/cmH₂O"));
    }

    #[tokio::test]
    async fn test_monitor_shows_critical_no_flow() {
        let (status, body) = get_page("/?o2=0&n2o=0&air=0&agent=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SYSTEM STATUS: FAIL (CRITICAL)"));
        assert!(body.contains("color: red;"));
        assert!(body.contains("CRITICAL: No fresh gas flow detected."));
        assert!(!body.contains("System operating within safe clinical limits."));
    }

    #[tokio::test]
    async fn test_monitor_lists_clinical_warnings() {
        let (status, body) =
            get_page("/?o2=2&n2o=0&air=0&agent=9&age=70&weight=45&compliance=20&asa=3").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SYSTEM STATUS: PASS (WARNING)"));
        assert!(body.contains("color: orange;"));
        assert!(body.contains("High anesthetic concentration (9.0%)."));
        assert!(body.contains("Low lung compliance. Monitor airway pressure closely."));
    }

    #[tokio::test]
    async fn test_monitor_rejects_bad_asa_class() {
        let (status, _) = get_page("/?asa=9").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_monitor_rejects_negative_flow() {
        let (status, body) = get_page("/?o2=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("o2"));
    }
}
