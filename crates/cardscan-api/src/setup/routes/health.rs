//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

pub async fn liveness_check(_state: Arc<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe: storage must accept the container; the document service is
/// reported by configuration only, since probing it costs an analysis call.
pub async fn readiness_check(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    let storage = state.storage();
    let mut response = serde_json::json!({
        "status": "ready",
        "storage": {
            "backend": storage.backend_type(),
            "container": storage.container(),
            "status": "unknown",
        },
        "document_intelligence": {
            "endpoint": state.config.intelligence.endpoint,
            "model_id": state.config.intelligence.model_id,
            "api_version": state.config.intelligence.api_version,
        },
    });

    let mut overall_ready = true;
    match tokio::time::timeout(TIMEOUT, storage.ensure_container()).await {
        Ok(Ok(_)) => response["storage"]["status"] = serde_json::json!("ready"),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Storage readiness check failed");
            response["storage"]["status"] = serde_json::json!("not_ready");
            overall_ready = false;
        }
        Err(_) => {
            tracing::error!("Storage readiness check timed out");
            response["storage"]["status"] = serde_json::json!("timeout");
            overall_ready = false;
        }
    }

    let status_code = if overall_ready {
        StatusCode::OK
    } else {
        response["status"] = serde_json::json!("not_ready");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
