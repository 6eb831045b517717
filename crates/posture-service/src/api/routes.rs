use crate::error::ApiError;
use crate::state::PostureServiceState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::posture::{AnalyzeImageRequest, PostureVerdict};
use common::vision::AnnotateResponse;
use serde_json::json;

/// Analyze a base64 encoded photograph
pub async fn analyze_image(
    State(state): State<PostureServiceState>,
    Json(request): Json<AnalyzeImageRequest>,
) -> Result<Json<PostureVerdict>, ApiError> {
    let verdict = state.analyze_image(&request.image).await.map_err(|e| {
        tracing::error!("Failed to analyze image: {}", e);
        e
    })?;
    Ok(Json(verdict))
}

/// Score a vision provider response the caller fetched itself
pub async fn analyze_annotations(
    State(state): State<PostureServiceState>,
    Json(response): Json<AnnotateResponse>,
) -> Result<Json<PostureVerdict>, ApiError> {
    Ok(Json(state.analyze_response(response)?))
}

/// Health check endpoint
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "posture-service"
        })),
    )
}

/// Readiness check endpoint
pub async fn readyz(State(state): State<PostureServiceState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "node_id": state.node_id(),
            "weights": state.engine().weights().as_array(),
        })),
    )
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics() -> impl IntoResponse {
    match telemetry::metrics::encode_metrics() {
        Ok(body) => body.into_response(),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics",
            )
                .into_response()
        }
    }
}
