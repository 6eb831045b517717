pub mod routes;

use crate::state::PostureServiceState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the API router
pub fn router(state: PostureServiceState) -> Router {
    Router::new()
        // Health and metrics endpoints
        .route("/healthz", get(routes::healthz))
        .route("/readyz", get(routes::readyz))
        .route("/metrics", get(routes::metrics))
        // Posture endpoints
        .route("/v1/posture/analyze", post(routes::analyze_image))
        .route("/v1/posture/annotations", post(routes::analyze_annotations))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(telemetry::correlation::propagate))
        .with_state(state)
}
