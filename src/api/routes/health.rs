use axum::{extract::State, Json};

use crate::api::models::HealthResponse;
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "costrelay",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.aggregator.backend_name().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
