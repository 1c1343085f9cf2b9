use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::models::DefenderPlan;

pub async fn get_plans(State(state): State<AppState>) -> Result<Json<Vec<DefenderPlan>>, ApiError> {
    state
        .aggregator
        .plans()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_relay(e, "Failed to fetch Defender plans"))
}
