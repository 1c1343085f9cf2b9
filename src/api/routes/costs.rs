use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::models::{CostReport, DateRangeRequest};
use super::date_range;

const FAILURE_MESSAGE: &str = "Failed to fetch cost data";

pub async fn get_costs(
    State(state): State<AppState>,
    body: Result<Json<DateRangeRequest>, JsonRejection>,
) -> Result<Json<CostReport>, ApiError> {
    let range = date_range(body).map_err(|e| ApiError::from_relay(e, FAILURE_MESSAGE))?;

    state
        .aggregator
        .costs(&range)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_relay(e, FAILURE_MESSAGE))
}
