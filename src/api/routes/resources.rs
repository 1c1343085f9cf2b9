use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::models::{DateRangeRequest, TopResource};
use super::date_range;

const FAILURE_MESSAGE: &str = "Failed to fetch top resources";

pub async fn get_top_resources(
    State(state): State<AppState>,
    body: Result<Json<DateRangeRequest>, JsonRejection>,
) -> Result<Json<Vec<TopResource>>, ApiError> {
    let range = date_range(body).map_err(|e| ApiError::from_relay(e, FAILURE_MESSAGE))?;

    state
        .aggregator
        .top_resources(&range)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_relay(e, FAILURE_MESSAGE))
}
