pub mod health;
pub mod costs;
pub mod resources;
pub mod plans;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::errors::RelayError;
use crate::models::{DateRange, DateRangeRequest};

/// Resolve a date-range body. A body that is absent or not valid JSON is
/// treated as an empty request, so the caller gets the same 400.
pub(crate) fn date_range(body: Result<Json<DateRangeRequest>, JsonRejection>) -> Result<DateRange, RelayError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    DateRange::try_from(req)
}
