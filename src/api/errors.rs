use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::errors::RelayError;
use super::models::ErrorResponse;

/// Error returned by a handler. Only validation messages reach the caller;
/// everything else is answered with the handler's generic message and
/// logged in full.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn from_relay(err: RelayError, failure_message: &str) -> Self {
        let class = err.classify();
        if err.is_client_error() {
            return Self {
                status: class.status,
                message: match err {
                    RelayError::Validation(msg) => msg,
                    other => other.to_string(),
                },
            };
        }

        error!(
            error_type = class.kind.as_str(),
            error = %err,
            "{}", failure_message
        );
        Self {
            status: class.status,
            message: failure_message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}
