use axum::http::StatusCode;

use super::types::RelayError;

/// Coarse error taxonomy used for logging and for choosing a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    UpstreamAuth,
    UpstreamQuery,
    Unhandled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::UpstreamAuth => "UpstreamAuthError",
            ErrorKind::UpstreamQuery => "UpstreamQueryError",
            ErrorKind::Unhandled => "UnhandledError",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub kind: ErrorKind,
    pub status: StatusCode,
}

impl RelayError {
    /// Classify this error into its taxonomy kind and the HTTP status a
    /// handler should answer with.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            RelayError::Validation(_) => ErrorClassification {
                kind: ErrorKind::Validation,
                status: StatusCode::BAD_REQUEST,
            },
            RelayError::Config(_) => ErrorClassification {
                kind: ErrorKind::Configuration,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            RelayError::Authentication(_) => ErrorClassification {
                kind: ErrorKind::UpstreamAuth,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            RelayError::UpstreamQuery(_) => ErrorClassification {
                kind: ErrorKind::UpstreamQuery,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            RelayError::Network(_)
            | RelayError::Io(_)
            | RelayError::Json(_)
            | RelayError::Internal(_) => ErrorClassification {
                kind: ErrorKind::Unhandled,
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.classify().status.is_client_error()
    }
}
