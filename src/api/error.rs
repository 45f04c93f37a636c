//! HTTP mapping for [`crate::errors::Error`].
//!
//! Every failure is returned as `{"error": "<message>"}`.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Wrapper that turns a crate error into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self.0 {
            Error::DuplicateSin { .. } | Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Error::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            Error::Config { .. } | Error::Storage { .. } | Error::Io(_) | Error::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self.0 {
            Error::RecordNotFound { .. } => "Record not found".to_string(),
            Error::DuplicateSin { .. } => "SIN already exists".to_string(),
            Error::InvalidInput { message } => message.clone(),
            other => {
                error!("Request failed: {}", other);
                "Failed to process request".to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
