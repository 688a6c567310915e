//! HTTP error response conversion
//!
//! JSON handlers return `Result<impl IntoResponse, HttpAppError>`; any
//! `AppError` renders with the same status, body shape and log level.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cardscan_core::{AppError, ErrorMetadata, LogLevel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(error: &AppError, with_details: bool) -> Self {
        Self {
            error: error.client_message(),
            details: with_details.then(|| error.detailed_message()),
            error_type: with_details.then(|| error.error_type().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper so `AppError` from `cardscan-core` can implement `IntoResponse`
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    /// Production hides `details` and `error_type` for every error.
    pub production: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, production: bool) -> Self {
        Self { error, production }
    }
}

pub(crate) fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

pub(crate) fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;
        log_error(app_error);

        // Details never leave the process in production or for sensitive errors.
        let with_details = !self.production && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, with_details);

        (status_of(app_error), Json(body)).into_response()
    }
}
