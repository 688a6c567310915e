//! Error types module
//!
//! Two layers of error live here. `ServiceError` is the tagged failure that the
//! storage uploader and the document extractor hand back to their callers: it
//! only distinguishes a configuration problem from a provider problem.
//! `AppError` is the HTTP-facing error used by the API, and self-describes its
//! status code, error code and client message through `ErrorMetadata`.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Remote service a provider failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Storage,
    DocumentIntelligence,
}

impl Display for ServiceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ServiceKind::Storage => write!(f, "storage"),
            ServiceKind::DocumentIntelligence => write!(f, "document intelligence"),
        }
    }
}

/// Failure returned by the storage uploader and the document extractor.
///
/// Neither variant is retried by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A required setting or input is missing or malformed. Detected before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote service rejected the call or the transport failed.
    #[error("{service} provider error: {message}")]
    Provider { service: ServiceKind, message: String },
}

impl ServiceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ServiceError::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ServiceError::Provider {
            service: ServiceKind::Storage,
            message: message.into(),
        }
    }

    pub fn document_intelligence(message: impl Into<String>) -> Self {
        ServiceError::Provider {
            service: ServiceKind::DocumentIntelligence,
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ServiceError::Configuration(_))
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, ServiceError::Provider { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Document analysis error: {0}")]
    DocumentAnalysis(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Configuration(msg) => AppError::Configuration(msg),
            ServiceError::Provider {
                service: ServiceKind::Storage,
                message,
            } => AppError::Storage(message),
            ServiceError::Provider {
                service: ServiceKind::DocumentIntelligence,
                message,
            } => AppError::DocumentAnalysis(message),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Configuration(_) => (
            500,
            "CONFIGURATION_ERROR",
            false,
            Some("Contact the service operator"),
            true,
            LogLevel::Error,
        ),
        AppError::Storage(_) => (
            502,
            "STORAGE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::DocumentAnalysis(_) => (
            502,
            "DOCUMENT_ANALYSIS_ERROR",
            true,
            Some("Retry with a clearer image of the card"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Configuration(_) => "Configuration",
            AppError::Storage(_) => "Storage",
            AppError::DocumentAnalysis(_) => "DocumentAnalysis",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        // Provider text never reaches the client.
        match self {
            AppError::Configuration(_) => "Service is not configured correctly".to_string(),
            AppError::Storage(_) => "Failed to upload the file to storage".to_string(),
            AppError::DocumentAnalysis(_) => "Failed to analyze the document".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
