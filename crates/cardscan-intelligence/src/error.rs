use cardscan_core::ServiceError;
use thiserror::Error;

/// Document Intelligence client errors
#[derive(Debug, Error)]
pub enum IntelligenceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Document Intelligence API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Analyze response has no Operation-Location header")]
    MissingOperationLocation,

    #[error("Analysis failed: {code}: {message}")]
    AnalysisFailed { code: String, message: String },

    #[error("Analysis was canceled")]
    Canceled,

    #[error("Analysis did not finish after {attempts} polls")]
    PollLimitExceeded { attempts: u32 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl IntelligenceError {
    /// Classify into the failure kind reported to extractor callers.
    pub fn into_service_error(self) -> ServiceError {
        match self {
            IntelligenceError::Configuration(msg) => ServiceError::configuration(msg),
            other => ServiceError::document_intelligence(other.to_string()),
        }
    }
}

impl From<IntelligenceError> for ServiceError {
    fn from(err: IntelligenceError) -> Self {
        err.into_service_error()
    }
}
