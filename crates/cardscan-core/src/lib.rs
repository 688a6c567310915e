//! Cardscan Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! field validation rule shared by the storage, extraction and API crates.

pub mod config;
pub mod error;
pub mod locale;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{
    AzureStorageConfig, BaseConfig, Config, DocumentIntelligenceConfig, LocalStorageConfig,
    StorageConfig, UploadLimits,
};
pub use error::{AppError, ErrorMetadata, LogLevel, ServiceError, ServiceKind};
pub use locale::Locale;
pub use models::{
    CardField, ExtractedFields, FieldVerdict, StorageKind, UploadResult, ValidationReport,
    ValidationStatus,
};
pub use storage_types::StorageBackend;
pub use validation::{is_field_valid, validate};
