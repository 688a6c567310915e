//! Storage abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use cardscan_core::ServiceError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid blob name: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Cannot sign URL: {0}")]
    SigningUnavailable(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Classify into the failure kind reported to uploader callers.
    pub fn into_service_error(self) -> ServiceError {
        match self {
            StorageError::ConfigError(msg) => ServiceError::configuration(msg),
            StorageError::InvalidKey(msg) => {
                ServiceError::configuration(format!("Invalid blob name: {}", msg))
            }
            StorageError::SigningUnavailable(msg) => {
                ServiceError::configuration(format!("Cannot sign URL: {}", msg))
            }
            other => ServiceError::storage(other.to_string()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        err.into_service_error()
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Outcome of provisioning the destination container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    AlreadyExists,
}

/// Storage abstraction trait
///
/// Each store is bound to one container. Handles are cheap to share across
/// requests and carry no per-request state.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container if it does not exist yet. Idempotent.
    async fn ensure_container(&self) -> StorageResult<ContainerStatus>;

    /// Write a blob, replacing any existing blob with the same name.
    async fn put_blob(&self, blob_name: &str, data: Bytes, content_type: &str)
        -> StorageResult<()>;

    /// Fetch the blob's properties and return its size in bytes.
    async fn blob_size(&self, blob_name: &str) -> StorageResult<u64>;

    /// Time-limited, read-only URL for the blob.
    ///
    /// Returns `SigningUnavailable` when the backend has no signing credentials.
    async fn signed_url(&self, blob_name: &str, expires_in: Duration) -> StorageResult<String>;

    /// Permanent URL for the blob; readable only if the container allows it.
    fn direct_url(&self, blob_name: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    fn container(&self) -> &str;
}
