//! Cardscan Storage Library
//!
//! Blob storage for uploaded card images. The [`BlobStore`] trait is
//! implemented by the Azure Blob Storage backend and by a local filesystem
//! backend used in development and tests. [`BlobUploader`] drives a store
//! through the upload contract and hands back a readable URL.
//!
//! # Blob names
//!
//! Blob names are flat identifiers inside a single container. They must not be
//! empty, contain `..` or a backslash, or start with `/`. The checks live in
//! the `keys` module so every backend applies the same rules.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-azure")]
pub mod azure;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;
pub mod uploader;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStorage;
pub use cardscan_core::StorageBackend;
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStorage;
pub use traits::{BlobStore, ContainerStatus, StorageError, StorageResult};
pub use uploader::BlobUploader;
