#[cfg(feature = "storage-azure")]
use crate::AzureBlobStorage;
#[cfg(feature = "storage-local")]
use crate::LocalBlobStorage;
use crate::{BlobStore, StorageError, StorageResult};
use cardscan_core::StorageConfig;
use std::sync::Arc;
#[cfg(feature = "storage-azure")]
use std::time::Duration;

/// Create a storage backend based on configuration
///
/// Called once at startup; the returned handle is shared by every request.
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config {
        #[cfg(feature = "storage-azure")]
        StorageConfig::Azure(azure) => {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .map_err(|e| StorageError::ConfigError(e.to_string()))?;
            let storage = AzureBlobStorage::new(azure, http)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-azure"))]
        StorageConfig::Azure(_) => Err(StorageError::ConfigError(
            "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageConfig::Local(local) => {
            let storage = LocalBlobStorage::new(
                local.base_path.clone(),
                local.base_url.clone(),
                local.container_name.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageConfig::Local(_) => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use cardscan_core::{LocalStorageConfig, StorageBackend};

    #[tokio::test]
    async fn builds_local_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig::Local(LocalStorageConfig {
            base_path: dir.path().display().to_string(),
            base_url: "http://localhost:8501/blobs".to_string(),
            container_name: "cards".to_string(),
        });
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.container(), "cards");
    }
}
