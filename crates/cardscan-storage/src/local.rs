use crate::keys::{encode_blob_path, validate_blob_name};
use crate::traits::{BlobStore, ContainerStatus, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// The container is a directory under `base_path`. URLs are always direct;
/// this backend cannot sign.
#[derive(Clone)]
pub struct LocalBlobStorage {
    base_path: PathBuf,
    base_url: String,
    container: String,
}

impl LocalBlobStorage {
    /// Create a new LocalBlobStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blobs (e.g., "/var/lib/cardscan/blobs")
    /// * `base_url` - Base URL for serving blobs (e.g., "http://localhost:8501/blobs")
    /// * `container` - Directory name under `base_path`
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        container: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        if container.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Container name not configured".to_string(),
            ));
        }
        validate_blob_name(&container)?;

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStorage {
            base_path,
            base_url,
            container,
        })
    }

    fn container_path(&self) -> PathBuf {
        self.base_path.join(&self.container)
    }

    fn blob_path(&self, blob_name: &str) -> StorageResult<PathBuf> {
        validate_blob_name(blob_name)?;
        Ok(self.container_path().join(blob_name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStorage {
    async fn ensure_container(&self) -> StorageResult<ContainerStatus> {
        let path = self.container_path();
        if fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(container = %self.container, "Container already exists");
            return Ok(ContainerStatus::AlreadyExists);
        }
        fs::create_dir_all(&path).await?;
        tracing::info!(container = %self.container, path = %path.display(), "Container created");
        Ok(ContainerStatus::Created)
    }

    async fn put_blob(
        &self,
        blob_name: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.blob_path(blob_name)?;
        let size = data.len();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            container = %self.container,
            blob_name = %blob_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local blob write successful"
        );

        Ok(())
    }

    async fn blob_size(&self, blob_name: &str) -> StorageResult<u64> {
        let path = self.blob_path(blob_name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(blob_name.to_string()))
            }
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn signed_url(&self, _blob_name: &str, _expires_in: Duration) -> StorageResult<String> {
        Err(StorageError::SigningUnavailable(
            "local storage serves direct URLs only".to_string(),
        ))
    }

    fn direct_url(&self, blob_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            encode_blob_path(&self.container),
            encode_blob_path(blob_name)
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    fn container(&self) -> &str {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn storage(dir: &TempDir) -> LocalBlobStorage {
        LocalBlobStorage::new(
            dir.path(),
            "http://localhost:8501/blobs/".to_string(),
            "cards".to_string(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn container_creation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert_eq!(storage.ensure_container().await.unwrap(), ContainerStatus::Created);
        assert_eq!(
            storage.ensure_container().await.unwrap(),
            ContainerStatus::AlreadyExists
        );
        assert!(dir.path().join("cards").is_dir());
    }

    #[tokio::test]
    async fn writes_and_measures_blob() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        storage.ensure_container().await.unwrap();
        storage
            .put_blob("card.png", Bytes::from_static(b"\x89PNG data"), "image/png")
            .await
            .unwrap();
        assert_eq!(storage.blob_size("card.png").await.unwrap(), 9);
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert!(matches!(
            storage.blob_size("ghost.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert!(matches!(
            storage
                .put_blob("../escape.png", Bytes::from_static(b"x"), "image/png")
                .await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn urls_are_direct() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir).await;
        assert_eq!(
            storage.direct_url("a card.jpg"),
            "http://localhost:8501/blobs/cards/a%20card.jpg"
        );
        assert!(matches!(
            storage.signed_url("a card.jpg", Duration::from_secs(60)).await,
            Err(StorageError::SigningUnavailable(_))
        ));
    }
}
