//! Upload contract on top of a [`BlobStore`].

use crate::traits::BlobStore;
use bytes::Bytes;
use cardscan_core::{ServiceError, UploadResult};
use std::sync::Arc;
use std::time::Duration;

/// Persists card images and returns a URL the extractor can read.
///
/// Uploads always overwrite: re-using a blob name silently replaces the
/// previous content.
#[derive(Clone)]
pub struct BlobUploader {
    store: Arc<dyn BlobStore>,
    sas_expiry: Duration,
}

impl BlobUploader {
    pub fn new(store: Arc<dyn BlobStore>, sas_expiry: Duration) -> Self {
        Self { store, sas_expiry }
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Upload `data` as `blob_name` and return a signed URL, or a direct URL
    /// when signing is not possible.
    ///
    /// Empty input is rejected before any storage call is made.
    pub async fn upload(
        &self,
        data: Bytes,
        blob_name: &str,
        content_type: &str,
    ) -> Result<UploadResult, ServiceError> {
        if data.is_empty() {
            tracing::error!(blob_name = %blob_name, "Refusing to upload an empty file");
            return Err(ServiceError::configuration("file content is empty"));
        }
        if blob_name.trim().is_empty() {
            tracing::error!("Refusing to upload without a blob name");
            return Err(ServiceError::configuration("blob name is empty"));
        }

        let container = self.store.container().to_string();

        self.store.ensure_container().await.map_err(|e| {
            tracing::error!(error = %e, container = %container, "Failed to provision container");
            e.into_service_error()
        })?;

        self.store
            .put_blob(blob_name, data, content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    container = %container,
                    blob_name = %blob_name,
                    "Failed to upload blob"
                );
                e.into_service_error()
            })?;

        let size = self.store.blob_size(blob_name).await.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %container,
                blob_name = %blob_name,
                "Uploaded blob is not retrievable"
            );
            e.into_service_error()
        })?;
        tracing::info!(
            container = %container,
            blob_name = %blob_name,
            size_bytes = size,
            "Blob uploaded"
        );

        match self.store.signed_url(blob_name, self.sas_expiry).await {
            Ok(url) => {
                tracing::debug!(blob_name = %blob_name, expiry_secs = self.sas_expiry.as_secs(), "Signed URL generated");
                Ok(UploadResult::signed(blob_name, url))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    blob_name = %blob_name,
                    "Signed URL unavailable, falling back to direct URL (container must allow public read)"
                );
                Ok(UploadResult::direct(blob_name, self.store.direct_url(blob_name)))
            }
        }
    }
}
