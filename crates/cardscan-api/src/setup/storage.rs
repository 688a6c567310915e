//! Storage setup and initialization

use anyhow::{Context, Result};
use cardscan_core::Config;
use cardscan_storage::{create_storage, BlobStore};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!("Initializing blob storage...");
    let storage = create_storage(&config.storage)
        .await
        .context("Failed to initialize blob storage")?;
    tracing::info!(
        backend = %storage.backend_type(),
        container = %storage.container(),
        "Blob storage initialized"
    );
    Ok(storage)
}
