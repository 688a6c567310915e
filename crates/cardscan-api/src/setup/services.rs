//! Service initialization and application state setup

use anyhow::{Context, Result};
use cardscan_core::Config;
use cardscan_intelligence::{DocumentAnalyzer, DocumentExtractor, DocumentIntelligenceClient};
use cardscan_storage::{BlobStore, BlobUploader, StorageBackend};
use std::sync::Arc;
use std::time::Duration;

use crate::services::CardScanService;
use crate::state::AppState;

pub fn setup_analyzer(config: &Config) -> Result<Arc<dyn DocumentAnalyzer>> {
    let client = DocumentIntelligenceClient::new(config.intelligence.clone())
        .context("Failed to initialize Document Intelligence client")?;
    Ok(Arc::new(client))
}

/// Wire the pipeline over the given storage handle and analyzer.
pub fn initialize_services(
    config: &Config,
    storage: Arc<dyn BlobStore>,
    analyzer: Arc<dyn DocumentAnalyzer>,
) -> Arc<AppState> {
    let sas_expiry = match &config.storage {
        cardscan_core::StorageConfig::Azure(azure) => {
            Duration::from_secs(azure.sas_expiry_hours.saturating_mul(3600))
        }
        cardscan_core::StorageConfig::Local(_) => Duration::ZERO,
    };
    if storage.backend_type() == StorageBackend::Local {
        tracing::debug!("Local storage serves direct URLs only");
    }

    let uploader = BlobUploader::new(storage, sas_expiry);
    let extractor = DocumentExtractor::new(analyzer);
    let scanner = CardScanService::new(uploader, extractor);

    Arc::new(AppState::new(config.clone(), scanner))
}
