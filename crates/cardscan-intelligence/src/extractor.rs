use std::sync::Arc;

use async_trait::async_trait;
use cardscan_core::{ExtractedFields, ServiceError};

/// Backend that turns a readable document URL into extracted fields.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze_document(&self, source_url: &str) -> Result<ExtractedFields, ServiceError>;
}

/// Extraction entry point used by the scan pipeline.
///
/// `analyze` never fails: any configuration or provider failure is logged
/// and reported as "nothing detected". No retries are attempted.
#[derive(Clone)]
pub struct DocumentExtractor {
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl DocumentExtractor {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Analyze `source_url`, returning the classified failure on error.
    pub async fn try_analyze(&self, source_url: &str) -> Result<ExtractedFields, ServiceError> {
        if source_url.trim().is_empty() {
            return Err(ServiceError::configuration("document URL is empty"));
        }

        let fields = self.analyzer.analyze_document(source_url).await?;
        if fields.is_empty() {
            tracing::warn!(source_url = %source_url, "No credit card fields detected in image");
        } else {
            tracing::info!(
                source_url = %source_url,
                fields_extracted = fields.len(),
                "Credit card fields extracted"
            );
        }
        Ok(fields)
    }

    /// Analyze `source_url`; failures yield an empty mapping.
    pub async fn analyze(&self, source_url: &str) -> ExtractedFields {
        match self.try_analyze(source_url).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    source_url = %source_url,
                    configuration = e.is_configuration(),
                    "Document analysis failed"
                );
                ExtractedFields::new()
            }
        }
    }
}
