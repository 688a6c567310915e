//! Upload, extract and validate one card image.

use bytes::Bytes;
use cardscan_core::{
    validate, AppError, ExtractedFields, UploadResult, ValidationReport, ValidationStatus,
};
use cardscan_intelligence::DocumentExtractor;
use cardscan_storage::BlobUploader;
use std::time::Instant;

use crate::utils::upload::blob_name_for;

/// A card image that passed upload checks.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    /// Client-supplied name, before sanitization
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub file_name: String,
    pub upload: UploadResult,
    pub fields: ExtractedFields,
    pub report: ValidationReport,
}

#[derive(Clone)]
pub struct CardScanService {
    uploader: BlobUploader,
    extractor: DocumentExtractor,
}

impl CardScanService {
    pub fn new(uploader: BlobUploader, extractor: DocumentExtractor) -> Self {
        Self {
            uploader,
            extractor,
        }
    }

    pub fn uploader(&self) -> &BlobUploader {
        &self.uploader
    }

    /// Run the pipeline for one file.
    ///
    /// A failed upload is returned as an error and analysis is skipped. A failed
    /// analysis is not an error: the outcome carries no fields and a NONE report.
    pub async fn scan(&self, file: UploadedFile) -> Result<ScanOutcome, AppError> {
        let started = Instant::now();
        let blob_name = blob_name_for(&file.file_name);

        let upload = self
            .uploader
            .upload(file.data, &blob_name, &file.content_type)
            .await?;

        let fields = self.extractor.analyze(&upload.url).await;
        let report = validate(&fields);

        match report.status {
            ValidationStatus::Full => tracing::info!(
                blob_name = %upload.blob_name,
                valid_count = report.valid_count,
                total_count = report.total_count,
                duration_ms = started.elapsed().as_millis() as u64,
                "Card fully validated"
            ),
            ValidationStatus::Partial | ValidationStatus::None => tracing::warn!(
                blob_name = %upload.blob_name,
                status = ?report.status,
                valid_count = report.valid_count,
                total_count = report.total_count,
                duration_ms = started.elapsed().as_millis() as u64,
                "Card not fully validated"
            ),
        }

        Ok(ScanOutcome {
            file_name: file.file_name,
            upload,
            fields,
            report,
        })
    }
}
