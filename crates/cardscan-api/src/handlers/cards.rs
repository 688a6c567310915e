//! JSON card analysis endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use cardscan_core::{ExtractedFields, StorageKind, ValidationReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ScanOutcome;
use crate::state::AppState;
use crate::utils::upload::read_card_upload;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScanResponse {
    /// Name of the file as sent by the client
    pub file_name: String,
    pub blob_name: String,
    /// URL the document service read the image from
    pub url: String,
    pub storage_kind: StorageKind,
    /// Every field the document service returned, including unknown ones
    pub fields: ExtractedFields,
    pub report: ValidationReport,
}

impl From<ScanOutcome> for ScanResponse {
    fn from(outcome: ScanOutcome) -> Self {
        Self {
            file_name: outcome.file_name,
            blob_name: outcome.upload.blob_name,
            url: outcome.upload.url,
            storage_kind: outcome.upload.storage_kind,
            fields: outcome.fields,
            report: outcome.report,
        }
    }
}

/// Upload a card image, extract its fields and validate them.
///
/// An analysis failure is not an error: the response carries no fields and a
/// `NONE` report.
#[utoipa::path(
    post,
    path = "/api/v1/cards/analyze",
    tag = "cards",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Card analyzed", body = ScanResponse),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Service misconfigured", body = ErrorResponse),
        (status = 502, description = "Storage upload failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "analyze_card"))]
pub async fn analyze_card(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ScanResponse>, HttpAppError> {
    let production = state.config.is_production();
    let reject = |error| HttpAppError::new(error, production);

    let file = read_card_upload(multipart, &state.config.uploads)
        .await
        .map_err(reject)?;
    let outcome = state.scanner.scan(file).await.map_err(reject)?;
    Ok(Json(outcome.into()))
}
