//! OpenAPI documentation for the JSON surface.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use cardscan_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cardscan API",
        version = "0.1.0",
        description = "Credit card image analysis: uploads the image to blob storage, extracts fields with the Document Intelligence prebuilt credit card model and validates them."
    ),
    paths(handlers::cards::analyze_card),
    components(schemas(
        handlers::cards::ScanResponse,
        models::CardField,
        models::ExtractedFields,
        models::FieldVerdict,
        models::StorageKind,
        models::ValidationReport,
        models::ValidationStatus,
        error::ErrorResponse,
    )),
    tags((name = "cards", description = "Card upload and validation"))
)]
pub struct ApiDoc;
