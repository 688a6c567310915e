//! Multipart extraction and upload checks shared by the page and JSON handlers

use axum::extract::Multipart;
use bytes::Bytes;
use cardscan_core::{AppError, UploadLimits};
use std::path::Path;
use uuid::Uuid;

use crate::services::UploadedFile;

const MAX_FILENAME_LENGTH: usize = 255;

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<(Bytes, String, String), AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file_data.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }
        filename = field.file_name().map(str::to_string);
        content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;
        file_data = Some(data);
    }

    let file_data =
        file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    let filename = filename.unwrap_or_else(|| "unknown".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((file_data, filename, content_type))
}

/// Read the `file` field and run every upload check against `limits`.
pub async fn read_card_upload(
    multipart: Multipart,
    limits: &UploadLimits,
) -> Result<UploadedFile, AppError> {
    let (data, file_name, content_type) = extract_multipart_file(multipart).await?;

    if data.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }
    validate_file_size(data.len(), limits.max_file_size_bytes)?;
    validate_file_extension(&file_name, &limits.allowed_extensions)?;
    validate_content_type(&content_type, &limits.allowed_content_types)?;

    tracing::debug!(
        file_name = %file_name,
        content_type = %content_type,
        size_bytes = data.len(),
        "Card upload accepted"
    );

    Ok(UploadedFile {
        data,
        file_name,
        content_type: normalize_mime_type(&content_type).to_lowercase(),
    })
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Strip MIME parameters ("image/jpeg; q=1" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or(content_type)
}

pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Returns the lower-cased extension when it is allowlisted.
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension.is_empty() || !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Reduce a client file name to a safe blob name component.
///
/// Directory parts are dropped, anything outside ASCII alphanumerics, `.`,
/// `-` and `_` becomes `_`, and runs of `..` collapse to `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mapped: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    // Blob names may not contain `..`.
    let sanitized = mapped.replace("..", "_");

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return "file".to_string();
    }

    sanitized
}

/// Unique blob name for an upload: `{uuid}_{sanitized name}`.
pub fn blob_name_for(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename))
}
