use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the returned URL grants read access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Time-limited, read-only signed URL
    Signed,
    /// Permanent URL; only readable when the container allows anonymous reads
    Direct,
}

/// Outcome of a successful upload. Consumed immediately by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResult {
    pub blob_name: String,
    pub url: String,
    pub storage_kind: StorageKind,
}

impl UploadResult {
    pub fn signed(blob_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            blob_name: blob_name.into(),
            url: url.into(),
            storage_kind: StorageKind::Signed,
        }
    }

    pub fn direct(blob_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            blob_name: blob_name.into(),
            url: url.into(),
            storage_kind: StorageKind::Direct,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.storage_kind == StorageKind::Signed
    }
}
