//! Shared blob-name rules for storage backends.

use crate::traits::{StorageError, StorageResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Encodes everything except RFC 3986 unreserved characters.
pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Reject names that are empty or could escape the container.
pub fn validate_blob_name(blob_name: &str) -> StorageResult<()> {
    if blob_name.trim().is_empty() {
        return Err(StorageError::InvalidKey("blob name is empty".to_string()));
    }
    if blob_name.contains("..") || blob_name.starts_with('/') || blob_name.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "blob name '{}' contains invalid characters",
            blob_name
        )));
    }
    Ok(())
}

/// Percent-encode a blob name for use in a URL path, keeping `/` separators.
pub fn encode_blob_path(blob_name: &str) -> String {
    blob_name
        .split('/')
        .map(|segment| utf8_percent_encode(segment, UNRESERVED).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_empty_names() {
        assert!(validate_blob_name("").is_err());
        assert!(validate_blob_name("  ").is_err());
        assert!(validate_blob_name("../secret.png").is_err());
        assert!(validate_blob_name("/abs.png").is_err());
        assert!(validate_blob_name("dir\\card.png").is_err());
        assert!(validate_blob_name("card.png").is_ok());
        assert!(validate_blob_name("2024/card.png").is_ok());
    }

    #[test]
    fn encodes_spaces_and_unicode_but_keeps_separators() {
        assert_eq!(encode_blob_path("my card.png"), "my%20card.png");
        assert_eq!(encode_blob_path("a/b c.jpg"), "a/b%20c.jpg");
        assert_eq!(encode_blob_path("cartão.png"), "cart%C3%A3o.png");
        assert_eq!(encode_blob_path("x_y-z~1.png"), "x_y-z~1.png");
    }
}
