//! SharedKey request signing for the Blob service REST calls that
//! `object_store` does not cover (container provisioning).

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::traits::{StorageError, StorageResult};

/// Base64 HMAC-SHA256 of `message` under the decoded account key.
pub(crate) fn hmac_sha256_base64(key: &[u8], message: &str) -> StorageResult<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| StorageError::SigningUnavailable(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

pub(crate) fn decode_account_key(account_key: &str) -> StorageResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(account_key.trim())
        .map_err(|_| StorageError::SigningUnavailable("account key is not valid base64".to_string()))
}

/// Blob service string-to-sign for a request without a body other than its length.
///
/// `ms_headers` are the `x-ms-*` headers sent with the request, `path` is the
/// URL path (which for the emulator already starts with the account) and
/// `query` the request's query parameters.
pub(crate) fn string_to_sign(
    verb: &str,
    content_length: u64,
    ms_headers: &[(&str, &str)],
    account: &str,
    path: &str,
    query: &[(&str, &str)],
) -> String {
    let length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };

    // Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range
    let standard = [
        verb, "", "", length.as_str(), "", "", "", "", "", "", "", "",
    ];

    let mut headers: Vec<(String, &str)> = ms_headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim()))
        .collect();
    headers.sort_by(|a, b| a.0.cmp(&b.0));
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect();

    let mut params: Vec<(String, &str)> = query
        .iter()
        .map(|(name, value)| (name.to_lowercase(), *value))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));
    let mut canonical_resource = format!("/{}{}", account, path);
    for (name, value) in params {
        canonical_resource.push_str(&format!("\n{}:{}", name, value));
    }

    format!(
        "{}\n{}{}",
        standard.join("\n"),
        canonical_headers,
        canonical_resource
    )
}

/// `Authorization` header value for a SharedKey-signed request.
pub(crate) fn authorization_header(
    account: &str,
    key: &[u8],
    string_to_sign: &str,
) -> StorageResult<String> {
    let signature = hmac_sha256_base64(key, string_to_sign)?;
    Ok(format!("SharedKey {}:{}", account, signature))
}
