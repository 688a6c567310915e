//! Read-only service SAS for a single blob.

use chrono::{DateTime, Utc};
use percent_encoding::utf8_percent_encode;

use super::shared_key::{decode_account_key, hmac_sha256_base64};
use crate::keys::UNRESERVED;
use crate::traits::StorageResult;

pub const SAS_VERSION: &str = "2022-11-02";

/// Signing material for service SAS tokens
#[derive(Clone)]
pub struct SasCredentials {
    pub account_name: String,
    pub account_key: String,
}

impl std::fmt::Debug for SasCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasCredentials")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

fn format_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// String-to-sign for a blob service SAS (version 2020-12-06 and later).
pub(crate) fn string_to_sign(
    permissions: &str,
    expiry: &str,
    account: &str,
    container: &str,
    blob: &str,
) -> String {
    let canonical_resource = format!("/blob/{}/{}/{}", account, container, blob);
    [
        permissions,
        "", // signedStart
        expiry,
        canonical_resource.as_str(),
        "", // signedIdentifier
        "", // signedIP
        "", // signedProtocol
        SAS_VERSION,
        "b", // signedResource
        "", // signedSnapshotTime
        "", // signedEncryptionScope
        "", // rscc
        "", // rscd
        "", // rsce
        "", // rscl
        "", // rsct
    ]
    .join("\n")
}

/// Query string granting read access to `container/blob` until `expires_at`.
pub fn blob_read_sas(
    credentials: &SasCredentials,
    container: &str,
    blob: &str,
    expires_at: DateTime<Utc>,
) -> StorageResult<String> {
    let key = decode_account_key(&credentials.account_key)?;
    let expiry = format_expiry(expires_at);
    let sts = string_to_sign("r", &expiry, &credentials.account_name, container, blob);
    let signature = hmac_sha256_base64(&key, &sts)?;

    Ok(format!(
        "sp=r&se={}&sv={}&sr=b&sig={}",
        utf8_percent_encode(&expiry, UNRESERVED),
        SAS_VERSION,
        utf8_percent_encode(&signature, UNRESERVED)
    ))
}
