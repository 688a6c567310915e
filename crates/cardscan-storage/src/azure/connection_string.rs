//! Azure Storage connection string parsing.

use crate::traits::{StorageError, StorageResult};

const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
pub(crate) const EMULATOR_ACCOUNT: &str = "devstoreaccount1";
/// Published Azurite development key. Not a secret.
pub(crate) const EMULATOR_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const EMULATOR_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// Parsed `Key=Value;` connection string
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub protocol: String,
    pub account_name: String,
    pub account_key: Option<String>,
    pub endpoint_suffix: String,
    pub blob_endpoint: Option<String>,
    pub shared_access_signature: Option<String>,
    pub use_emulator: bool,
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("protocol", &self.protocol)
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("blob_endpoint", &self.blob_endpoint)
            .field(
                "shared_access_signature",
                &self.shared_access_signature.as_ref().map(|_| "<redacted>"),
            )
            .field("use_emulator", &self.use_emulator)
            .finish()
    }
}

impl ConnectionString {
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let mut protocol = None;
        let mut account_name = None;
        let mut account_key = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut sas = None;
        let mut use_emulator = false;

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Values (keys, SAS tokens) may themselves contain '='.
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::ConfigError(format!("Malformed connection string segment '{}'", pair))
            })?;
            let value = value.trim().to_string();
            match key.trim() {
                "DefaultEndpointsProtocol" => protocol = Some(value),
                "AccountName" => account_name = Some(value),
                "AccountKey" => account_key = Some(value),
                "EndpointSuffix" => endpoint_suffix = Some(value),
                "BlobEndpoint" => blob_endpoint = Some(value.trim_end_matches('/').to_string()),
                "SharedAccessSignature" => {
                    sas = Some(value.trim_start_matches('?').to_string())
                }
                "UseDevelopmentStorage" => use_emulator = value.eq_ignore_ascii_case("true"),
                other => tracing::debug!(key = %other, "Ignoring connection string key"),
            }
        }

        if use_emulator {
            return Ok(ConnectionString {
                protocol: "http".to_string(),
                account_name: EMULATOR_ACCOUNT.to_string(),
                account_key: Some(EMULATOR_ACCOUNT_KEY.to_string()),
                endpoint_suffix: DEFAULT_ENDPOINT_SUFFIX.to_string(),
                blob_endpoint: Some(EMULATOR_BLOB_ENDPOINT.to_string()),
                shared_access_signature: None,
                use_emulator: true,
            });
        }

        let account_name = account_name.filter(|a| !a.is_empty()).ok_or_else(|| {
            StorageError::ConfigError("Connection string has no AccountName".to_string())
        })?;
        let account_key = account_key.filter(|k| !k.is_empty());
        let shared_access_signature = sas.filter(|s| !s.is_empty());

        if account_key.is_none() && shared_access_signature.is_none() {
            return Err(StorageError::ConfigError(
                "Connection string has neither AccountKey nor SharedAccessSignature".to_string(),
            ));
        }

        Ok(ConnectionString {
            protocol: protocol.unwrap_or_else(|| "https".to_string()),
            account_name,
            account_key,
            endpoint_suffix: endpoint_suffix.unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_string()),
            blob_endpoint,
            shared_access_signature,
            use_emulator: false,
        })
    }

    /// Base URL of the blob service, without a trailing slash.
    pub fn blob_endpoint(&self) -> String {
        match &self.blob_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!(
                "{}://{}.blob.{}",
                self.protocol, self.account_name, self.endpoint_suffix
            ),
        }
    }

    /// True when the blob endpoint was set explicitly rather than derived.
    pub fn has_custom_endpoint(&self) -> bool {
        self.blob_endpoint.is_some() && !self.use_emulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_key_connection_string() {
        let cs = ConnectionString::parse(
            "DefaultEndpointsProtocol=https;AccountName=cardsacct;AccountKey=a2V5PT0=;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(cs.account_name, "cardsacct");
        assert_eq!(cs.account_key.as_deref(), Some("a2V5PT0="));
        assert_eq!(cs.blob_endpoint(), "https://cardsacct.blob.core.windows.net");
        assert!(!cs.has_custom_endpoint());
    }

    #[test]
    fn explicit_blob_endpoint_wins() {
        let cs = ConnectionString::parse(
            "AccountName=acct;SharedAccessSignature=?sv=2022-11-02&sig=abc%3D;BlobEndpoint=https://acct.example.net/",
        )
        .unwrap();
        assert_eq!(cs.blob_endpoint(), "https://acct.example.net");
        assert_eq!(
            cs.shared_access_signature.as_deref(),
            Some("sv=2022-11-02&sig=abc%3D")
        );
        assert!(cs.account_key.is_none());
        assert!(cs.has_custom_endpoint());
    }

    #[test]
    fn development_storage_shortcut() {
        let cs = ConnectionString::parse("UseDevelopmentStorage=true").unwrap();
        assert!(cs.use_emulator);
        assert_eq!(cs.account_name, "devstoreaccount1");
        assert_eq!(cs.blob_endpoint(), "http://127.0.0.1:10000/devstoreaccount1");
    }

    #[test]
    fn missing_account_or_credential_is_a_configuration_error() {
        assert!(matches!(
            ConnectionString::parse("AccountKey=abc"),
            Err(StorageError::ConfigError(_))
        ));
        assert!(matches!(
            ConnectionString::parse("AccountName=acct;EndpointSuffix=core.windows.net"),
            Err(StorageError::ConfigError(_))
        ));
        assert!(matches!(
            ConnectionString::parse("AccountName"),
            Err(StorageError::ConfigError(_))
        ));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let cs = ConnectionString::parse("AccountName=acct;AccountKey=c2VjcmV0").unwrap();
        assert!(!format!("{:?}", cs).contains("c2VjcmV0"));
    }
}
