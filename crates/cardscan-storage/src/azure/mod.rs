//! Azure Blob Storage backend
//!
//! Blob writes and property reads go through `object_store`'s Azure client.
//! Container provisioning is a single SharedKey-signed REST call, and read
//! URLs are service SAS tokens signed locally.

pub mod connection_string;
pub mod sas;
mod shared_key;

pub use connection_string::ConnectionString;
pub use sas::SasCredentials;

use crate::keys::{encode_blob_path, validate_blob_name};
use crate::traits::{BlobStore, ContainerStatus, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use cardscan_core::AzureStorageConfig;
use chrono::Utc;
use object_store::azure::{AzureConfigKey, MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use reqwest::StatusCode;
use std::time::Duration;

/// REST API version sent with container provisioning requests
const BLOB_API_VERSION: &str = "2022-11-02";

/// Azure Blob Storage implementation bound to one container
pub struct AzureBlobStorage {
    store: MicrosoftAzure,
    http: reqwest::Client,
    connection: ConnectionString,
    container: String,
    signing: Option<SasCredentials>,
}

impl AzureBlobStorage {
    /// Create a new AzureBlobStorage instance
    ///
    /// Signing credentials come only from the explicit account name and key
    /// settings; the connection string's key is used for writes and
    /// provisioning but never for signing read URLs.
    pub fn new(config: &AzureStorageConfig, http: reqwest::Client) -> StorageResult<Self> {
        if config.container_name.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Container name not configured".to_string(),
            ));
        }

        let connection = ConnectionString::parse(&config.connection_string)?;

        let mut builder = MicrosoftAzureBuilder::new()
            .with_account(connection.account_name.clone())
            .with_container_name(config.container_name.clone());

        if let Some(ref key) = connection.account_key {
            builder = builder.with_access_key(key.clone());
        } else if let Some(ref sas) = connection.shared_access_signature {
            builder = builder.with_config(AzureConfigKey::SasKey, sas.clone());
        }

        if connection.use_emulator {
            builder = builder.with_use_emulator(true);
        } else if connection.has_custom_endpoint() {
            let endpoint = connection.blob_endpoint();
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let signing = config
            .signing_credentials()
            .map(|(account_name, account_key)| SasCredentials {
                account_name: account_name.to_string(),
                account_key: account_key.to_string(),
            });

        tracing::info!(
            account = %connection.account_name,
            container = %config.container_name,
            endpoint = %connection.blob_endpoint(),
            signed_urls = signing.is_some(),
            "Azure Blob Storage initialized"
        );

        Ok(AzureBlobStorage {
            store,
            http,
            connection,
            container: config.container_name.clone(),
            signing,
        })
    }

    fn container_url(&self) -> String {
        format!(
            "{}/{}",
            self.connection.blob_endpoint(),
            encode_blob_path(&self.container)
        )
    }

    fn create_container_request(&self) -> StorageResult<reqwest::RequestBuilder> {
        let base = format!("{}?restype=container", self.container_url());
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        if let Some(ref key) = self.connection.account_key {
            let key = shared_key::decode_account_key(key).map_err(|_| {
                StorageError::ConfigError(
                    "AccountKey in connection string is not valid base64".to_string(),
                )
            })?;
            let url = reqwest::Url::parse(&base)
                .map_err(|e| StorageError::ConfigError(format!("Invalid blob endpoint: {}", e)))?;
            let sts = shared_key::string_to_sign(
                "PUT",
                0,
                &[("x-ms-date", &date), ("x-ms-version", BLOB_API_VERSION)],
                &self.connection.account_name,
                url.path(),
                &[("restype", "container")],
            );
            let authorization =
                shared_key::authorization_header(&self.connection.account_name, &key, &sts)
                    .map_err(|e| StorageError::ConfigError(e.to_string()))?;
            Ok(self
                .http
                .put(url)
                .header("x-ms-date", date)
                .header("x-ms-version", BLOB_API_VERSION)
                .header("Authorization", authorization)
                .body(""))
        } else if let Some(ref sas) = self.connection.shared_access_signature {
            Ok(self
                .http
                .put(format!("{}&{}", base, sas))
                .header("x-ms-date", date)
                .header("x-ms-version", BLOB_API_VERSION)
                .body(""))
        } else {
            Err(StorageError::ConfigError(
                "Connection string has no credential".to_string(),
            ))
        }
    }
}

#[async_trait]
impl BlobStore for AzureBlobStorage {
    async fn ensure_container(&self) -> StorageResult<ContainerStatus> {
        let request = self.create_container_request()?;
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, container = %self.container, "Container request failed");
            StorageError::BackendError(format!("Container request failed: {}", e))
        })?;

        let status = response.status();
        let error_code = response
            .headers()
            .get("x-ms-error-code")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match status {
            StatusCode::CREATED => {
                tracing::info!(container = %self.container, "Container created");
                Ok(ContainerStatus::Created)
            }
            StatusCode::CONFLICT
                if matches!(error_code.as_deref(), None | Some("ContainerAlreadyExists")) =>
            {
                tracing::debug!(container = %self.container, "Container already exists");
                Ok(ContainerStatus::AlreadyExists)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    container = %self.container,
                    status = %status,
                    error_code = ?error_code,
                    "Container creation failed"
                );
                Err(StorageError::BackendError(format!(
                    "Container creation failed with status {}: {}",
                    status,
                    error_code.unwrap_or(body)
                )))
            }
        }
    }

    async fn put_blob(
        &self,
        blob_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        validate_blob_name(blob_name)?;
        let size = data.len() as u64;
        let location = Path::from(blob_name);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                container = %self.container,
                blob_name = %blob_name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Azure blob upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            container = %self.container,
            blob_name = %blob_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure blob upload successful"
        );

        Ok(())
    }

    async fn blob_size(&self, blob_name: &str) -> StorageResult<u64> {
        let location = Path::from(blob_name);
        match self.store.head(&location).await {
            Ok(meta) => Ok(meta.size),
            Err(ObjectStoreError::NotFound { .. }) => {
                Err(StorageError::NotFound(blob_name.to_string()))
            }
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn signed_url(&self, blob_name: &str, expires_in: Duration) -> StorageResult<String> {
        let credentials = self.signing.as_ref().ok_or_else(|| {
            StorageError::SigningUnavailable(
                "AZURE_STORAGE_STORAGE_NAME and AZURE_STORAGE_API_KEY are not configured"
                    .to_string(),
            )
        })?;
        let expires_at = chrono::Duration::from_std(expires_in)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or_else(|| {
                StorageError::SigningUnavailable(format!(
                    "SAS expiry of {}s is out of range",
                    expires_in.as_secs()
                ))
            })?;

        let token = sas::blob_read_sas(credentials, &self.container, blob_name, expires_at)?;
        Ok(format!("{}?{}", self.direct_url(blob_name), token))
    }

    fn direct_url(&self, blob_name: &str) -> String {
        format!("{}/{}", self.container_url(), encode_blob_path(blob_name))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }

    fn container(&self) -> &str {
        &self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(connection_string: String) -> AzureStorageConfig {
        AzureStorageConfig {
            connection_string,
            container_name: "cards".to_string(),
            account_name: None,
            account_key: None,
            sas_expiry_hours: 24,
        }
    }

    fn storage_for(endpoint: &str) -> AzureBlobStorage {
        let cs = format!("AccountName=acct;AccountKey=a2V5;BlobEndpoint={}", endpoint);
        AzureBlobStorage::new(&config(cs), reqwest::Client::new()).unwrap()
    }

    #[tokio::test]
    async fn creates_missing_container() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/cards")
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .match_header("x-ms-version", BLOB_API_VERSION)
            .match_header("authorization", Matcher::Regex("^SharedKey acct:".to_string()))
            .with_status(201)
            .create_async()
            .await;

        let storage = storage_for(&server.url());
        assert_eq!(storage.ensure_container().await.unwrap(), ContainerStatus::Created);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn existing_container_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/cards")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_header("x-ms-error-code", "ContainerAlreadyExists")
            .create_async()
            .await;

        let storage = storage_for(&server.url());
        assert_eq!(
            storage.ensure_container().await.unwrap(),
            ContainerStatus::AlreadyExists
        );
    }

    #[tokio::test]
    async fn rejected_container_request_is_a_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/cards")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ms-error-code", "AuthenticationFailed")
            .create_async()
            .await;

        let storage = storage_for(&server.url());
        let err = storage.ensure_container().await.unwrap_err();
        assert!(err.to_string().contains("AuthenticationFailed"));
        assert!(err.into_service_error().is_provider());
    }

    #[tokio::test]
    async fn unsigned_without_explicit_credentials() {
        let storage = storage_for("https://acct.blob.core.windows.net");
        let result = storage
            .signed_url("card.png", Duration::from_secs(3600))
            .await;
        assert!(matches!(result, Err(StorageError::SigningUnavailable(_))));
        assert_eq!(
            storage.direct_url("my card.png"),
            "https://acct.blob.core.windows.net/cards/my%20card.png"
        );
    }

    #[tokio::test]
    async fn signed_url_appends_sas_to_direct_url() {
        let mut cfg = config(
            "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5;EndpointSuffix=core.windows.net"
                .to_string(),
        );
        cfg.account_name = Some("acct".to_string());
        cfg.account_key = Some("a2V5".to_string());
        let storage = AzureBlobStorage::new(&cfg, reqwest::Client::new()).unwrap();

        let url = storage
            .signed_url("card.png", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.starts_with("https://acct.blob.core.windows.net/cards/card.png?sp=r&se="));
        assert!(url.contains("&sr=b&sig="));
    }

    #[tokio::test]
    async fn out_of_range_expiry_cannot_be_signed() {
        let mut cfg = config("AccountName=acct;AccountKey=a2V5".to_string());
        cfg.account_name = Some("acct".to_string());
        cfg.account_key = Some("a2V5".to_string());
        let storage = AzureBlobStorage::new(&cfg, reqwest::Client::new()).unwrap();

        let result = storage
            .signed_url("card.png", Duration::from_secs(u64::MAX / 2))
            .await;
        assert!(matches!(result, Err(StorageError::SigningUnavailable(_))));

        // Representable as a delta but past the last representable date.
        let million_years = Duration::from_secs(1_000_000 * 365 * 24 * 3600);
        let result = storage.signed_url("card.png", million_years).await;
        assert!(matches!(result, Err(StorageError::SigningUnavailable(_))));
    }

    #[test]
    fn empty_container_name_is_a_configuration_error() {
        let mut cfg = config("AccountName=acct;AccountKey=a2V5".to_string());
        cfg.container_name = " ".to_string();
        assert!(matches!(
            AzureBlobStorage::new(&cfg, reqwest::Client::new()),
            Err(StorageError::ConfigError(_))
        ));
    }
}
