//! Shared setup for API integration tests: local blob storage in a temp
//! directory (or a store that always fails) and a stub document analyzer.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use cardscan_api::setup::{routes, services, storage};
use cardscan_core::{CardField, Config, ExtractedFields, ServiceError};
use cardscan_intelligence::DocumentAnalyzer;
use cardscan_storage::{BlobStore, ContainerStatus, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const BLOB_BASE_URL: &str = "http://localhost:8501/blobs";

/// Analyzer returning a fixed result and recording the URLs it was given.
pub struct StubAnalyzer {
    result: Result<ExtractedFields, ServiceError>,
    urls: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentAnalyzer for StubAnalyzer {
    async fn analyze_document(&self, source_url: &str) -> Result<ExtractedFields, ServiceError> {
        self.urls.lock().unwrap().push(source_url.to_string());
        self.result.clone()
    }
}

/// Provider text a rejected storage account would return.
pub const STORAGE_FAILURE: &str = "AuthorizationFailure: signature mismatch for account cardsacct";

/// Store whose account rejects every request.
pub struct RejectingStore;

#[async_trait]
impl BlobStore for RejectingStore {
    async fn ensure_container(&self) -> StorageResult<ContainerStatus> {
        Err(StorageError::BackendError(STORAGE_FAILURE.to_string()))
    }

    async fn put_blob(&self, _: &str, _: Bytes, _: &str) -> StorageResult<()> {
        Err(StorageError::BackendError(STORAGE_FAILURE.to_string()))
    }

    async fn blob_size(&self, _: &str) -> StorageResult<u64> {
        Err(StorageError::BackendError(STORAGE_FAILURE.to_string()))
    }

    async fn signed_url(&self, blob_name: &str, _: Duration) -> StorageResult<String> {
        Err(StorageError::SigningUnavailable(blob_name.to_string()))
    }

    fn direct_url(&self, blob_name: &str) -> String {
        format!("https://cardsacct.blob.core.windows.net/cards/{}", blob_name)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Azure
    }

    fn container(&self) -> &str {
        "cards"
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub analyzer: Arc<StubAnalyzer>,
    pub storage_dir: TempDir,
}

pub fn all_fields() -> ExtractedFields {
    [
        (CardField::CardHolderName, "JOHN DOE"),
        (CardField::CardNumber, "4111 1111 1111 1111"),
        (CardField::ExpirationDate, "12/29"),
        (CardField::CardVerificationValue, "123"),
        (CardField::PaymentNetwork, "VISA"),
        (CardField::IssuingBank, "Contoso Bank"),
    ]
    .into_iter()
    .map(|(field, value)| (field.as_str(), value))
    .collect()
}

pub fn test_config(storage_dir: &TempDir, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_BASE_URL", BLOB_BASE_URL),
        ("AZURE_DOCS_ENDPOINT", "https://docs.example.com"),
        ("AZURE_DOCS_API_KEY", "test-key"),
        ("MAX_FILE_SIZE_MB", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert(
        "LOCAL_STORAGE_PATH".to_string(),
        storage_dir.path().display().to_string(),
    );
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|k| vars.get(k).cloned()).expect("Failed to build test config")
}

pub async fn setup_test_app(result: Result<ExtractedFields, ServiceError>) -> TestApp {
    setup_test_app_with(result, &[]).await
}

pub async fn setup_test_app_with(
    result: Result<ExtractedFields, ServiceError>,
    extra_vars: &[(&str, &str)],
) -> TestApp {
    let storage_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&storage_dir, extra_vars);

    let analyzer = Arc::new(StubAnalyzer {
        result,
        urls: Mutex::new(Vec::new()),
    });
    let store = storage::setup_storage(&config)
        .await
        .expect("Failed to setup storage");
    let state = services::initialize_services(&config, store, analyzer.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        analyzer,
        storage_dir,
    }
}

/// App whose storage account rejects every upload.
pub async fn setup_rejecting_storage_app() -> TestApp {
    let storage_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(&storage_dir, &[]);

    let analyzer = Arc::new(StubAnalyzer {
        result: Ok(all_fields()),
        urls: Mutex::new(Vec::new()),
    });
    let state = services::initialize_services(&config, Arc::new(RejectingStore), analyzer.clone());
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        analyzer,
        storage_dir,
    }
}

pub fn card_form(bytes: &[u8], file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes.to_vec())
        .file_name(file_name)
        .mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}

pub fn png_form(file_name: &str) -> MultipartForm {
    card_form(b"\x89PNG\r\n\x1a\nfake card image", file_name, "image/png")
}
