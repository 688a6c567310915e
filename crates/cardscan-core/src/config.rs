//! Configuration module
//!
//! Configuration is read once at startup from the process environment (after
//! loading an optional `.env` file), validated, and then handed to each
//! component by value. Nothing below the entry point reads the environment.

use std::env;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::locale::Locale;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8501;
const MAX_FILE_SIZE_MB: usize = 10;
const SAS_EXPIRY_HOURS: u64 = 24;
const MAX_SAS_EXPIRY_HOURS: u64 = 24 * 365;
const LOCAL_CONTAINER_NAME: &str = "cards";
const DOCS_MODEL_ID: &str = "prebuilt-creditCard";
const DOCS_API_VERSION: &str = "2024-11-30";
const DOCS_POLL_INTERVAL_MS: u64 = 1000;
const DOCS_MAX_POLL_ATTEMPTS: u32 = 300;
const DOCS_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Optional variables and what they are for, reported together when absent.
const OPTIONAL_VARS: &[(&str, &str)] = &[
    ("AZURE_DOCS_REGION", "Azure Document Intelligence Region"),
    ("AZURE_STORAGE_STORAGE_NAME", "Azure Storage Account Name"),
    ("AZURE_STORAGE_API_KEY", "Azure Storage API Key"),
    ("DEBUG", "Enable debug mode"),
];

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub debug: bool,
    pub locale: Locale,
}

/// Limits applied to an uploaded card image before it enters the pipeline
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

/// Azure Blob Storage settings
#[derive(Clone)]
pub struct AzureStorageConfig {
    pub connection_string: String,
    pub container_name: String,
    /// Account name used to sign read URLs. Absent means direct URLs only.
    pub account_name: Option<String>,
    /// Account key used to sign read URLs. Absent means direct URLs only.
    pub account_key: Option<String>,
    pub sas_expiry_hours: u64,
}

impl AzureStorageConfig {
    /// Both halves of the signing credential, when configured.
    pub fn signing_credentials(&self) -> Option<(&str, &str)> {
        match (self.account_name.as_deref(), self.account_key.as_deref()) {
            (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => Some((name, key)),
            _ => None,
        }
    }
}

impl Debug for AzureStorageConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AzureStorageConfig")
            .field("connection_string", &"<redacted>")
            .field("container_name", &self.container_name)
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field("sas_expiry_hours", &self.sas_expiry_hours)
            .finish()
    }
}

/// Local filesystem storage settings (development and tests)
#[derive(Clone, Debug)]
pub struct LocalStorageConfig {
    pub base_path: String,
    pub base_url: String,
    pub container_name: String,
}

#[derive(Clone, Debug)]
pub enum StorageConfig {
    Azure(AzureStorageConfig),
    Local(LocalStorageConfig),
}

impl StorageConfig {
    pub fn backend(&self) -> StorageBackend {
        match self {
            StorageConfig::Azure(_) => StorageBackend::Azure,
            StorageConfig::Local(_) => StorageBackend::Local,
        }
    }

    pub fn container_name(&self) -> &str {
        match self {
            StorageConfig::Azure(azure) => &azure.container_name,
            StorageConfig::Local(local) => &local.container_name,
        }
    }
}

/// Azure Document Intelligence settings
#[derive(Clone)]
pub struct DocumentIntelligenceConfig {
    pub endpoint: String,
    pub api_key: String,
    pub region: Option<String>,
    pub model_id: String,
    pub api_version: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub request_timeout_secs: u64,
}

impl DocumentIntelligenceConfig {
    /// Settings for the given endpoint and key with every tunable at its default.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            region: None,
            model_id: DOCS_MODEL_ID.to_string(),
            api_version: DOCS_API_VERSION.to_string(),
            poll_interval_ms: DOCS_POLL_INTERVAL_MS,
            max_poll_attempts: DOCS_MAX_POLL_ATTEMPTS,
            request_timeout_secs: DOCS_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Debug for DocumentIntelligenceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DocumentIntelligenceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("region", &self.region)
            .field("model_id", &self.model_id)
            .field("api_version", &self.api_version)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub uploads: UploadLimits,
    pub storage: StorageConfig,
    pub intelligence: DocumentIntelligenceConfig,
}

impl Config {
    /// Load `.env` (if present) and read the configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!(path = %path.display(), ".env loaded"),
            Err(e) if e.not_found() => tracing::debug!(".env file not found, using process environment"),
            Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let list = |key: &str, default: &str| -> Vec<String> {
            get(key)
                .unwrap_or_else(|| default.to_string())
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let backend = match get("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Azure,
        };

        let mut missing_required: Vec<&str> = Vec::new();
        let mut require = |key: &'static str| -> String {
            get(key).unwrap_or_else(|| {
                missing_required.push(key);
                String::new()
            })
        };

        let docs_endpoint = require("AZURE_DOCS_ENDPOINT");
        let docs_api_key = require("AZURE_DOCS_API_KEY");

        let storage = match backend {
            StorageBackend::Azure => StorageConfig::Azure(AzureStorageConfig {
                connection_string: require("AZURE_STORAGE_CONN_STRING"),
                container_name: require("AZURE_STORAGE_CONTAINER_NAME"),
                account_name: get("AZURE_STORAGE_STORAGE_NAME"),
                account_key: get("AZURE_STORAGE_API_KEY"),
                sas_expiry_hours: get("AZURE_STORAGE_SAS_EXPIRY_HOURS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(SAS_EXPIRY_HOURS),
            }),
            StorageBackend::Local => StorageConfig::Local(LocalStorageConfig {
                base_path: require("LOCAL_STORAGE_PATH"),
                base_url: require("LOCAL_STORAGE_BASE_URL"),
                container_name: get("AZURE_STORAGE_CONTAINER_NAME")
                    .unwrap_or_else(|| LOCAL_CONTAINER_NAME.to_string()),
            }),
        };

        if !missing_required.is_empty() {
            let listed: Vec<String> = missing_required.iter().map(|k| format!("  - {}", k)).collect();
            return Err(anyhow::anyhow!(
                "Missing required environment variables:\n{}",
                listed.join("\n")
            ));
        }

        let missing_optional: Vec<String> = OPTIONAL_VARS
            .iter()
            .filter(|(key, _)| get(key).is_none())
            .map(|(key, description)| format!("  - {}: {}", key, description))
            .collect();
        if !missing_optional.is_empty() {
            tracing::warn!(
                "Missing optional environment variables:\n{}",
                missing_optional.join("\n")
            );
        }

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let locale = match get("UI_LOCALE") {
            Some(value) => value.parse::<Locale>()?,
            None => Locale::default(),
        };

        let base = BaseConfig {
            server_port: get("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            debug: get("DEBUG").map(|v| parse_bool(&v)).unwrap_or(false),
            locale,
        };

        let max_file_size_mb = get("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let uploads = UploadLimits {
            max_file_size_bytes: max_file_size_mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?,
            allowed_extensions: list("ALLOWED_EXTENSIONS", "png,jpg,jpeg"),
            allowed_content_types: list("ALLOWED_CONTENT_TYPES", "image/png,image/jpeg"),
        };

        let intelligence = DocumentIntelligenceConfig {
            endpoint: docs_endpoint,
            api_key: docs_api_key,
            region: get("AZURE_DOCS_REGION"),
            model_id: get("AZURE_DOCS_MODEL_ID").unwrap_or_else(|| DOCS_MODEL_ID.to_string()),
            api_version: get("AZURE_DOCS_API_VERSION")
                .unwrap_or_else(|| DOCS_API_VERSION.to_string()),
            poll_interval_ms: get("AZURE_DOCS_POLL_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DOCS_POLL_INTERVAL_MS),
            max_poll_attempts: get("AZURE_DOCS_MAX_POLL_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DOCS_MAX_POLL_ATTEMPTS),
            request_timeout_secs: get("AZURE_DOCS_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DOCS_REQUEST_TIMEOUT_SECS),
        };

        let config = Config {
            base,
            uploads,
            storage,
            intelligence,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.uploads.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB cannot be 0"));
        }

        if self.uploads.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS cannot be empty"));
        }

        let endpoint = &self.intelligence.endpoint;
        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(anyhow::anyhow!(
                "AZURE_DOCS_ENDPOINT must be an http(s) URL, got '{}'",
                endpoint
            ));
        }

        if self.intelligence.max_poll_attempts == 0 {
            return Err(anyhow::anyhow!("AZURE_DOCS_MAX_POLL_ATTEMPTS cannot be 0"));
        }

        if let StorageConfig::Azure(azure) = &self.storage {
            if azure.sas_expiry_hours == 0 {
                return Err(anyhow::anyhow!("AZURE_STORAGE_SAS_EXPIRY_HOURS cannot be 0"));
            }
            if azure.sas_expiry_hours > MAX_SAS_EXPIRY_HOURS {
                return Err(anyhow::anyhow!(
                    "AZURE_STORAGE_SAS_EXPIRY_HOURS cannot exceed {}",
                    MAX_SAS_EXPIRY_HOURS
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn debug(&self) -> bool {
        self.base.debug
    }

    pub fn locale(&self) -> Locale {
        self.base.locale
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn azure_vars() -> HashMap<String, String> {
        vars(&[
            ("AZURE_DOCS_ENDPOINT", "https://cards.cognitiveservices.azure.com"),
            ("AZURE_DOCS_API_KEY", "docs-key"),
            (
                "AZURE_STORAGE_CONN_STRING",
                "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5;EndpointSuffix=core.windows.net",
            ),
            ("AZURE_STORAGE_CONTAINER_NAME", "cards"),
        ])
    }

    fn load(map: &HashMap<String, String>) -> Result<Config, anyhow::Error> {
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn loads_required_azure_settings_with_defaults() {
        let config = load(&azure_vars()).unwrap();
        assert_eq!(config.server_port(), 8501);
        assert_eq!(config.storage_backend(), StorageBackend::Azure);
        assert_eq!(config.intelligence.model_id, "prebuilt-creditCard");
        assert_eq!(config.intelligence.api_version, "2024-11-30");
        assert_eq!(config.uploads.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.uploads.allowed_extensions, vec!["png", "jpg", "jpeg"]);
        assert!(!config.debug());
        match &config.storage {
            StorageConfig::Azure(azure) => {
                assert_eq!(azure.sas_expiry_hours, 24);
                assert!(azure.signing_credentials().is_none());
            }
            other => panic!("expected azure storage, got {:?}", other),
        }
    }

    #[test]
    fn reports_every_missing_required_variable() {
        let err = load(&HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("AZURE_DOCS_ENDPOINT"));
        assert!(err.contains("AZURE_DOCS_API_KEY"));
        assert!(err.contains("AZURE_STORAGE_CONN_STRING"));
        assert!(err.contains("AZURE_STORAGE_CONTAINER_NAME"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut map = azure_vars();
        map.insert("AZURE_DOCS_API_KEY".to_string(), "   ".to_string());
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("AZURE_DOCS_API_KEY"));
    }

    #[test]
    fn signing_credentials_need_both_name_and_key() {
        let mut map = azure_vars();
        map.insert("AZURE_STORAGE_STORAGE_NAME".to_string(), "acct".to_string());
        let config = load(&map).unwrap();
        let StorageConfig::Azure(azure) = &config.storage else {
            panic!("expected azure storage");
        };
        assert!(azure.signing_credentials().is_none());

        map.insert("AZURE_STORAGE_API_KEY".to_string(), "a2V5".to_string());
        let config = load(&map).unwrap();
        let StorageConfig::Azure(azure) = &config.storage else {
            panic!("expected azure storage");
        };
        assert_eq!(azure.signing_credentials(), Some(("acct", "a2V5")));
    }

    #[test]
    fn local_backend_requires_path_and_url() {
        let map = vars(&[
            ("AZURE_DOCS_ENDPOINT", "http://localhost:5000"),
            ("AZURE_DOCS_API_KEY", "docs-key"),
            ("STORAGE_BACKEND", "local"),
        ]);
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("LOCAL_STORAGE_PATH"));
        assert!(err.contains("LOCAL_STORAGE_BASE_URL"));
        assert!(!err.contains("AZURE_STORAGE_CONN_STRING"));
    }

    #[test]
    fn local_backend_defaults_container_name() {
        let map = vars(&[
            ("AZURE_DOCS_ENDPOINT", "http://localhost:5000"),
            ("AZURE_DOCS_API_KEY", "docs-key"),
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/cardscan"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8501/blobs"),
        ]);
        let config = load(&map).unwrap();
        assert_eq!(config.storage.container_name(), "cards");
    }

    #[test]
    fn debug_flag_accepts_common_truthy_values() {
        for value in ["true", "1", "YES", "on"] {
            let mut map = azure_vars();
            map.insert("DEBUG".to_string(), value.to_string());
            assert!(load(&map).unwrap().debug(), "{} should enable debug", value);
        }
        let mut map = azure_vars();
        map.insert("DEBUG".to_string(), "nope".to_string());
        assert!(!load(&map).unwrap().debug());
    }

    #[test]
    fn rejects_wildcard_cors_in_production() {
        let mut map = azure_vars();
        map.insert("ENVIRONMENT".to_string(), "production".to_string());
        assert!(load(&map).is_err());

        map.insert("CORS_ORIGINS".to_string(), "https://cards.example.com".to_string());
        assert!(load(&map).unwrap().is_production());
    }

    #[test]
    fn sas_expiry_is_bounded() {
        let mut map = azure_vars();
        map.insert("AZURE_STORAGE_SAS_EXPIRY_HOURS".to_string(), "8760".to_string());
        assert!(load(&map).is_ok());

        map.insert(
            "AZURE_STORAGE_SAS_EXPIRY_HOURS".to_string(),
            "18446744073709551615".to_string(),
        );
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("AZURE_STORAGE_SAS_EXPIRY_HOURS"));
    }

    #[test]
    fn oversized_upload_limit_is_rejected() {
        let mut map = azure_vars();
        map.insert("MAX_FILE_SIZE_MB".to_string(), usize::MAX.to_string());
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("MAX_FILE_SIZE_MB"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let mut map = azure_vars();
        map.insert("AZURE_DOCS_ENDPOINT".to_string(), "cards.cognitiveservices.azure.com".to_string());
        let err = load(&map).unwrap_err().to_string();
        assert!(err.contains("AZURE_DOCS_ENDPOINT"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = load(&azure_vars()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("docs-key"));
        assert!(!rendered.contains("AccountKey"));
        assert!(rendered.contains("<redacted>"));
    }
}
