//! Client side of the cardscan JSON API.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8501";

/// Pick the API base URL: explicit flag, then `CARDSCAN_API_URL`, then the default.
pub fn resolve_api_url(flag: Option<String>, env_value: Option<String>) -> String {
    flag.or(env_value)
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Content type the server allowlist expects for a card image.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a card image and return the scan response body.
    pub async fn analyze_card(&self, file: &Path) -> Result<serde_json::Value> {
        let data = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("card.png")
            .to_string();

        tracing::debug!(file_name = %file_name, size_bytes = data.len(), "Uploading card image");

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime_for_path(file))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/api/v1/cards/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        read_json(response).await
    }

    pub async fn readiness(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(format!("{}/health/ready", self.base_url))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base_url))?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("Response is not valid JSON")?;
    if !status.is_success() {
        let message = body
            .get("error")
            .and_then(|e| e.as_str())
            .or_else(|| body.get("status").and_then(|s| s.as_str()))
            .unwrap_or("unknown error");
        anyhow::bail!("API returned {}: {}", status, message);
    }
    Ok(body)
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
