//! Azure Document Intelligence REST client
//!
//! Analysis is a long-running operation: the analyze call returns `202` with
//! an `Operation-Location` URL that is polled until the status is terminal.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use cardscan_core::{DocumentIntelligenceConfig, ExtractedFields, ServiceError};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use tokio::time::sleep;

use crate::error::IntelligenceError;
use crate::extractor::DocumentAnalyzer;
use crate::models::{merge_documents, AnalyzeOperation, AnalyzeRequest, AnalyzeResult, OperationStatus};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION_HEADER: &str = "Operation-Location";

pub struct DocumentIntelligenceClient {
    http_client: reqwest::Client,
    config: DocumentIntelligenceConfig,
}

impl Debug for DocumentIntelligenceClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DocumentIntelligenceClient")
            .field("endpoint", &self.config.endpoint)
            .field("model_id", &self.config.model_id)
            .finish()
    }
}

impl DocumentIntelligenceClient {
    pub fn new(config: DocumentIntelligenceConfig) -> Result<Self, IntelligenceError> {
        if config.endpoint.trim().is_empty() {
            return Err(IntelligenceError::Configuration(
                "Document Intelligence endpoint not configured".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(IntelligenceError::Configuration(
                "Document Intelligence API key not configured".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| IntelligenceError::Configuration(e.to_string()))?;

        tracing::info!(
            endpoint = %config.endpoint,
            region = ?config.region,
            model_id = %config.model_id,
            api_version = %config.api_version,
            "Document Intelligence client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &DocumentIntelligenceConfig {
        &self.config
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    /// Submit the document and return the operation URL to poll.
    pub async fn begin_analyze(&self, source_url: &str) -> Result<String, IntelligenceError> {
        let response = self
            .http_client
            .post(self.analyze_url())
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .json(&AnalyzeRequest {
                url_source: source_url,
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntelligenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(IntelligenceError::MissingOperationLocation)
    }

    async fn get_operation(
        &self,
        operation_location: &str,
    ) -> Result<(AnalyzeOperation, Option<Duration>), IntelligenceError> {
        let response = self
            .http_client
            .get(operation_location)
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IntelligenceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let retry_after = retry_after(response.headers());
        let operation = response
            .json::<AnalyzeOperation>()
            .await
            .map_err(|e| IntelligenceError::InvalidResponse(e.to_string()))?;

        Ok((operation, retry_after))
    }

    /// Poll the operation until it reaches a terminal status.
    pub async fn wait_for_result(
        &self,
        operation_location: &str,
    ) -> Result<AnalyzeResult, IntelligenceError> {
        let max_attempts = self.config.max_poll_attempts;
        let default_interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 0..max_attempts {
            let (operation, retry_after) = self.get_operation(operation_location).await?;

            match operation.status {
                OperationStatus::Succeeded => {
                    tracing::info!(
                        operation_location = %operation_location,
                        attempts = attempt + 1,
                        "Document analysis completed successfully"
                    );
                    return operation.analyze_result.ok_or_else(|| {
                        IntelligenceError::InvalidResponse(
                            "succeeded operation has no analyzeResult".to_string(),
                        )
                    });
                }
                OperationStatus::Failed => {
                    let error = operation.error.unwrap_or_else(|| crate::models::ApiError {
                        code: "Unknown".to_string(),
                        message: "Unknown error".to_string(),
                    });
                    return Err(IntelligenceError::AnalysisFailed {
                        code: error.code,
                        message: error.message,
                    });
                }
                OperationStatus::Canceled => return Err(IntelligenceError::Canceled),
                OperationStatus::NotStarted | OperationStatus::Running => {
                    tracing::debug!(
                        operation_location = %operation_location,
                        attempt = attempt + 1,
                        status = ?operation.status,
                        "Waiting for document analysis to complete"
                    );
                }
                OperationStatus::Unknown => {
                    tracing::warn!(
                        operation_location = %operation_location,
                        "Unknown analysis status"
                    );
                }
            }

            if attempt + 1 < max_attempts {
                sleep(retry_after.unwrap_or(default_interval)).await;
            }
        }

        Err(IntelligenceError::PollLimitExceeded {
            attempts: max_attempts,
        })
    }

    /// Submit and wait for the analysis of the document at `source_url`.
    pub async fn analyze(&self, source_url: &str) -> Result<AnalyzeResult, IntelligenceError> {
        let start = std::time::Instant::now();
        let operation_location = self.begin_analyze(source_url).await?;
        tracing::debug!(
            source_url = %source_url,
            operation_location = %operation_location,
            "Document analysis submitted"
        );
        let result = self.wait_for_result(&operation_location).await?;
        tracing::info!(
            source_url = %source_url,
            documents = result.documents.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Document analysis finished"
        );
        Ok(result)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl DocumentAnalyzer for DocumentIntelligenceClient {
    async fn analyze_document(&self, source_url: &str) -> Result<ExtractedFields, ServiceError> {
        let result = self
            .analyze(source_url)
            .await
            .map_err(IntelligenceError::into_service_error)?;
        Ok(merge_documents(&result))
    }
}
