/*!
 * Google Translate `gtx` endpoint client.
 *
 * The endpoint answers with nested arrays; the first element lists the
 * translated segments as `[translated, original, ...]`.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Public gtx endpoint
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the gtx endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl GoogleTranslate {
    /// Create a new client; an empty endpoint selects the public one
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            timeout_secs,
        })
    }

    fn request_url(&self, request: &TranslationRequest) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid gtx endpoint {}: {}", self.endpoint, e)))
    }

    /// Join the translated segments of a gtx response
    fn extract_text(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::ParseError("gtx response has no segment list".to_string()))?;

        Ok(segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
            .collect::<String>())
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let url = self.request_url(&request)?;
        debug!("gtx request {} -> {}", request.source_language, request.target_language);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::ConnectionError(format!("Failed to send request to gtx: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded("gtx endpoint throttled".to_string()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("gtx API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("gtx response: {}", e)))?;

        Ok(TranslationResponse {
            status: status.as_u16(),
            text: Self::extract_text(&body)?,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(TranslationRequest::new("hola", "es", "en")).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google-gtx"
    }
}
