/*!
 * MyMemory translation API client.
 *
 * `GET {endpoint}?q=<text>&langpair=<from>|<to>` answers with
 * `{"responseData": {"translatedText": ..}, "responseStatus": ..}`. The
 * status is a number on success and sometimes a string on errors.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest, TranslationResponse};

/// Public MyMemory endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net/get";

/// MyMemory client
#[derive(Debug)]
pub struct MyMemory {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL
    endpoint: String,
    /// Request timeout, for error reporting
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
    #[serde(rename = "responseStatus")]
    response_status: Option<Value>,
    #[serde(rename = "responseDetails")]
    response_details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

impl MyMemoryResponse {
    /// Status as a number; string statuses are parsed, anything else reads as 500
    fn status(&self) -> u16 {
        match &self.response_status {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()).unwrap_or(500),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(500),
            _ => 500,
        }
    }

    fn details(&self) -> String {
        match &self.response_details {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

impl MyMemory {
    /// Create a new client; an empty endpoint selects the public API
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
        let langpair = format!("{}|{}", request.source_language, request.target_language);
        Url::parse_with_params(&self.endpoint, &[("q", request.text.as_str()), ("langpair", langpair.as_str())])
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid MyMemory endpoint {}: {}", self.endpoint, e)))
    }

    fn parse_body(body: &str) -> Result<TranslationResponse, ProviderError> {
        let parsed: MyMemoryResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("MyMemory response: {}", e)))?;

        let status = parsed.status();
        if status == 429 {
            return Err(ProviderError::RateLimitExceeded(parsed.details()));
        }
        if status != 200 {
            return Err(ProviderError::ApiError {
                status_code: status,
                message: parsed.details(),
            });
        }

        let text = parsed
            .response_data
            .and_then(|d| d.translated_text)
            .unwrap_or_default();

        Ok(TranslationResponse { status, text })
    }
}

#[async_trait]
impl Provider for MyMemory {
    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let url = self.request_url(&request)?;
        debug!("MyMemory request {} -> {}", request.source_language, request.target_language);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else {
                ProviderError::ConnectionError(format!("Failed to send request to MyMemory: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded("MyMemory daily quota reached".to_string()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("MyMemory API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read MyMemory response: {}", e)))?;

        Self::parse_body(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(TranslationRequest::new("hola", "es", "en")).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "mymemory"
    }
}
