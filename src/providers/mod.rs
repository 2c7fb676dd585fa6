/*!
 * Provider implementations for text translation services.
 *
 * This module contains client implementations for the translation backends:
 * - MyMemory: free public translation API
 * - Google: the unauthenticated `gtx` endpoint, used as a fallback
 * - Mock: scripted behaviors for tests
 *
 * `FallbackProvider` chains providers and returns the first usable answer.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::ProviderError;

/// Text to translate and the language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Source text
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Translated text with the status reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    /// Status code reported by the backend (HTTP-like, 200 = ok)
    pub status: u16,
    /// Translated text
    pub text: String,
}

impl TranslationResponse {
    /// Successful response
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            status: 200,
            text: text.into(),
        }
    }

    /// Whether the response carries a usable translation
    pub fn is_usable(&self) -> bool {
        self.status == 200 && !self.text.trim().is_empty()
    }
}

/// Common trait for all translation providers
///
/// Object safe, so the application can hold any backend as
/// `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a piece of text
    ///
    /// # Arguments
    /// * `request` - The text and language pair
    ///
    /// # Returns
    /// * `Result<TranslationResponse, ProviderError>` - The translation or an error
    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

/// Tries each provider in order until one returns a usable translation
#[derive(Debug)]
pub struct FallbackProvider {
    providers: Vec<Arc<dyn Provider>>,
}

impl FallbackProvider {
    /// Chain the given providers, first one first
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self { providers }
    }

    /// Number of chained providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl Provider for FallbackProvider {
    async fn complete(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let mut last_error = ProviderError::ConnectionError("No providers configured".to_string());

        for provider in &self.providers {
            match provider.complete(request.clone()).await {
                Ok(response) if response.is_usable() => return Ok(response),
                Ok(response) => {
                    debug!(
                        "Provider {} returned no usable translation (status {})",
                        provider.name(),
                        response.status
                    );
                    last_error = ProviderError::EmptyResponse;
                }
                Err(e) => {
                    warn!("Provider {} failed: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let mut last_error = ProviderError::ConnectionError("No providers configured".to_string());
        for provider in &self.providers {
            match provider.test_connection().await {
                Ok(()) => return Ok(()),
                Err(e) => last_error = e,
            }
        }
        Err(last_error)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

pub mod google;
pub mod mock;
pub mod mymemory;
