/*!
 * Cache-first translation.
 *
 * Lookups go cache -> provider -> write-back. Failures never reach the
 * caller: a translation that cannot be obtained comes back as the original
 * text, a definition that cannot be obtained comes back as `None`.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::providers::{Provider, TranslationRequest};
use crate::translation::cache::TranslationCache;

/// Cache namespace for word definitions
const DEFINITION_PREFIX: &str = "def:";

/// Translation front door shared by the timeline pass and ad-hoc lookups
#[derive(Clone)]
pub struct TranslationGateway {
    provider: Arc<dyn Provider>,
    cache: TranslationCache,
}

impl TranslationGateway {
    /// Create a gateway over a provider and a (shared) cache
    pub fn new(provider: Arc<dyn Provider>, cache: TranslationCache) -> Self {
        Self { provider, cache }
    }

    /// The cache used by this gateway
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// The provider used on cache misses
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Translate `text`; returns the text unchanged when it is blank or no
    /// translation can be obtained
    pub async fn translate(&self, text: &str, from: &str, to: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        if let Some(cached) = self.cache.get(text, from, to) {
            return cached;
        }

        match self.fetch(text, from, to).await {
            Some(translation) => {
                self.cache.put(text, &translation, from, to);
                translation
            }
            None => text.to_string(),
        }
    }

    /// Short definition of a single word, `None` when unavailable
    pub async fn word_definition(&self, word: &str, from: &str, to: &str) -> Option<String> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }

        let key = format!("{}{}", DEFINITION_PREFIX, word);
        if let Some(cached) = self.cache.get(&key, from, to) {
            return Some(cached);
        }

        let definition = self.translate(word, from, to).await;
        if definition.trim().is_empty() || definition.trim().eq_ignore_ascii_case(word) {
            debug!("No definition available for '{}'", word);
            return None;
        }

        self.cache.put(&key, &definition, from, to);
        Some(definition)
    }

    async fn fetch(&self, text: &str, from: &str, to: &str) -> Option<String> {
        let request = TranslationRequest::new(text, from, to);
        match self.provider.complete(request).await {
            Ok(response) if response.is_usable() => Some(response.text.trim().to_string()),
            Ok(response) => {
                debug!(
                    "Provider {} returned no usable translation (status {})",
                    self.provider.name(),
                    response.status
                );
                None
            }
            Err(e) => {
                warn!("Translation via {} failed: {}", self.provider.name(), e);
                None
            }
        }
    }
}
