/*!
 * Translation caching functionality.
 *
 * A bounded, expiring map from `(source language, target language, text)` to
 * a translation. Entries older than the TTL read as absent but stay stored
 * until capacity eviction removes them. When an insert pushes the cache past
 * its cap, the oldest batch of entries is dropped at once.
 *
 * All state lives behind one mutex, so an insert and the eviction it causes
 * are a single atomic step even when the bulk timeline pass and an ad-hoc
 * lookup share the cache.
 */

use chrono::{DateTime, Duration, Utc};
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::clock::{self, Clock};

/// Default maximum number of entries
pub const DEFAULT_MAX_ENTRIES: usize = 5000;

/// Default number of entries dropped per eviction
pub const DEFAULT_EVICTION_BATCH: usize = 1000;

/// Default entry lifetime in days
pub const DEFAULT_TTL_DAYS: i64 = 7;

/// Size and lifetime limits of a cache
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy {
    /// Maximum number of entries kept after an insert
    pub max_entries: usize,
    /// Entries removed when the cap is exceeded
    pub eviction_batch: usize,
    /// Entry lifetime
    pub ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            eviction_batch: DEFAULT_EVICTION_BATCH,
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheEntry {
    translation: String,
    cached_at: DateTime<Utc>,
}

/// Serializable copy of the cache contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    entries: BTreeMap<String, CacheEntry>,
}

impl CacheSnapshot {
    /// Number of entries in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    hits: usize,
    misses: usize,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that missed or found an expired entry
    pub misses: usize,
    /// Stored entries, expired ones included
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups that hit
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Translation cache for storing and retrieving translations
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct TranslationCache {
    state: Arc<Mutex<CacheState>>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl TranslationCache {
    /// Create a cache with the default policy and the system clock
    pub fn new(enabled: bool) -> Self {
        Self::with_policy(enabled, CachePolicy::default(), clock::system())
    }

    /// Create a cache with an explicit policy and clock
    pub fn with_policy(enabled: bool, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            policy,
            clock,
            enabled,
        }
    }

    fn key(text: &str, from: &str, to: &str) -> String {
        format!("{}|{}|{}", from, to, text.to_lowercase())
    }

    /// Look up a translation. Expired entries read as absent.
    pub fn get(&self, text: &str, from: &str, to: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let key = Self::key(text, from, to);
        let now = self.clock.now();
        let mut state = self.state.lock();

        let fresh = state
            .entries
            .get(&key)
            .filter(|entry| now - entry.cached_at < self.policy.ttl)
            .map(|entry| entry.translation.clone());

        match fresh {
            Some(translation) => {
                state.hits += 1;
                debug!("Cache hit for '{}' ({} -> {})", truncate_text(text, 30), from, to);
                Some(translation)
            }
            None => {
                state.misses += 1;
                debug!("Cache miss for '{}' ({} -> {})", truncate_text(text, 30), from, to);
                None
            }
        }
    }

    /// Store a translation, evicting the oldest batch if the cap is exceeded
    pub fn put(&self, text: &str, translation: &str, from: &str, to: &str) {
        if !self.enabled {
            return;
        }

        let key = Self::key(text, from, to);
        let entry = CacheEntry {
            translation: translation.to_string(),
            cached_at: self.clock.now(),
        };

        let mut state = self.state.lock();
        state.entries.insert(key, entry);
        self.evict_locked(&mut state);
    }

    fn evict_locked(&self, state: &mut CacheState) {
        while state.entries.len() > self.policy.max_entries {
            let batch = self.policy.eviction_batch.max(1).min(state.entries.len());

            let mut by_age: Vec<(&DateTime<Utc>, &String)> = state
                .entries
                .iter()
                .map(|(key, entry)| (&entry.cached_at, key))
                .collect();
            by_age.sort_unstable();

            let victims: Vec<String> = by_age
                .into_iter()
                .take(batch)
                .map(|(_, key)| key.clone())
                .collect();
            for key in &victims {
                state.entries.remove(key);
            }

            debug!(
                "Evicted {} cache entries, {} remain",
                victims.len(),
                state.entries.len()
            );
        }
    }

    /// Whether an entry is stored for the key, fresh or not
    pub fn contains(&self, text: &str, from: &str, to: &str) -> bool {
        self.state
            .lock()
            .entries
            .contains_key(&Self::key(text, from, to))
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            entries: state.entries.len(),
        }
    }

    /// Remove every entry and reset the counters
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = CacheState::default();
        debug!("Translation cache cleared");
    }

    /// Copy the stored entries for persistence
    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.state.lock();
        CacheSnapshot {
            entries: state
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect(),
        }
    }

    /// Merge persisted entries into the cache; existing keys are overwritten
    pub fn restore(&self, snapshot: CacheSnapshot) {
        let restored = snapshot.len();
        let mut state = self.state.lock();
        state.entries.extend(snapshot.entries);
        self.evict_locked(&mut state);
        debug!("Restored {} cache entries ({} stored)", restored, state.entries.len());
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Enable or disable the cache
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Active policy
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
