/*!
 * Typed access to the learner's persisted data.
 */

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{KeyValueStore, PREFERENCES_KEY, QUIZ_HISTORY_KEY, TRANSLATION_CACHE_KEY, VOCABULARY_KEY};
use crate::clock::{self, Clock};
use crate::errors::StoreError;
use crate::quiz::QuizKind;
use crate::translation::CacheSnapshot;

/// Number of quiz results kept in the history
pub const QUIZ_HISTORY_LIMIT: usize = 1000;

/// Learner preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Language being learned (captions are in this language)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Learner's own language (translations are in this language)
    #[serde(default = "default_native_language")]
    pub native_language: String,

    /// Seconds between scheduled quizzes
    #[serde(default = "default_quiz_frequency_secs")]
    pub quiz_frequency_secs: u64,

    /// Translate the whole timeline when a video loads
    #[serde(default = "default_true")]
    pub auto_translate: bool,

    /// Show the translation under the original line
    #[serde(default = "default_true")]
    pub dual_subtitles: bool,

    /// Include pronunciation quizzes
    #[serde(default = "default_true")]
    pub pronunciation_enabled: bool,

    /// Speech rate for pronunciation playback
    #[serde(default = "default_pronunciation_speed")]
    pub pronunciation_speed: f32,
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_native_language() -> String {
    "en".to_string()
}

fn default_quiz_frequency_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_pronunciation_speed() -> f32 {
    0.8
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            native_language: default_native_language(),
            quiz_frequency_secs: default_quiz_frequency_secs(),
            auto_translate: true,
            dual_subtitles: true,
            pronunciation_enabled: true,
            pronunciation_speed: default_pronunciation_speed(),
        }
    }
}

/// A word saved to the vocabulary book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Word, lowercase
    pub word: String,
    /// Translation shown to the learner
    pub translation: String,
    /// Subtitle line the word was saved from
    #[serde(default)]
    pub context: Option<String>,
    /// Video the word was saved from
    #[serde(default)]
    pub video_id: Option<String>,
    /// When the word was first saved
    pub added_at: DateTime<Utc>,
    /// How many times the word was saved again
    #[serde(default)]
    pub review_count: u32,
    /// Last time the word was saved again
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

/// Outcome of one presented quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Quiz kind
    pub kind: QuizKind,
    /// `Some(correct)` for graded answers, `None` when ungraded or dismissed
    pub correct: Option<bool>,
    /// Word or sentence asked about
    pub prompt: String,
    /// When the quiz ended
    pub timestamp: DateTime<Utc>,
}

/// Typed facade over a `KeyValueStore`
#[derive(Clone)]
pub struct LearnerStore {
    backend: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl LearnerStore {
    /// Wrap a backend, stamping records with the system clock
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(backend, clock::system())
    }

    /// Wrap a backend with an explicit clock
    pub fn with_clock(backend: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.backend.get(key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(T::default()),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.backend.set(key, serde_json::to_value(value)?).await
    }

    /// Stored preferences; missing fields take their defaults
    pub async fn preferences(&self) -> Result<Preferences, StoreError> {
        self.load(PREFERENCES_KEY).await
    }

    /// Replace the preferences
    pub async fn save_preferences(&self, preferences: &Preferences) -> Result<(), StoreError> {
        self.save(PREFERENCES_KEY, preferences).await
    }

    /// Saved vocabulary, in the order words were first saved
    pub async fn vocabulary(&self) -> Result<Vec<VocabularyEntry>, StoreError> {
        self.load(VOCABULARY_KEY).await
    }

    /// Save a word, or refresh it when already saved
    ///
    /// Words are keyed by their trimmed lowercase form. Saving a word again
    /// counts as a review: the translation is replaced, context and video are
    /// replaced only when given, `review_count` goes up by one and
    /// `last_reviewed` is set to now. `added_at` is kept.
    ///
    /// Returns the number of saved words.
    pub async fn add_vocabulary(
        &self,
        word: &str,
        translation: &str,
        context: Option<&str>,
        video_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        let word = word.trim().to_lowercase();
        let now = self.clock.now();
        let mut entries = self.vocabulary().await?;

        match entries.iter_mut().find(|e| e.word == word) {
            Some(existing) => {
                existing.translation = translation.to_string();
                if let Some(context) = context {
                    existing.context = Some(context.to_string());
                }
                if let Some(video_id) = video_id {
                    existing.video_id = Some(video_id.to_string());
                }
                existing.review_count += 1;
                existing.last_reviewed = Some(now);
                debug!("Refreshed vocabulary entry '{}'", word);
            }
            None => {
                entries.push(VocabularyEntry {
                    word: word.clone(),
                    translation: translation.to_string(),
                    context: context.map(str::to_string),
                    video_id: video_id.map(str::to_string),
                    added_at: now,
                    review_count: 0,
                    last_reviewed: None,
                });
                debug!("Saved vocabulary entry '{}'", word);
            }
        }

        self.save(VOCABULARY_KEY, &entries).await?;
        Ok(entries.len())
    }

    /// Quiz history, oldest first
    pub async fn quiz_history(&self) -> Result<Vec<QuizResult>, StoreError> {
        self.load(QUIZ_HISTORY_KEY).await
    }

    /// Append a quiz result, keeping only the most recent ones
    pub async fn add_quiz_result(
        &self,
        kind: QuizKind,
        correct: Option<bool>,
        prompt: &str,
    ) -> Result<(), StoreError> {
        let mut history = self.quiz_history().await?;
        history.push(QuizResult {
            kind,
            correct,
            prompt: prompt.to_string(),
            timestamp: self.clock.now(),
        });

        if history.len() > QUIZ_HISTORY_LIMIT {
            let overflow = history.len() - QUIZ_HISTORY_LIMIT;
            history.drain(..overflow);
        }

        self.save(QUIZ_HISTORY_KEY, &history).await
    }

    /// Persisted translation cache, empty when none or unreadable
    pub async fn load_cache_snapshot(&self) -> CacheSnapshot {
        match self.load(TRANSLATION_CACHE_KEY).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable translation cache snapshot: {}", e);
                CacheSnapshot::default()
            }
        }
    }

    /// Persist a translation cache snapshot
    pub async fn save_cache_snapshot(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        self.save(TRANSLATION_CACHE_KEY, snapshot).await
    }

    /// Remove all learner data
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.backend.clear().await
    }
}
