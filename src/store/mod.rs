/*!
 * Persistent learner data.
 *
 * Storage is a plain key-value capability (`KeyValueStore`) holding JSON
 * values under a few fixed keys. `LearnerStore` gives typed access to them.
 *
 * - `memory`: in-process backend, used by tests and ephemeral runs
 * - `sqlite`: single-table SQLite backend
 * - `learner`: typed facade (preferences, vocabulary book, quiz history,
 *   translation cache snapshot)
 */

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;

pub mod learner;
pub mod memory;
pub mod sqlite;

pub use learner::{LearnerStore, Preferences, QuizResult, VocabularyEntry};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the learner preferences
pub const PREFERENCES_KEY: &str = "linguacue_preferences";

/// Key holding the saved vocabulary list
pub const VOCABULARY_KEY: &str = "linguacue_vocabulary";

/// Key holding the quiz history
pub const QUIZ_HISTORY_KEY: &str = "linguacue_quiz_history";

/// Key holding the translation cache snapshot
pub const TRANSLATION_CACHE_KEY: &str = "linguacue_translations";

/// Minimal async key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove every key
    async fn clear(&self) -> Result<(), StoreError>;
}
