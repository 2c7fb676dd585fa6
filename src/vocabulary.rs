/*!
 * Vocabulary candidate extraction.
 *
 * Subtitle text is lowercased, stripped of everything except letters,
 * digits and whitespace, and split into words. Short words, stop words and
 * tokens without a letter are dropped; the rest are deduplicated in
 * first-seen order.
 */

use std::collections::HashSet;

use crate::caption::Subtitle;

/// Default minimum word length, in characters
pub const DEFAULT_MIN_WORD_LENGTH: usize = 4;

// @const: Frequent Spanish words not worth quizzing
const DEFAULT_STOP_WORDS: &[&str] = &[
    "el", "la", "de", "que", "y", "a", "en", "un", "es", "se", "no", "te", "lo", "le", "da", "su",
    "por", "son", "con", "para", "al", "una", "me", "mi", "del", "muy", "como", "este", "más",
    "pero", "todo", "está", "hasta", "sobre", "tiene", "hace", "aquí", "puede", "bien", "eso",
    "cada", "otro", "mismo", "solo", "tan", "entre", "tanto", "menos", "hacer", "gran", "todos",
    "tal", "vez", "vida", "han", "mundo", "casa", "lugar",
];

/// Extracts quizzable words from subtitle text
#[derive(Debug, Clone)]
pub struct VocabularyExtractor {
    min_length: usize,
    stop_words: HashSet<String>,
}

impl Default for VocabularyExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORD_LENGTH)
    }
}

impl VocabularyExtractor {
    /// Extractor with the built-in stop-word list
    pub fn new(min_length: usize) -> Self {
        Self::with_stop_words(min_length, DEFAULT_STOP_WORDS.iter().copied())
    }

    /// Extractor with a custom stop-word list
    pub fn with_stop_words<I, S>(min_length: usize, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_length,
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Minimum word length in characters
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Whether a cleaned, lowercase word is worth quizzing
    pub fn is_candidate(&self, word: &str) -> bool {
        word.chars().count() >= self.min_length
            && !self.stop_words.contains(word)
            && word.chars().any(char::is_alphabetic)
    }

    /// Candidates from a list of subtitles, deduplicated in first-seen order
    pub fn extract<'a, I>(&self, subtitles: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Subtitle>,
    {
        let mut seen = HashSet::new();
        let mut words = Vec::new();

        for subtitle in subtitles {
            for word in normalize(subtitle.text()).split_whitespace() {
                if self.is_candidate(word) && seen.insert(word.to_string()) {
                    words.push(word.to_string());
                }
            }
        }

        words
    }

    /// Candidates from a single piece of text
    pub fn extract_text(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        normalize(text)
            .split_whitespace()
            .filter(|word| self.is_candidate(word))
            .filter(|word| seen.insert(word.to_string()))
            .map(str::to_string)
            .collect()
    }
}

/// Lowercase and keep only letters, digits and whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// A token with surrounding and inner punctuation removed, case preserved
pub fn strip_punctuation(token: &str) -> String {
    token.chars().filter(|c| c.is_alphanumeric()).collect()
}
