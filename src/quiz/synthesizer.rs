/*!
 * Quiz item synthesis.
 *
 * A quiz is built from the subtitles of the recent viewing window. The kind
 * is drawn uniformly from the enabled kinds; the generator for that kind may
 * refuse (no definition, no suitable sentence, ...), in which case no quiz is
 * shown this cycle.
 *
 * Randomness comes from one `StdRng` so a seeded synthesizer is fully
 * reproducible. The lock on it is never held across an await.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::SeedableRng;
use regex::Regex;
use std::collections::HashSet;

use super::{QuizItem, QuizKind};
use crate::caption::Subtitle;
use crate::errors::QuizError;
use crate::store::LearnerStore;
use crate::translation::TranslationGateway;
use crate::vocabulary::{strip_punctuation, VocabularyExtractor};

/// Replacement text for the blanked word
pub const BLANK: &str = "_____";

/// Number of wrong options in a vocabulary quiz
const DISTRACTOR_COUNT: usize = 3;

// @const: Sentence length bounds (words) for translation quizzes
const TRANSLATION_MIN_WORDS: usize = 3;
const TRANSLATION_MAX_WORDS: usize = 10;

/// Minimum words in a fill-blank sentence
const FILL_BLANK_MIN_WORDS: usize = 3;

// @const: Whitespace-delimited tokens of a sentence
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

// @const: Generic wrong answers used when saved vocabulary runs short
const GENERIC_DISTRACTORS: &[&str] = &[
    "house", "water", "time", "day", "person", "year", "way", "work", "thing", "life", "hand",
    "part", "child", "eye", "woman", "place", "world", "right", "government", "system",
];

/// What a quiz is built from
#[derive(Debug, Clone, Copy)]
pub struct QuizRequest<'a> {
    /// Subtitles of the recent viewing window, in order
    pub recent: &'a [Subtitle],
    /// Language of the subtitles
    pub from: &'a str,
    /// Language answers are given in
    pub to: &'a str,
    /// Kinds that may be drawn
    pub kinds: &'a [QuizKind],
}

/// Builds quiz items from recent subtitles
pub struct QuizSynthesizer {
    gateway: TranslationGateway,
    store: LearnerStore,
    extractor: VocabularyExtractor,
    rng: Mutex<StdRng>,
}

impl QuizSynthesizer {
    /// Create a synthesizer seeded from the OS
    pub fn new(gateway: TranslationGateway, store: LearnerStore, extractor: VocabularyExtractor) -> Self {
        Self::with_rng(gateway, store, extractor, StdRng::from_os_rng())
    }

    /// Create a synthesizer with an explicit generator (seeded in tests)
    pub fn with_rng(
        gateway: TranslationGateway,
        store: LearnerStore,
        extractor: VocabularyExtractor,
        rng: StdRng,
    ) -> Self {
        Self {
            gateway,
            store,
            extractor,
            rng: Mutex::new(rng),
        }
    }

    /// The vocabulary extractor in use
    pub fn extractor(&self) -> &VocabularyExtractor {
        &self.extractor
    }

    /// Build one quiz item of a random enabled kind
    pub async fn generate(&self, request: QuizRequest<'_>) -> Result<QuizItem, QuizError> {
        if request.recent.is_empty() {
            return Err(QuizError::NoRecentContent);
        }

        let vocabulary = self.extractor.extract(request.recent);
        if vocabulary.is_empty() {
            return Err(QuizError::NoVocabulary);
        }

        let kind = {
            let mut rng = self.rng.lock();
            *request.kinds.choose(&mut *rng).ok_or(QuizError::NoEnabledKinds)?
        };
        debug!("Generating {} quiz from {} recent subtitles", kind, request.recent.len());

        self.generate_kind(kind, &vocabulary, request).await
    }

    /// Build one quiz item of the given kind
    pub async fn generate_kind(
        &self,
        kind: QuizKind,
        vocabulary: &[String],
        request: QuizRequest<'_>,
    ) -> Result<QuizItem, QuizError> {
        match kind {
            QuizKind::Vocabulary => self.vocabulary_quiz(vocabulary, request.from, request.to).await,
            QuizKind::FillBlank => self.fill_blank_quiz(request.recent),
            QuizKind::Translation => self.translation_quiz(request.recent, request.from, request.to).await,
            QuizKind::Pronunciation => self.pronunciation_quiz(vocabulary),
        }
    }

    async fn vocabulary_quiz(&self, vocabulary: &[String], from: &str, to: &str) -> Result<QuizItem, QuizError> {
        let word = self.pick(vocabulary).ok_or(QuizError::NoVocabulary)?;

        let correct = self
            .gateway
            .word_definition(&word, from, to)
            .await
            .ok_or_else(|| QuizError::DefinitionUnavailable(word.clone()))?;

        let saved = match self.store.vocabulary().await {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| e.word != word)
                .map(|e| e.translation)
                .collect(),
            Err(e) => {
                warn!("Saved vocabulary unavailable for distractors: {}", e);
                Vec::new()
            }
        };

        let distractors = self.distractors(&correct, saved)?;

        let mut options = Vec::with_capacity(DISTRACTOR_COUNT + 1);
        options.push(correct.clone());
        options.extend(distractors);
        options.shuffle(&mut *self.rng.lock());

        let options: [String; 4] = options
            .try_into()
            .map_err(|rest: Vec<String>| QuizError::NotEnoughDistractors(rest.len().saturating_sub(1)))?;

        Ok(QuizItem::Vocabulary { word, correct, options })
    }

    /// Pick three wrong options: saved translations first, generic words to top up
    fn distractors(&self, correct: &str, saved: Vec<String>) -> Result<Vec<String>, QuizError> {
        let mut taken: HashSet<String> = HashSet::from([correct.trim().to_lowercase()]);

        let saved: Vec<String> = saved
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && taken.insert(t.to_lowercase()))
            .collect();

        let mut rng = self.rng.lock();
        let mut chosen: Vec<String> = saved
            .choose_multiple(&mut *rng, DISTRACTOR_COUNT)
            .cloned()
            .collect();

        if chosen.len() < DISTRACTOR_COUNT {
            let chosen_lower: HashSet<String> = chosen.iter().map(|c| c.to_lowercase()).collect();
            let correct_lower = correct.trim().to_lowercase();
            let generic: Vec<&str> = GENERIC_DISTRACTORS
                .iter()
                .copied()
                .filter(|g| *g != correct_lower && !chosen_lower.contains(*g))
                .collect();
            chosen.extend(
                generic
                    .choose_multiple(&mut *rng, DISTRACTOR_COUNT - chosen.len())
                    .map(|g| g.to_string()),
            );
        }

        if chosen.len() < DISTRACTOR_COUNT {
            return Err(QuizError::NotEnoughDistractors(chosen.len()));
        }
        Ok(chosen)
    }

    fn fill_blank_quiz(&self, recent: &[Subtitle]) -> Result<QuizItem, QuizError> {
        let eligible: Vec<&Subtitle> = recent
            .iter()
            .filter(|s| s.word_count() >= FILL_BLANK_MIN_WORDS)
            .collect();

        let mut rng = self.rng.lock();
        let subtitle = eligible
            .choose(&mut *rng)
            .ok_or(QuizError::NoEligibleSentence("fill-blank"))?;

        let candidates: Vec<&str> = TOKEN_REGEX
            .find_iter(subtitle.text())
            .map(|m| m.as_str())
            .filter(|token| self.extractor.is_candidate(&strip_punctuation(token).to_lowercase()))
            .collect();

        let token = candidates
            .choose(&mut *rng)
            .ok_or(QuizError::NoEligibleSentence("fill-blank"))?;

        Ok(QuizItem::FillBlank {
            sentence: blank_first(subtitle.text(), token),
            correct: strip_punctuation(token),
            original_text: subtitle.text().to_string(),
        })
    }

    async fn translation_quiz(&self, recent: &[Subtitle], from: &str, to: &str) -> Result<QuizItem, QuizError> {
        let eligible: Vec<&Subtitle> = recent
            .iter()
            .filter(|s| (TRANSLATION_MIN_WORDS..=TRANSLATION_MAX_WORDS).contains(&s.word_count()))
            .collect();

        let sentence = self
            .pick(&eligible)
            .ok_or(QuizError::NoEligibleSentence("translation"))?
            .text()
            .to_string();

        let translation = self.gateway.translate(&sentence, from, to).await;
        if translation.trim().is_empty() || translation.trim() == sentence {
            return Err(QuizError::UnusableTranslation(sentence));
        }

        Ok(QuizItem::Translation {
            sentence,
            correct: translation,
        })
    }

    fn pronunciation_quiz(&self, vocabulary: &[String]) -> Result<QuizItem, QuizError> {
        let word = self.pick(vocabulary).ok_or(QuizError::NoVocabulary)?;
        Ok(QuizItem::Pronunciation {
            instruction: format!("Listen and repeat: \"{}\"", word),
            word,
        })
    }

    fn pick<T: Clone>(&self, items: &[T]) -> Option<T> {
        items.choose(&mut *self.rng.lock()).cloned()
    }
}

/// `text` with the first whole token equal to `token` replaced by the blank
fn blank_first(text: &str, token: &str) -> String {
    match TOKEN_REGEX.find_iter(text).find(|m| m.as_str() == token) {
        Some(m) => format!("{}{}{}", &text[..m.start()], BLANK, &text[m.end()..]),
        None => text.to_string(),
    }
}
