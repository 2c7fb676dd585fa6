/*!
 * Comprehension quizzes built from recently watched subtitles.
 *
 * - `synthesizer`: builds one `QuizItem` of a randomly chosen kind
 * - `answers`: grades learner answers
 * - `scheduler`: decides when the next quiz is due
 */

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod answers;
pub mod scheduler;
pub mod synthesizer;

pub use answers::{check_answer, Verdict};
pub use scheduler::QuizScheduler;
pub use synthesizer::{QuizRequest, QuizSynthesizer};

/// Kinds of quiz the synthesizer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizKind {
    /// Pick the meaning of a word among four options
    Vocabulary,
    /// Type the word blanked out of a sentence
    FillBlank,
    /// Translate a short sentence
    Translation,
    /// Repeat a word out loud
    Pronunciation,
}

impl QuizKind {
    /// Every kind, in declaration order
    pub const ALL: [QuizKind; 4] = [
        QuizKind::Vocabulary,
        QuizKind::FillBlank,
        QuizKind::Translation,
        QuizKind::Pronunciation,
    ];

    /// Kinds enabled for a learner
    pub fn enabled(pronunciation: bool) -> Vec<QuizKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| pronunciation || *kind != QuizKind::Pronunciation)
            .collect()
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vocabulary => write!(f, "vocabulary"),
            Self::FillBlank => write!(f, "fill_blank"),
            Self::Translation => write!(f, "translation"),
            Self::Pronunciation => write!(f, "pronunciation"),
        }
    }
}

/// One quiz question, as handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizItem {
    /// Multiple-choice meaning of a word
    Vocabulary {
        /// Word being asked about
        word: String,
        /// Correct option
        correct: String,
        /// Four distinct options, `correct` among them exactly once
        options: [String; 4],
    },
    /// Sentence with one word blanked out
    FillBlank {
        /// Sentence with the blank
        sentence: String,
        /// Blanked word, punctuation stripped
        correct: String,
        /// Sentence as it appeared in the subtitles
        original_text: String,
    },
    /// Translate a sentence
    Translation {
        /// Sentence in the learned language
        sentence: String,
        /// Reference translation
        correct: String,
    },
    /// Say a word
    Pronunciation {
        /// Word to repeat
        word: String,
        /// Prompt shown to the learner
        instruction: String,
    },
}

impl QuizItem {
    /// Kind of this item
    pub fn kind(&self) -> QuizKind {
        match self {
            Self::Vocabulary { .. } => QuizKind::Vocabulary,
            Self::FillBlank { .. } => QuizKind::FillBlank,
            Self::Translation { .. } => QuizKind::Translation,
            Self::Pronunciation { .. } => QuizKind::Pronunciation,
        }
    }

    /// Text the question is about (word or sentence)
    pub fn prompt(&self) -> &str {
        match self {
            Self::Vocabulary { word, .. } | Self::Pronunciation { word, .. } => word,
            Self::FillBlank { sentence, .. } | Self::Translation { sentence, .. } => sentence,
        }
    }

    /// Expected answer, if the item is graded
    pub fn correct_answer(&self) -> Option<&str> {
        match self {
            Self::Vocabulary { correct, .. }
            | Self::FillBlank { correct, .. }
            | Self::Translation { correct, .. } => Some(correct),
            Self::Pronunciation { .. } => None,
        }
    }
}

/// How the learner left a presented quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// The learner submitted an answer
    Answered(String),
    /// The learner closed the quiz without answering
    Dismissed,
}
