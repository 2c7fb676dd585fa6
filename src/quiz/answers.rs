/*!
 * Answer grading.
 */

use serde::Serialize;

use super::QuizItem;

/// Result of grading an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The answer is right
    Correct,
    /// The answer is wrong
    Incorrect,
    /// The item is not graded (pronunciation)
    Ungraded,
}

impl Verdict {
    /// `Some(true/false)` for graded items, `None` otherwise
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Correct => Some(true),
            Self::Incorrect => Some(false),
            Self::Ungraded => None,
        }
    }

    fn from_bool(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Grade a learner answer
///
/// Vocabulary and fill-blank answers must match the expected answer
/// ignoring case. Translations are accepted when either text contains the
/// other (ignoring case); blank answers never pass.
pub fn check_answer(item: &QuizItem, answer: &str) -> Verdict {
    let answer = answer.trim().to_lowercase();

    match item {
        QuizItem::Vocabulary { correct, .. } | QuizItem::FillBlank { correct, .. } => {
            Verdict::from_bool(!answer.is_empty() && answer == correct.trim().to_lowercase())
        }
        QuizItem::Translation { correct, .. } => {
            let correct = correct.trim().to_lowercase();
            Verdict::from_bool(
                !answer.is_empty() && (correct.contains(&answer) || answer.contains(&correct)),
            )
        }
        QuizItem::Pronunciation { .. } => Verdict::Ungraded,
    }
}
