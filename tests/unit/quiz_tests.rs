/*!
 * Tests for quiz synthesis, grading and scheduling
 */

use chrono::Duration;
use linguacue::caption::Subtitle;
use linguacue::clock::{Clock, ManualClock};
use linguacue::errors::QuizError;
use linguacue::providers::mock::MockProvider;
use linguacue::quiz::{check_answer, QuizItem, QuizKind, QuizRequest, QuizScheduler, QuizSynthesizer, Verdict};
use linguacue::store::{LearnerStore, MemoryStore};
use linguacue::translation::{TranslationCache, TranslationGateway};
use linguacue::vocabulary::VocabularyExtractor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn synthesizer(provider: MockProvider, store: LearnerStore, seed: u64) -> QuizSynthesizer {
    let gateway = TranslationGateway::new(Arc::new(provider), TranslationCache::new(true));
    QuizSynthesizer::with_rng(gateway, store, VocabularyExtractor::default(), StdRng::seed_from_u64(seed))
}

fn recent() -> Vec<Subtitle> {
    vec![Subtitle::new(0.0, 3.0, "el gato corre rápido").unwrap()]
}

fn request<'a>(recent: &'a [Subtitle], kinds: &'a [QuizKind]) -> QuizRequest<'a> {
    QuizRequest {
        recent,
        from: "es",
        to: "en",
        kinds,
    }
}

#[tokio::test]
async fn test_vocabulary_quiz_withSavedWords_shouldUseTheirTranslations() {
    let store = LearnerStore::new(Arc::new(MemoryStore::new()));
    for (word, translation) in [("perro", "dog"), ("casa", "house"), ("agua", "water"), ("libro", "book")] {
        store.add_vocabulary(word, translation, None, None).await.unwrap();
    }
    let provider = MockProvider::working().with_dictionary([("gato", "cat"), ("corre", "runs"), ("rápido", "fast")]);
    let synth = synthesizer(provider, store, 11);
    let recent = recent();

    for _ in 0..10 {
        let item = synth
            .generate(request(&recent, &[QuizKind::Vocabulary]))
            .await
            .unwrap();
        let QuizItem::Vocabulary { correct, options, .. } = &item else {
            panic!("expected a vocabulary quiz");
        };
        assert_eq!(options.iter().filter(|o| *o == correct).count(), 1);
        let distractors: Vec<&String> = options.iter().filter(|o| *o != correct).collect();
        assert_eq!(distractors.len(), 3);
        for d in distractors {
            assert!(["dog", "house", "water", "book"].contains(&d.as_str()), "unexpected distractor {}", d);
        }
    }
}

#[tokio::test]
async fn test_vocabulary_quiz_withFailingProvider_shouldAbort() {
    let store = LearnerStore::new(Arc::new(MemoryStore::new()));
    let synth = synthesizer(MockProvider::failing(), store, 1);
    let recent = recent();

    let result = synth.generate(request(&recent, &[QuizKind::Vocabulary])).await;
    assert!(matches!(result, Err(QuizError::DefinitionUnavailable(_))));
}

#[tokio::test]
async fn test_generate_withOnlyStopWords_shouldRefuse() {
    let store = LearnerStore::new(Arc::new(MemoryStore::new()));
    let synth = synthesizer(MockProvider::working(), store, 1);
    let recent = vec![Subtitle::new(0.0, 1.0, "de la que el").unwrap()];

    let result = synth.generate(request(&recent, &QuizKind::ALL)).await;
    assert_eq!(result, Err(QuizError::NoVocabulary));
}

#[tokio::test]
async fn test_generate_withNoKinds_shouldRefuse() {
    let store = LearnerStore::new(Arc::new(MemoryStore::new()));
    let synth = synthesizer(MockProvider::working(), store, 1);
    let recent = recent();

    let result = synth.generate(request(&recent, &[])).await;
    assert_eq!(result, Err(QuizError::NoEnabledKinds));
}

#[tokio::test]
async fn test_fill_blank_quiz_shouldBeAnswerableWithBlankedWord() {
    let store = LearnerStore::new(Arc::new(MemoryStore::new()));
    let synth = synthesizer(MockProvider::working(), store, 5);
    let recent = vec![Subtitle::new(0.0, 3.0, "¡Mañana vamos al cine!").unwrap()];

    let item = synth.generate(request(&recent, &[QuizKind::FillBlank])).await.unwrap();
    let QuizItem::FillBlank { sentence, correct, original_text } = &item else {
        panic!("expected a fill-blank quiz");
    };
    assert!(sentence.contains("_____"));
    assert_eq!(original_text, "¡Mañana vamos al cine!");
    assert!(["Mañana", "vamos", "cine"].contains(&correct.as_str()));
    assert_eq!(check_answer(&item, &correct.to_uppercase()), Verdict::Correct);
}

#[tokio::test]
async fn test_fill_blank_quiz_shouldBlankOnlyExtractedWords() {
    let extractor = VocabularyExtractor::with_stop_words(4, ["el"]);
    let recent = vec![Subtitle::new(10.0, 13.0, "el gato corre rápido").unwrap()];
    let words = extractor.extract(&recent);
    assert_eq!(words, vec!["gato", "corre", "rápido"]);

    for seed in 0..50 {
        let gateway = TranslationGateway::new(Arc::new(MockProvider::working()), TranslationCache::new(true));
        let store = LearnerStore::new(Arc::new(MemoryStore::new()));
        let synth = QuizSynthesizer::with_rng(gateway, store, extractor.clone(), StdRng::seed_from_u64(seed));

        let item = synth.generate(request(&recent, &[QuizKind::FillBlank])).await.unwrap();
        let QuizItem::FillBlank { sentence, correct, .. } = &item else {
            panic!("expected a fill-blank quiz");
        };
        assert_ne!(correct, "el");
        assert!(words.contains(correct), "blanked {:?} outside {:?}", correct, words);
        assert!(sentence.starts_with("el "));
    }
}

#[test]
fn test_check_answer_withTranslation_shouldAcceptSubstrings() {
    let item = QuizItem::Translation {
        sentence: "el gato corre".to_string(),
        correct: "The cat runs".to_string(),
    };
    assert_eq!(check_answer(&item, "the cat"), Verdict::Correct);
    assert_eq!(check_answer(&item, "The cat runs away"), Verdict::Correct);
    assert_eq!(check_answer(&item, "dog"), Verdict::Incorrect);
    assert_eq!(check_answer(&item, "  "), Verdict::Incorrect);
}

#[test]
fn test_check_answer_withPronunciation_shouldBeUngraded() {
    let item = QuizItem::Pronunciation {
        word: "gato".to_string(),
        instruction: "Listen and repeat: \"gato\"".to_string(),
    };
    assert_eq!(check_answer(&item, "gato"), Verdict::Ungraded);
    assert_eq!(Verdict::Ungraded.as_bool(), None);
}

#[test]
fn test_quiz_item_serialization_shouldTagType() {
    let item = QuizItem::FillBlank {
        sentence: "el _____ corre".to_string(),
        correct: "gato".to_string(),
        original_text: "el gato corre".to_string(),
    };
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["type"], "fill_blank");
    assert_eq!(json["correct"], "gato");
}

#[test]
fn test_scheduler_shouldTriggerOnlyWhilePlayingAfterInterval() {
    let clock = ManualClock::at_epoch();
    let mut scheduler = QuizScheduler::new(300, Arc::new(clock.clone()));
    assert!(scheduler.is_due(true));
    scheduler.record_quiz();

    clock.advance(Duration::seconds(299));
    assert!(!scheduler.is_due(true));

    clock.advance(Duration::seconds(1));
    assert!(scheduler.is_due(true));
    assert!(!scheduler.is_due(false));

    scheduler.record_quiz();
    assert!(!scheduler.is_due(true));
    assert_eq!(scheduler.last_quiz_at(), Some(clock.now()));
}

#[test]
fn test_quiz_kind_enabled_withoutPronunciation_shouldDropIt() {
    let kinds = QuizKind::enabled(false);
    assert_eq!(kinds.len(), 3);
    assert!(!kinds.contains(&QuizKind::Pronunciation));
}
