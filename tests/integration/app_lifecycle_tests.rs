/*!
 * Full app lifecycle: controller, SQLite store, quizzes and sessions
 */

use async_trait::async_trait;
use linguacue::app_config::Config;
use linguacue::app_controller::{Collaborators, Controller};
use linguacue::caption::{parse_captions, CaptionSource, Subtitle};
use linguacue::clock::ManualClock;
use linguacue::errors::{AppError, CaptionError};
use linguacue::providers::mock::MockProvider;
use linguacue::quiz::{QuizOutcome, Verdict};
use linguacue::store::{KeyValueStore, LearnerStore, Preferences, SqliteStore};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::common::{self, FakePlayback, ScriptedPresenter};

/// Serves the shared sample payload for every video
struct SampleSource;

#[async_trait]
impl CaptionSource for SampleSource {
    async fn acquire(&self, video_id: &str) -> Result<Vec<Subtitle>, CaptionError> {
        if video_id == "missing" {
            return Err(CaptionError::NoCaptions(video_id.to_string()));
        }
        Ok(parse_captions(common::SAMPLE_VTT))
    }

    fn name(&self) -> &str {
        "sample"
    }
}

fn build(
    db_path: &Path,
    playback: Arc<FakePlayback>,
    presenter: ScriptedPresenter,
    config: Config,
) -> (Controller, ManualClock) {
    let clock = ManualClock::at_epoch();
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(db_path).unwrap());
    let parts = Collaborators {
        source: Arc::new(SampleSource),
        provider: Arc::new(MockProvider::working()),
        store,
        playback,
        presenter: common::presenter(presenter),
        clock: Arc::new(clock.clone()),
        rng_seed: Some(3),
    };
    (Controller::with_config(config, parts), clock)
}

#[test]
fn test_controller_load_video_shouldPersistTranslationCache() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    let db_path = dir.path().join("learner.db");

    tokio_test::block_on(async {
        let (controller, _) = build(
            &db_path,
            Arc::new(FakePlayback::playing_at(0.0)),
            ScriptedPresenter::AnswerCorrectly,
            Config::default(),
        );
        controller.start().await.unwrap();
        let state = controller.load_video("video-1", None).await.unwrap();
        assert_eq!(state.translated.as_ref().unwrap().translated_count(), 2);
    });

    // A fresh store over the same file sees the saved snapshot
    tokio_test::block_on(async {
        let store = LearnerStore::new(Arc::new(SqliteStore::new(&db_path).unwrap()));
        let snapshot = store.load_cache_snapshot().await;
        assert_eq!(snapshot.len(), 2);
    });
}

#[tokio::test]
async fn test_controller_start_shouldApplySavedPreferences() {
    let dir = common::create_temp_dir().unwrap();
    let db_path = dir.path().join("learner.db");
    {
        let store = LearnerStore::new(Arc::new(SqliteStore::new(&db_path).unwrap()));
        let preferences = Preferences {
            auto_translate: false,
            quiz_frequency_secs: 60,
            ..Preferences::default()
        };
        store.save_preferences(&preferences).await.unwrap();
    }

    let (controller, _) = build(
        &db_path,
        Arc::new(FakePlayback::playing_at(0.0)),
        ScriptedPresenter::AnswerCorrectly,
        Config::default(),
    );
    let preferences = controller.start().await.unwrap();
    assert!(!preferences.auto_translate);

    let state = controller.load_video("video-1", None).await.unwrap();
    assert!(state.translated.is_none());
    let current = controller.current_subtitle(2.0).unwrap();
    assert_eq!(current.subtitle.text(), "el gato corre rápido");
    assert!(current.translation.is_none());
}

#[tokio::test]
async fn test_controller_load_video_withNoCaptions_shouldKeepPreviousSession() {
    let dir = common::create_temp_dir().unwrap();
    let (controller, _) = build(
        &dir.path().join("learner.db"),
        Arc::new(FakePlayback::playing_at(0.0)),
        ScriptedPresenter::AnswerCorrectly,
        Config::default(),
    );
    let loaded = controller.load_video("video-1", None).await.unwrap();

    let result = controller.load_video("missing", None).await;
    assert!(matches!(result, Err(AppError::Caption(CaptionError::NoCaptions(_)))));
    assert_eq!(controller.sessions().token(), loaded.token);
}

#[tokio::test]
async fn test_controller_tick_withWrongAnswer_shouldRecordFailure() {
    let dir = common::create_temp_dir().unwrap();
    let playback = Arc::new(FakePlayback::playing_at(20.0));
    let (controller, clock) = build(
        &dir.path().join("learner.db"),
        playback.clone(),
        ScriptedPresenter::Answer("definitely wrong".to_string()),
        Config::default(),
    );
    controller.start().await.unwrap();
    controller.load_video("video-1", None).await.unwrap();

    clock.advance(chrono::Duration::seconds(301));
    let record = controller.tick().await.unwrap().expect("a quiz is due");

    assert!(matches!(record.outcome, QuizOutcome::Answered(_)));
    let history = controller.store().quiz_history().await.unwrap();
    assert_eq!(history.len(), 1);
    match record.verdict {
        Some(Verdict::Ungraded) => assert_eq!(history[0].correct, None),
        Some(Verdict::Incorrect) => assert_eq!(history[0].correct, Some(false)),
        other => panic!("unexpected verdict {:?}", other),
    }
    assert_eq!(playback.pauses.load(Ordering::SeqCst), 1);
    assert_eq!(playback.plays.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_controller_trigger_quiz_shouldPersistLookupsMadeForTheQuiz() {
    let dir = common::create_temp_dir().unwrap();
    let mut warmed = 0;

    for seed in 0..8 {
        let db_path = dir.path().join(format!("learner-{}.db", seed));
        let parts = Collaborators {
            source: Arc::new(SampleSource),
            provider: Arc::new(MockProvider::working()),
            store: Arc::new(SqliteStore::new(&db_path).unwrap()),
            playback: Arc::new(FakePlayback::playing_at(20.0)),
            presenter: common::presenter(ScriptedPresenter::AnswerCorrectly),
            clock: Arc::new(ManualClock::at_epoch()),
            rng_seed: Some(seed),
        };
        let controller = Controller::with_config(Config::default(), parts);
        let mut preferences = controller.preferences();
        preferences.auto_translate = false;
        controller.use_preferences(preferences);
        controller.load_video("video-1", None).await.unwrap();
        assert!(controller.gateway().cache().is_empty());

        controller.trigger_quiz().await.unwrap();

        let cached = controller.gateway().cache().len();
        let store = LearnerStore::new(Arc::new(SqliteStore::new(&db_path).unwrap()));
        assert_eq!(store.load_cache_snapshot().await.len(), cached);
        if cached > 0 {
            warmed += 1;
        }
    }

    assert!(warmed > 0, "no quiz looked anything up");
}

#[tokio::test]
async fn test_controller_trigger_quiz_withSilentLearner_shouldDismissAndResume() {
    let dir = common::create_temp_dir().unwrap();
    let playback = Arc::new(FakePlayback::playing_at(20.0));
    let mut config = Config::default();
    config.quiz.auto_dismiss_secs = 1;
    let (controller, _) = build(
        &dir.path().join("learner.db"),
        playback.clone(),
        ScriptedPresenter::Ignore,
        config,
    );
    controller.load_video("video-1", None).await.unwrap();

    let record = controller.trigger_quiz().await.unwrap().expect("a quiz is shown");
    assert_eq!(record.outcome, QuizOutcome::Dismissed);
    assert!(record.verdict.is_none());
    assert!(playback.is_playing_now());
    assert!(controller.store().quiz_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_controller_trigger_quiz_beforeAnyCaptions_shouldBeNoOp() {
    let dir = common::create_temp_dir().unwrap();
    let playback = Arc::new(FakePlayback::playing_at(0.0));
    let (controller, _) = build(
        &dir.path().join("learner.db"),
        playback.clone(),
        ScriptedPresenter::AnswerCorrectly,
        Config::default(),
    );

    assert!(controller.trigger_quiz().await.unwrap().is_none());
    assert_eq!(playback.pauses.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_controller_define_and_save_word_shouldGrowVocabulary() {
    let dir = common::create_temp_dir().unwrap();
    let (controller, _) = build(
        &dir.path().join("learner.db"),
        Arc::new(FakePlayback::playing_at(0.0)),
        ScriptedPresenter::AnswerCorrectly,
        Config::default(),
    );
    controller.load_video("video-1", None).await.unwrap();

    let definition = controller.define_word("gato").await.unwrap();
    assert_eq!(definition, "[en] gato");
    assert_eq!(controller.save_word("gato", &definition, Some("el gato corre")).await.unwrap(), 1);
    assert_eq!(controller.save_word("GATO", &definition, None).await.unwrap(), 1);

    let vocabulary = controller.store().vocabulary().await.unwrap();
    assert_eq!(vocabulary[0].review_count, 1);
    assert_eq!(vocabulary[0].context.as_deref(), Some("el gato corre"));
    assert_eq!(vocabulary[0].video_id.as_deref(), Some("video-1"));
}

#[tokio::test]
async fn test_controller_run_scheduler_shouldStopOnShutdown() {
    let dir = common::create_temp_dir().unwrap();
    let mut config = Config::default();
    config.quiz.tick_interval_secs = 1;
    let (controller, _) = build(
        &dir.path().join("learner.db"),
        Arc::new(FakePlayback::playing_at(0.0)),
        ScriptedPresenter::AnswerCorrectly,
        config,
    );
    let (tx, rx) = tokio::sync::watch::channel(false);

    let stopper = async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        tx.send(true).unwrap();
    };
    let ((), ()) = tokio::join!(controller.run_scheduler(rx), stopper);
}
