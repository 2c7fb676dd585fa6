use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::app_config::{AcquisitionStrategy, Config};
use crate::caption::live::CaptionStreamFactory;
use crate::caption::{CaptionSource, HttpPayloadFetcher, LiveCaptionSource, Subtitle, TrackListSource};
use crate::clock::Clock;
use crate::errors::AppError;
use crate::providers::google::GoogleTranslate;
use crate::providers::mymemory::MyMemory;
use crate::providers::{FallbackProvider, Provider};
use crate::quiz::{check_answer, QuizItem, QuizKind, QuizOutcome, QuizRequest, QuizScheduler, QuizSynthesizer, Verdict};
use crate::session::{SessionManager, SessionState, SessionToken};
use crate::store::{KeyValueStore, LearnerStore, Preferences, SqliteStore};
use crate::timeline::{SubtitleTimeline, TranslatedSubtitle};
use crate::translation::{TranslationCache, TranslationGateway};
use crate::vocabulary::VocabularyExtractor;

// @module: Application controller for a watching session

/// The host video element
pub trait PlaybackControl: Send + Sync {
    /// Whether the video is currently playing
    fn is_playing(&self) -> bool;
    /// Current playback position in seconds
    fn current_time(&self) -> f64;
    /// Pause playback
    fn pause(&self);
    /// Resume playback
    fn play(&self);
}

/// The layer that shows quizzes to the learner
#[async_trait]
pub trait QuizPresenter: Send + Sync {
    /// Show a quiz and wait for the learner to answer or close it
    async fn present(&self, item: &QuizItem) -> QuizOutcome;
}

/// Everything the controller talks to
pub struct Collaborators {
    // @field: Caption acquisition strategy
    pub source: Arc<dyn CaptionSource>,
    // @field: Translation backend
    pub provider: Arc<dyn Provider>,
    // @field: Persistent key-value store
    pub store: Arc<dyn KeyValueStore>,
    // @field: Host video element
    pub playback: Arc<dyn PlaybackControl>,
    // @field: Quiz UI
    pub presenter: Arc<dyn QuizPresenter>,
    // @field: Time source
    pub clock: Arc<dyn Clock>,
    // @field: Seed for quiz randomness, OS entropy when absent
    pub rng_seed: Option<u64>,
}

/// A quiz that was shown
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRecord {
    /// The item presented
    pub item: QuizItem,
    /// What the learner did
    pub outcome: QuizOutcome,
    /// Grade of the answer; `None` when dismissed
    pub verdict: Option<Verdict>,
}

/// Main application controller for a watching session
pub struct Controller {
    config: Config,
    sessions: SessionManager,
    source: Arc<dyn CaptionSource>,
    gateway: TranslationGateway,
    store: LearnerStore,
    synthesizer: QuizSynthesizer,
    scheduler: Mutex<QuizScheduler>,
    preferences: RwLock<Preferences>,
    playback: Arc<dyn PlaybackControl>,
    presenter: Arc<dyn QuizPresenter>,
    quiz_active: AtomicBool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, parts: Collaborators) -> Self {
        let cache = TranslationCache::with_policy(config.cache.enabled, config.cache.policy(), parts.clock.clone());
        let gateway = TranslationGateway::new(parts.provider, cache);
        let store = LearnerStore::with_clock(parts.store, parts.clock.clone());
        let extractor = VocabularyExtractor::new(config.quiz.min_word_length);
        let rng = match parts.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let synthesizer = QuizSynthesizer::with_rng(gateway.clone(), store.clone(), extractor, rng);

        let preferences = Preferences::default();
        let scheduler = QuizScheduler::new(preferences.quiz_frequency_secs, parts.clock);

        Self {
            config,
            sessions: SessionManager::new(),
            source: parts.source,
            gateway,
            store,
            synthesizer,
            scheduler: Mutex::new(scheduler),
            preferences: RwLock::new(preferences),
            playback: parts.playback,
            presenter: parts.presenter,
            quiz_active: AtomicBool::new(false),
        }
    }

    /// Load persisted preferences and translation cache
    pub async fn start(&self) -> Result<Preferences, AppError> {
        let preferences = self.store.preferences().await?;
        self.use_preferences(preferences.clone());

        let snapshot = self.store.load_cache_snapshot().await;
        if !snapshot.is_empty() {
            info!("Restored {} cached translations", snapshot.len());
        }
        self.gateway.cache().restore(snapshot);

        Ok(preferences)
    }

    /// Current learner preferences
    pub fn preferences(&self) -> Preferences {
        self.preferences.read().clone()
    }

    /// Persist and apply new preferences
    pub async fn update_preferences(&self, preferences: Preferences) -> Result<(), AppError> {
        self.store.save_preferences(&preferences).await?;
        self.use_preferences(preferences);
        Ok(())
    }

    /// Apply preferences for this run without persisting them
    pub fn use_preferences(&self, preferences: Preferences) {
        self.scheduler.lock().set_interval(preferences.quiz_frequency_secs);
        *self.preferences.write() = preferences;
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translation gateway shared by timeline and ad-hoc lookups
    pub fn gateway(&self) -> &TranslationGateway {
        &self.gateway
    }

    /// Learner data
    pub fn store(&self) -> &LearnerStore {
        &self.store
    }

    /// Session bookkeeping
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Start a session for a video: acquire captions, build the timeline
    /// and, when enabled, translate it.
    ///
    /// A session replaced by a newer video while translating keeps its
    /// untranslated state and the call reports `SessionError::Stale`.
    pub async fn load_video(&self, video_id: &str, progress: Option<&ProgressBar>) -> Result<Arc<SessionState>, AppError> {
        info!("Loading captions for {} via {}", video_id, self.source.name());
        let subtitles = self.source.acquire(video_id).await?;
        if subtitles.is_empty() {
            warn!("No subtitles found for {}", video_id);
        }

        let state = self
            .sessions
            .replace(SessionState::for_video(video_id, SubtitleTimeline::from_subtitles(subtitles)));

        if !self.preferences.read().auto_translate || state.timeline.is_empty() {
            return Ok(state);
        }

        self.translate_session(state.token, progress).await
    }

    /// Translate every subtitle of the session identified by `token`, in order
    pub async fn translate_session(
        &self,
        token: SessionToken,
        progress: Option<&ProgressBar>,
    ) -> Result<Arc<SessionState>, AppError> {
        self.sessions.ensure_current(token)?;
        let state = self.sessions.current();
        let (from, to) = self.language_pair();

        if let Some(pb) = progress {
            pb.set_length(state.timeline.len() as u64);
            pb.set_position(0);
        }

        let mut translations = Vec::with_capacity(state.timeline.len());
        for subtitle in state.timeline.subtitles() {
            self.sessions.ensure_current(token)?;
            let translated = self.gateway.translate(subtitle.text(), &from, &to).await;
            translations.push((translated != subtitle.text()).then_some(translated));
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        let translated = state.timeline.attach_translations(translations)?;
        let done = translated.translated_count();
        let committed = self
            .sessions
            .commit_if_current(token, move |s| s.with_translations(translated))?;

        info!("Translated {}/{} subtitles", done, committed.timeline.len());
        if let Some(pb) = progress {
            pb.finish_with_message(format!("{} subtitles translated", done));
        }

        self.persist_cache().await;
        Ok(committed)
    }

    /// The subtitle showing at `t`, with its translation when dual subtitles are on
    pub fn current_subtitle(&self, t: f64) -> Option<TranslatedSubtitle> {
        let state = self.sessions.current();
        let dual = self.preferences.read().dual_subtitles;

        if let Some(translated) = &state.translated {
            return translated.current_at(t).map(|entry| TranslatedSubtitle {
                subtitle: entry.subtitle.clone(),
                translation: entry.translation.clone().filter(|_| dual),
            });
        }

        state.timeline.current_at(t).map(|subtitle| TranslatedSubtitle {
            subtitle: subtitle.clone(),
            translation: None,
        })
    }

    /// Look up the meaning of a word in the learner's language
    pub async fn define_word(&self, word: &str) -> Option<String> {
        let (from, to) = self.language_pair();
        self.gateway.word_definition(word, &from, &to).await
    }

    /// Save a word to the vocabulary book, tagged with the current video
    ///
    /// Returns the number of saved words.
    pub async fn save_word(&self, word: &str, translation: &str, context: Option<&str>) -> Result<usize, AppError> {
        let state = self.sessions.current();
        let count = self
            .store
            .add_vocabulary(word, translation, context, state.video_id.as_deref())
            .await?;
        Ok(count)
    }

    /// Check the schedule and run a quiz when one is due
    pub async fn tick(&self) -> Result<Option<QuizRecord>, AppError> {
        let due = self.scheduler.lock().is_due(self.playback.is_playing());
        if !due {
            return Ok(None);
        }
        self.trigger_quiz().await
    }

    /// Run a quiz now
    ///
    /// Returns `None` when no quiz could be built or one is already showing.
    pub async fn trigger_quiz(&self) -> Result<Option<QuizRecord>, AppError> {
        if self.quiz_active.swap(true, Ordering::SeqCst) {
            debug!("Quiz already showing, skipping");
            return Ok(None);
        }

        let _active = ActiveQuiz(&self.quiz_active);
        self.run_quiz().await
    }

    async fn run_quiz(&self) -> Result<Option<QuizRecord>, AppError> {
        let state = self.sessions.current();
        let now = self.playback.current_time();
        let window_start = (now - self.config.quiz.recent_window_secs).max(0.0);
        let recent: Vec<Subtitle> = state.timeline.in_range(window_start, now).into_iter().cloned().collect();

        let preferences = self.preferences();
        let kinds = QuizKind::enabled(preferences.pronunciation_enabled);
        let request = QuizRequest {
            recent: &recent,
            from: &preferences.target_language,
            to: &preferences.native_language,
            kinds: &kinds,
        };

        let cached_before = self.gateway.cache().len();
        let generated = self.synthesizer.generate(request).await;
        if self.gateway.cache().len() != cached_before {
            self.persist_cache().await;
        }

        let item = match generated {
            Ok(item) => item,
            Err(e) => {
                debug!("No quiz this cycle: {}", e);
                return Ok(None);
            }
        };

        if !self.sessions.is_current(state.token) {
            debug!("Discarding quiz built for stale session {}", state.token.short());
            return Ok(None);
        }
        self.scheduler.lock().record_quiz();

        let outcome = self.present_paused(&item).await;
        let verdict = match &outcome {
            QuizOutcome::Answered(answer) => Some(check_answer(&item, answer)),
            QuizOutcome::Dismissed => None,
        };

        if let Some(verdict) = verdict {
            info!("{} quiz answered: {:?}", item.kind(), verdict);
            self.store
                .add_quiz_result(item.kind(), verdict.as_bool(), item.prompt())
                .await?;
        }

        Ok(Some(QuizRecord { item, outcome, verdict }))
    }

    /// Present `item` with playback paused, resuming on every exit
    async fn present_paused(&self, item: &QuizItem) -> QuizOutcome {
        let _paused = PausedPlayback::pause(self.playback.as_ref());

        let limit = Duration::from_secs(self.config.quiz.auto_dismiss_secs);
        match tokio::time::timeout(limit, self.presenter.present(item)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                info!("Quiz dismissed after {}s without an answer", limit.as_secs());
                QuizOutcome::Dismissed
            }
        }
    }

    /// Tick every `tick_interval_secs` until `shutdown` flips to true
    pub async fn run_scheduler(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.config.quiz.tick_interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!("Quiz tick failed: {}", e);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Quiz scheduler stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Save the translation cache to the store
    pub async fn persist_cache(&self) {
        let snapshot = self.gateway.cache().snapshot();
        if let Err(e) = self.store.save_cache_snapshot(&snapshot).await {
            warn!("Failed to persist translation cache: {}", e);
        }
    }

    /// (subtitle language, learner language)
    fn language_pair(&self) -> (String, String) {
        let preferences = self.preferences.read();
        (preferences.target_language.clone(), preferences.native_language.clone())
    }
}

/// Clears the active-quiz flag when the quiz ends, also if its future is dropped
struct ActiveQuiz<'a>(&'a AtomicBool);

impl Drop for ActiveQuiz<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Playback paused for a quiz; resumed on drop if it was playing before
struct PausedPlayback<'a> {
    playback: &'a dyn PlaybackControl,
    was_playing: bool,
}

impl<'a> PausedPlayback<'a> {
    fn pause(playback: &'a dyn PlaybackControl) -> Self {
        let was_playing = playback.is_playing();
        if was_playing {
            playback.pause();
        }
        Self { playback, was_playing }
    }
}

impl Drop for PausedPlayback<'_> {
    fn drop(&mut self) {
        if self.was_playing {
            debug!("Resuming playback after quiz");
            self.playback.play();
        }
    }
}

/// Translation backend described by the configuration
pub fn build_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let settings = &config.provider;
    let primary: Arc<dyn Provider> = Arc::new(
        MyMemory::new(settings.endpoint.clone(), settings.timeout_secs).context("Failed to create MyMemory client")?,
    );

    if !settings.google_fallback {
        return Ok(primary);
    }

    let fallback: Arc<dyn Provider> = Arc::new(
        GoogleTranslate::new(settings.google_endpoint.clone(), settings.timeout_secs)
            .context("Failed to create gtx client")?,
    );
    Ok(Arc::new(FallbackProvider::new(vec![primary, fallback])))
}

/// The caption source selected by the configuration
///
/// The live strategy needs the host's caption stream.
pub fn build_caption_source(
    config: &Config,
    preferred_language: &str,
    live_stream: Option<CaptionStreamFactory>,
) -> Result<Arc<dyn CaptionSource>> {
    let settings = &config.acquisition;
    match settings.strategy {
        AcquisitionStrategy::TrackList => {
            let fetcher = HttpPayloadFetcher::new(config.provider.timeout_secs)
                .context("Failed to create caption fetcher")?;
            Ok(Arc::new(TrackListSource::new(
                Arc::new(fetcher),
                settings.watch_url_template.clone(),
                preferred_language,
                settings.language_variants.clone(),
            )))
        }
        AcquisitionStrategy::Live => {
            let stream = live_stream.ok_or_else(|| anyhow!("Live caption acquisition needs a caption stream"))?;
            Ok(Arc::new(LiveCaptionSource::new(
                stream,
                Duration::from_secs(settings.live_window_secs),
                settings.live_line_duration_secs,
            )))
        }
    }
}

/// The persistent store described by the configuration
pub fn open_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    let store = if config.database_path.is_empty() {
        SqliteStore::new_default()?
    } else {
        SqliteStore::new(&config.database_path)?
    };
    Ok(Arc::new(store))
}
