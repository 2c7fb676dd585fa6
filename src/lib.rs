/*!
 * # LinguaCue - second-language learning on top of video captions
 *
 * A Rust library that turns the captions of a video into a bilingual
 * learning layer.
 *
 * ## Features
 *
 * - Acquire captions from a published track list or a live caption feed
 * - Parse WebVTT and timed-text XML payloads
 * - Answer "what is showing at T" in logarithmic time
 * - Translate through a bounded, expiring cache:
 *   - MyMemory free API
 *   - Google gtx endpoint as fallback
 * - Extract vocabulary and build comprehension quizzes
 * - Keep preferences, saved words and quiz history in SQLite
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_codec`: Timecode parsing and formatting
 * - `caption`: Caption acquisition and format parsing
 * - `timeline`: Time-indexed subtitle lookup
 * - `translation`: Translation cache and gateway:
 *   - `translation::cache`: Bounded expiring cache
 *   - `translation::gateway`: Cache, provider, write-back, degrade
 * - `providers`: Translation backends:
 *   - `providers::mymemory`: MyMemory API client
 *   - `providers::google`: Google gtx client
 *   - `providers::mock`: Scripted provider for tests
 * - `vocabulary`: Vocabulary extraction
 * - `quiz`: Quiz synthesis, grading and scheduling
 * - `store`: Persistent learner data
 * - `session`: Current video session
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `clock`: Injectable time source
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod caption;
pub mod clock;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod quiz;
pub mod session;
pub mod store;
pub mod time_codec;
pub mod timeline;
pub mod translation;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, PlaybackControl, QuizPresenter};
pub use caption::{parse_captions, CaptionSource, Subtitle};
pub use errors::AppError;
pub use quiz::{QuizItem, QuizKind};
pub use timeline::{SubtitleTimeline, TranslatedTimeline};
pub use translation::{TranslationCache, TranslationGateway};
