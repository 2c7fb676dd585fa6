/*!
 * Error types for the linguacue library.
 *
 * Every subsystem has its own error enum built with thiserror. None of these
 * are fatal to a running session: callers log them and fall back to a
 * "do nothing useful" path.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP or payload status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider answered without any translated text
    #[error("Provider returned an empty translation")]
    EmptyResponse,

    /// The request did not complete in time
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors raised while acquiring or parsing caption data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptionError {
    /// No caption source could be found for the video
    #[error("No captions available for video {0}")]
    NoCaptions(String),

    /// Fetching a caption resource failed
    #[error("Failed to fetch captions: {0}")]
    Fetch(String),

    /// The payload was structurally malformed
    #[error("Malformed caption payload: {0}")]
    Malformed(String),

    /// A single cue could not be turned into a subtitle
    #[error("Invalid cue [{start} -> {end}]: {reason}")]
    InvalidCue {
        /// Start time in seconds
        start: f64,
        /// End time in seconds
        end: f64,
        /// Why the cue was rejected
        reason: String,
    },
}

/// Errors raised by timeline operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Translation list does not pair one-to-one with the subtitles
    #[error("Translation count mismatch: timeline has {expected} subtitles, got {actual} translations")]
    LengthMismatch {
        /// Number of subtitles in the timeline
        expected: usize,
        /// Number of translations supplied
        actual: usize,
    },
}

/// Reasons a quiz generator refused to produce an item
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// No subtitles fall inside the recent window
    #[error("No recent subtitles to build a quiz from")]
    NoRecentContent,

    /// Vocabulary extraction produced no candidates
    #[error("No vocabulary candidates in recent subtitles")]
    NoVocabulary,

    /// Definition lookup for the chosen word failed
    #[error("No definition available for '{0}'")]
    DefinitionUnavailable(String),

    /// No subtitle satisfied the generator's sentence constraints
    #[error("No eligible sentence for a {0} quiz")]
    NoEligibleSentence(&'static str),

    /// The sentence translation was empty or identical to the source
    #[error("Translation of '{0}' is not usable for a quiz")]
    UnusableTranslation(String),

    /// Not enough distinct distractors could be assembled
    #[error("Only {0} distinct distractors available")]
    NotEnoughDistractors(usize),

    /// Every quiz kind is disabled
    #[error("No quiz kinds are enabled")]
    NoEnabledKinds,
}

/// Errors raised when an async result outlives its session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session changed while an operation was in flight
    #[error("Session {captured} is stale (current session is {current})")]
    Stale {
        /// Token captured when the operation started
        captured: String,
        /// Token of the session that is current now
        current: String,
    },
}

/// Errors raised by persistent store backends
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend failed to read or write
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A stored value could not be (de)serialized
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from caption acquisition or parsing
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Error from the timeline
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from quiz generation
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// Error from session bookkeeping
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the persistent store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Backend(error.to_string())
    }
}
