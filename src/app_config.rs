use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils;
use crate::translation::CachePolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Translation provider settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Translation cache settings
    #[serde(default)]
    pub cache: CacheSettings,

    /// Quiz settings
    #[serde(default)]
    pub quiz: QuizSettings,

    /// Caption acquisition settings
    #[serde(default)]
    pub acquisition: AcquisitionSettings,

    /// Learner store location; empty selects the per-user data directory
    #[serde(default)]
    pub database_path: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    // @field: MyMemory endpoint
    #[serde(default = "default_mymemory_endpoint")]
    pub endpoint: String,

    // @field: Use the Google gtx endpoint when MyMemory fails
    #[serde(default = "default_true")]
    pub google_fallback: bool,

    // @field: gtx endpoint
    #[serde(default = "default_google_endpoint")]
    pub google_endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_mymemory_endpoint(),
            google_fallback: true,
            google_endpoint: default_google_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheSettings {
    /// Whether translations are cached
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of entries
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,

    /// Entries dropped when the maximum is exceeded
    #[serde(default = "default_cache_eviction_batch")]
    pub eviction_batch: usize,

    /// Entry lifetime in days
    #[serde(default = "default_cache_ttl_days")]
    pub ttl_days: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_max_entries(),
            eviction_batch: default_cache_eviction_batch(),
            ttl_days: default_cache_ttl_days(),
        }
    }
}

impl CacheSettings {
    /// Cache policy described by these settings
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            max_entries: self.max_entries,
            eviction_batch: self.eviction_batch,
            ttl: chrono::Duration::days(self.ttl_days),
        }
    }
}

/// Quiz settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizSettings {
    /// Minimum length of quizzable words, in characters
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Seconds between scheduler checks
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Seconds before an unanswered quiz is dismissed
    #[serde(default = "default_auto_dismiss_secs")]
    pub auto_dismiss_secs: u64,

    /// Seconds of viewing history quizzes are built from
    #[serde(default = "default_recent_window_secs")]
    pub recent_window_secs: f64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            tick_interval_secs: default_tick_interval_secs(),
            auto_dismiss_secs: default_auto_dismiss_secs(),
            recent_window_secs: default_recent_window_secs(),
        }
    }
}

/// How captions are acquired
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStrategy {
    // @strategy: Fetch the published caption track
    #[default]
    TrackList,
    // @strategy: Observe captions as they are rendered
    Live,
}

impl std::fmt::Display for AcquisitionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrackList => write!(f, "track_list"),
            Self::Live => write!(f, "live"),
        }
    }
}

impl std::str::FromStr for AcquisitionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "track_list" => Ok(Self::TrackList),
            "live" => Ok(Self::Live),
            _ => Err(anyhow!("Invalid acquisition strategy: {}", s)),
        }
    }
}

/// Caption acquisition settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AcquisitionSettings {
    /// Strategy in use
    #[serde(default)]
    pub strategy: AcquisitionStrategy,

    /// Watch page URL with a `{video_id}` placeholder
    #[serde(default = "default_watch_url_template")]
    pub watch_url_template: String,

    /// Seconds of live caption collection
    #[serde(default = "default_live_window_secs")]
    pub live_window_secs: u64,

    /// Duration given to the last live caption line
    #[serde(default = "default_live_line_duration_secs")]
    pub live_line_duration_secs: f64,

    /// Track languages accepted as exact matches, best first
    #[serde(default = "default_language_variants")]
    pub language_variants: Vec<String>,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            strategy: AcquisitionStrategy::default(),
            watch_url_template: default_watch_url_template(),
            live_window_secs: default_live_window_secs(),
            live_line_duration_secs: default_live_line_duration_secs(),
            language_variants: default_language_variants(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_mymemory_endpoint() -> String {
    crate::providers::mymemory::DEFAULT_ENDPOINT.to_string()
}

fn default_google_endpoint() -> String {
    crate::providers::google::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_max_entries() -> usize {
    crate::translation::cache::DEFAULT_MAX_ENTRIES
}

fn default_cache_eviction_batch() -> usize {
    crate::translation::cache::DEFAULT_EVICTION_BATCH
}

fn default_cache_ttl_days() -> i64 {
    crate::translation::cache::DEFAULT_TTL_DAYS
}

fn default_min_word_length() -> usize {
    crate::vocabulary::DEFAULT_MIN_WORD_LENGTH
}

fn default_tick_interval_secs() -> u64 {
    30
}

fn default_auto_dismiss_secs() -> u64 {
    30
}

fn default_recent_window_secs() -> f64 {
    300.0
}

fn default_watch_url_template() -> String {
    "https://www.youtube.com/watch?v={video_id}".to_string()
}

fn default_live_window_secs() -> u64 {
    5
}

fn default_live_line_duration_secs() -> f64 {
    3.0
}

fn default_language_variants() -> Vec<String> {
    ["es", "es-ES", "es-MX", "es-AR"]
        .iter()
        .map(|v| v.to_string())
        .collect()
}

impl Config {
    /// Load a configuration file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for variant in &self.acquisition.language_variants {
            language_utils::validate_language_code(language_utils::primary_subtag(variant))
                .with_context(|| format!("Invalid caption language variant: {}", variant))?;
        }

        if !self.acquisition.watch_url_template.contains("{video_id}") {
            return Err(anyhow!("watch_url_template must contain a {{video_id}} placeholder"));
        }
        if self.acquisition.live_window_secs == 0 {
            return Err(anyhow!("live_window_secs must be positive"));
        }
        if !(self.acquisition.live_line_duration_secs > 0.0) {
            return Err(anyhow!("live_line_duration_secs must be positive"));
        }

        if self.cache.max_entries == 0 || self.cache.eviction_batch == 0 {
            return Err(anyhow!("Cache max_entries and eviction_batch must be positive"));
        }
        if self.cache.eviction_batch > self.cache.max_entries {
            return Err(anyhow!(
                "Cache eviction_batch ({}) exceeds max_entries ({})",
                self.cache.eviction_batch,
                self.cache.max_entries
            ));
        }
        if self.cache.ttl_days <= 0 {
            return Err(anyhow!("Cache ttl_days must be positive"));
        }

        if self.quiz.min_word_length == 0 {
            return Err(anyhow!("Quiz min_word_length must be positive"));
        }
        if self.quiz.tick_interval_secs == 0 || self.quiz.auto_dismiss_secs == 0 {
            return Err(anyhow!("Quiz tick and auto-dismiss intervals must be positive"));
        }
        if !(self.quiz.recent_window_secs > 0.0) {
            return Err(anyhow!("Quiz recent_window_secs must be positive"));
        }

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout_secs must be positive"));
        }
        url::Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;
        if self.provider.google_fallback {
            url::Url::parse(&self.provider.google_endpoint)
                .with_context(|| format!("Invalid gtx endpoint: {}", self.provider.google_endpoint))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderSettings::default(),
            cache: CacheSettings::default(),
            quiz: QuizSettings::default(),
            acquisition: AcquisitionSettings::default(),
            database_path: String::new(),
            log_level: LogLevel::default(),
        }
    }
}
