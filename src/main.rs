// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use linguacue::app_config::{self, Config};
use linguacue::app_controller::{self, Collaborators, Controller, PlaybackControl, QuizPresenter};
use linguacue::caption::{parse_captions, CaptionSource, Subtitle};
use linguacue::clock;
use linguacue::errors::CaptionError;
use linguacue::language_utils;
use linguacue::quiz::{QuizItem, QuizOutcome};
use linguacue::time_codec;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a caption file and print its subtitles
    Parse {
        /// WebVTT or timed-text XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only print the subtitle showing at this time (seconds or HH:MM:SS.mmm)
        #[arg(long)]
        at: Option<String>,
    },

    /// Translate a caption file and print the bilingual timeline
    Translate {
        /// WebVTT or timed-text XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Build a quiz from what was watched up to a playback time
    Quiz {
        /// WebVTT or timed-text XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Playback position (seconds or HH:MM:SS.mmm)
        #[arg(long)]
        at: String,
    },

    /// Look up the meaning of a word
    Define {
        /// Word to look up
        word: String,

        /// Save the word to the vocabulary book
        #[arg(short, long)]
        save: bool,
    },

    /// Check that the translation provider is reachable
    CheckProvider,

    /// Generate shell completions for linguacue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// LinguaCue - learn a language from the captions you watch
///
/// Parses video captions, translates them through a cached free translation
/// service and builds short comprehension quizzes from them.
#[derive(Parser, Debug)]
#[command(name = "linguacue")]
#[command(version)]
#[command(about = "Bilingual captions and quizzes for language learners")]
#[command(long_about = "LinguaCue parses video captions, translates them and quizzes you on what you watched.

EXAMPLES:
    linguacue parse episode.vtt                 # Print the subtitles of a caption file
    linguacue parse episode.vtt --at 00:01:05   # Print the subtitle showing at 1:05
    linguacue translate episode.vtt             # Print original and translated lines
    linguacue quiz episode.vtt --at 300         # Quiz on the first five minutes
    linguacue define gato --save                # Look up a word and save it
    linguacue --from fr --to en translate a.vtt # Learn French from English
    linguacue completions bash > linguacue.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Learner preferences, saved words and quiz
    history live in the database configured by database_path.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Language of the captions, overrides the saved preference for this run
    #[arg(long, global = true)]
    from: Option<String>,

    /// Language translations are shown in, overrides the saved preference for this run
    #[arg(long, global = true)]
    to: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Caption source reading local files; the video id is the file path
struct FileCaptionSource;

#[async_trait]
impl CaptionSource for FileCaptionSource {
    async fn acquire(&self, video_id: &str) -> Result<Vec<Subtitle>, CaptionError> {
        let content = tokio::fs::read_to_string(video_id)
            .await
            .map_err(|e| CaptionError::Fetch(format!("{}: {}", video_id, e)))?;
        Ok(parse_captions(&content))
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Stopped playback at a fixed position
struct FixedPosition(f64);

impl PlaybackControl for FixedPosition {
    fn is_playing(&self) -> bool {
        false
    }

    fn current_time(&self) -> f64 {
        self.0
    }

    fn pause(&self) {
        debug!("pause requested");
    }

    fn play(&self) {
        debug!("play requested");
    }
}

/// Presents quizzes on the terminal and reads the answer from stdin
struct TerminalPresenter;

#[async_trait]
impl QuizPresenter for TerminalPresenter {
    async fn present(&self, item: &QuizItem) -> QuizOutcome {
        match item {
            QuizItem::Vocabulary { word, options, .. } => {
                println!("What does \"{}\" mean?", word);
                for (i, option) in options.iter().enumerate() {
                    println!("  {}) {}", i + 1, option);
                }
            }
            QuizItem::FillBlank { sentence, .. } => println!("Fill in the blank: {}", sentence),
            QuizItem::Translation { sentence, .. } => println!("Translate: {}", sentence),
            QuizItem::Pronunciation { instruction, .. } => println!("{}", instruction),
        }
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let answer = match lines.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            _ => return QuizOutcome::Dismissed,
        };
        if answer.is_empty() {
            return QuizOutcome::Dismissed;
        }

        // A vocabulary answer may be given as the option number
        if let QuizItem::Vocabulary { options, .. } = item {
            if let Some(option) = answer.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| options.get(i)) {
                return QuizOutcome::Answered(option.clone());
            }
        }
        QuizOutcome::Answered(answer)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "linguacue", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Parse { file, at } => run_parse(file, at.as_deref()),
        Commands::Translate { file } => run_translate(&config, &cli, file).await,
        Commands::Quiz { file, at } => run_quiz(&config, &cli, file, at).await,
        Commands::Define { word, save } => run_define(&config, &cli, word, *save).await,
        Commands::CheckProvider => run_check_provider(&config).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to save default config to {}", config_path))?;
        info!("Default config saved to '{}'", config_path);
        config
    };

    // Update log level in config if specified via command line
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Invalid configuration")?;
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Configuration loaded from '{}'", config_path);

    Ok(config)
}

/// Build a controller for a terminal session and apply language overrides
async fn build_controller(config: &Config, cli: &CommandLineOptions, position: f64) -> Result<Controller> {
    let parts = Collaborators {
        source: Arc::new(FileCaptionSource),
        provider: app_controller::build_provider(config)?,
        store: app_controller::open_store(config)?,
        playback: Arc::new(FixedPosition(position)),
        presenter: Arc::new(TerminalPresenter),
        clock: clock::system(),
        rng_seed: None,
    };
    let controller = Controller::with_config(config.clone(), parts);
    let mut preferences = controller.start().await?;

    if let Some(from) = &cli.from {
        preferences.target_language = language_utils::normalize_to_part1_or_part2t(from)?;
    }
    if let Some(to) = &cli.to {
        preferences.native_language = language_utils::normalize_to_part1_or_part2t(to)?;
    }
    controller.use_preferences(preferences);

    Ok(controller)
}

fn run_parse(file: &Path, at: Option<&str>) -> Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let timeline = linguacue::SubtitleTimeline::from_subtitles(parse_captions(&content));
    info!("Parsed {} subtitles from {:?}", timeline.len(), file);

    match at {
        Some(at) => match timeline.current_at(time_codec::parse(at)) {
            Some(subtitle) => println!("{}", subtitle),
            None => println!("(nothing showing at {})", at),
        },
        None => {
            for subtitle in timeline.subtitles() {
                println!("{}", subtitle);
            }
        }
    }
    Ok(())
}

async fn run_translate(config: &Config, cli: &CommandLineOptions, file: &Path) -> Result<()> {
    let controller = build_controller(config, cli, 0.0).await?;
    let mut preferences = controller.preferences();
    preferences.auto_translate = false;
    controller.use_preferences(preferences);

    let video_id = file.to_string_lossy();
    let state = controller.load_video(&video_id, None).await?;

    let progress_bar = ProgressBar::new(state.timeline.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");
    progress_bar.set_style(style);

    let state = controller.translate_session(state.token, Some(&progress_bar)).await?;
    let translated = state
        .translated
        .as_ref()
        .ok_or_else(|| anyhow!("Translation produced no bilingual timeline"))?;

    for entry in translated.entries() {
        println!("{}", entry.subtitle);
        println!("    {}", entry.translation.as_deref().unwrap_or("-"));
    }

    let stats = controller.gateway().cache().stats();
    info!(
        "Cache: {} hits, {} misses ({:.0}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );
    Ok(())
}

async fn run_quiz(config: &Config, cli: &CommandLineOptions, file: &Path, at: &str) -> Result<()> {
    let position = time_codec::parse(at);
    let controller = build_controller(config, cli, position).await?;
    let mut preferences = controller.preferences();
    preferences.auto_translate = false;
    controller.use_preferences(preferences);

    controller.load_video(&file.to_string_lossy(), None).await?;

    match controller.trigger_quiz().await? {
        Some(record) => {
            match (record.verdict, record.item.correct_answer()) {
                (None, _) => println!("Quiz dismissed"),
                (Some(verdict), Some(correct)) => println!("{:?}, expected: {}", verdict, correct),
                (Some(verdict), None) => println!("{:?}", verdict),
            }
        }
        None => println!("Not enough recent content for a quiz at {}", time_codec::format(position)),
    }
    Ok(())
}

async fn run_define(config: &Config, cli: &CommandLineOptions, word: &str, save: bool) -> Result<()> {
    let controller = build_controller(config, cli, 0.0).await?;

    let Some(definition) = controller.define_word(word).await else {
        println!("No definition available for \"{}\"", word);
        return Ok(());
    };
    println!("{}: {}", word, definition);

    if save {
        let count = controller.save_word(word, &definition, None).await?;
        info!("Saved \"{}\" ({} words in your vocabulary)", word, count);
    }
    controller.persist_cache().await;
    Ok(())
}

async fn run_check_provider(config: &Config) -> Result<()> {
    let provider = app_controller::build_provider(config)?;
    provider
        .test_connection()
        .await
        .with_context(|| format!("Provider {} is not reachable", provider.name()))?;
    info!("Provider {} is reachable", provider.name());
    Ok(())
}
