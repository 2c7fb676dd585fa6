/*!
 * Common test utilities for the linguacue test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use linguacue::app_controller::{PlaybackControl, QuizPresenter};
use linguacue::quiz::{QuizItem, QuizOutcome};

/// Two-cue WebVTT payload with a header, an identifier and a NOTE block
pub const SAMPLE_VTT: &str = "WEBVTT
Kind: captions
Language: es

NOTE generated for tests

1
00:00:01.000 --> 00:00:04.000 align:start position:0%
<c>el gato corre</c>
rápido

00:00:05.000 --> 00:00:09.500
la casa es muy grande
";

/// Timed-text XML payload with entities and inline markup
pub const SAMPLE_TIMED_TEXT: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0.5" dur="2.0">Tom &amp; Jerry</text>
<text start="3" dur="1.5">&lt;i&gt;hola&lt;/i&gt;   amigos &#39;míos&#39;</text>
<text start="5" dur="1">   </text>
</transcript>"#;

/// Initialize test logging once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Playback stand-in that records pause/play calls
pub struct FakePlayback {
    pub playing: AtomicBool,
    pub position: f64,
    pub pauses: AtomicUsize,
    pub plays: AtomicUsize,
}

impl FakePlayback {
    pub fn playing_at(position: f64) -> Self {
        Self {
            playing: AtomicBool::new(true),
            position,
            pauses: AtomicUsize::new(0),
            plays: AtomicUsize::new(0),
        }
    }
}

impl FakePlayback {
    /// Whether playback is running, without going through the trait
    pub fn is_playing_now(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl PlaybackControl for FakePlayback {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn pause(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }

    fn play(&self) {
        self.playing.store(true, Ordering::SeqCst);
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

/// Presenter scripted with a fixed behavior
pub enum ScriptedPresenter {
    /// Always answer with the expected answer
    AnswerCorrectly,
    /// Always answer with this text
    Answer(String),
    /// Never answer
    Ignore,
}

#[async_trait]
impl QuizPresenter for ScriptedPresenter {
    async fn present(&self, item: &QuizItem) -> QuizOutcome {
        match self {
            Self::AnswerCorrectly => QuizOutcome::Answered(item.correct_answer().unwrap_or("ok").to_string()),
            Self::Answer(text) => QuizOutcome::Answered(text.clone()),
            Self::Ignore => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                QuizOutcome::Dismissed
            }
        }
    }
}

/// Shared handle for a scripted presenter
pub fn presenter(script: ScriptedPresenter) -> Arc<dyn QuizPresenter> {
    Arc::new(script)
}
