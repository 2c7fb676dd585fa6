/*!
 * Quiz timing.
 *
 * The scheduler is polled on a fixed tick. A quiz is due when the video is
 * playing and either no quiz has been shown yet or the configured interval
 * has passed since the last quiz that was actually shown.
 */

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::clock::Clock;

/// Tracks when the last quiz was shown
pub struct QuizScheduler {
    clock: Arc<dyn Clock>,
    // @field: None until the first quiz is shown; the first tick while playing is due
    last_quiz_at: Option<DateTime<Utc>>,
    interval: Duration,
}

impl QuizScheduler {
    /// Create a scheduler with no quiz shown yet
    pub fn new(interval_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_quiz_at: None,
            interval: seconds(interval_secs),
        }
    }

    /// Whether a quiz should be attempted on this tick
    pub fn is_due(&self, playing: bool) -> bool {
        playing && self.elapsed().is_none_or(|elapsed| elapsed >= self.interval)
    }

    /// Time since the last quiz, `None` before the first one
    pub fn elapsed(&self) -> Option<Duration> {
        self.last_quiz_at.map(|at| self.clock.now() - at)
    }

    /// Note that a quiz was shown now
    pub fn record_quiz(&mut self) {
        self.last_quiz_at = Some(self.clock.now());
    }

    /// Change the interval (learner preference)
    pub fn set_interval(&mut self, interval_secs: u64) {
        self.interval = seconds(interval_secs);
    }

    /// Current interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant of the last quiz
    pub fn last_quiz_at(&self) -> Option<DateTime<Utc>> {
        self.last_quiz_at
    }
}

// @const: Ten years; longer intervals are clamped
const MAX_INTERVAL_SECS: u64 = 315_360_000;

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_INTERVAL_SECS) as i64)
}
