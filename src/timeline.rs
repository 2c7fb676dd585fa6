/*!
 * Time-indexed subtitle timeline.
 *
 * Subtitles are kept in start order next to a running maximum of their end
 * times. For a time `t`, every subtitle that can contain `t` starts at or
 * before `t` (a prefix of the list) and the first one whose running maximum
 * reaches `t` is the first subtitle in start order that is still showing.
 * Both boundaries are binary searches.
 */

use serde::Serialize;
use std::sync::Arc;

use crate::caption::Subtitle;
use crate::errors::TimelineError;

/// Ordered, immutable subtitle intervals
#[derive(Debug, Clone, Default)]
pub struct SubtitleTimeline {
    subtitles: Vec<Subtitle>,
    // prefix_max_end[i] = max(end of subtitles[0..=i])
    prefix_max_end: Vec<f64>,
}

impl SubtitleTimeline {
    /// Build a timeline; subtitles are stably sorted by start
    pub fn from_subtitles(mut subtitles: Vec<Subtitle>) -> Self {
        subtitles.sort_by(|a, b| a.start().total_cmp(&b.start()));

        let mut prefix_max_end = Vec::with_capacity(subtitles.len());
        let mut running = f64::NEG_INFINITY;
        for subtitle in &subtitles {
            running = running.max(subtitle.end());
            prefix_max_end.push(running);
        }

        Self {
            subtitles,
            prefix_max_end,
        }
    }

    /// First subtitle (in start order) with `start <= t <= end`
    pub fn current_at(&self, t: f64) -> Option<&Subtitle> {
        self.current_index(t).map(|i| &self.subtitles[i])
    }

    fn current_index(&self, t: f64) -> Option<usize> {
        if t.is_nan() {
            return None;
        }
        let started = self.subtitles.partition_point(|s| s.start() <= t);
        let candidate = self.prefix_max_end.partition_point(|end| *end < t);

        // prefix_max_end is non-decreasing, so subtitles before `candidate` all end before t
        // and subtitles[candidate] is the one that lifted the maximum to >= t
        (candidate < started).then_some(candidate)
    }

    /// Subtitles lying entirely inside `[t1, t2]`, in order
    pub fn in_range(&self, t1: f64, t2: f64) -> Vec<&Subtitle> {
        let started = self.subtitles.partition_point(|s| s.start() < t1);
        self.subtitles[started..]
            .iter()
            .take_while(|s| s.start() <= t2)
            .filter(|s| s.end() <= t2)
            .collect()
    }

    /// Pair each subtitle with its translation by index
    pub fn attach_translations(
        &self,
        translations: Vec<Option<String>>,
    ) -> Result<TranslatedTimeline, TimelineError> {
        if translations.len() != self.subtitles.len() {
            return Err(TimelineError::LengthMismatch {
                expected: self.subtitles.len(),
                actual: translations.len(),
            });
        }

        let entries = self
            .subtitles
            .iter()
            .cloned()
            .zip(translations)
            .map(|(subtitle, translation)| TranslatedSubtitle {
                subtitle,
                translation,
            })
            .collect();

        Ok(TranslatedTimeline {
            timeline: Arc::new(self.clone()),
            entries,
        })
    }

    /// All subtitles in start order
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// Number of subtitles
    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    /// Whether the timeline has no subtitles
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    /// End of the last-ending subtitle, if any
    pub fn duration(&self) -> Option<f64> {
        self.prefix_max_end.last().copied()
    }
}

/// A subtitle with its (optional) translation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedSubtitle {
    /// Original subtitle
    pub subtitle: Subtitle,
    /// Translation, when one was obtained
    pub translation: Option<String>,
}

/// Bilingual view over a timeline
#[derive(Debug, Clone)]
pub struct TranslatedTimeline {
    timeline: Arc<SubtitleTimeline>,
    entries: Vec<TranslatedSubtitle>,
}

impl TranslatedTimeline {
    /// Same query as `SubtitleTimeline::current_at`, over the bilingual view
    pub fn current_at(&self, t: f64) -> Option<&TranslatedSubtitle> {
        self.timeline.current_index(t).map(|i| &self.entries[i])
    }

    /// Entries in start order
    pub fn entries(&self) -> &[TranslatedSubtitle] {
        &self.entries
    }

    /// Number of entries with a translation
    pub fn translated_count(&self) -> usize {
        self.entries.iter().filter(|e| e.translation.is_some()).count()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
