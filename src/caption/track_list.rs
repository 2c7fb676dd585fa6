/*!
 * Caption acquisition from published track metadata.
 *
 * The watch page embeds a player response JSON object listing the caption
 * tracks of the video. The best track for the learner's language is picked
 * and its payload is fetched and parsed.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::parser::parse_captions;
use super::source::CaptionSource;
use super::Subtitle;
use crate::errors::CaptionError;
use crate::language_utils;

// @const: Assignment of the embedded player response
static PLAYER_RESPONSE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ytInitialPlayerResponse\s*=\s*").unwrap());

/// One caption track advertised by the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionTrack {
    /// Payload URL
    pub url: String,
    /// Language code as advertised (e.g. "es-MX")
    pub language: String,
    /// Display name
    pub name: String,
    /// Track kind ("captions" or "asr" for auto-generated)
    pub kind: String,
}

impl CaptionTrack {
    /// List the caption tracks in a player response object
    pub fn from_player_response(player_response: &Value) -> Vec<CaptionTrack> {
        let Some(tracks) = player_response
            .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
            .and_then(|v| v.as_array())
        else {
            return Vec::new();
        };

        tracks
            .iter()
            .filter_map(|track| {
                let url = track.get("baseUrl").and_then(|v| v.as_str())?;
                let language = track
                    .get("languageCode")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                let name = track
                    .pointer("/name/simpleText")
                    .or_else(|| track.pointer("/name/runs/0/text"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(language);
                let kind = track
                    .get("kind")
                    .and_then(|v| v.as_str())
                    .unwrap_or("captions");

                Some(CaptionTrack {
                    url: url.to_string(),
                    language: language.to_string(),
                    name: name.to_string(),
                    kind: kind.to_string(),
                })
            })
            .collect()
    }

    /// Pick the track to use for a learner.
    ///
    /// Exact matches against `variants` win, then any track whose primary
    /// language matches `preferred_language`, then the first track.
    pub fn select_best<'a>(
        tracks: &'a [CaptionTrack],
        preferred_language: &str,
        variants: &[String],
    ) -> Option<&'a CaptionTrack> {
        tracks
            .iter()
            .find(|track| variants.iter().any(|v| v == &track.language))
            .or_else(|| {
                tracks.iter().find(|track| {
                    language_utils::language_codes_match(
                        language_utils::primary_subtag(&track.language),
                        preferred_language,
                    )
                })
            })
            .or_else(|| tracks.first())
    }
}

/// Locate and decode the player response object embedded in a page
pub fn extract_player_response(html: &str) -> Option<Value> {
    let assignment = PLAYER_RESPONSE_REGEX.find(html)?;
    let rest = &html[assignment.end()..];

    // Stream a single JSON value so trailing script text is left alone
    match serde_json::Deserializer::from_str(rest).into_iter::<Value>().next() {
        Some(Ok(value)) if value.is_object() => Some(value),
        Some(Err(e)) => {
            warn!("Embedded player response is not valid JSON: {}", e);
            None
        }
        _ => None,
    }
}

/// Fetches text resources (pages, caption payloads)
#[async_trait]
pub trait PayloadFetcher: Send + Sync {
    /// Fetch the body of `url` as text
    async fn fetch(&self, url: &str) -> Result<String, CaptionError>;
}

/// `PayloadFetcher` backed by reqwest
pub struct HttpPayloadFetcher {
    client: Client,
}

impl HttpPayloadFetcher {
    /// Create a fetcher with the given request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, CaptionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CaptionError::Fetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PayloadFetcher for HttpPayloadFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CaptionError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaptionError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Fetch(format!("{} returned {}", url, status)));
        }

        response
            .text()
            .await
            .map_err(|e| CaptionError::Fetch(format!("Failed to read body of {}: {}", url, e)))
    }
}

/// Acquires captions from the track list embedded in the watch page
pub struct TrackListSource {
    fetcher: Arc<dyn PayloadFetcher>,
    page_url_template: String,
    preferred_language: String,
    language_variants: Vec<String>,
}

impl TrackListSource {
    /// Create a source. `page_url_template` contains a `{video_id}` placeholder.
    pub fn new(
        fetcher: Arc<dyn PayloadFetcher>,
        page_url_template: impl Into<String>,
        preferred_language: impl Into<String>,
        language_variants: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            page_url_template: page_url_template.into(),
            preferred_language: preferred_language.into(),
            language_variants,
        }
    }

    /// List the tracks advertised for a video
    pub async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, CaptionError> {
        let page_url = self.page_url_template.replace("{video_id}", video_id);
        let html = self.fetcher.fetch(&page_url).await?;

        let player_response = extract_player_response(&html)
            .ok_or_else(|| CaptionError::NoCaptions(video_id.to_string()))?;

        Ok(CaptionTrack::from_player_response(&player_response))
    }
}

#[async_trait]
impl CaptionSource for TrackListSource {
    async fn acquire(&self, video_id: &str) -> Result<Vec<Subtitle>, CaptionError> {
        let tracks = self.list_tracks(video_id).await?;
        debug!("Video {} advertises {} caption tracks", video_id, tracks.len());

        let track = CaptionTrack::select_best(&tracks, &self.preferred_language, &self.language_variants)
            .ok_or_else(|| CaptionError::NoCaptions(video_id.to_string()))?;

        info!("Using caption track '{}' ({}, {})", track.name, track.language, track.kind);
        let payload = self.fetcher.fetch(&track.url).await?;

        Ok(parse_captions(&payload))
    }

    fn name(&self) -> &str {
        "track-list"
    }
}
