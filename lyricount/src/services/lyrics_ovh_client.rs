//! lyrics.ovh API client
//!
//! `GET {base}/{artist}/{title}` returns `{"lyrics": "..."}`. A 404 means the
//! song is unknown and maps to an empty [`LyricResult`]; any other
//! non-success status is a transport failure.

use crate::error::{Error, Result};
use crate::services::catalog::{require_text, LyricCatalog};
use async_trait::async_trait;
use lyricount_common::config::TomlConfig;
use lyricount_common::LyricResult;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

const SERVICE: &str = "lyrics.ovh";

#[derive(Debug, Deserialize)]
struct LyricsResponse {
    #[serde(default)]
    lyrics: String,
}

/// lyrics.ovh API client
pub struct LyricsOvhClient {
    client: Client,
    base_url: Url,
}

impl LyricsOvhClient {
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let base_url = Url::parse(&config.lyrics.base_url).map_err(|e| {
            Error::InvalidArgument(format!(
                "invalid lyrics base URL '{}': {}",
                config.lyrics.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!(
                "lyrics base URL '{}' cannot be a base",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(config.musicbrainz.effective_user_agent())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::transport(SERVICE, format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Build the lookup URL with both segments percent-encoded
    ///
    /// `.` and `..` would be resolved away as dot segments and address a
    /// different resource, so they are rejected.
    fn lyrics_url(&self, artist_name: &str, song_title: &str) -> Result<Url> {
        for segment in [artist_name, song_title] {
            if matches!(segment, "." | "..") {
                return Err(Error::InvalidArgument(format!(
                    "'{}' cannot be used as a lyrics path segment",
                    segment
                )));
            }
        }

        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in from_config
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(artist_name).push(song_title);
        }
        Ok(url)
    }
}

#[async_trait]
impl LyricCatalog for LyricsOvhClient {
    fn source_id(&self) -> &'static str {
        SERVICE
    }

    async fn fetch_lyrics(&self, artist_name: &str, song_title: &str) -> Result<LyricResult> {
        let artist_name = require_text(artist_name, "artist name")?;
        let song_title = require_text(song_title, "song title")?;

        let url = self.lyrics_url(artist_name, song_title)?;
        tracing::debug!(artist = %artist_name, title = %song_title, "Querying lyrics.ovh");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(SERVICE, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(title = %song_title, "No lyrics found");
            return Ok(LyricResult::not_found());
        }
        if !status.is_success() {
            return Err(Error::transport(
                SERVICE,
                format!("HTTP {} for '{}'", status.as_u16(), song_title),
            ));
        }

        let body: LyricsResponse = response
            .json()
            .await
            .map_err(|e| Error::transport(SERVICE, format!("malformed response: {}", e)))?;

        Ok(LyricResult::new(body.lyrics))
    }
}
