//! MusicBrainz API client
//!
//! Artist search and paginated work browsing against the MusicBrainz web
//! service (`/ws/2`). Requests are rate limited with a token bucket to the
//! configured rate (MusicBrainz policy: at most 1 request/second).
//!
//! API Documentation: https://musicbrainz.org/doc/MusicBrainz_API

use crate::error::{Error, Result};
use crate::services::catalog::{require_artist_id, require_text, ArtistCatalog};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use lyricount_common::config::TomlConfig;
use lyricount_common::{Artist, ArtistId, ArtistType, Work, WorkPage};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::num::NonZeroU32;

const SERVICE: &str = "MusicBrainz";

/// Artist search response
#[derive(Debug, Deserialize)]
struct MBArtistSearch {
    #[serde(default)]
    artists: Vec<MBArtist>,
}

#[derive(Debug, Deserialize)]
struct MBArtist {
    id: String,
    name: String,
    #[serde(rename = "type", default)]
    artist_type: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Work browse response
#[derive(Debug, Deserialize)]
struct MBWorkBrowse {
    #[serde(rename = "work-count", default)]
    work_count: usize,
    #[serde(default)]
    works: Vec<MBWork>,
}

#[derive(Debug, Deserialize)]
struct MBWork {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(rename = "type", default)]
    work_type: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

impl TryFrom<MBArtist> for Artist {
    type Error = Error;

    fn try_from(mb: MBArtist) -> Result<Self> {
        let id = ArtistId::parse(&mb.id).map_err(|e| {
            Error::transport(SERVICE, format!("malformed artist id '{}': {}", mb.id, e))
        })?;

        let artist_type = match mb.artist_type.as_deref() {
            Some("Person") => ArtistType::Person,
            Some("Group") => ArtistType::Group,
            _ => ArtistType::Other,
        };

        Ok(Artist::new(
            id,
            artist_type,
            mb.name,
            mb.country.unwrap_or_default(),
        ))
    }
}

impl From<MBWork> for Work {
    fn from(mb: MBWork) -> Self {
        Work {
            title: mb.title,
            id: mb.id,
            work_type: mb.work_type,
            language: mb.language,
        }
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    /// HTTP client with configured timeouts and User-Agent
    client: Client,
    /// Base URL for the web service, without trailing slash
    base_url: String,
    rate_limiter: RateLimiter<
        governor::state::direct::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl MusicBrainzClient {
    /// Create client against the public MusicBrainz service
    ///
    /// # Arguments
    /// * `user_agent` - User-Agent string (required by MusicBrainz policy)
    ///   Format: "AppName/Version ( contact )"
    pub fn new(user_agent: String) -> Result<Self> {
        let mut config = TomlConfig::default();
        config.musicbrainz.user_agent = Some(user_agent);
        Self::from_config(&config)
    }

    /// Create client from configuration (base URL, timeouts, rate)
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.musicbrainz.effective_user_agent())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| Error::transport(SERVICE, format!("HTTP client setup failed: {}", e)))?;

        let per_second =
            NonZeroU32::new(config.musicbrainz.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            client,
            base_url: config.musicbrainz.base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// GET a JSON resource, honouring the rate limit
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = self.endpoint(resource);
        tracing::debug!(url = %url, ?query, "Querying MusicBrainz API");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .query(&[("fmt", "json")])
            .send()
            .await
            .map_err(|e| Error::transport(SERVICE, e.to_string()))?;

        let status = response.status();
        if status == 503 {
            return Err(Error::transport(SERVICE, "rate limit exceeded (HTTP 503)"));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::transport(
                SERVICE,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| Error::transport(SERVICE, format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl ArtistCatalog for MusicBrainzClient {
    fn source_id(&self) -> &'static str {
        SERVICE
    }

    async fn search_artists(&self, name: &str, max_results: u32) -> Result<Vec<Artist>> {
        let name = require_text(name, "artist name")?;

        let search: MBArtistSearch = self
            .get_json(
                "artist",
                &[
                    ("query", name.to_string()),
                    ("limit", max_results.max(1).to_string()),
                ],
            )
            .await?;

        let artists = search
            .artists
            .into_iter()
            .map(Artist::try_from)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(query = %name, found = artists.len(), "MusicBrainz artist search complete");
        Ok(artists)
    }

    async fn list_works(
        &self,
        artist_id: ArtistId,
        limit: u32,
        offset: usize,
    ) -> Result<WorkPage> {
        let artist_id = require_artist_id(artist_id)?;

        let browse: MBWorkBrowse = self
            .get_json(
                "work",
                &[
                    ("artist", artist_id.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            artist_id = %artist_id,
            offset,
            received = browse.works.len(),
            total = browse.work_count,
            "MusicBrainz work page received"
        );

        Ok(WorkPage {
            works: browse.works.into_iter().map(Work::from).collect(),
            total_count: browse.work_count,
            offset,
            limit: limit as usize,
        })
    }
}
