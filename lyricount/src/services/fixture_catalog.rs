//! In-memory catalogs
//!
//! Deterministic stand-ins for the live clients. They validate inputs exactly
//! like the live clients, record every request they serve, and can be told to
//! fail at a given point. `demo()` builds the data set used by `--offline`.

use crate::error::{Error, Result};
use crate::services::catalog::{require_artist_id, require_text, ArtistCatalog, LyricCatalog};
use async_trait::async_trait;
use lyricount_common::{Artist, ArtistId, ArtistType, LyricResult, Work, WorkPage};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

const ARTIST_SOURCE: &str = "fixture-artists";
const LYRIC_SOURCE: &str = "fixture-lyrics";

/// One work listing request as received by the fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRequest {
    pub artist_id: ArtistId,
    pub limit: u32,
    pub offset: usize,
}

/// In-memory artist/work catalog
#[derive(Default)]
pub struct FixtureArtistCatalog {
    artists: Vec<Artist>,
    works: HashMap<ArtistId, Vec<Work>>,
    /// Overrides the reported `total_count` per artist
    reported_totals: HashMap<ArtistId, usize>,
    /// Fail any work request at or beyond this offset
    fail_from_offset: Option<usize>,
    /// Return every work from `offset` on, regardless of `limit`
    ignore_limit: bool,
    searches: Mutex<Vec<String>>,
    requests: Mutex<Vec<WorkRequest>>,
}

impl FixtureArtistCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artist with its works, in catalog order
    pub fn with_artist(mut self, artist: Artist, works: Vec<Work>) -> Self {
        self.works.insert(artist.id, works);
        self.artists.push(artist);
        self
    }

    /// Report `total` as the catalog count regardless of the works held
    pub fn with_reported_total(mut self, artist_id: ArtistId, total: usize) -> Self {
        self.reported_totals.insert(artist_id, total);
        self
    }

    /// Make work requests at `offset` or later fail with a transport error
    pub fn failing_from_offset(mut self, offset: usize) -> Self {
        self.fail_from_offset = Some(offset);
        self
    }

    /// Serve pages longer than the requested limit
    pub fn ignoring_limit(mut self) -> Self {
        self.ignore_limit = true;
        self
    }

    /// Work listing requests served so far, in order
    pub fn work_requests(&self) -> Vec<WorkRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Search queries served so far, in order
    pub fn searches(&self) -> Vec<String> {
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Demo data set for offline runs
    pub fn demo() -> Self {
        let (artists, _) = demo_data();
        artists
    }
}

#[async_trait]
impl ArtistCatalog for FixtureArtistCatalog {
    fn source_id(&self) -> &'static str {
        ARTIST_SOURCE
    }

    async fn search_artists(&self, name: &str, max_results: u32) -> Result<Vec<Artist>> {
        let name = require_text(name, "artist name")?;
        self.searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(name.to_string());

        let needle = name.trim().to_lowercase();
        Ok(self
            .artists
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .take(max_results.max(1) as usize)
            .cloned()
            .collect())
    }

    async fn list_works(
        &self,
        artist_id: ArtistId,
        limit: u32,
        offset: usize,
    ) -> Result<WorkPage> {
        let artist_id = require_artist_id(artist_id)?;
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(WorkRequest {
                artist_id,
                limit,
                offset,
            });

        if matches!(self.fail_from_offset, Some(fail_at) if offset >= fail_at) {
            return Err(Error::transport(
                ARTIST_SOURCE,
                format!("simulated failure at offset {}", offset),
            ));
        }

        let all = self.works.get(&artist_id).map(Vec::as_slice).unwrap_or(&[]);
        let start = offset.min(all.len());
        let end = if self.ignore_limit {
            all.len()
        } else {
            offset.saturating_add(limit as usize).min(all.len())
        };
        let total_count = self
            .reported_totals
            .get(&artist_id)
            .copied()
            .unwrap_or(all.len());

        Ok(WorkPage {
            works: all[start..end].to_vec(),
            total_count,
            offset,
            limit: limit as usize,
        })
    }
}

/// Scripted reply for one song title
#[derive(Debug, Clone)]
enum LyricReply {
    Text(String),
    TransportFailure,
}

/// In-memory lyrics catalog keyed by song title
#[derive(Default)]
pub struct FixtureLyricCatalog {
    replies: HashMap<String, LyricReply>,
    /// Returned for titles without a scripted reply; `None` means not found
    fallback: Option<String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FixtureLyricCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lyrics(mut self, title: impl Into<String>, lyrics: impl Into<String>) -> Self {
        self.replies
            .insert(title.into(), LyricReply::Text(lyrics.into()));
        self
    }

    /// Answer every unscripted title with `lyrics`
    pub fn with_fallback(mut self, lyrics: impl Into<String>) -> Self {
        self.fallback = Some(lyrics.into());
        self
    }

    /// Fail the lookup for `title` with a transport error
    pub fn failing_for(mut self, title: impl Into<String>) -> Self {
        self.replies.insert(title.into(), LyricReply::TransportFailure);
        self
    }

    /// `(artist, title)` pairs requested so far, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Demo data set for offline runs
    pub fn demo() -> Self {
        let (_, lyrics) = demo_data();
        lyrics
    }
}

#[async_trait]
impl LyricCatalog for FixtureLyricCatalog {
    fn source_id(&self) -> &'static str {
        LYRIC_SOURCE
    }

    async fn fetch_lyrics(&self, artist_name: &str, song_title: &str) -> Result<LyricResult> {
        let artist_name = require_text(artist_name, "artist name")?;
        let song_title = require_text(song_title, "song title")?;
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((artist_name.to_string(), song_title.to_string()));

        match self.replies.get(song_title) {
            Some(LyricReply::Text(text)) => Ok(LyricResult::new(text.clone())),
            Some(LyricReply::TransportFailure) => Err(Error::transport(
                LYRIC_SOURCE,
                format!("simulated failure for '{}'", song_title),
            )),
            None => Ok(self
                .fallback
                .as_ref()
                .map(LyricResult::new)
                .unwrap_or_default()),
        }
    }
}

fn demo_artist(id: u128, artist_type: ArtistType, name: &str, country: &str) -> Artist {
    Artist::new(
        ArtistId::new(Uuid::from_u128(id)),
        artist_type,
        name,
        country,
    )
}

/// Offline demo set: three "Test Artist" look-alikes so selection is exercised
fn demo_data() -> (FixtureArtistCatalog, FixtureLyricCatalog) {
    let solo = demo_artist(
        0x6d0e_7a2c_1f3b_4c5d_8e9f_0a1b_2c3d_4e5f,
        ArtistType::Person,
        "Test Artist",
        "GB",
    );
    let band = demo_artist(
        0x1a2b_3c4d_5e6f_4a7b_8c9d_0e1f_2a3b_4c5d,
        ArtistType::Group,
        "Test Artist Band",
        "US",
    );
    let unknown = demo_artist(
        0x9f8e_7d6c_5b4a_4392_8170_6f5e_4d3c_2b1a,
        ArtistType::Other,
        "The Test Artists",
        "",
    );

    let solo_songs = [
        ("Morning Tide", "the tide comes in the tide goes out\nand I wait on the shore"),
        ("Paper Lanterns", "paper lanterns float\nover a quiet town tonight"),
        ("Long Way Home", ""),
        ("Northern Lights", "green and violet\nacross the northern sky\nwe never said goodbye"),
        ("Static", "static on the radio   static in my head"),
    ];
    let band_songs = [
        ("Four Chords", "one two three four\nplay it again"),
        ("Garage Days", "loud loud loud\nturn it up"),
    ];

    let mut lyrics = FixtureLyricCatalog::new();
    for (title, text) in solo_songs.iter().chain(band_songs.iter()) {
        lyrics = lyrics.with_lyrics(*title, *text);
    }

    let artists = FixtureArtistCatalog::new()
        .with_artist(
            solo,
            solo_songs.iter().map(|(title, _)| Work::new(*title)).collect(),
        )
        .with_artist(
            band,
            band_songs.iter().map(|(title, _)| Work::new(*title)).collect(),
        )
        .with_artist(unknown, Vec::new());

    (artists, lyrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(name: &str) -> Artist {
        Artist::new(
            ArtistId::new(Uuid::new_v4()),
            ArtistType::Person,
            name,
            "",
        )
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let catalog = FixtureArtistCatalog::new()
            .with_artist(artist("Ed Sheeran"), vec![])
            .with_artist(artist("Ellie Goulding"), vec![]);

        let found = catalog.search_artists("sheer", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ed Sheeran");

        let found = catalog.search_artists("e", 1).await.unwrap();
        assert_eq!(found.len(), 1);

        let none = catalog.search_artists("abcdefghijklmnop", 10).await.unwrap();
        assert!(none.is_empty());
        assert_eq!(catalog.searches().len(), 3);
    }

    #[tokio::test]
    async fn test_list_works_pages_and_records() {
        let a = artist("Paged");
        let id = a.id;
        let works = (1..=7).map(|i| Work::new(format!("Song {}", i))).collect();
        let catalog = FixtureArtistCatalog::new().with_artist(a, works);

        let page = catalog.list_works(id, 5, 5).await.unwrap();
        assert_eq!(page.works.len(), 2);
        assert_eq!(page.works[0].title, "Song 6");
        assert_eq!(page.total_count, 7);

        let past_end = catalog.list_works(id, 5, 50).await.unwrap();
        assert!(past_end.is_empty());

        assert_eq!(
            catalog.work_requests(),
            vec![
                WorkRequest { artist_id: id, limit: 5, offset: 5 },
                WorkRequest { artist_id: id, limit: 5, offset: 50 },
            ]
        );
    }

    #[tokio::test]
    async fn test_lyric_replies() {
        let catalog = FixtureLyricCatalog::new()
            .with_lyrics("Known", "la la la")
            .failing_for("Broken");

        assert_eq!(
            catalog.fetch_lyrics("A", "Known").await.unwrap().word_count(),
            3
        );
        assert_eq!(
            catalog.fetch_lyrics("A", "Unknown").await.unwrap(),
            LyricResult::not_found()
        );
        assert!(catalog
            .fetch_lyrics("A", "Broken")
            .await
            .unwrap_err()
            .is_transport());
        assert!(matches!(
            catalog.fetch_lyrics("A", "").await,
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(catalog.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_demo_data_is_consistent() {
        let artists = FixtureArtistCatalog::demo();
        let found = artists.search_artists("test artist", 10).await.unwrap();
        assert_eq!(found.len(), 3);

        let page = artists.list_works(found[0].id, 100, 0).await.unwrap();
        assert_eq!(page.total_count, 5);

        let lyrics = FixtureLyricCatalog::demo();
        for work in &page.works {
            let result = lyrics.fetch_lyrics(&found[0].name, &work.title).await;
            assert!(result.is_ok());
        }
    }
}
