//! Catalog data contracts shared by the clients and the pipeline
//!
//! All records are immutable once built from a catalog response.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Catalog artist identifier (MusicBrainz MBID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(pub Uuid);

impl ArtistId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// The nil identifier never names a real artist
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for ArtistId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Artist kind as reported by the catalog
///
/// The catalog also knows orchestras, choirs, characters and so on; those
/// (and a missing type) collapse to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArtistType {
    Person,
    Group,
    #[default]
    #[serde(other)]
    Other,
}

/// Artist search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub artist_type: ArtistType,
    pub name: String,
    /// ISO country code; empty when unknown
    pub country: String,
}

impl Artist {
    pub fn new(
        id: ArtistId,
        artist_type: ArtistType,
        name: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id,
            artist_type,
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn has_country(&self) -> bool {
        !self.country.trim().is_empty()
    }
}

/// One catalog-listed work (composition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub title: String,
    /// Catalog work MBID (unused by the pipeline)
    #[serde(default)]
    pub id: Option<String>,
    /// e.g. "Song" (unused by the pipeline)
    #[serde(default)]
    pub work_type: Option<String>,
    /// ISO 639-3 lyric language (unused by the pipeline)
    #[serde(default)]
    pub language: Option<String>,
}

impl Work {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: None,
            work_type: None,
            language: None,
        }
    }
}

/// One page of a paginated work listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPage {
    pub works: Vec<Work>,
    /// Total works the catalog holds for the artist
    pub total_count: usize,
    pub offset: usize,
    pub limit: usize,
}

impl WorkPage {
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}

/// Raw lyric text for one work; empty means "not found"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricResult {
    pub lyrics: String,
}

impl LyricResult {
    pub fn new(lyrics: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::default()
    }

    /// Number of whitespace-separated tokens
    pub fn word_count(&self) -> usize {
        self.lyrics.split_whitespace().count()
    }
}

/// Final aggregate of a sampling run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleOutcome {
    /// Works that were sampled
    pub sampled_count: usize,
    /// Works whose lyrics had at least one word
    pub included_count: usize,
    /// Sum of word counts over included works
    pub total_words: usize,
    /// `total_words / included_count`, floored; 0 when nothing was included
    pub average_words: usize,
}

impl SampleOutcome {
    pub fn new(sampled_count: usize, included_count: usize, total_words: usize) -> Self {
        let average_words = if included_count > 0 {
            total_words / included_count
        } else {
            0
        };

        Self {
            sampled_count,
            included_count,
            total_words,
            average_words,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_ignores_whitespace_runs() {
        assert_eq!(LyricResult::new("a   b\tc\n").word_count(), 3);
        assert_eq!(LyricResult::new("a b c").word_count(), 3);
        assert_eq!(LyricResult::new(" \n\t ").word_count(), 0);
        assert_eq!(LyricResult::not_found().word_count(), 0);
    }

    #[test]
    fn test_outcome_floors_average() {
        let outcome = SampleOutcome::new(3, 2, 5);
        assert_eq!(outcome.average_words, 2);
    }

    #[test]
    fn test_outcome_zero_included() {
        let outcome = SampleOutcome::new(4, 0, 0);
        assert_eq!(outcome.average_words, 0);
        assert_eq!(outcome.sampled_count, 4);
    }

    #[test]
    fn test_artist_type_unknown_values() {
        let t: ArtistType = serde_json::from_str("\"Orchestra\"").unwrap();
        assert_eq!(t, ArtistType::Other);
        let t: ArtistType = serde_json::from_str("\"Group\"").unwrap();
        assert_eq!(t, ArtistType::Group);
    }

    #[test]
    fn test_nil_artist_id() {
        assert!(ArtistId::new(Uuid::nil()).is_nil());
        let id = ArtistId::parse("b8a7c51f-362c-4dcb-a259-bc6e0095f0a6").unwrap();
        assert!(!id.is_nil());
        assert_eq!(id.to_string(), "b8a7c51f-362c-4dcb-a259-bc6e0095f0a6");
    }
}
