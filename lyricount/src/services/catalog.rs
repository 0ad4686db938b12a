//! Catalog collaborator traits
//!
//! The pipeline only talks to these traits. Each has a live HTTP client and
//! an in-memory fixture; both validate inputs with the same helpers so a
//! fixture rejects exactly what the live client rejects.

use crate::error::{Error, Result};
use async_trait::async_trait;
use lyricount_common::{Artist, ArtistId, LyricResult, WorkPage};

/// Artist/work metadata catalog
#[async_trait]
pub trait ArtistCatalog: Send + Sync {
    /// Catalog identifier for logs and error messages
    fn source_id(&self) -> &'static str;

    /// Search artists by name, best match first
    ///
    /// An empty list is a successful "nothing found", not an error.
    ///
    /// # Errors
    /// * `InvalidArgument` - `name` is empty or whitespace (no request sent)
    /// * `TransportFailure` - request could not complete
    async fn search_artists(&self, name: &str, max_results: u32) -> Result<Vec<Artist>>;

    /// List one page of an artist's works
    ///
    /// # Errors
    /// * `InvalidArgument` - `artist_id` is the nil identifier (no request sent)
    /// * `TransportFailure` - request could not complete
    async fn list_works(&self, artist_id: ArtistId, limit: u32, offset: usize)
        -> Result<WorkPage>;
}

/// Lyrics catalog
#[async_trait]
pub trait LyricCatalog: Send + Sync {
    fn source_id(&self) -> &'static str;

    /// Fetch lyric text for one song; empty text means not found
    ///
    /// # Errors
    /// * `InvalidArgument` - either input is empty or whitespace
    /// * `TransportFailure` - request could not complete
    async fn fetch_lyrics(&self, artist_name: &str, song_title: &str) -> Result<LyricResult>;
}

/// Reject empty or whitespace-only text
pub fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(value)
}

/// Reject the nil artist identifier
pub fn require_artist_id(artist_id: ArtistId) -> Result<ArtistId> {
    if artist_id.is_nil() {
        return Err(Error::InvalidArgument(
            "artist id must not be the nil identifier".to_string(),
        ));
    }
    Ok(artist_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_require_text() {
        assert!(require_text("Ed Sheeran", "artist name").is_ok());
        assert!(matches!(
            require_text(" \t", "artist name"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            require_text("", "song title"),
            Err(Error::InvalidArgument(msg)) if msg.contains("song title")
        ));
    }

    #[test]
    fn test_require_artist_id() {
        assert!(require_artist_id(ArtistId::new(Uuid::nil())).is_err());
        assert!(require_artist_id(ArtistId::new(Uuid::new_v4())).is_ok());
    }
}
