//! Catalog services
//!
//! - `catalog`: collaborator traits and shared input checks
//! - `musicbrainz_client`: live artist/work catalog
//! - `lyrics_ovh_client`: live lyrics catalog
//! - `fixture_catalog`: deterministic in-memory catalogs (tests, `--offline`)

pub mod catalog;
pub mod fixture_catalog;
pub mod lyrics_ovh_client;
pub mod musicbrainz_client;

pub use catalog::{ArtistCatalog, LyricCatalog};
pub use fixture_catalog::{FixtureArtistCatalog, FixtureLyricCatalog, WorkRequest};
pub use lyrics_ovh_client::LyricsOvhClient;
pub use musicbrainz_client::MusicBrainzClient;
