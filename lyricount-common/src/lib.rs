//! # lyricount common library
//!
//! Shared code for the lyricount crates:
//! - Catalog data contracts (artists, works, lyric results, outcomes)
//! - Pipeline event types
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
pub use events::PipelineEvent;
pub use models::{Artist, ArtistId, ArtistType, LyricResult, SampleOutcome, Work, WorkPage};
