//! lyricount library interface
//!
//! Samples an artist's works from MusicBrainz, fetches lyrics for each from
//! lyrics.ovh and reports the average word count. The binary is a thin shell
//! over [`workflow::Pipeline`]; everything here is usable without a terminal.

pub mod console;
pub mod error;
pub mod services;
pub mod workflow;

pub use crate::error::{Error, Result};
pub use crate::services::{ArtistCatalog, LyricCatalog};
pub use crate::workflow::{ArtistSelector, FixedSelection, Pipeline, PipelineConfig};
