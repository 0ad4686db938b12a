//! Pipeline Orchestrator
//!
//! Composes the sampling run:
//! - **Resolve**: artist search, then selection when several candidates match
//! - **Sample**: paginated work retrieval ([`WorkSampler`])
//! - **Aggregate**: per-work lyric word counts ([`LyricAggregator`])
//!
//! # Error Handling
//! - Empty search → `NoMatch`; empty sample → `NoWorksFound`
//! - Transport failures from either stage propagate unchanged
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(artists, lyrics, PipelineConfig::default());
//! let outcome = pipeline.run("Ed Sheeran", 20, Some(&mut FixedSelection(1))).await?;
//! ```

use super::lyric_aggregator::LyricAggregator;
use super::progress::{emit, ProgressObserver};
use super::work_sampler::WorkSampler;
use crate::error::{Error, Result};
use crate::services::catalog::require_text;
use crate::services::{ArtistCatalog, LyricCatalog};
use chrono::Utc;
use lyricount_common::config::{TomlConfig, DEFAULT_SEARCH_LIMIT, MUSICBRAINZ_MAX_BATCH_SIZE};
use lyricount_common::{Artist, PipelineEvent, SampleOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Picks one artist out of several candidates
pub trait ArtistSelector {
    /// Return the 1-based position of the chosen candidate
    ///
    /// Range checking is done by the pipeline.
    fn select(&mut self, candidates: &[Artist]) -> Result<usize>;
}

/// Selector with a predetermined answer (e.g. `--id`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSelection(pub usize);

impl ArtistSelector for FixedSelection {
    fn select(&mut self, _candidates: &[Artist]) -> Result<usize> {
        Ok(self.0)
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum artist candidates requested from the catalog
    pub search_limit: u32,
    /// Upper bound on a single work listing request
    pub max_batch_size: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            max_batch_size: MUSICBRAINZ_MAX_BATCH_SIZE,
        }
    }
}

impl From<&TomlConfig> for PipelineConfig {
    fn from(config: &TomlConfig) -> Self {
        Self {
            search_limit: config.musicbrainz.search_limit,
            max_batch_size: config.musicbrainz.max_batch_size,
        }
    }
}

/// Artist → works → lyrics orchestrator
pub struct Pipeline {
    artists: Arc<dyn ArtistCatalog>,
    lyrics: Arc<dyn LyricCatalog>,
    config: PipelineConfig,
    cancel: CancellationToken,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl Pipeline {
    pub fn new(
        artists: Arc<dyn ArtistCatalog>,
        lyrics: Arc<dyn LyricCatalog>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            artists,
            lyrics,
            config,
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    /// Abort at the next batch/work boundary once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run the full sampling pipeline
    ///
    /// # Arguments
    /// * `artist_name` - Name to search for
    /// * `sample_size` - Number of works to sample (positive)
    /// * `selector` - Chooses among several candidates; unused for a single match
    ///
    /// # Returns
    /// The aggregator's outcome, unchanged
    pub async fn run(
        &self,
        artist_name: &str,
        sample_size: u32,
        selector: Option<&mut dyn ArtistSelector>,
    ) -> Result<SampleOutcome> {
        if sample_size == 0 {
            return Err(Error::InvalidArgument(
                "sample size must be a positive integer".to_string(),
            ));
        }

        let artist = self.resolve_artist(artist_name, selector).await?;

        let works = WorkSampler::new(self.artists.clone(), self.config.max_batch_size)
            .with_cancellation(self.cancel.clone())
            .with_observer(self.observer.clone())
            .sample(artist.id, sample_size)
            .await?;

        if works.is_empty() {
            return Err(Error::NoWorksFound(artist.name));
        }

        LyricAggregator::new(self.lyrics.clone())
            .with_cancellation(self.cancel.clone())
            .with_observer(self.observer.clone())
            .aggregate(&artist.name, &works)
            .await
    }

    /// Search for the artist and settle on one candidate
    ///
    /// A single candidate is taken without consulting the selector.
    pub async fn resolve_artist(
        &self,
        artist_name: &str,
        selector: Option<&mut dyn ArtistSelector>,
    ) -> Result<Artist> {
        let artist_name = require_text(artist_name, "artist name")?.trim();

        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut candidates = self
            .artists
            .search_artists(artist_name, self.config.search_limit)
            .await?;

        if candidates.is_empty() {
            return Err(Error::NoMatch(artist_name.to_string()));
        }

        emit(self.observer.as_ref(), || PipelineEvent::CandidatesFound {
            query: artist_name.to_string(),
            candidates: candidates.clone(),
            timestamp: Utc::now(),
        });

        let count = candidates.len();
        let position = match (count, selector) {
            (1, _) => 1,
            (_, None) => return Err(Error::SelectionRequired(count)),
            (_, Some(selector)) => selector.select(&candidates)?,
        };

        if position == 0 || position > count {
            return Err(Error::SelectionOutOfRange {
                selected: position,
                count,
            });
        }

        let artist = candidates.swap_remove(position - 1);
        info!(
            artist = %artist.name,
            artist_id = %artist.id,
            position,
            candidates = count,
            "Artist selected"
        );
        emit(self.observer.as_ref(), || PipelineEvent::ArtistSelected {
            artist: artist.clone(),
            position,
            timestamp: Utc::now(),
        });

        Ok(artist)
    }
}
