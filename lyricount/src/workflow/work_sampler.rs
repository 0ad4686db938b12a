//! Work sampling
//!
//! Pages through an artist's works until the requested sample size is
//! collected or the catalog runs out. Exhaustion is a successful (possibly
//! short) sample; a catalog error discards whatever was collected.

use crate::error::{Error, Result};
use crate::services::ArtistCatalog;
use crate::workflow::progress::{emit, ProgressObserver};
use chrono::Utc;
use lyricount_common::config::MUSICBRAINZ_MAX_BATCH_SIZE;
use lyricount_common::{ArtistId, PipelineEvent, Work};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// Requested sample size reached
    Filled,
    /// Catalog returned an empty page or reported no more works
    Exhausted,
}

/// Paginated work sampler
pub struct WorkSampler {
    catalog: Arc<dyn ArtistCatalog>,
    max_batch_size: u32,
    cancel: CancellationToken,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl WorkSampler {
    /// `max_batch_size` is clamped to `1..=MUSICBRAINZ_MAX_BATCH_SIZE`
    pub fn new(catalog: Arc<dyn ArtistCatalog>, max_batch_size: u32) -> Self {
        Self {
            catalog,
            max_batch_size: max_batch_size.clamp(1, MUSICBRAINZ_MAX_BATCH_SIZE),
            cancel: CancellationToken::new(),
            observer: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_observer(mut self, observer: Option<Arc<dyn ProgressObserver>>) -> Self {
        self.observer = observer;
        self
    }

    /// Collect up to `sample_size` works in catalog order
    ///
    /// Each request asks for `min(remaining, max_batch_size)` works at
    /// `offset = collected`. Stops when the sample is full, a page comes back
    /// empty, or the catalog's reported total is reached.
    ///
    /// # Errors
    /// * `InvalidArgument` - `sample_size` is zero (no request sent)
    /// * `TransportFailure` - any page request failed; partial results are dropped
    /// * `Cancelled` - cancellation observed before a page request
    pub async fn sample(&self, artist_id: ArtistId, sample_size: u32) -> Result<Vec<Work>> {
        if sample_size == 0 {
            return Err(Error::InvalidArgument(
                "sample size must be a positive integer".to_string(),
            ));
        }

        let target = sample_size as usize;
        let mut collected: Vec<Work> = Vec::new();

        let stop = loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let (works, stop) = self.next_batch(artist_id, target, collected).await?;
            collected = works;
            if let Some(stop) = stop {
                break stop;
            }
        };

        info!(
            artist_id = %artist_id,
            requested = target,
            collected = collected.len(),
            exhausted = stop == Stop::Exhausted,
            "Work sampling complete"
        );

        Ok(collected)
    }

    /// Fetch one page and fold it into the accumulator
    async fn next_batch(
        &self,
        artist_id: ArtistId,
        target: usize,
        mut collected: Vec<Work>,
    ) -> Result<(Vec<Work>, Option<Stop>)> {
        let offset = collected.len();
        let remaining = target - offset;
        let limit = remaining.min(self.max_batch_size as usize) as u32;

        let page = self.catalog.list_works(artist_id, limit, offset).await?;

        if page.is_empty() {
            debug!(offset, "Empty work page, catalog exhausted");
            return Ok((collected, Some(Stop::Exhausted)));
        }

        let received = page.works.len();
        collected.extend(page.works.into_iter().take(remaining));

        emit(self.observer.as_ref(), || PipelineEvent::BatchFetched {
            offset,
            received,
            collected: collected.len(),
            requested: target,
            available: page.total_count,
            timestamp: Utc::now(),
        });

        let stop = if collected.len() >= target {
            Some(Stop::Filled)
        } else if collected.len() >= page.total_count {
            Some(Stop::Exhausted)
        } else {
            None
        };

        Ok((collected, stop))
    }
}
