//! Lyric aggregation
//!
//! Fetches lyrics for each sampled work in order and folds the word counts
//! into a running sum. Works without usable lyrics are left out of the
//! average entirely; only transport failures abort the run.

use crate::error::{Error, Result};
use crate::services::catalog::{require_text, LyricCatalog};
use crate::workflow::progress::{emit, ProgressObserver};
use chrono::Utc;
use lyricount_common::{LyricResult, PipelineEvent, SampleOutcome, Work};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Running totals over processed works
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    included: usize,
    words: usize,
}

impl Tally {
    fn add(self, word_count: usize) -> Self {
        if word_count == 0 {
            return self;
        }
        Tally {
            included: self.included + 1,
            words: self.words + word_count,
        }
    }
}

/// Per-work lyric fetcher and word-count aggregator
pub struct LyricAggregator {
    catalog: Arc<dyn LyricCatalog>,
    cancel: CancellationToken,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl LyricAggregator {
    pub fn new(catalog: Arc<dyn LyricCatalog>) -> Self {
        Self {
            catalog,
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

    /// Fetch lyrics for every work and average the word counts
    ///
    /// # Errors
    /// * `InvalidArgument` - `artist_name` is empty (no request sent)
    /// * `TransportFailure` - a lyric request could not complete
    /// * `Cancelled` - cancellation observed before a lyric request
    pub async fn aggregate(&self, artist_name: &str, works: &[Work]) -> Result<SampleOutcome> {
        let artist_name = require_text(artist_name, "artist name")?;
        let total = works.len();
        let mut tally = Tally::default();

        for (position, work) in works.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let word_count = self.fetch(artist_name, work).await?.word_count();
            tally = tally.add(word_count);

            debug!(
                title = %work.title,
                word_count,
                included = word_count > 0,
                "Lyrics counted"
            );
            emit(self.observer.as_ref(), || PipelineEvent::WorkProcessed {
                index: position + 1,
                total,
                title: work.title.clone(),
                word_count,
                included: word_count > 0,
                timestamp: Utc::now(),
            });
        }

        let outcome = SampleOutcome::new(total, tally.included, tally.words);
        info!(
            artist = %artist_name,
            sampled = outcome.sampled_count,
            included = outcome.included_count,
            average = outcome.average_words,
            "Lyric aggregation complete"
        );
        emit(self.observer.as_ref(), || PipelineEvent::SampleCompleted {
            outcome,
            timestamp: Utc::now(),
        });

        Ok(outcome)
    }

    /// Fetch one work's lyrics; a rejected request counts as "no lyrics"
    async fn fetch(&self, artist_name: &str, work: &Work) -> Result<LyricResult> {
        match self.catalog.fetch_lyrics(artist_name, &work.title).await {
            Ok(lyrics) => Ok(lyrics),
            Err(Error::InvalidArgument(reason)) => {
                warn!(title = %work.title, %reason, "Skipping work without usable lyrics");
                Ok(LyricResult::not_found())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FixtureLyricCatalog;
    use crate::workflow::progress::EventLog;

    fn works(titles: &[&str]) -> Vec<Work> {
        titles.iter().map(|t| Work::new(*t)).collect()
    }

    #[tokio::test]
    async fn test_empty_lyrics_excluded_from_average() {
        let catalog = FixtureLyricCatalog::new()
            .with_lyrics("A", "one two")
            .with_lyrics("B", "")
            .with_lyrics("C", "three four five");
        let aggregator = LyricAggregator::new(Arc::new(catalog));

        let outcome = aggregator
            .aggregate("Artist", &works(&["A", "B", "C"]))
            .await
            .unwrap();

        assert_eq!(outcome.sampled_count, 3);
        assert_eq!(outcome.included_count, 2);
        assert_eq!(outcome.total_words, 5);
        assert_eq!(outcome.average_words, 2);
    }

    #[tokio::test]
    async fn test_all_empty_yields_zero_average() {
        let catalog = FixtureLyricCatalog::new().with_lyrics("Blank", " \n\t ");
        let aggregator = LyricAggregator::new(Arc::new(catalog));

        let outcome = aggregator
            .aggregate("Artist", &works(&["Blank", "Missing"]))
            .await
            .unwrap();

        assert_eq!(outcome, SampleOutcome::new(2, 0, 0));
    }

    #[tokio::test]
    async fn test_blank_title_is_skipped_not_fatal() {
        let catalog = Arc::new(FixtureLyricCatalog::new().with_fallback("la la"));
        let aggregator = LyricAggregator::new(catalog.clone());

        let outcome = aggregator
            .aggregate("Artist", &works(&["First", "   ", "Third"]))
            .await
            .unwrap();

        assert_eq!(outcome.sampled_count, 3);
        assert_eq!(outcome.included_count, 2);
        assert_eq!(outcome.average_words, 2);
        assert_eq!(catalog.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_aborts() {
        let catalog = Arc::new(
            FixtureLyricCatalog::new()
                .with_fallback("words here")
                .failing_for("Second"),
        );
        let aggregator = LyricAggregator::new(catalog.clone());

        let err = aggregator
            .aggregate("Artist", &works(&["First", "Second", "Third"]))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(catalog.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_artist_name_rejected() {
        let catalog = Arc::new(FixtureLyricCatalog::new());
        let aggregator = LyricAggregator::new(catalog.clone());

        let err = aggregator.aggregate(" ", &works(&["A"])).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(catalog.requests().is_empty());
    }

    #[tokio::test]
    async fn test_progress_reported_per_work() {
        let log = EventLog::new();
        let catalog = FixtureLyricCatalog::new().with_fallback("x y z");
        let aggregator =
            LyricAggregator::new(Arc::new(catalog)).with_observer(Some(Arc::new(log.clone())));

        aggregator
            .aggregate("Artist", &works(&["A", "B"]))
            .await
            .unwrap();

        let indices: Vec<(usize, usize)> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::WorkProcessed { index, total, .. } => Some((*index, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(indices, vec![(1, 2), (2, 2)]);
        assert_eq!(log.event_types().last(), Some(&"SampleCompleted"));
    }

    #[tokio::test]
    async fn test_cancellation_stops_before_next_work() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let observer: Arc<dyn ProgressObserver> = Arc::new(move |event: &PipelineEvent| {
            if matches!(event, PipelineEvent::WorkProcessed { index: 1, .. }) {
                trigger.cancel();
            }
        });
        let catalog = Arc::new(FixtureLyricCatalog::new().with_fallback("a b"));
        let aggregator = LyricAggregator::new(catalog.clone())
            .with_cancellation(cancel)
            .with_observer(Some(observer));

        let result = aggregator.aggregate("Artist", &works(&["A", "B", "C"])).await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(catalog.requests().len(), 1);
    }
}
