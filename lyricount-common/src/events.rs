//! Event types emitted while a sampling run progresses
//!
//! Events carry everything a presentation layer needs (candidate list,
//! per-batch and per-work progress) so the pipeline never renders anything.

use crate::models::{Artist, SampleOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// Artist search returned candidates
    CandidatesFound {
        query: String,
        candidates: Vec<Artist>,
        timestamp: DateTime<Utc>,
    },

    /// A candidate was chosen (1-based position in the candidate list)
    ArtistSelected {
        artist: Artist,
        position: usize,
        timestamp: DateTime<Utc>,
    },

    /// One work listing batch arrived
    BatchFetched {
        offset: usize,
        received: usize,
        /// Works collected so far, including this batch
        collected: usize,
        requested: usize,
        /// Total reported by the catalog
        available: usize,
        timestamp: DateTime<Utc>,
    },

    /// Lyrics for one work were fetched and counted
    WorkProcessed {
        /// 1-based position of the work in the sample
        index: usize,
        total: usize,
        title: String,
        word_count: usize,
        included: bool,
        timestamp: DateTime<Utc>,
    },

    /// Aggregation finished
    SampleCompleted {
        outcome: SampleOutcome,
        timestamp: DateTime<Utc>,
    },
}

impl PipelineEvent {
    /// Short event name for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            PipelineEvent::CandidatesFound { .. } => "CandidatesFound",
            PipelineEvent::ArtistSelected { .. } => "ArtistSelected",
            PipelineEvent::BatchFetched { .. } => "BatchFetched",
            PipelineEvent::WorkProcessed { .. } => "WorkProcessed",
            PipelineEvent::SampleCompleted { .. } => "SampleCompleted",
        }
    }
}
