//! Sampling workflow
//!
//! - `work_sampler`: paginated work retrieval for one artist
//! - `lyric_aggregator`: per-work lyric fetch and word-count averaging
//! - `pipeline`: artist resolution plus both stages above
//! - `progress`: observer hook for [`PipelineEvent`](lyricount_common::PipelineEvent)s
//!
//! Every stage checks its cancellation token before each outbound request, so
//! a cancelled run stops at the next batch or work boundary.

pub mod lyric_aggregator;
pub mod pipeline;
pub mod progress;
pub mod work_sampler;

pub use lyric_aggregator::LyricAggregator;
pub use pipeline::{ArtistSelector, FixedSelection, Pipeline, PipelineConfig};
pub use progress::{EventLog, ProgressObserver};
pub use work_sampler::WorkSampler;
