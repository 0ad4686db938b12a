//! Pipeline Integration Tests
//! Test File: pipeline_tests.rs
//!
//! Drives the full artist → works → lyrics pipeline against the in-memory
//! catalogs. No network access.

use std::sync::Arc;

use lyricount::services::{FixtureArtistCatalog, FixtureLyricCatalog, WorkRequest};
use lyricount::workflow::EventLog;
use lyricount::{Error, FixedSelection, Pipeline, PipelineConfig};
use lyricount_common::{Artist, ArtistId, ArtistType, PipelineEvent, SampleOutcome, Work};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn artist(name: &str) -> Artist {
    Artist::new(ArtistId::new(Uuid::new_v4()), ArtistType::Person, name, "GB")
}

fn works(n: usize) -> Vec<Work> {
    (1..=n).map(|i| Work::new(format!("Song {}", i))).collect()
}

fn pipeline(artists: Arc<FixtureArtistCatalog>, lyrics: Arc<FixtureLyricCatalog>) -> Pipeline {
    Pipeline::new(artists, lyrics, PipelineConfig::default())
}

/// TC-PL-001: End-to-end single candidate
/// **Type:** Integration | **Priority:** P0
#[tokio::test]
async fn tc_pl_001_end_to_end_single_candidate() {
    // Given: One "Test Artist" with 5 works, every lyric has 5 words
    let test_artist = artist("Test Artist");
    let id = test_artist.id;
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(test_artist, works(5)));
    let lyrics = Arc::new(FixtureLyricCatalog::new().with_fallback("one two three four five"));

    // When: Sampling 20 works without a selector
    let outcome = pipeline(artists.clone(), lyrics.clone())
        .run("Test Artist", 20, None)
        .await
        .unwrap();

    // Then: All 5 works included, average 5, one listing request
    assert_eq!(outcome, SampleOutcome::new(5, 5, 25));
    assert_eq!(outcome.average_words, 5);
    assert_eq!(
        artists.work_requests(),
        vec![WorkRequest { artist_id: id, limit: 20, offset: 0 }]
    );
    assert_eq!(lyrics.requests().len(), 5);
    assert!(lyrics.requests().iter().all(|(a, _)| a == "Test Artist"));
}

/// TC-PL-002: Selection among several candidates
/// **Type:** Integration | **Priority:** P0
#[tokio::test]
async fn tc_pl_002_selected_candidate_is_sampled() {
    // Given: Two matching artists with different catalogs
    let first = artist("Echo One");
    let second = artist("Echo Two");
    let second_id = second.id;
    let artists = Arc::new(
        FixtureArtistCatalog::new()
            .with_artist(first, works(3))
            .with_artist(second, works(2)),
    );
    let lyrics = Arc::new(FixtureLyricCatalog::new().with_fallback("a b c d"));

    // When: Position 2 is selected
    let outcome = pipeline(artists.clone(), lyrics)
        .run("echo", 10, Some(&mut FixedSelection(2)))
        .await
        .unwrap();

    // Then: Only the second artist's works are sampled
    assert_eq!(outcome.sampled_count, 2);
    assert_eq!(outcome.average_words, 4);
    assert!(artists
        .work_requests()
        .iter()
        .all(|r| r.artist_id == second_id));
}

/// TC-PL-003: Out-of-range selection
/// **Type:** Integration | **Priority:** P0
#[tokio::test]
async fn tc_pl_003_selection_out_of_range_sends_no_listing() {
    // Given: Two matching artists
    let artists = Arc::new(
        FixtureArtistCatalog::new()
            .with_artist(artist("Echo One"), works(1))
            .with_artist(artist("Echo Two"), works(1)),
    );
    let lyrics = Arc::new(FixtureLyricCatalog::new());
    let pipeline = pipeline(artists.clone(), lyrics);

    // When/Then: 0 and count+1 are both rejected
    for selected in [0, 3] {
        let err = pipeline
            .run("echo", 5, Some(&mut FixedSelection(selected)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SelectionOutOfRange { count: 2, .. }));
    }
    assert!(artists.work_requests().is_empty());
}

/// TC-PL-004: No artist matches
/// **Type:** Integration | **Priority:** P1
#[tokio::test]
async fn tc_pl_004_no_match_is_empty_result() {
    // Given: A catalog without the requested artist
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(artist("Someone"), works(1)));
    let lyrics = Arc::new(FixtureLyricCatalog::new());

    // When: Searching for an unknown name
    let err = pipeline(artists, lyrics.clone())
        .run("Nobody Known", 5, None)
        .await
        .unwrap_err();

    // Then: NoMatch, reported as a valid empty outcome
    assert!(matches!(err, Error::NoMatch(_)));
    assert!(err.is_empty_result());
    assert!(lyrics.requests().is_empty());
}

/// TC-PL-005: Artist without works
/// **Type:** Integration | **Priority:** P1
#[tokio::test]
async fn tc_pl_005_no_works_found() {
    // Given: The only match has an empty catalog
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(artist("Quiet"), Vec::new()));
    let lyrics = Arc::new(FixtureLyricCatalog::new());

    // When
    let err = pipeline(artists, lyrics.clone())
        .run("Quiet", 5, None)
        .await
        .unwrap_err();

    // Then: NoWorksFound names the artist, no lyric lookups
    assert!(matches!(err, Error::NoWorksFound(ref name) if name == "Quiet"));
    assert!(lyrics.requests().is_empty());
}

/// TC-PL-006: Catalog exhausted before the sample size
/// **Type:** Integration | **Priority:** P1
#[tokio::test]
async fn tc_pl_006_exhaustion_returns_short_sample() {
    // Given: 150 works, some without lyrics
    let prolific = artist("Prolific");
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(prolific, works(150)));
    let lyrics = Arc::new(
        FixtureLyricCatalog::new()
            .with_fallback("x y z")
            .with_lyrics("Song 1", "")
            .with_lyrics("Song 2", ""),
    );

    // When: Requesting more works than exist
    let outcome = pipeline(artists.clone(), lyrics)
        .run("Prolific", 500, None)
        .await
        .unwrap();

    // Then: Every work sampled in two batches, empties excluded
    assert_eq!(outcome.sampled_count, 150);
    assert_eq!(outcome.included_count, 148);
    assert_eq!(outcome.average_words, 3);
    let limits: Vec<u32> = artists.work_requests().iter().map(|r| r.limit).collect();
    assert_eq!(limits, vec![100, 100]);
}

/// TC-PL-007: Transport failure during lyric lookup
/// **Type:** Integration | **Priority:** P1
#[tokio::test]
async fn tc_pl_007_lyric_transport_failure_propagates() {
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(artist("Flaky"), works(4)));
    let lyrics = Arc::new(
        FixtureLyricCatalog::new()
            .with_fallback("la la")
            .failing_for("Song 3"),
    );

    let err = pipeline(artists, lyrics.clone())
        .run("Flaky", 10, None)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(lyrics.requests().len(), 3);
}

/// TC-PL-008: Event sequence
/// **Type:** Integration | **Priority:** P2
#[tokio::test]
async fn tc_pl_008_events_in_pipeline_order() {
    // Given: Offline demo catalogs and an event log
    let log = EventLog::new();
    let pipeline = Pipeline::new(
        Arc::new(FixtureArtistCatalog::demo()),
        Arc::new(FixtureLyricCatalog::demo()),
        PipelineConfig::default(),
    )
    .with_observer(Arc::new(log.clone()));

    // When: Selecting the solo "Test Artist"
    let outcome = pipeline
        .run("Test Artist", 20, Some(&mut FixedSelection(1)))
        .await
        .unwrap();

    // Then: Candidates, selection, one batch, five works, completion
    assert_eq!(outcome.sampled_count, 5);
    assert_eq!(outcome.included_count, 4);
    assert_eq!(
        log.event_types(),
        vec![
            "CandidatesFound",
            "ArtistSelected",
            "BatchFetched",
            "WorkProcessed",
            "WorkProcessed",
            "WorkProcessed",
            "WorkProcessed",
            "WorkProcessed",
            "SampleCompleted",
        ]
    );
    match &log.events()[0] {
        PipelineEvent::CandidatesFound { candidates, .. } => assert_eq!(candidates.len(), 3),
        other => panic!("unexpected first event: {:?}", other),
    }
}

/// TC-PL-009: Cancelled before the run starts
/// **Type:** Integration | **Priority:** P2
#[tokio::test]
async fn tc_pl_009_cancelled_pipeline_sends_nothing() {
    let artists = Arc::new(FixtureArtistCatalog::new().with_artist(artist("Solo"), works(3)));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = pipeline(artists.clone(), Arc::new(FixtureLyricCatalog::new()))
        .with_cancellation(cancel)
        .run("Solo", 5, None)
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(artists.searches().is_empty());
}
