//! lyricount - average lyric word count for an artist
//!
//! Resolves an artist on MusicBrainz, samples their works, fetches lyrics
//! from lyrics.ovh and prints the floor-average word count of the songs that
//! have lyrics. Logs go to stderr, everything else to stdout.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use lyricount::console::{self, ConsoleProgress, PromptSelector};
use lyricount::services::{
    FixtureArtistCatalog, FixtureLyricCatalog, LyricsOvhClient, MusicBrainzClient,
};
use lyricount::{ArtistCatalog, ArtistSelector, Error, FixedSelection, LyricCatalog};
use lyricount::{Pipeline, PipelineConfig};
use lyricount_common::config::{ConfigResolver, TomlConfig};

/// Command-line arguments for lyricount
#[derive(Parser, Debug)]
#[command(name = "lyricount")]
#[command(about = "Average lyric word count across a sample of an artist's songs")]
#[command(version)]
struct Args {
    /// Artist to search for (prompted when omitted)
    #[arg(short, long, value_name = "NAME", env = "LYRICOUNT_ARTIST")]
    artist: Option<String>,

    /// Position of the artist in the search results (1-based)
    #[arg(long, value_name = "N")]
    id: Option<usize>,

    /// Number of works to sample (overrides the config file)
    #[arg(short = 'n', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    sample_size: Option<u32>,

    /// Config file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use the built-in demo catalogs instead of the network
    #[arg(long)]
    offline: bool,
}

type FilterHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Install the stderr subscriber; the filter is reloadable once config is known
fn init_tracing() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    handle
}

/// Switch to the configured level unless RUST_LOG was given
fn apply_log_level(handle: &FilterHandle, config: &TomlConfig) {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }
    match EnvFilter::try_new(&config.logging.level) {
        Ok(filter) => {
            if let Err(e) = handle.reload(filter) {
                warn!("Failed to apply log level: {}", e);
            }
        }
        Err(e) => warn!(level = %config.logging.level, "Invalid logging.level: {}", e),
    }
}

fn build_catalogs(
    config: &TomlConfig,
    offline: bool,
) -> Result<(Arc<dyn ArtistCatalog>, Arc<dyn LyricCatalog>)> {
    if offline {
        info!("Offline mode: using demo catalogs");
        return Ok((
            Arc::new(FixtureArtistCatalog::demo()),
            Arc::new(FixtureLyricCatalog::demo()),
        ));
    }

    let artists = MusicBrainzClient::from_config(config)
        .context("Failed to initialize MusicBrainz client")?;
    let lyrics =
        LyricsOvhClient::from_config(config).context("Failed to initialize lyrics client")?;
    Ok((Arc::new(artists), Arc::new(lyrics)))
}

/// First Ctrl+C cancels the pipeline, a second one exits immediately
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Failed to install Ctrl+C handler");
            return;
        }
        eprintln!("Interrupted, stopping after the current request (Ctrl+C again to quit)");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_handle = init_tracing();

    info!(
        "Starting lyricount v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;
    apply_log_level(&log_handle, &config);

    let (artists, lyrics) = build_catalogs(&config, args.offline)?;
    let sample_size = args.sample_size.unwrap_or(config.sample_size);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let artist_name = match args.artist.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            println!("Searching for artist: {}", name);
            name.to_string()
        }
        _ => console::prompt_artist_name(&mut io::stdin().lock(), &mut io::stdout())
            .context("Failed to read artist name")?,
    };

    let pipeline = Pipeline::new(artists, lyrics, PipelineConfig::from(&config))
        .with_cancellation(cancel)
        .with_observer(Arc::new(ConsoleProgress));

    let mut fixed;
    let mut prompt;
    let selector: &mut dyn ArtistSelector = match args.id {
        Some(position) => {
            fixed = FixedSelection(position);
            &mut fixed
        }
        None => {
            prompt = PromptSelector::new(io::stdin().lock(), io::stdout());
            &mut prompt
        }
    };

    match pipeline.run(&artist_name, sample_size, Some(selector)).await {
        Ok(outcome) => {
            println!();
            println!("{}", console::format_outcome(&artist_name, &outcome));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_empty_result() => {
            println!("{}", e);
            Ok(ExitCode::SUCCESS)
        }
        Err(Error::Cancelled) => {
            eprintln!("Cancelled");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
