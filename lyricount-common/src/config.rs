//! Configuration loading and resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `LYRICOUNT_CONFIG` environment variable
//! 3. Per-user config file (`<config_dir>/lyricount/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never terminates the run: a warning is logged and
//! the compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "LYRICOUNT_CONFIG";

pub const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
pub const LYRICS_OVH_BASE_URL: &str = "https://api.lyrics.ovh/v1";

/// MusicBrainz refuses browse requests with `limit` above this value
pub const MUSICBRAINZ_MAX_BATCH_SIZE: u32 = 100;

pub const DEFAULT_SAMPLE_SIZE: u32 = 20;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Standard User-Agent for outbound HTTP requests
///
/// MusicBrainz rejects anonymous clients, so every request carries
/// `AppName/Version ( contact )`.
pub fn get_user_agent() -> String {
    format!(
        "lyricount/{} ( https://github.com/lyricount/lyricount )",
        env!("CARGO_PKG_VERSION")
    )
}

/// Configuration loaded from TOML file
///
/// Every field is optional in the file; absent keys take compiled defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Number of works to sample when `--sample-size` is not given
    pub sample_size: u32,

    /// Total timeout for a single HTTP request (seconds)
    pub request_timeout_secs: u64,

    /// Connection timeout for a single HTTP request (seconds)
    pub connect_timeout_secs: u64,

    pub musicbrainz: MusicBrainzConfig,

    pub lyrics: LyricsConfig,

    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            musicbrainz: MusicBrainzConfig::default(),
            lyrics: LyricsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Artist/work catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicBrainzConfig {
    pub base_url: String,

    /// Overrides [`get_user_agent`] when set
    pub user_agent: Option<String>,

    /// Maximum number of artist candidates returned by a search
    pub search_limit: u32,

    /// Largest `limit` sent on a work listing request
    pub max_batch_size: u32,

    pub requests_per_second: u32,
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            base_url: MUSICBRAINZ_BASE_URL.to_string(),
            user_agent: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            max_batch_size: MUSICBRAINZ_MAX_BATCH_SIZE,
            requests_per_second: 1,
        }
    }
}

impl MusicBrainzConfig {
    /// User agent to send, falling back to the standard one
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(str::to_string)
            .unwrap_or_else(get_user_agent)
    }
}

/// Lyrics catalog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: String,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: LYRICS_OVH_BASE_URL.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl TomlConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check values and clamp the ones with a hard upstream range
    ///
    /// A zero sample size is rejected outright; everything else is clamped
    /// with a warning.
    pub fn validated(mut self) -> Result<Self> {
        if self.sample_size == 0 {
            return Err(Error::InvalidInput(
                "sample_size must be at least 1".to_string(),
            ));
        }

        let batch = self
            .musicbrainz
            .max_batch_size
            .clamp(1, MUSICBRAINZ_MAX_BATCH_SIZE);
        if batch != self.musicbrainz.max_batch_size {
            warn!(
                configured = self.musicbrainz.max_batch_size,
                using = batch,
                "musicbrainz.max_batch_size out of range"
            );
            self.musicbrainz.max_batch_size = batch;
        }

        if self.musicbrainz.search_limit == 0 {
            warn!("musicbrainz.search_limit is 0, using 1");
            self.musicbrainz.search_limit = 1;
        }

        if self.musicbrainz.requests_per_second == 0 {
            warn!("musicbrainz.requests_per_second is 0, using 1");
            self.musicbrainz.requests_per_second = 1;
        }

        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Where the effective config file path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    UserConfigDir,
}

/// Config file resolver
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Pick the config file path by priority, without touching the file
    pub fn resolve_path(&self) -> Option<(PathBuf, ConfigSource)> {
        if let Some(path) = &self.cli_path {
            return Some((path.clone(), ConfigSource::CommandLine));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), ConfigSource::Environment));
            }
        }

        default_config_path().map(|path| (path, ConfigSource::UserConfigDir))
    }

    /// Resolve, load and validate the configuration
    ///
    /// A missing file falls back to defaults; a file that exists but cannot
    /// be parsed is an error.
    pub fn load(&self) -> Result<TomlConfig> {
        let config = match self.resolve_path() {
            Some((path, source)) if path.exists() => {
                let config = TomlConfig::load(&path)?;
                info!(path = %path.display(), ?source, "Loaded configuration");
                config
            }
            Some((path, source)) => {
                if source != ConfigSource::UserConfigDir {
                    warn!(
                        path = %path.display(),
                        ?source,
                        "Config file not found, using defaults"
                    );
                }
                TomlConfig::default()
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                TomlConfig::default()
            }
        };

        config.validated()
    }
}

/// Per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyricount").join("config.toml"))
}
