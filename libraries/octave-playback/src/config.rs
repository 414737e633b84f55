//! Player configuration

use crate::error::{PlaybackError, Result};
use crate::types::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, read from the working directory if present
pub const CONFIG_FILE: &str = "octave.toml";

/// Prefix of environment overrides (`OCTAVE_API__BASE_URL`, ...)
pub const ENV_PREFIX: &str = "OCTAVE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OctaveConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default = "default_recently_played_limit")]
    pub recently_played_limit: usize,

    #[serde(default = "default_lyrics_tick_ms")]
    pub lyrics_tick_ms: u64,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

impl OctaveConfig {
    /// Load configuration from `octave.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from a specific file (if it exists) and the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        // Nested keys use a double underscore so field names keep theirs
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(PlaybackError::Config(
                "API base URL is required (set OCTAVE_API__BASE_URL)".to_string(),
            ));
        }

        if self.playback.history_size == 0 {
            return Err(PlaybackError::Config(
                "playback.history_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Runtime settings handed to the session
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            history_size: self.playback.history_size,
            recently_played_limit: self.playback.recently_played_limit,
            lyrics_tick_ms: self.playback.lyrics_tick_ms,
            search_debounce_ms: self.playback.search_debounce_ms,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            history_size: default_history_size(),
            recently_played_limit: default_recently_played_limit(),
            lyrics_tick_ms: default_lyrics_tick_ms(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

// Default values
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_database_url() -> String {
    "sqlite://./data/octave.db".to_string()
}

fn default_history_size() -> usize {
    crate::history::DEFAULT_HISTORY_SIZE
}

fn default_recently_played_limit() -> usize {
    4
}

fn default_lyrics_tick_ms() -> u64 {
    crate::lyrics::DEFAULT_TICK.as_millis() as u64
}

fn default_search_debounce_ms() -> u64 {
    octave_client::DEFAULT_DEBOUNCE.as_millis() as u64
}
