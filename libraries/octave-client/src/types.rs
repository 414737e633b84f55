//! Wire types for the remote API.

use octave_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://octave.example.com`
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// `GET /api/search/tracks` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Track>,
}

/// `POST /api/lyrics` body.
#[derive(Debug, Clone, Serialize)]
pub struct LyricsRequest<'a> {
    pub title: &'a str,
    pub artist: &'a str,
}
