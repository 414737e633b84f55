//! Core traits for Octave

use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Where the media handle reads audio from
#[derive(Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Blob from the offline cache
    Offline {
        /// Track the blob belongs to
        track_id: String,
        /// Encoded audio bytes
        bytes: Arc<[u8]>,
    },

    /// Network stream
    Stream {
        /// Absolute URL of the audio resource
        url: String,
    },
}

impl MediaSource {
    /// URL the source is addressed by (`offline://{id}` for cached blobs)
    pub fn url(&self) -> String {
        match self {
            Self::Offline { track_id, .. } => format!("offline://{track_id}"),
            Self::Stream { url } => url.clone(),
        }
    }

    /// Whether this source is served from the offline cache
    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline { .. })
    }
}

impl std::fmt::Debug for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline { track_id, bytes } => f
                .debug_struct("Offline")
                .field("track_id", track_id)
                .field("len", &bytes.len())
                .finish(),
            Self::Stream { url } => f.debug_struct("Stream").field("url", url).finish(),
        }
    }
}

/// Readiness of a freshly loaded source
pub type CanPlay = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// The single media output of a session
///
/// Implementers wrap the platform's media element or decoder. Decoding is
/// entirely theirs; the engine only drives source, transport and volume.
#[async_trait]
pub trait MediaHandle: Send {
    /// Set the source
    ///
    /// The returned future resolves once the handle can start playing and
    /// does not borrow the handle, so other calls may run while it is
    /// pending. It fails if the source cannot be fetched or decoded.
    fn load(&mut self, source: &MediaSource) -> CanPlay;

    /// Start or resume output
    async fn play(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self);

    /// Move the playhead, in seconds
    fn seek(&mut self, position: f64);

    /// Current playhead, in seconds
    fn position(&self) -> f64;

    /// Duration of the loaded source, if known
    fn duration(&self) -> Option<f64>;

    /// Set output volume, 0.0-1.0
    fn set_volume(&mut self, volume: f32);
}

/// Response of the lyrics endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResponse {
    /// Whether lyrics were found
    #[serde(default)]
    pub success: bool,

    /// Whether `lyrics` carries `[mm:ss.ss]` timestamps
    #[serde(default)]
    pub synced: bool,

    /// Newline-separated lyric lines
    #[serde(default)]
    pub lyrics: String,
}

/// Remote search, lyrics and audio API
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Search tracks by free text
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>>;

    /// Look up lyrics for a title and artist
    async fn lyrics(&self, title: &str, artist: &str) -> Result<LyricsResponse>;

    /// Fetch the full audio resource of a track
    async fn fetch_track(&self, track_id: &str) -> Result<Vec<u8>>;

    /// Streaming URL of a track
    fn stream_url(&self, track_id: &str) -> String;
}
