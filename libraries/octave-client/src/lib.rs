//! HTTP client for the Octave music API.
//!
//! This crate provides:
//! - Track search (`GET /api/search/tracks`)
//! - Lyrics lookup (`POST /api/lyrics`)
//! - Audio download and streaming URLs (`GET /api/track/{id}.mp3`)
//! - A debouncer for search-as-you-type
//!
//! [`ApiClient`] implements [`octave_core::MusicApi`], which is what the
//! playback crate depends on.

mod client;
mod error;
mod search;
mod types;

pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use search::{SearchDebouncer, SearchResults, DEFAULT_DEBOUNCE};
pub use types::{ApiConfig, LyricsRequest, SearchResponse};
