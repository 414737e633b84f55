//! Octave Core
//!
//! Platform-agnostic core types, traits, and error handling for Octave.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `Lyric`, `Settings`
//! - **Core Traits**: `SettingsStore`, `BlobStore`, `MusicApi`, `MediaHandle`
//! - **Error Handling**: Unified `OctaveError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use octave_core::types::{Playlist, Track, LIKED_SONGS};
//!
//! let track = Track::new("42", "Song", "Artist");
//! let mut liked = Playlist::new(LIKED_SONGS, Vec::new());
//! liked.tracks.push(track);
//! assert!(liked.contains("42"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{OctaveError, Result};
pub use storage::{BlobStore, SettingsStore};
pub use traits::{CanPlay, LyricsResponse, MediaHandle, MediaSource, MusicApi};
pub use types::{
    Album, Artist, AudioQuality, Lyric, Playlist, PlaylistImage, RepeatMode, Settings, Track,
    LIKED_SONGS,
};
