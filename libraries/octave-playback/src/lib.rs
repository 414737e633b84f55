//! Octave - Playback Core
//!
//! Queue, playback engine and offline cache for the Octave player.
//!
//! This crate provides:
//! - Queue with bounded history (current + up-next, unique ids)
//! - Track-end policy (repeat off / all / one)
//! - Playback engine over a single injected media handle
//! - Offline audio cache with streaming fallback
//! - Time-synced lyrics
//! - Playlists and likes
//! - [`PlayerSession`], which wires it all together and persists every change
//!
//! # Architecture
//!
//! Decoding and output are not handled here. The platform implements
//! [`octave_core::MediaHandle`] and reports natural ends through
//! [`PlaybackEngine::media_ended`]; the session picks those up in
//! [`PlayerSession::process_events`].
//!
//! # Example: Queue
//!
//! ```rust
//! use octave_playback::{QueueManager, QueueSelection};
//! use octave_core::Track;
//!
//! let mut queue = QueueManager::new(50);
//! queue.play_track(Track::new("1", "One", "Artist"));
//! queue.add_to_queue(vec![
//!     Track::new("2", "Two", "Artist"),
//!     Track::new("3", "Three", "Artist"),
//! ]);
//!
//! queue.skip_track().unwrap();
//! assert_eq!(queue.current().unwrap().id, "2");
//!
//! queue.select(QueueSelection::history(0)).unwrap();
//! assert_eq!(queue.current().unwrap().id, "1");
//! ```
//!
//! # Example: Session
//!
//! ```rust,no_run
//! use octave_playback::{OctaveConfig, PlayerSession};
//! # async fn example(handle: Box<dyn octave_core::MediaHandle>) -> octave_playback::Result<()> {
//! octave_playback::init_tracing();
//!
//! let config = OctaveConfig::load()?;
//! let mut session = PlayerSession::open(&config, handle).await?;
//!
//! let tracks = session.search("daft punk").await;
//! session.replace_queue(tracks).await;
//!
//! // After the platform reports a natural end:
//! session.process_events().await;
//! for event in session.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod engine;
mod error;
mod events;
mod history;
mod library;
pub mod lyrics;
mod persist;
mod queue;
mod session;
mod shuffle;
pub mod track_end;
pub mod types;

// Public exports
pub use cache::{DownloadReport, OfflineCache, PRELOAD_AHEAD};
pub use config::{ApiSettings, OctaveConfig, PlaybackSettings, StorageSettings};
pub use engine::{PlaybackEngine, SourceResolver};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use history::{History, DEFAULT_HISTORY_SIZE};
pub use library::Library;
pub use lyrics::{active_index, parse_lyrics, LyricsSync, SharedLyrics};
pub use queue::QueueManager;
pub use session::PlayerSession;
pub use shuffle::{shuffle_random, shuffle_smart};
pub use types::{
    LoadOutcome, PlaybackConfig, PlaybackState, QueueSelection, QueueSource, TrackEndAction,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a `tracing` subscriber for hosts that don't bring their own
///
/// Honors `RUST_LOG`; defaults to `octave=info`. Calling it twice is a
/// no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "octave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
