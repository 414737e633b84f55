//! Player events
//!
//! Queued by the session as things happen and drained by the UI with
//! [`PlayerSession::drain_events`](crate::PlayerSession::drain_events).

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by a player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the track that was current before, if any
        previous_track_id: Option<String>,
    },

    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
        /// Completed plays of this track, including this one
        listen_count: u64,
    },

    /// Up-next changed (tracks added, removed, reordered)
    QueueChanged {
        /// New up-next length
        length: usize,
    },

    /// Non-blocking message for the user (e.g. "No next track")
    Notice {
        /// Message text
        message: String,
    },

    /// Playlist download progress
    DownloadProgress {
        /// Playlist being downloaded
        playlist: String,
        /// Completed share, 0-100
        percent: f64,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}
