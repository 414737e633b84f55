//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Playback state
///
/// ```text
/// Idle → Loading → Playing ⇄ Paused → Ended
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing playing (initial state, or stopped at end of queue)
    #[default]
    Idle,

    /// Source set, waiting for the handle to become playable
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track (also entered when a load fails)
    Paused,

    /// Track reached its natural end
    Ended,
}

impl PlaybackState {
    /// Whether audio is being output
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

/// Which list a [`QueueSelection`] points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueSource {
    /// Previously played tracks, most recent first
    History,

    /// Tracks waiting to play
    Upcoming,
}

/// A track picked from the queue view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSelection {
    pub source: QueueSource,
    pub index: usize,
}

impl QueueSelection {
    /// Select `history[index]`
    pub fn history(index: usize) -> Self {
        Self {
            source: QueueSource::History,
            index,
        }
    }

    /// Select `up_next[index]`
    pub fn upcoming(index: usize) -> Self {
        Self {
            source: QueueSource::Upcoming,
            index,
        }
    }
}

/// What to do when the current track ends naturally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEndAction {
    /// Replay the current track from the start
    Restart,

    /// Take the next track from up-next
    Advance,

    /// Rebuild the queue from the played cycle and start over
    WrapAround,

    /// Stop and keep the current track
    Stop,
}

/// Result of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Source set and playback started
    Started,

    /// A newer load was issued before this one finished; nothing applied
    Superseded,
}

/// Runtime settings for a player session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Entries kept in "recently played" (default: 4)
    pub recently_played_limit: usize,

    /// Lyrics sampling period in milliseconds (default: 250)
    pub lyrics_tick_ms: u64,

    /// Search quiet period in milliseconds (default: 300)
    pub search_debounce_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: crate::history::DEFAULT_HISTORY_SIZE,
            recently_played_limit: 4,
            lyrics_tick_ms: crate::lyrics::DEFAULT_TICK.as_millis() as u64,
            search_debounce_ms: octave_client::DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}
