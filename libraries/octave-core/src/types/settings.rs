//! Persisted user preferences and playback bookkeeping

use super::{Artist, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Setting keys, as stored in the local key-value store
///
/// Each value is JSON text.
pub mod keys {
    /// Output volume (`f32`)
    pub const VOLUME: &str = "volume";
    /// Shuffle indicator (`bool`)
    pub const SHUFFLE_ON: &str = "shuffleOn";
    /// [`RepeatMode`](super::RepeatMode)
    pub const REPEAT_MODE: &str = "repeatMode";
    /// [`AudioQuality`](super::AudioQuality)
    pub const AUDIO_QUALITY: &str = "audioQuality";
    /// Whether onboarding was completed (`bool`)
    pub const ONBOARDING_DONE: &str = "onboardingDone";
    /// Favorite artists picked during onboarding
    pub const FAVORITE_ARTISTS: &str = "favoriteArtists";
    /// Current track, `null` when none
    pub const CURRENT_TRACK: &str = "currentTrack";
    /// Play history, most recent first
    pub const PREVIOUS_TRACKS: &str = "previousTracks";
    /// Up-next tracks, in order
    pub const QUEUE: &str = "queue";
    /// Completed plays per track id
    pub const LISTEN_COUNTS: &str = "listenCounts";
    /// Recently played tracks, most recent first
    pub const RECENTLY_PLAYED: &str = "recentlyPlayed";
    /// Every playlist, Liked Songs included
    pub const PLAYLISTS: &str = "playlists";
    /// Last observed position of the current track, in seconds
    pub const SEEK_POSITION: &str = "seekPosition";
    /// Tracks a repeat-all wrap starts over from
    pub const PLAY_CONTEXT: &str = "playContext";
}

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,
    /// Loop the whole queue
    All,
    /// Loop the current track
    One,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }

    /// Next mode in the UI toggle order (off → all → one → off)
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Streaming quality preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioQuality {
    /// Lossless where available
    Max,
    /// High bitrate
    #[default]
    High,
    /// Standard bitrate
    Normal,
    /// Lowest bitrate
    DataSaver,
}

impl AudioQuality {
    /// Cycle order used by the quality toggle
    pub const ORDER: [AudioQuality; 4] = [Self::Max, Self::High, Self::Normal, Self::DataSaver];

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "MAX",
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
            Self::DataSaver => "DATA_SAVER",
        }
    }

    /// Next quality in cycle order, wrapping around
    #[must_use]
    pub fn cycle(self) -> Self {
        let index = Self::ORDER.iter().position(|q| *q == self).unwrap_or(0);
        Self::ORDER[(index + 1) % Self::ORDER.len()]
    }
}

impl std::fmt::Display for AudioQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences and playback bookkeeping
///
/// Queue, history, current track and playlists are persisted under their
/// own keys by their owners; this struct carries everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Output volume, 0.0-1.0
    pub volume: f32,
    /// Shuffle indicator shown in the UI
    pub shuffle_on: bool,
    /// What happens when a track ends on its own
    pub repeat_mode: RepeatMode,
    /// Streaming quality preference
    pub audio_quality: AudioQuality,
    /// Whether the first-run flow was completed
    pub onboarding_done: bool,
    /// Artists picked during onboarding
    pub favorite_artists: Vec<Artist>,
    /// Completed plays per track id
    pub listen_counts: HashMap<String, u64>,
    /// Most recent first
    pub recently_played: Vec<Track>,
    /// Last observed position of the current track, in seconds
    pub seek_position: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle_on: false,
            repeat_mode: RepeatMode::Off,
            audio_quality: AudioQuality::High,
            onboarding_done: false,
            favorite_artists: Vec::new(),
            listen_counts: HashMap::new(),
            recently_played: Vec::new(),
            seek_position: 0.0,
        }
    }
}

impl Settings {
    /// Listen count for a track (0 when never completed)
    pub fn listen_count(&self, track_id: &str) -> u64 {
        self.listen_counts.get(track_id).copied().unwrap_or(0)
    }

    /// Record one completed play and return the new count
    pub fn record_listen(&mut self, track_id: &str) -> u64 {
        let count = self.listen_counts.entry(track_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Front-insert into recently played, de-duplicated by id and capped
    pub fn push_recently_played(&mut self, track: Track, limit: usize) {
        self.recently_played.retain(|t| t.id != track.id);
        self.recently_played.insert(0, track);
        self.recently_played.truncate(limit);
    }
}
