//! Playback history tracking
//!
//! Maintains a bounded history of played tracks for "previous" navigation
//! and for the history half of the queue view.

use octave_core::Track;
use std::collections::VecDeque;

/// Default number of tracks kept in history
pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Playback history with bounded size
///
/// Ordered most recent first, which is also the order it is displayed and
/// persisted in. When full, the oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild history from a persisted list (most recent first)
    pub fn from_tracks(tracks: Vec<Track>, max_size: usize) -> Self {
        let mut tracks: VecDeque<Track> = tracks.into();
        tracks.truncate(max_size);
        Self { tracks, max_size }
    }

    /// Add track to history
    ///
    /// If history is full, oldest track is discarded
    pub fn push(&mut self, track: Track) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_back();
        }
        self.tracks.push_front(track);
    }

    /// Get most recent track (without removing)
    pub fn peek(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// Pop most recent track from history
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Remove the entry at `index` (0 = most recent)
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        self.tracks.remove(index)
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Owned copy, most recent first
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}
