//! Play queue
//!
//! ```text
//! History (most recent first):
//!   - Track A
//!   - Track B
//! ─────────────────────────────
//! Currently Playing: Track C
//! ─────────────────────────────
//! Up Next:
//!   - Track D
//!   - Track E
//! ```
//!
//! Track ids are unique across the current track and up-next. History is a
//! plain log and may repeat ids.
//!
//! The play context is the list repeat-all loops over: whatever was last
//! started with [`QueueManager::replace_queue`], plus tracks queued or
//! played since. It is independent of the bounded history.

use crate::error::{PlaybackError, Result};
use crate::history::History;
use crate::shuffle::shuffle_random;
use crate::track_end::wrap_cycle;
use crate::types::{QueueSelection, QueueSource};
use octave_core::Track;
use std::collections::HashSet;

/// Queue and history state for one session
#[derive(Debug, Clone, Default)]
pub struct QueueManager {
    current: Option<Track>,
    up_next: Vec<Track>,
    history: History,
    context: Vec<Track>,
}

impl QueueManager {
    /// Create an empty queue with the given history bound
    pub fn new(history_size: usize) -> Self {
        Self {
            current: None,
            up_next: Vec::new(),
            history: History::new(history_size),
            context: Vec::new(),
        }
    }

    /// Rebuild a queue from persisted parts
    ///
    /// Persisted data may predate the uniqueness rule, so duplicates (and
    /// any copy of the current track) are dropped from up-next. A missing
    /// context is rebuilt from the current track and up-next.
    pub fn restore(
        current: Option<Track>,
        up_next: Vec<Track>,
        history: Vec<Track>,
        context: Vec<Track>,
        history_size: usize,
    ) -> Self {
        let mut seen: HashSet<String> = current.iter().map(|t| t.id.clone()).collect();
        let up_next: Vec<Track> = up_next
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();

        let mut queue = Self {
            current,
            up_next,
            history: History::from_tracks(history, history_size),
            context: Vec::new(),
        };
        queue.extend_context(context);
        let live: Vec<Track> = queue.display_queue();
        queue.extend_context(live);
        queue
    }

    /// Currently playing track
    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    /// Tracks waiting to play, in order
    pub fn up_next(&self) -> &[Track] {
        &self.up_next
    }

    /// Played tracks, most recent first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tracks a repeat-all wrap starts over from, in play order
    pub fn context(&self) -> &[Track] {
        &self.context
    }

    /// Whether anything is waiting to play
    pub fn has_next(&self) -> bool {
        !self.up_next.is_empty()
    }

    /// Make `track` current
    ///
    /// The previous current track goes to history unless it is the same
    /// track being replayed.
    pub fn play_track(&mut self, track: Track) -> &Track {
        self.up_next.retain(|t| t.id != track.id);
        if let Some(old) = self.current.take() {
            if old.id != track.id {
                self.history.push(old);
            }
        }
        self.extend_context([track.clone()]);
        self.current.insert(track)
    }

    /// Advance to the head of up-next
    pub fn skip_track(&mut self) -> Result<&Track> {
        if self.up_next.is_empty() {
            return Err(PlaybackError::NoNextTrack);
        }

        let next = self.up_next.remove(0);
        if let Some(old) = self.current.take() {
            self.history.push(old);
        }
        Ok(self.current.insert(next))
    }

    /// Step back to the most recent history entry
    ///
    /// The track being left is put at the front of up-next so it plays
    /// again after the restored one.
    pub fn previous_track(&mut self) -> Result<&Track> {
        let previous = self.history.pop().ok_or(PlaybackError::NoPreviousTrack)?;
        Ok(self.make_current_keeping_old(previous))
    }

    /// Append tracks to up-next, skipping ids already queued
    ///
    /// Returns the number of tracks actually appended.
    pub fn add_to_queue(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let mut seen: HashSet<String> = self
            .current
            .iter()
            .chain(&self.up_next)
            .map(|t| t.id.clone())
            .collect();

        let added: Vec<Track> = tracks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        let count = added.len();
        self.extend_context(added.iter().cloned());
        self.up_next.extend(added);
        count
    }

    /// Remove `up_next[index]`
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Track> {
        if index < self.up_next.len() {
            let removed = self.up_next.remove(index);
            self.context.retain(|t| t.id != removed.id);
            Some(removed)
        } else {
            None
        }
    }

    /// Jump to a track picked from the queue view
    pub fn select(&mut self, selection: QueueSelection) -> Result<&Track> {
        match selection.source {
            QueueSource::History => {
                let picked = self
                    .history
                    .remove(selection.index)
                    .ok_or(PlaybackError::IndexOutOfBounds(selection.index))?;
                Ok(self.make_current_keeping_old(picked))
            }
            QueueSource::Upcoming => {
                if selection.index >= self.up_next.len() {
                    return Err(PlaybackError::IndexOutOfBounds(selection.index));
                }
                let picked = self.up_next.remove(selection.index);
                if let Some(old) = self.current.take() {
                    self.history.push(old);
                }
                Ok(self.current.insert(picked))
            }
        }
    }

    /// Replace the whole queue, starting with the first track
    ///
    /// The de-duplicated tracks become the new play context. Returns `None`
    /// and leaves the queue untouched when `tracks` is empty.
    pub fn replace_queue(&mut self, tracks: Vec<Track>) -> Option<&Track> {
        let mut seen = HashSet::new();
        let tracks: Vec<Track> = tracks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();

        let mut rest = tracks.clone().into_iter();
        let first = rest.next()?;
        if let Some(old) = self.current.take() {
            if old.id != first.id {
                self.history.push(old);
            }
        }
        self.up_next = rest.collect();
        self.context = tracks;
        Some(self.current.insert(first))
    }

    /// Empty up-next, keeping the current track
    ///
    /// The play context shrinks to the current track.
    pub fn clear_queue(&mut self) {
        self.up_next.clear();
        self.context = self.current.iter().cloned().collect();
    }

    /// Randomize up-next in place
    ///
    /// The play context follows the new order: tracks already played from
    /// it come first, then the current track and the shuffled up-next.
    pub fn shuffle_up_next(&mut self) {
        shuffle_random(&mut self.up_next);

        let live: Vec<Track> = self.display_queue();
        let live_ids: HashSet<&str> = live.iter().map(|t| t.id.as_str()).collect();
        let mut context: Vec<Track> = self
            .context
            .iter()
            .filter(|t| !live_ids.contains(t.id.as_str()))
            .cloned()
            .collect();
        context.extend(live.iter().cloned());
        self.context = context;
    }

    /// Start the play context over (repeat-all at the end of the queue)
    ///
    /// The finished track goes to history, the first track of the context
    /// becomes current and the rest are queued behind it. A context of one
    /// leaves the same track current.
    pub fn wrap_around(&mut self) -> Option<&Track> {
        let finished = self.current.take()?;
        let mut cycle = wrap_cycle(&self.context, &finished).into_iter();
        self.history.push(finished);

        let first = cycle.next()?;
        self.up_next = cycle.collect();
        Some(self.current.insert(first))
    }

    /// Current track followed by up-next, as shown in the queue view
    pub fn display_queue(&self) -> Vec<Track> {
        self.current
            .iter()
            .chain(&self.up_next)
            .cloned()
            .collect()
    }

    fn make_current_keeping_old(&mut self, track: Track) -> &Track {
        self.up_next.retain(|t| t.id != track.id);
        if let Some(old) = self.current.take() {
            if old.id != track.id {
                self.up_next.retain(|t| t.id != old.id);
                self.up_next.insert(0, old);
            }
        }
        self.extend_context([track.clone()]);
        self.current.insert(track)
    }

    /// Append tracks missing from the play context
    fn extend_context(&mut self, tracks: impl IntoIterator<Item = Track>) {
        let mut known: HashSet<String> = self.context.iter().map(|t| t.id.clone()).collect();
        for track in tracks {
            if known.insert(track.id.clone()) {
                self.context.push(track);
            }
        }
    }
}
