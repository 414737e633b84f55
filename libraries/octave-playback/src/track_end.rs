//! What happens when a track finishes on its own

use crate::types::TrackEndAction;
use octave_core::{RepeatMode, Track};
use std::collections::HashSet;

/// Decide the transition for a natural track end
///
/// Evaluated once per end event, before any queue mutation.
pub fn resolve(repeat: RepeatMode, has_next: bool) -> TrackEndAction {
    match (repeat, has_next) {
        (RepeatMode::One, _) => TrackEndAction::Restart,
        (RepeatMode::All, false) => TrackEndAction::WrapAround,
        (RepeatMode::All | RepeatMode::Off, true) => TrackEndAction::Advance,
        (RepeatMode::Off, false) => TrackEndAction::Stop,
    }
}

/// The track list for a repeat-all wrap
///
/// The play context with duplicate ids dropped, keeping first occurrences.
/// The finished track is appended if the context lost it.
pub fn wrap_cycle(context: &[Track], finished: &Track) -> Vec<Track> {
    let mut seen = HashSet::new();
    let mut cycle: Vec<Track> = context
        .iter()
        .filter(|t| seen.insert(t.id.as_str()))
        .cloned()
        .collect();
    if !seen.contains(finished.id.as_str()) {
        cycle.push(finished.clone());
    }
    cycle
}
