//! Shuffle algorithms for queue randomization
//!
//! Implements both pure random (Fisher-Yates) and an artist-aware shuffle
//! used by the playlist "smart shuffle" action.

use octave_core::Track;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::{HashMap, VecDeque};

/// Pure random shuffle using Fisher-Yates algorithm
///
/// Each track has equal probability of appearing at any position.
pub fn shuffle_random(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}

/// Artist-aware shuffle
///
/// Goals:
/// - Avoid same artist playing consecutively (when possible)
/// - Distribute artists evenly throughout playback
/// - Maintain some randomness
///
/// Tracks are grouped by artist name, each group is shuffled, and groups are
/// then interleaved round-robin in a random artist order.
pub fn shuffle_smart(tracks: &mut [Track]) {
    if tracks.len() <= 2 {
        shuffle_random(tracks);
        return;
    }

    let mut rng = thread_rng();

    let mut by_artist: HashMap<&str, Vec<Track>> = HashMap::new();
    for track in tracks.iter() {
        by_artist
            .entry(track.artist.name.as_str())
            .or_default()
            .push(track.clone());
    }

    let mut groups: Vec<VecDeque<Track>> = by_artist
        .into_values()
        .map(|mut group| {
            group.shuffle(&mut rng);
            group.into()
        })
        .collect();
    groups.shuffle(&mut rng);

    let mut result = Vec::with_capacity(tracks.len());
    while result.len() < tracks.len() {
        for group in &mut groups {
            if let Some(track) = group.pop_front() {
                result.push(track);
            }
        }
    }

    for (slot, track) in tracks.iter_mut().zip(result) {
        *slot = track;
    }
}
