//! User playlists and likes
//!
//! Playlists are identified by name. "Liked Songs" always exists once
//! anything has been liked and cannot be deleted.

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffle_smart;
use octave_core::{OctaveError, Playlist, PlaylistImage, Track, LIKED_SONGS};
use std::collections::HashMap;
use tracing::debug;

/// Tracks pulled in by one smart shuffle
const SMART_SHUFFLE_ADDITIONS: usize = 5;

/// The user's playlists, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    playlists: Vec<Playlist>,
}

impl Library {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| OctaveError::not_found("Playlist", name).into())
    }

    /// The Liked Songs playlist, created empty if missing
    pub fn ensure_liked_songs(&mut self) -> &mut Playlist {
        let index = match self.playlists.iter().position(Playlist::is_liked_songs) {
            Some(index) => index,
            None => {
                debug!("Creating Liked Songs playlist");
                self.playlists.push(Playlist::new(LIKED_SONGS, Vec::new()));
                self.playlists.len() - 1
            }
        };
        &mut self.playlists[index]
    }

    /// Whether a track is in Liked Songs
    pub fn is_liked(&self, track_id: &str) -> bool {
        self.get(LIKED_SONGS).is_some_and(|p| p.contains(track_id))
    }

    /// Like or unlike a track; returns whether it is liked afterwards
    pub fn toggle_like(&mut self, track: &Track) -> bool {
        let liked = self.ensure_liked_songs();
        if liked.contains(&track.id) {
            liked.tracks.retain(|t| t.id != track.id);
            false
        } else {
            liked.tracks.push(track.clone().sanitize());
            true
        }
    }

    /// Create a playlist
    ///
    /// Without an explicit image the playlist gets a composite of up to
    /// four covers from its tracks.
    pub fn create_playlist(
        &mut self,
        name: &str,
        tracks: Vec<Track>,
        image: Option<PlaylistImage>,
    ) -> Result<&Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(OctaveError::invalid_input("Playlist name cannot be empty").into());
        }
        if self.get(name).is_some() {
            return Err(OctaveError::Duplicate(format!("Playlist '{name}'")).into());
        }

        let tracks: Vec<Track> = tracks.into_iter().map(Track::sanitize).collect();
        let mut playlist = Playlist::new(name, tracks);
        if let Some(image) = image {
            playlist.image = image;
        }

        self.playlists.push(playlist);
        Ok(&self.playlists[self.playlists.len() - 1])
    }

    /// Append a track; returns false when it was already there
    pub fn add_to_playlist(&mut self, name: &str, track: &Track) -> Result<bool> {
        let playlist = self.get_mut(name)?;
        if playlist.contains(&track.id) {
            return Ok(false);
        }
        playlist.tracks.push(track.clone().sanitize());
        Ok(true)
    }

    /// Delete a playlist (Liked Songs is refused)
    pub fn delete_playlist(&mut self, name: &str) -> Result<Playlist> {
        if name == LIKED_SONGS {
            return Err(PlaybackError::InvalidOperation(
                "Liked Songs cannot be deleted".to_string(),
            ));
        }
        let index = self
            .playlists
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| OctaveError::not_found("Playlist", name))?;
        Ok(self.playlists.remove(index))
    }

    /// Flip the pinned flag; returns the new value
    pub fn toggle_pin(&mut self, name: &str) -> Result<bool> {
        let playlist = self.get_mut(name)?;
        playlist.pinned = !playlist.pinned;
        Ok(playlist.pinned)
    }

    pub fn mark_downloaded(&mut self, name: &str, downloaded: bool) -> Result<()> {
        self.get_mut(name)?.downloaded = downloaded;
        Ok(())
    }

    /// Clear the downloaded flag on every playlist holding `track_id`
    ///
    /// Returns how many playlists changed.
    pub fn unmark_downloaded_with(&mut self, track_id: &str) -> usize {
        let mut changed = 0;
        for playlist in &mut self.playlists {
            if playlist.downloaded && playlist.contains(track_id) {
                playlist.downloaded = false;
                changed += 1;
            }
        }
        changed
    }

    /// Pinned playlists first, otherwise creation order
    pub fn display_order(&self) -> Vec<&Playlist> {
        let mut ordered: Vec<&Playlist> = self.playlists.iter().collect();
        ordered.sort_by_key(|p| !p.pinned);
        ordered
    }

    /// Grow a playlist with more of its most common artist, then shuffle it
    ///
    /// Up to five `candidates` by that artist and not already in the
    /// playlist are appended before the artist-aware shuffle runs.
    pub fn smart_shuffle(&mut self, name: &str, candidates: &[Track]) -> Result<&Playlist> {
        let playlist = self.get_mut(name)?;

        if let Some(artist) = most_common_artist(&playlist.tracks) {
            let additions: Vec<Track> = candidates
                .iter()
                .filter(|t| t.artist.name == artist && !playlist.contains(&t.id))
                .take(SMART_SHUFFLE_ADDITIONS)
                .cloned()
                .collect();
            debug!(playlist = %name, artist = %artist, added = additions.len(), "Smart shuffle");
            playlist.tracks.extend(additions);
        }

        shuffle_smart(&mut playlist.tracks);
        Ok(&*playlist)
    }
}

/// Artist with the most tracks; ties go to the artist seen first
fn most_common_artist(tracks: &[Track]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, track) in tracks.iter().enumerate() {
        counts
            .entry(track.artist.name.as_str())
            .or_insert((0, position))
            .0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(artist, _)| artist.to_string())
}
