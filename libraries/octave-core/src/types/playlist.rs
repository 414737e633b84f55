//! Playlist domain types

use super::Track;
use serde::{Deserialize, Serialize};

/// Name of the distinguished playlist holding liked tracks
pub const LIKED_SONGS: &str = "Liked Songs";

/// Maximum number of covers combined into a composite playlist image
pub const COMPOSITE_COVER_LIMIT: usize = 4;

/// Placeholder used when a playlist has neither an image nor tracks
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Playlist cover
///
/// Either a single image URL or a 2x2 grid built from up to four track covers.
/// The grid is rendered by the UI; only the source URLs are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaylistImage {
    /// Single image URL (uploaded or placeholder)
    Url(String),

    /// Composite of track covers, in grid order
    Composite {
        /// Cover URLs (at most four)
        covers: Vec<String>,
    },
}

impl PlaylistImage {
    /// Build a composite from the first tracks' medium covers
    ///
    /// Falls back to the placeholder when no track has a cover.
    pub fn composite_from(tracks: &[Track]) -> Self {
        let covers: Vec<String> = tracks
            .iter()
            .map(|t| t.album.cover_medium.clone())
            .filter(|c| !c.is_empty())
            .take(COMPOSITE_COVER_LIMIT)
            .collect();

        if covers.is_empty() {
            Self::Url(PLACEHOLDER_IMAGE.to_string())
        } else {
            Self::Composite { covers }
        }
    }
}

impl Default for PlaylistImage {
    fn default() -> Self {
        Self::Url(PLACEHOLDER_IMAGE.to_string())
    }
}

/// Named, ordered collection of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist name (unique across the library)
    pub name: String,

    /// Cover image
    #[serde(default)]
    pub image: PlaylistImage,

    /// Tracks in playback order
    #[serde(default)]
    pub tracks: Vec<Track>,

    /// Pinned playlists are listed first
    #[serde(default)]
    pub pinned: bool,

    /// Set only after every track was cached for offline playback
    #[serde(default)]
    pub downloaded: bool,
}

impl Playlist {
    /// Create a playlist with a composite image derived from its tracks
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let image = PlaylistImage::composite_from(&tracks);
        Self {
            name: name.into(),
            image,
            tracks,
            pinned: false,
            downloaded: false,
        }
    }

    /// Whether the playlist contains a track with this id
    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    /// Whether this is the Liked Songs playlist
    pub fn is_liked_songs(&self) -> bool {
        self.name == LIKED_SONGS
    }
}
