//! Track domain types

use serde::{Deserialize, Deserializer, Serialize};

const UNKNOWN_ID: &str = "unknown-id";
const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A playable audio item
///
/// Identity is by `id` only; the rest is display metadata that may differ
/// between two fetches of the same track. Missing fields deserialize to
/// placeholders so a partial payload never fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier (numeric ids from the API are stored as strings)
    #[serde(default = "unknown_id", deserialize_with = "deserialize_id")]
    pub id: String,

    /// Track title
    #[serde(default = "unknown_title")]
    pub title: String,

    /// Performing artist
    #[serde(default)]
    pub artist: Artist,

    /// Album and cover art
    #[serde(default)]
    pub album: Album,
}

/// Artist reference embedded in a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Display name
    #[serde(default = "unknown_artist")]
    pub name: String,

    /// Artist picture, only present on favorite-artist entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Album reference embedded in a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Album title
    #[serde(default = "unknown_album")]
    pub title: String,

    /// Cover art URLs by size; empty when the API had none
    #[serde(default)]
    pub cover_small: String,
    /// Medium cover, used for playlist composites
    #[serde(default)]
    pub cover_medium: String,
    /// Large cover
    #[serde(default)]
    pub cover_big: String,
    /// Full-size cover
    #[serde(default)]
    pub cover_xl: String,
}

impl Default for Artist {
    fn default() -> Self {
        Self {
            name: unknown_artist(),
            picture: None,
        }
    }
}

impl Default for Album {
    fn default() -> Self {
        Self {
            title: unknown_album(),
            cover_small: String::new(),
            cover_medium: String::new(),
            cover_big: String::new(),
            cover_xl: String::new(),
        }
    }
}

impl Artist {
    /// Create an artist reference by name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            picture: None,
        }
    }
}

impl Track {
    /// Create a track with placeholder album metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: Artist::new(artist),
            album: Album::default(),
        }
    }

    /// Replace blank fields with placeholders
    ///
    /// Applied before a track is stored in a playlist, so that a track
    /// fetched with partial metadata still renders.
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        fill_blank(&mut self.id, UNKNOWN_ID);
        fill_blank(&mut self.title, UNKNOWN_TITLE);
        fill_blank(&mut self.artist.name, UNKNOWN_ARTIST);
        fill_blank(&mut self.album.title, UNKNOWN_ALBUM);
        self
    }
}

fn fill_blank(field: &mut String, placeholder: &str) {
    if field.trim().is_empty() {
        *field = placeholder.to_string();
    }
}

fn unknown_id() -> String {
    UNKNOWN_ID.to_string()
}

fn unknown_title() -> String {
    UNKNOWN_TITLE.to_string()
}

fn unknown_artist() -> String {
    UNKNOWN_ARTIST.to_string()
}

fn unknown_album() -> String {
    UNKNOWN_ALBUM.to_string()
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) => s,
        Some(RawId::Number(n)) => n.to_string(),
        None => unknown_id(),
    })
}
