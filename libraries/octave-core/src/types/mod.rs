//! Domain types shared by every crate

mod lyric;
mod playlist;
mod settings;
mod track;

pub use lyric::Lyric;
pub use playlist::{Playlist, PlaylistImage, COMPOSITE_COVER_LIMIT, LIKED_SONGS, PLACEHOLDER_IMAGE};
pub use settings::{keys, AudioQuality, RepeatMode, Settings};
pub use track::{Album, Artist, Track};
