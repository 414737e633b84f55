//! Lyric line type

use serde::{Deserialize, Serialize};

/// One synced lyric line
///
/// `end_time` is the start of the next line, or the track duration for the
/// last line (`f64::INFINITY` when the duration is unknown).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lyric {
    /// Line start, in seconds
    pub time: f64,

    /// Exclusive line end, in seconds
    #[serde(rename = "endTime")]
    pub end_time: f64,

    /// Line text
    pub text: String,
}
