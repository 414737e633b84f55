//! Time-synced lyrics
//!
//! Parses `[mm:ss.xx]text` lines and tracks which line is active as the
//! playhead moves.

use crate::engine::PlaybackEngine;
use octave_core::{Lyric, MusicApi, Track};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Default sampling period of the lyrics ticker
pub const DEFAULT_TICK: Duration = Duration::from_millis(250);

/// Parse synced lyrics text
///
/// Lines without a readable `[mm:ss.xx]` prefix (metadata tags, blank
/// lines) are skipped. A timestamp with empty text is kept as an
/// instrumental gap. Times are rounded to a tenth of a second and the
/// result is sorted. The last line ends at `duration`, or never when the
/// duration is unknown.
pub fn parse_lyrics(text: &str, duration: Option<f64>) -> Vec<Lyric> {
    let mut lines: Vec<(f64, String)> = text.lines().filter_map(parse_line).collect();
    lines.sort_by(|a, b| a.0.total_cmp(&b.0));

    let last_end = duration.filter(|d| d.is_finite()).unwrap_or(f64::INFINITY);
    let starts: Vec<f64> = lines.iter().map(|(time, _)| *time).collect();

    lines
        .into_iter()
        .enumerate()
        .map(|(i, (time, text))| Lyric {
            time,
            end_time: starts.get(i + 1).copied().unwrap_or(last_end),
            text,
        })
        .collect()
}

fn parse_line(line: &str) -> Option<(f64, String)> {
    let rest = line.trim().strip_prefix('[')?;
    let (stamp, text) = rest.split_once(']')?;
    let (minutes, seconds) = stamp.split_once(':')?;

    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    let time = minutes * 60.0 + seconds;
    if !time.is_finite() || time < 0.0 {
        return None;
    }

    Some(((time * 10.0).round() / 10.0, text.trim().to_string()))
}

/// Index of the line active at `position`
///
/// The last line starting at or before `position`; `None` before the first
/// line or when there are no lines.
pub fn active_index(lyrics: &[Lyric], position: f64) -> Option<usize> {
    if position.is_nan() {
        return None;
    }
    lyrics
        .partition_point(|line| line.time <= position)
        .checked_sub(1)
}

/// Fetch and parse lyrics for a track
///
/// Only synced lyrics are used; anything else, including a failed request,
/// yields no lines.
pub async fn fetch_lyrics(api: &dyn MusicApi, track: &Track, duration: Option<f64>) -> Vec<Lyric> {
    match api.lyrics(&track.title, &track.artist.name).await {
        Ok(response) if response.success && response.synced => {
            parse_lyrics(&response.lyrics, duration)
        }
        Ok(_) => {
            debug!(track_id = %track.id, "No synced lyrics available");
            Vec::new()
        }
        Err(e) => {
            warn!(track_id = %track.id, error = %e, "Lyrics lookup failed");
            Vec::new()
        }
    }
}

/// Lyric lines plus the currently active index
#[derive(Debug, Clone, Default)]
pub struct LyricsSync {
    lines: Vec<Lyric>,
    index: Option<usize>,
}

impl LyricsSync {
    pub fn new(lines: Vec<Lyric>) -> Self {
        Self { lines, index: None }
    }

    pub fn lines(&self) -> &[Lyric] {
        &self.lines
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current_line(&self) -> Option<&Lyric> {
        self.index.and_then(|i| self.lines.get(i))
    }

    /// Recompute the active line; returns true when it changed
    pub fn update(&mut self, position: f64) -> bool {
        let index = active_index(&self.lines, position);
        if index == self.index {
            false
        } else {
            self.index = index;
            true
        }
    }
}

/// Lyrics state shared between a session and its ticker
pub type SharedLyrics = Arc<Mutex<LyricsSync>>;

/// Lock shared lyrics, recovering from a poisoned lock
pub(crate) fn lock(shared: &SharedLyrics) -> std::sync::MutexGuard<'_, LyricsSync> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sample the engine position periodically and publish active-line changes
///
/// The lines are read from `shared` on every tick, so lyrics loaded or
/// cleared after the ticker started are picked up. The task ends once
/// every receiver has been dropped.
pub fn spawn_lyrics_ticker(
    engine: Arc<PlaybackEngine>,
    shared: SharedLyrics,
    period: Duration,
) -> (JoinHandle<()>, watch::Receiver<Option<usize>>) {
    let (tx, rx) = watch::channel(lock(&shared).index());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if tx.is_closed() {
                break;
            }
            let position = engine.position().await;
            let index = {
                let mut sync = lock(&shared);
                sync.update(position);
                sync.index()
            };
            tx.send_if_modified(|published| {
                if *published == index {
                    false
                } else {
                    *published = index;
                    true
                }
            });
        }
    });

    (task, rx)
}
