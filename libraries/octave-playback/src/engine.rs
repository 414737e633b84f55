//! Playback engine
//!
//! Drives the single media handle of a session through
//! `Idle → Loading → Playing ⇄ Paused → Ended`.
//!
//! Loads are ordered by a sequence number: a load that finishes after a
//! newer one was issued is reported as [`LoadOutcome::Superseded`] and does
//! not start playback.

use crate::error::{PlaybackError, Result};
use crate::types::{LoadOutcome, PlaybackState};
use async_trait::async_trait;
use octave_core::{MediaHandle, MediaSource, Track};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, error, info};

/// Picks where a track's audio comes from
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Resolve a playable source; implementations fall back rather than fail
    async fn resolve(&self, track: &Track) -> MediaSource;
}

type TrackEndCallback = Box<dyn Fn() + Send + Sync>;

/// `f64` stored as bits in an `AtomicU64`
#[derive(Debug, Default)]
struct AtomicSeconds(AtomicU64);

impl AtomicSeconds {
    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::SeqCst))
    }

    fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::SeqCst);
    }
}

struct Output {
    handle: Box<dyn MediaHandle>,
    source: Option<MediaSource>,
}

/// The playback engine of one session
///
/// Shared as `Arc<PlaybackEngine>`; all methods take `&self`.
pub struct PlaybackEngine {
    output: AsyncMutex<Output>,
    resolver: Arc<dyn SourceResolver>,
    load_seq: AtomicU64,
    state: watch::Sender<PlaybackState>,
    seek_position: AtomicSeconds,
    saved_position: AtomicSeconds,
    on_track_end: Mutex<Option<TrackEndCallback>>,
}

impl PlaybackEngine {
    /// Create an idle engine around a media handle
    pub fn new(handle: Box<dyn MediaHandle>, resolver: Arc<dyn SourceResolver>) -> Self {
        let (state, _) = watch::channel(PlaybackState::Idle);
        Self {
            output: AsyncMutex::new(Output {
                handle,
                source: None,
            }),
            resolver,
            load_seq: AtomicU64::new(0),
            state,
            seek_position: AtomicSeconds::default(),
            saved_position: AtomicSeconds::default(),
            on_track_end: Mutex::new(None),
        }
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        *self.state.borrow()
    }

    /// Last sampled or sought position, in seconds
    pub fn seek_position(&self) -> f64 {
        self.seek_position.load()
    }

    /// Position to resume from when play is pressed on a fresh source
    pub fn set_saved_position(&self, position: f64) {
        self.saved_position.store(position.max(0.0));
    }

    /// Source currently set on the handle
    pub async fn current_source(&self) -> Option<MediaSource> {
        self.output.lock().await.source.clone()
    }

    /// Live playhead position, in seconds
    pub async fn position(&self) -> f64 {
        self.output.lock().await.handle.position()
    }

    /// Duration of the loaded source, if known
    pub async fn duration(&self) -> Option<f64> {
        self.output.lock().await.handle.duration()
    }

    /// Load `track` and start playing from `start_offset` seconds
    ///
    /// The output is not held while the handle gets ready, so a newer load
    /// (or a seek, volume change or position read) is never queued behind
    /// a slow one. On failure the engine is left `Paused` with no source
    /// and the error is returned; nothing is retried.
    pub async fn play_track_from_source(
        &self,
        track: &Track,
        start_offset: f64,
    ) -> Result<LoadOutcome> {
        let seq = self.load_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(PlaybackState::Loading);

        let source = self.resolver.resolve(track).await;
        if self.is_stale(seq) {
            debug!(track_id = %track.id, seq, "Load superseded before source was set");
            return Ok(LoadOutcome::Superseded);
        }

        let can_play = {
            let mut output = self.output.lock().await;
            if self.is_stale(seq) {
                debug!(track_id = %track.id, seq, "Load superseded while waiting for output");
                return Ok(LoadOutcome::Superseded);
            }
            output.source = None;
            output.handle.load(&source)
        };
        let ready = can_play.await;

        let mut output = self.output.lock().await;
        if self.is_stale(seq) {
            // A newer load owns the handle now
            debug!(track_id = %track.id, seq, "Load superseded while getting ready");
            return Ok(LoadOutcome::Superseded);
        }

        let started = match ready {
            Ok(()) => Self::start(&mut output, start_offset).await,
            Err(e) => Err(PlaybackError::Media(e.to_string())),
        };

        match started {
            Ok(()) => {
                info!(
                    track_id = %track.id,
                    offline = source.is_offline(),
                    start_offset,
                    "Playback started"
                );
                output.source = Some(source);
                self.seek_position.store(start_offset);
                self.saved_position.store(start_offset);
                self.set_state(PlaybackState::Playing);
                Ok(LoadOutcome::Started)
            }
            Err(e) => {
                error!(track_id = %track.id, url = %source.url(), error = %e, "Failed to load track");
                self.set_state(PlaybackState::Paused);
                Err(e)
            }
        }
    }

    async fn start(output: &mut Output, start_offset: f64) -> Result<()> {
        if start_offset > 0.0 {
            output.handle.seek(start_offset);
        }
        output
            .handle
            .play()
            .await
            .map_err(|e| PlaybackError::Media(e.to_string()))
    }

    /// Pause if playing, resume otherwise
    ///
    /// Resuming a source that is still at zero jumps to the saved position
    /// first (used after a cold start). Returns the new state; a pending
    /// load is left alone. Fails with `NoTrackLoaded` when no source is
    /// ready, including after a failed load.
    pub async fn toggle_play(&self) -> Result<PlaybackState> {
        let mut output = self.output.lock().await;
        if self.state() == PlaybackState::Loading {
            return Ok(PlaybackState::Loading);
        }
        if output.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        if self.state().is_playing() {
            output.handle.pause();
            self.seek_position.store(output.handle.position());
            self.set_state(PlaybackState::Paused);
            return Ok(PlaybackState::Paused);
        }

        let saved = self.saved_position.load();
        if output.handle.position() == 0.0 && saved > 0.0 {
            debug!(position = saved, "Resuming from saved position");
            output.handle.seek(saved);
        }
        output
            .handle
            .play()
            .await
            .map_err(|e| PlaybackError::Media(e.to_string()))?;
        self.set_state(PlaybackState::Playing);
        Ok(PlaybackState::Playing)
    }

    /// Move the playhead, clamped to `[0, duration]`
    ///
    /// Returns the position actually applied.
    pub async fn seek(&self, time: f64) -> f64 {
        let mut output = self.output.lock().await;
        let mut target = time.max(0.0);
        if let Some(duration) = output.handle.duration() {
            target = target.min(duration);
        }
        output.handle.seek(target);
        self.seek_position.store(target);
        target
    }

    /// Set output volume, clamped to `[0, 1]`
    pub async fn set_volume(&self, volume: f32) -> f32 {
        let volume = volume.clamp(0.0, 1.0);
        self.output.lock().await.handle.set_volume(volume);
        volume
    }

    /// Register the natural-end callback, replacing any previous one
    pub fn set_on_track_end(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self
            .on_track_end
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
    }

    /// Report that the loaded source played to its end
    pub fn media_ended(&self) {
        self.set_state(PlaybackState::Ended);
        let callback = self
            .on_track_end
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = callback.as_ref() {
            callback();
        }
    }

    /// Pause and return to idle
    pub async fn stop(&self) {
        self.output.lock().await.handle.pause();
        self.set_state(PlaybackState::Idle);
    }

    /// Replay the loaded source from the start
    pub async fn restart(&self) -> Result<()> {
        let mut output = self.output.lock().await;
        if output.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        output.handle.seek(0.0);
        output
            .handle
            .play()
            .await
            .map_err(|e| PlaybackError::Media(e.to_string()))?;
        self.seek_position.store(0.0);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Sample the handle position into `seek_position` and return it
    pub async fn record_position(&self) -> f64 {
        let position = self.output.lock().await.handle.position();
        self.seek_position.store(position);
        position
    }

    fn is_stale(&self, seq: u64) -> bool {
        self.load_seq.load(Ordering::SeqCst) != seq
    }

    fn set_state(&self, state: PlaybackState) {
        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                debug!(from = ?*current, to = ?state, "Playback state changed");
                *current = state;
                true
            }
        });
    }
}
