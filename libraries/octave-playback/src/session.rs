//! Player session
//!
//! Ties the queue, engine, cache, library and lyrics together and writes
//! every change through to the settings store. One session per player; it
//! is owned by the UI task while the engine is shared with platform glue
//! (which reports natural ends through [`PlaybackEngine::media_ended`]).

use crate::cache::{DownloadReport, OfflineCache};
use crate::config::OctaveConfig;
use crate::engine::PlaybackEngine;
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::history::History;
use crate::library::Library;
use crate::lyrics::{self, fetch_lyrics, spawn_lyrics_ticker, LyricsSync, SharedLyrics};
use crate::persist;
use crate::queue::QueueManager;
use crate::track_end;
use crate::types::{LoadOutcome, PlaybackConfig, PlaybackState, QueueSelection, TrackEndAction};
use octave_client::{ApiClient, ApiConfig, SearchDebouncer, SearchResults};
use octave_core::types::keys;
use octave_core::{
    Artist, AudioQuality, BlobStore, Lyric, MediaHandle, MusicApi, Playlist, PlaylistImage,
    RepeatMode, Settings, SettingsStore, Track,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// A running player
pub struct PlayerSession {
    engine: Arc<PlaybackEngine>,
    cache: OfflineCache,
    store: Arc<dyn SettingsStore>,
    api: Arc<dyn MusicApi>,
    config: PlaybackConfig,
    queue: QueueManager,
    settings: Settings,
    library: Library,
    lyrics: SharedLyrics,
    track_end_rx: mpsc::UnboundedReceiver<()>,
    last_state: PlaybackState,
    events: Vec<PlayerEvent>,
}

impl PlayerSession {
    /// Open the configured database and API, then cold-load the session
    pub async fn open(config: &OctaveConfig, handle: Box<dyn MediaHandle>) -> Result<Self> {
        config.validate()?;

        let api = ApiClient::new(ApiConfig {
            base_url: config.api.base_url.clone(),
            timeout: config.request_timeout(),
        })?;
        let store = Arc::new(octave_storage::open(&config.storage.database_url).await?);

        Ok(Self::load(
            store.clone(),
            store,
            Arc::new(api),
            handle,
            config.playback_config(),
        )
        .await)
    }

    /// Cold-load persisted state
    ///
    /// Every key is read defensively; anything missing or corrupt starts
    /// from its default. Nothing starts playing.
    pub async fn load(
        store: Arc<dyn SettingsStore>,
        blobs: Arc<dyn BlobStore>,
        api: Arc<dyn MusicApi>,
        handle: Box<dyn MediaHandle>,
        config: PlaybackConfig,
    ) -> Self {
        let defaults = Settings::default();
        let s = store.as_ref();

        let mut settings = Settings {
            volume: persist::load(s, keys::VOLUME)
                .await
                .unwrap_or(defaults.volume)
                .clamp(0.0, 1.0),
            shuffle_on: persist::load_or_default(s, keys::SHUFFLE_ON).await,
            repeat_mode: persist::load_or_default(s, keys::REPEAT_MODE).await,
            audio_quality: persist::load_or_default(s, keys::AUDIO_QUALITY).await,
            onboarding_done: persist::load_or_default(s, keys::ONBOARDING_DONE).await,
            favorite_artists: persist::load_or_default(s, keys::FAVORITE_ARTISTS).await,
            listen_counts: persist::load_or_default(s, keys::LISTEN_COUNTS).await,
            recently_played: persist::load_or_default(s, keys::RECENTLY_PLAYED).await,
            seek_position: persist::load::<f64>(s, keys::SEEK_POSITION)
                .await
                .filter(|p| p.is_finite() && *p >= 0.0)
                .unwrap_or_default(),
        };
        settings
            .recently_played
            .truncate(config.recently_played_limit);

        let current: Option<Track> = persist::load_or_default(s, keys::CURRENT_TRACK).await;
        let up_next: Vec<Track> = persist::load_or_default(s, keys::QUEUE).await;
        let previous: Vec<Track> = persist::load_or_default(s, keys::PREVIOUS_TRACKS).await;
        let context: Vec<Track> = persist::load_or_default(s, keys::PLAY_CONTEXT).await;
        let queue = QueueManager::restore(current, up_next, previous, context, config.history_size);

        let mut library = Library::new(persist::load_or_default(s, keys::PLAYLISTS).await);
        library.ensure_liked_songs();

        let cache = OfflineCache::new(blobs, api.clone());
        cache.warm(queue.up_next()).await;
        let engine = Arc::new(PlaybackEngine::new(handle, Arc::new(cache.clone())));
        engine.set_saved_position(settings.seek_position);
        engine.set_volume(settings.volume).await;

        let (tx, track_end_rx) = mpsc::unbounded_channel();
        engine.set_on_track_end(move || {
            let _ = tx.send(());
        });

        info!(
            current = ?queue.current().map(|t| t.id.as_str()),
            up_next = queue.up_next().len(),
            history = queue.history().len(),
            playlists = library.playlists().len(),
            "Player session loaded"
        );

        Self {
            engine,
            cache,
            store,
            api,
            config,
            queue,
            settings,
            library,
            lyrics: SharedLyrics::default(),
            track_end_rx,
            last_state: PlaybackState::Idle,
            events: Vec::new(),
        }
    }

    // ===== Accessors =====

    /// Shared engine, for platform glue and the lyrics ticker
    pub fn engine(&self) -> Arc<PlaybackEngine> {
        Arc::clone(&self.engine)
    }

    pub fn state(&self) -> PlaybackState {
        self.engine.state()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn up_next(&self) -> &[Track] {
        self.queue.up_next()
    }

    pub fn history(&self) -> &History {
        self.queue.history()
    }

    /// Current track followed by up-next
    pub fn display_queue(&self) -> Vec<Track> {
        self.queue.display_queue()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Snapshot of the loaded lyrics and the active line
    pub fn lyrics(&self) -> LyricsSync {
        lyrics::lock(&self.lyrics).clone()
    }

    pub fn listen_count(&self, track_id: &str) -> u64 {
        self.settings.listen_count(track_id)
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Queue and transport =====

    /// Play a track now
    #[instrument(skip(self, track), fields(track_id = %track.id))]
    pub async fn play_track(&mut self, track: Track) -> Result<LoadOutcome> {
        let previous = self.queue.current().map(|t| t.id.clone());
        self.queue.play_track(track);
        self.after_track_change(previous).await;
        self.load_current(0.0).await
    }

    /// Advance to the next queued track; false (with a notice) if none
    pub async fn skip_track(&mut self) -> bool {
        let previous = self.queue.current().map(|t| t.id.clone());
        match self.queue.skip_track() {
            Ok(_) => {
                self.after_track_change(previous).await;
                self.load_current_logged().await;
                true
            }
            Err(e) => {
                self.notice(&e);
                false
            }
        }
    }

    /// Go back to the most recently played track; false (with a notice) if none
    pub async fn previous_track(&mut self) -> bool {
        let previous = self.queue.current().map(|t| t.id.clone());
        match self.queue.previous_track() {
            Ok(_) => {
                self.after_track_change(previous).await;
                self.load_current_logged().await;
                true
            }
            Err(e) => {
                self.notice(&e);
                false
            }
        }
    }

    /// Jump to a track from the queue view
    pub async fn select(&mut self, selection: QueueSelection) -> bool {
        let previous = self.queue.current().map(|t| t.id.clone());
        match self.queue.select(selection) {
            Ok(_) => {
                self.after_track_change(previous).await;
                self.load_current_logged().await;
                true
            }
            Err(e) => {
                self.notice(&e);
                false
            }
        }
    }

    /// Append tracks to up-next, returning how many were new
    pub async fn add_to_queue(&mut self, tracks: Vec<Track>) -> usize {
        let added = self.queue.add_to_queue(tracks);
        if added > 0 {
            self.queue_changed().await;
            self.events.push(PlayerEvent::QueueChanged {
                length: self.queue.up_next().len(),
            });
        }
        added
    }

    pub async fn remove_from_queue(&mut self, index: usize) -> Option<Track> {
        let removed = self.queue.remove_from_queue(index)?;
        self.queue_changed().await;
        self.events.push(PlayerEvent::QueueChanged {
            length: self.queue.up_next().len(),
        });
        Some(removed)
    }

    /// Replace the queue and start its first track
    pub async fn replace_queue(&mut self, tracks: Vec<Track>) -> bool {
        let previous = self.queue.current().map(|t| t.id.clone());
        if self.queue.replace_queue(tracks).is_none() {
            self.notice(&PlaybackError::InvalidOperation(
                "Nothing to play".to_string(),
            ));
            return false;
        }
        self.after_track_change(previous).await;
        self.load_current_logged().await;
        true
    }

    /// Play a playlist from its first track
    pub async fn play_playlist(&mut self, name: &str) -> bool {
        match self.library.get(name) {
            Some(playlist) => {
                let tracks = playlist.tracks.clone();
                self.replace_queue(tracks).await
            }
            None => {
                self.notice(&octave_core::OctaveError::not_found("Playlist", name).into());
                false
            }
        }
    }

    pub async fn clear_queue(&mut self) {
        self.queue.clear_queue();
        self.queue_changed().await;
        self.events.push(PlayerEvent::QueueChanged { length: 0 });
    }

    /// Shuffle up-next and flip the shuffle indicator
    pub async fn toggle_shuffle(&mut self) -> bool {
        self.queue.shuffle_up_next();
        self.settings.shuffle_on = !self.settings.shuffle_on;
        self.queue_changed().await;
        self.save(keys::SHUFFLE_ON, &self.settings.shuffle_on).await;
        self.settings.shuffle_on
    }

    /// Pause or resume
    ///
    /// With nothing loaded yet (after a cold start) the current track is
    /// loaded and resumed from the saved position.
    pub async fn toggle_play(&mut self) -> Result<PlaybackState> {
        let state = match self.engine.toggle_play().await {
            Ok(state) => state,
            Err(PlaybackError::NoTrackLoaded) if self.queue.current().is_some() => {
                let offset = self.settings.seek_position;
                self.load_current(offset).await?;
                self.engine.state()
            }
            Err(e) => return Err(e),
        };

        if state == PlaybackState::Paused {
            self.record_position().await;
        }
        self.sync_state();
        Ok(state)
    }

    /// Seek within the current track; returns the applied position
    pub async fn seek(&mut self, time: f64) -> f64 {
        let position = self.engine.seek(time).await;
        self.settings.seek_position = position;
        self.save(keys::SEEK_POSITION, &position).await;
        position
    }

    /// Sample and persist the playhead position
    pub async fn record_position(&mut self) -> f64 {
        let position = self.engine.record_position().await;
        self.settings.seek_position = position;
        self.save(keys::SEEK_POSITION, &position).await;
        position
    }

    /// Apply pending natural-end notifications from the engine
    ///
    /// Returns how many were handled.
    pub async fn process_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(()) = self.track_end_rx.try_recv() {
            self.handle_track_end().await;
            handled += 1;
        }
        handled
    }

    async fn handle_track_end(&mut self) {
        let Some(finished) = self.queue.current().cloned() else {
            debug!("Track ended with nothing current");
            return;
        };

        let listen_count = self.settings.record_listen(&finished.id);
        self.save(keys::LISTEN_COUNTS, &self.settings.listen_counts)
            .await;
        self.events.push(PlayerEvent::TrackFinished {
            track_id: finished.id.clone(),
            listen_count,
        });

        let action = track_end::resolve(self.settings.repeat_mode, self.queue.has_next());
        debug!(track_id = %finished.id, ?action, "Track ended");

        match action {
            TrackEndAction::Restart => self.restart_current().await,
            TrackEndAction::Advance => {
                if self.queue.skip_track().is_ok() {
                    self.after_track_change(Some(finished.id)).await;
                    self.load_current_logged().await;
                }
            }
            TrackEndAction::WrapAround => {
                let restarted = self
                    .queue
                    .wrap_around()
                    .is_some_and(|t| t.id == finished.id);
                self.queue_changed().await;
                if restarted {
                    self.restart_current().await;
                } else {
                    self.after_track_change(Some(finished.id)).await;
                    self.load_current_logged().await;
                }
            }
            TrackEndAction::Stop => {
                self.engine.stop().await;
                self.sync_state();
            }
        }
    }

    async fn restart_current(&mut self) {
        if let Err(e) = self.engine.restart().await {
            warn!(error = %e, "Restart failed");
            self.events.push(PlayerEvent::Error {
                message: e.to_string(),
            });
        }
        self.sync_state();
    }

    // ===== Settings =====

    /// Set and persist volume; returns the clamped value
    pub async fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = self.engine.set_volume(volume).await;
        self.settings.volume = volume;
        self.save(keys::VOLUME, &volume).await;
        volume
    }

    pub async fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.settings.repeat_mode = mode;
        self.save(keys::REPEAT_MODE, &mode).await;
    }

    /// Step the repeat toggle (off → all → one → off)
    pub async fn cycle_repeat_mode(&mut self) -> RepeatMode {
        let mode = self.settings.repeat_mode.cycle();
        self.set_repeat_mode(mode).await;
        mode
    }

    /// Step the quality toggle (MAX → HIGH → NORMAL → DATA_SAVER → MAX)
    pub async fn cycle_audio_quality(&mut self) -> AudioQuality {
        let quality = self.settings.audio_quality.cycle();
        self.settings.audio_quality = quality;
        self.save(keys::AUDIO_QUALITY, &quality).await;
        quality
    }

    pub async fn complete_onboarding(&mut self) {
        self.settings.onboarding_done = true;
        self.save(keys::ONBOARDING_DONE, &true).await;
    }

    pub async fn set_favorite_artists(&mut self, artists: Vec<Artist>) {
        self.settings.favorite_artists = artists;
        self.save(keys::FAVORITE_ARTISTS, &self.settings.favorite_artists)
            .await;
    }

    // ===== Library =====

    pub fn is_liked(&self, track_id: &str) -> bool {
        self.library.is_liked(track_id)
    }

    /// Like or unlike a track (the current one when `None`)
    ///
    /// Returns whether the track is liked afterwards, or `None` when there
    /// was no track to act on.
    pub async fn toggle_like(&mut self, track: Option<&Track>) -> Option<bool> {
        let track = track.or(self.queue.current())?.clone();
        let liked = self.library.toggle_like(&track);
        self.persist_playlists().await;
        Some(liked)
    }

    pub async fn create_playlist(
        &mut self,
        name: &str,
        tracks: Vec<Track>,
        image: Option<PlaylistImage>,
    ) -> Result<()> {
        self.library.create_playlist(name, tracks, image)?;
        self.persist_playlists().await;
        Ok(())
    }

    pub async fn add_to_playlist(&mut self, name: &str, track: &Track) -> Result<bool> {
        let added = self.library.add_to_playlist(name, track)?;
        if added {
            self.persist_playlists().await;
        }
        Ok(added)
    }

    pub async fn delete_playlist(&mut self, name: &str) -> Result<Playlist> {
        let removed = self.library.delete_playlist(name)?;
        self.persist_playlists().await;
        Ok(removed)
    }

    pub async fn toggle_pin(&mut self, name: &str) -> Result<bool> {
        let pinned = self.library.toggle_pin(name)?;
        self.persist_playlists().await;
        Ok(pinned)
    }

    /// Smart-shuffle a playlist, drawing extra tracks from `candidates`
    /// (typically the latest search results)
    pub async fn smart_shuffle(&mut self, name: &str, candidates: &[Track]) -> Result<()> {
        self.library.smart_shuffle(name, candidates)?;
        self.persist_playlists().await;
        Ok(())
    }

    // ===== Offline =====

    pub async fn is_cached(&self, track_id: &str) -> bool {
        self.cache.is_cached(track_id).await
    }

    pub async fn download_track(&mut self, track: &Track) -> Result<()> {
        self.cache.download_track(track).await.map_err(|e| {
            warn!(track_id = %track.id, error = %e, "Download failed");
            e
        })
    }

    /// Drop a track's offline copy
    ///
    /// Playlists containing the track are no longer fully downloaded, so
    /// their flag is cleared. Returns whether a copy existed.
    pub async fn remove_download(&mut self, track_id: &str) -> Result<bool> {
        let removed = self.cache.remove(track_id).await?;
        if removed && self.library.unmark_downloaded_with(track_id) > 0 {
            self.persist_playlists().await;
        }
        Ok(removed)
    }

    /// Download a playlist for offline playback
    ///
    /// Progress is queued as [`PlayerEvent::DownloadProgress`]. The playlist
    /// is marked downloaded only if every track was stored.
    pub async fn download_playlist(&mut self, name: &str) -> Result<DownloadReport> {
        let playlist = self
            .library
            .get(name)
            .cloned()
            .ok_or_else(|| octave_core::OctaveError::not_found("Playlist", name))?;

        let events = &mut self.events;
        let report = self
            .cache
            .download_playlist(&playlist, |percent| {
                events.push(PlayerEvent::DownloadProgress {
                    playlist: playlist.name.clone(),
                    percent,
                });
            })
            .await;

        if report.is_complete() {
            self.library.mark_downloaded(name, true)?;
            self.persist_playlists().await;
        } else {
            warn!(playlist = %name, failed = report.failed.len(), "Playlist only partly downloaded");
        }
        Ok(report)
    }

    // ===== Lyrics and search =====

    /// Fetch lyrics for the current track and reset the active line
    ///
    /// A running ticker picks the new lines up on its next tick.
    pub async fn load_lyrics(&mut self) -> Vec<Lyric> {
        let lines = match self.queue.current() {
            Some(track) => {
                let duration = self.engine.duration().await;
                fetch_lyrics(self.api.as_ref(), track, duration).await
            }
            None => Vec::new(),
        };
        *lyrics::lock(&self.lyrics) = LyricsSync::new(lines.clone());
        lines
    }

    /// Start sampling the playhead against this session's lyrics
    pub fn spawn_lyrics_ticker(&self) -> (JoinHandle<()>, watch::Receiver<Option<usize>>) {
        spawn_lyrics_ticker(
            self.engine(),
            Arc::clone(&self.lyrics),
            Duration::from_millis(self.config.lyrics_tick_ms),
        )
    }

    /// One-shot search; failures yield no results
    pub async fn search(&self, query: &str) -> Vec<Track> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.api.search_tracks(query).await.unwrap_or_else(|e| {
            warn!(query = %query, error = %e, "Search failed");
            Vec::new()
        })
    }

    /// Debouncer for search-as-you-type, using the configured quiet period
    pub fn search_debouncer(&self) -> (SearchDebouncer, mpsc::UnboundedReceiver<SearchResults>) {
        SearchDebouncer::new(
            self.api.clone(),
            Duration::from_millis(self.config.search_debounce_ms),
        )
    }

    // ===== Internals =====

    async fn load_current(&mut self, start_offset: f64) -> Result<LoadOutcome> {
        let track = self
            .queue
            .current()
            .cloned()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        let result = self.engine.play_track_from_source(&track, start_offset).await;
        self.cache.warm(self.queue.up_next()).await;
        match &result {
            Ok(LoadOutcome::Started) => {
                self.settings
                    .push_recently_played(track, self.config.recently_played_limit);
                self.save(keys::RECENTLY_PLAYED, &self.settings.recently_played)
                    .await;
            }
            Ok(LoadOutcome::Superseded) => {}
            Err(e) => self.events.push(PlayerEvent::Error {
                message: e.to_string(),
            }),
        }
        self.sync_state();
        result
    }

    async fn load_current_logged(&mut self) {
        if let Err(e) = self.load_current(0.0).await {
            warn!(error = %e, "Track could not be started");
        }
    }

    async fn after_track_change(&mut self, previous: Option<String>) {
        self.persist_queue().await;
        *lyrics::lock(&self.lyrics) = LyricsSync::default();
        self.settings.seek_position = 0.0;

        if let Some(current) = self.queue.current() {
            if previous.as_deref() != Some(current.id.as_str()) {
                self.events.push(PlayerEvent::TrackChanged {
                    track_id: current.id.clone(),
                    previous_track_id: previous,
                });
            }
        }
    }

    fn notice(&mut self, err: &PlaybackError) {
        warn!(error = %err, "Navigation rejected");
        self.events.push(PlayerEvent::Notice {
            message: err.to_string(),
        });
    }

    fn sync_state(&mut self) {
        let state = self.engine.state();
        if state != self.last_state {
            self.last_state = state;
            self.events.push(PlayerEvent::StateChanged { state });
        }
    }

    async fn persist_queue(&self) {
        let s = self.store.as_ref();
        persist::save(s, keys::CURRENT_TRACK, &self.queue.current()).await;
        persist::save(s, keys::QUEUE, self.queue.up_next()).await;
        persist::save(s, keys::PREVIOUS_TRACKS, &self.queue.history().to_vec()).await;
        persist::save(s, keys::PLAY_CONTEXT, self.queue.context()).await;
    }

    /// Persist an up-next edit and prepare offline copies of what plays next
    async fn queue_changed(&self) {
        self.persist_queue().await;
        self.cache.warm(self.queue.up_next()).await;
    }

    async fn persist_playlists(&self) {
        self.save(keys::PLAYLISTS, self.library.playlists()).await;
    }

    async fn save<T: serde::Serialize + ?Sized + Sync>(&self, key: &str, value: &T) {
        persist::save(self.store.as_ref(), key, value).await;
    }
}
