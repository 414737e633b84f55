//! In-memory fakes for the session's collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use octave_core::{
    BlobStore, CanPlay, LyricsResponse, MediaHandle, MediaSource, MusicApi, OctaveError,
    SettingsStore, Track,
};
use octave_playback::{PlaybackConfig, PlayerSession};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MemorySettings {
    pub values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get_raw(&self, key: &str) -> octave_core::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set_raw(&self, key: &str, value: &str) -> octave_core::Result<()> {
        self.put(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> octave_core::Result<bool> {
        Ok(self.values.lock().unwrap().remove(key).is_some())
    }
}

#[derive(Default)]
pub struct MemoryBlobs {
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl BlobStore for MemoryBlobs {
    async fn get_blob(&self, id: &str) -> octave_core::Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(id).cloned())
    }

    async fn put_blob(&self, id: &str, bytes: &[u8]) -> octave_core::Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn contains_blob(&self, id: &str) -> octave_core::Result<bool> {
        Ok(self.blobs.lock().unwrap().contains_key(id))
    }

    async fn delete_blob(&self, id: &str) -> octave_core::Result<bool> {
        Ok(self.blobs.lock().unwrap().remove(id).is_some())
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub catalog: Vec<Track>,
    pub lyrics: Option<LyricsResponse>,
    pub unavailable: HashSet<String>,
}

#[async_trait]
impl MusicApi for FakeApi {
    async fn search_tracks(&self, query: &str) -> octave_core::Result<Vec<Track>> {
        let query = query.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|t| t.artist.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn lyrics(&self, _title: &str, _artist: &str) -> octave_core::Result<LyricsResponse> {
        self.lyrics
            .clone()
            .ok_or_else(|| OctaveError::network("lyrics service down"))
    }

    async fn fetch_track(&self, track_id: &str) -> octave_core::Result<Vec<u8>> {
        if self.unavailable.contains(track_id) {
            return Err(OctaveError::network(format!("{track_id}: 404")));
        }
        Ok(format!("mp3:{track_id}").into_bytes())
    }

    fn stream_url(&self, track_id: &str) -> String {
        format!("http://api.test/api/track/{track_id}.mp3")
    }
}

/// What the fake media element has been asked to do
#[derive(Debug, Default)]
pub struct MediaLog {
    pub loaded: Vec<MediaSource>,
    pub playing: bool,
    pub position: f64,
    pub volume: f32,
    pub fail_next_load: bool,
}

impl MediaLog {
    pub fn loaded_urls(&self) -> Vec<String> {
        self.loaded.iter().map(MediaSource::url).collect()
    }
}

pub struct FakeMedia {
    pub log: Arc<Mutex<MediaLog>>,
    pub duration: Option<f64>,
}

#[async_trait]
impl MediaHandle for FakeMedia {
    fn load(&mut self, source: &MediaSource) -> CanPlay {
        let mut log = self.log.lock().unwrap();
        if std::mem::take(&mut log.fail_next_load) {
            return Box::pin(async { Err(OctaveError::media("decode error")) });
        }
        log.loaded.push(source.clone());
        log.position = 0.0;
        Box::pin(async { Ok(()) })
    }

    async fn play(&mut self) -> octave_core::Result<()> {
        self.log.lock().unwrap().playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.log.lock().unwrap().playing = false;
    }

    fn seek(&mut self, position: f64) {
        self.log.lock().unwrap().position = position;
    }

    fn position(&self) -> f64 {
        self.log.lock().unwrap().position
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.lock().unwrap().volume = volume;
    }
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"), "Test Artist")
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn ids(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.id.as_str()).collect()
}

/// A session over fresh fakes, plus handles to inspect them
pub struct Harness {
    pub session: PlayerSession,
    pub settings: Arc<MemorySettings>,
    pub blobs: Arc<MemoryBlobs>,
    pub media: Arc<Mutex<MediaLog>>,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with(FakeApi::default(), Arc::new(MemorySettings::default())).await
    }

    pub async fn with(api: FakeApi, settings: Arc<MemorySettings>) -> Self {
        Self::with_blobs(api, settings, Arc::new(MemoryBlobs::default())).await
    }

    pub async fn with_blobs(
        api: FakeApi,
        settings: Arc<MemorySettings>,
        blobs: Arc<MemoryBlobs>,
    ) -> Self {
        let media = Arc::new(Mutex::new(MediaLog::default()));
        let handle = FakeMedia {
            log: media.clone(),
            duration: Some(180.0),
        };
        let session = PlayerSession::load(
            settings.clone(),
            blobs.clone(),
            Arc::new(api),
            Box::new(handle),
            PlaybackConfig::default(),
        )
        .await;

        Self {
            session,
            settings,
            blobs,
            media,
        }
    }

    /// Simulate the media element reaching the end of the track
    pub async fn finish_track(&mut self) {
        self.session.engine().media_ended();
        self.session.process_events().await;
    }

    pub fn current_id(&self) -> Option<String> {
        self.session.current_track().map(|t| t.id.clone())
    }
}
