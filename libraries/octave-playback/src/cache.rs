//! Offline audio cache
//!
//! Whole-track blobs keyed by track id. Reads never fail: a storage error is
//! logged and treated as a miss, so playback falls back to streaming.
//!
//! The next few queued tracks are read ahead of time with
//! [`OfflineCache::warm`] so a skip does not wait on storage.

use crate::engine::SourceResolver;
use crate::error::Result;
use async_trait::async_trait;
use octave_core::{BlobStore, MediaSource, MusicApi, Playlist, Track};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Number of upcoming tracks kept ready by [`OfflineCache::warm`]
pub const PRELOAD_AHEAD: usize = 3;

/// Outcome of a playlist download
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Tracks attempted
    pub total: usize,
    /// Ids stored successfully, in playlist order
    pub completed: Vec<String>,
    /// Ids that failed, in playlist order
    pub failed: Vec<String>,
}

impl DownloadReport {
    /// True when every track was stored
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Offline cache over a blob store and the remote API
#[derive(Clone)]
pub struct OfflineCache {
    blobs: Arc<dyn BlobStore>,
    api: Arc<dyn MusicApi>,
    prepared: Arc<Mutex<HashMap<String, MediaSource>>>,
}

impl OfflineCache {
    pub fn new(blobs: Arc<dyn BlobStore>, api: Arc<dyn MusicApi>) -> Self {
        Self {
            blobs,
            api,
            prepared: Arc::default(),
        }
    }

    /// Cached source for a track, if any
    pub async fn get(&self, track_id: &str) -> Option<MediaSource> {
        match self.blobs.get_blob(track_id).await {
            Ok(Some(bytes)) => Some(MediaSource::Offline {
                track_id: track_id.to_string(),
                bytes: bytes.into(),
            }),
            Ok(None) => None,
            Err(e) => {
                warn!(track_id = %track_id, error = %e, "Offline cache read failed");
                None
            }
        }
    }

    /// Store a blob, replacing any previous one
    pub async fn put(&self, track_id: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.put_blob(track_id, bytes).await?;
        Ok(())
    }

    /// Delete a track's blob; returns whether one existed
    pub async fn remove(&self, track_id: &str) -> Result<bool> {
        self.prepared().remove(track_id);
        let removed = self.blobs.delete_blob(track_id).await?;
        if removed {
            info!(track_id = %track_id, "Offline copy removed");
        }
        Ok(removed)
    }

    /// Read the offline copies of the first [`PRELOAD_AHEAD`] tracks of
    /// `up_next` ahead of playback
    ///
    /// Replaces whatever was prepared before. Tracks without a blob are
    /// left to stream.
    pub async fn warm(&self, up_next: &[Track]) {
        let wanted = &up_next[..up_next.len().min(PRELOAD_AHEAD)];
        let mut ready = {
            let mut prepared = self.prepared();
            let mut kept = HashMap::new();
            for track in wanted {
                if let Some(source) = prepared.remove(&track.id) {
                    kept.insert(track.id.clone(), source);
                }
            }
            prepared.clear();
            kept
        };

        for track in wanted {
            if ready.contains_key(&track.id) {
                continue;
            }
            if let Some(source) = self.get(&track.id).await {
                ready.insert(track.id.clone(), source);
            }
        }

        debug!(prepared = ready.len(), "Offline sources warmed");
        *self.prepared() = ready;
    }

    fn prepared(&self) -> std::sync::MutexGuard<'_, HashMap<String, MediaSource>> {
        self.prepared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a blob exists for this track
    pub async fn is_cached(&self, track_id: &str) -> bool {
        self.blobs.contains_blob(track_id).await.unwrap_or_else(|e| {
            warn!(track_id = %track_id, error = %e, "Offline cache lookup failed");
            false
        })
    }

    /// Fetch the full audio for a track and store it
    pub async fn download_track(&self, track: &Track) -> Result<()> {
        let bytes = self.api.fetch_track(&track.id).await?;
        self.put(&track.id, &bytes).await?;
        info!(track_id = %track.id, size = bytes.len(), "Track available offline");
        Ok(())
    }

    /// Download every track of a playlist, one at a time
    ///
    /// `progress` receives the completed percentage after each attempt,
    /// failed or not. An empty playlist reports 100 immediately.
    pub async fn download_playlist(
        &self,
        playlist: &Playlist,
        mut progress: impl FnMut(f64) + Send,
    ) -> DownloadReport {
        let total = playlist.tracks.len();
        let mut report = DownloadReport {
            total,
            ..DownloadReport::default()
        };

        if total == 0 {
            progress(100.0);
            return report;
        }

        for (done, track) in playlist.tracks.iter().enumerate() {
            match self.download_track(track).await {
                Ok(()) => report.completed.push(track.id.clone()),
                Err(e) => {
                    warn!(
                        playlist = %playlist.name,
                        track_id = %track.id,
                        error = %e,
                        "Track download failed"
                    );
                    report.failed.push(track.id.clone());
                }
            }
            progress((done + 1) as f64 / total as f64 * 100.0);
        }

        info!(
            playlist = %playlist.name,
            completed = report.completed.len(),
            failed = report.failed.len(),
            "Playlist download finished"
        );
        report
    }
}

#[async_trait]
impl SourceResolver for OfflineCache {
    async fn resolve(&self, track: &Track) -> MediaSource {
        let warmed = self.prepared().remove(&track.id);
        if let Some(source) = warmed {
            debug!(track_id = %track.id, "Playing prepared offline copy");
            return source;
        }
        if let Some(source) = self.get(&track.id).await {
            debug!(track_id = %track.id, "Playing from offline cache");
            return source;
        }
        MediaSource::Stream {
            url: self.api.stream_url(&track.id),
        }
    }
}
