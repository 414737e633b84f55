//! Debounced search.
//!
//! Only the most recent query submitted before a quiet period fires.
//! Requests already in flight run to completion; a result is still
//! delivered even if a newer query was submitted meanwhile.

use octave_core::{MusicApi, Track};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Quiet period used by the search box.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Results of one fired search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub tracks: Vec<Track>,
}

/// Debounces search submissions and publishes results on a channel.
pub struct SearchDebouncer {
    api: Arc<dyn MusicApi>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    results: mpsc::UnboundedSender<SearchResults>,
}

impl SearchDebouncer {
    /// Create a debouncer and the receiver its results are published on.
    pub fn new(
        api: Arc<dyn MusicApi>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchResults>) {
        let (results, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                delay,
                generation: Arc::new(AtomicU64::new(0)),
                results,
            },
            rx,
        )
    }

    /// Submit a query. Must be called from within a tokio runtime.
    ///
    /// Blank queries publish an empty result without touching the network.
    pub fn submit(&self, query: impl Into<String>) {
        let query = query.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let latest = Arc::clone(&self.generation);
        let api = Arc::clone(&self.api);
        let results = self.results.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            let tracks = if query.trim().is_empty() {
                Vec::new()
            } else {
                debug!(query = %query, "Debounced search firing");
                api.search_tracks(&query).await.unwrap_or_else(|e| {
                    warn!(query = %query, error = %e, "Search failed");
                    Vec::new()
                })
            };

            let _ = results.send(SearchResults { query, tracks });
        });
    }
}
