//! HTTP client for the remote search, lyrics and audio endpoints.

use crate::error::{ClientError, Result};
use crate::types::{ApiConfig, LyricsRequest, SearchResponse};
use async_trait::async_trait;
use octave_core::{LyricsResponse, MusicApi, Track};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client for the remote music API.
///
/// # Example
///
/// ```ignore
/// use octave_client::{ApiClient, ApiConfig};
///
/// let client = ApiClient::new(ApiConfig::new("https://octave.example.com"))?;
/// let tracks = client.search("daft punk").await?;
/// println!("Found {} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Octave/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { http, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a track's audio resource.
    pub fn track_url(&self, track_id: &str) -> String {
        format!("{}/api/track/{}.mp3", self.base_url, track_id)
    }

    /// Search tracks by free text.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>> {
        let mut url = Url::parse(&format!("{}/api/search/tracks", self.base_url))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("query", query);

        debug!(query = %query, "Searching tracks");

        let response = self.http.get(url).send().await.map_err(map_send_error)?;
        let response = check_status(response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse search results: {}", e)))?;

        debug!(query = %query, count = body.results.len(), "Search complete");

        Ok(body.results)
    }

    /// Look up lyrics for a track.
    pub async fn fetch_lyrics(&self, title: &str, artist: &str) -> Result<LyricsResponse> {
        let url = format!("{}/api/lyrics", self.base_url);

        debug!(title = %title, artist = %artist, "Fetching lyrics");

        let response = self
            .http
            .post(&url)
            .json(&LyricsRequest { title, artist })
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse lyrics: {}", e)))
    }

    /// Fetch a track's full audio resource into memory.
    pub async fn download(&self, track_id: &str) -> Result<Vec<u8>> {
        let url = self.track_url(track_id);

        debug!(url = %url, track_id = %track_id, "Downloading track");

        let response = self.http.get(&url).send().await.map_err(map_send_error)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;

        info!(track_id = %track_id, size = bytes.len(), "Track downloaded");

        Ok(bytes.to_vec())
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MusicApi for ApiClient {
    async fn search_tracks(&self, query: &str) -> octave_core::Result<Vec<Track>> {
        Ok(self.search(query).await?)
    }

    async fn lyrics(&self, title: &str, artist: &str) -> octave_core::Result<LyricsResponse> {
        Ok(self.fetch_lyrics(title, artist).await?)
    }

    async fn fetch_track(&self, track_id: &str) -> octave_core::Result<Vec<u8>> {
        Ok(self.download(track_id).await?)
    }

    fn stream_url(&self, track_id: &str) -> String {
        self.track_url(track_id)
    }
}
