//! Storage traits for the local per-origin store
//!
//! Two collections back the player: a key-value settings collection holding
//! JSON text, and a blob collection keyed by track id holding cached audio.

use crate::error::Result;
use async_trait::async_trait;

/// Key-value settings collection
///
/// Values are opaque JSON text; typed decoding (with defaults on corrupt
/// data) is the caller's concern.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a raw value
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw value, replacing any previous one
    async fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;
}

/// Blob collection keyed by track id
///
/// At most one blob per id; `put` overwrites silently.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a blob, `None` when absent
    async fn get_blob(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Store a blob
    async fn put_blob(&self, id: &str, bytes: &[u8]) -> Result<()>;

    /// Whether a blob exists, without loading it
    async fn contains_blob(&self, id: &str) -> Result<bool>;

    /// Remove a blob, returning whether it existed
    async fn delete_blob(&self, id: &str) -> Result<bool>;
}
