use crate::{settings, tracks};
use async_trait::async_trait;
use octave_core::{error::Result, BlobStore, SettingsStore};
use sqlx::SqlitePool;

/// Local store backed by `SQLite`
///
/// Implements both collections of the per-origin store. Cloning is cheap
/// (the pool is reference counted).
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SettingsStore for LocalStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(settings::get_raw(&self.pool, key).await?)
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        Ok(settings::set_raw(&self.pool, key, value).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(settings::delete(&self.pool, key).await?)
    }
}

#[async_trait]
impl BlobStore for LocalStore {
    async fn get_blob(&self, id: &str) -> Result<Option<Vec<u8>>> {
        Ok(tracks::get(&self.pool, id).await?)
    }

    async fn put_blob(&self, id: &str, bytes: &[u8]) -> Result<()> {
        Ok(tracks::put(&self.pool, id, bytes).await?)
    }

    async fn contains_blob(&self, id: &str) -> Result<bool> {
        Ok(tracks::contains(&self.pool, id).await?)
    }

    async fn delete_blob(&self, id: &str) -> Result<bool> {
        Ok(tracks::delete(&self.pool, id).await?)
    }
}
