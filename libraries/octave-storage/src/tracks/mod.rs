//! Offline audio blobs, keyed by track id

use sqlx::SqlitePool;

use crate::error::Result;

/// Load the blob for a track
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Vec<u8>>> {
    let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT blob FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(blob,)| blob))
}

/// Store a blob, overwriting any previous one for the same id
pub async fn put(pool: &SqlitePool, id: &str, bytes: &[u8]) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let size = i64::try_from(bytes.len()).unwrap_or(i64::MAX);

    sqlx::query(
        "INSERT INTO tracks (id, blob, size, stored_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            blob = excluded.blob,
            size = excluded.size,
            stored_at = excluded.stored_at",
    )
    .bind(id)
    .bind(bytes)
    .bind(size)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::debug!(track_id = %id, size, "Stored offline blob");

    Ok(())
}

/// Whether a blob exists for this id
pub async fn contains(pool: &SqlitePool, id: &str) -> Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM tracks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Delete the blob for a track
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
