//! Key-value settings collection
//!
//! Settings are stored as key-value pairs with JSON-serialized values, so
//! each logical field (volume, queue, playlists, ...) is written on its own.
//!
//! # Example
//!
//! ```rust,no_run
//! use octave_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_raw(pool, "volume", "0.5").await?;
//! let volume = settings::get_raw(pool, "volume").await?;
//! # Ok(())
//! # }
//! ```

use sqlx::SqlitePool;

use crate::error::Result;

/// Get the raw JSON text of a setting
///
/// Returns `Ok(None)` if the key was never written
pub async fn get_raw(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Write the raw JSON text of a setting, replacing any previous value
pub async fn set_raw(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a setting
///
/// Returns `Ok(true)` if a setting was deleted, `Ok(false)` if no setting was found
pub async fn delete(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
