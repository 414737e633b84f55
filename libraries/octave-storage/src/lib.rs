//! Octave Storage
//!
//! Local `SQLite` persistence for the Octave player.
//!
//! This crate provides the per-origin store behind the player: a key-value
//! settings collection (JSON values) and a blob collection holding cached
//! audio for offline playback.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each collection owns its own queries (`settings`, `tracks`)
//! - **Last Writer Wins**: every write is a single-statement upsert; no
//!   transaction spans several logical fields
//!
//! # Example
//!
//! ```rust,no_run
//! use octave_storage::{LocalStore, create_pool, run_migrations};
//! use octave_core::SettingsStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://octave.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalStore::new(pool);
//! store.set_raw("volume", "0.5").await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod settings;
pub mod tracks;

pub use context::LocalStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// The database file and any missing parent directories are created.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://octave.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // SQLite creates the file but not its directory
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(url = %database_url, "SQLite pool ready");

    Ok(pool)
}

/// Create a pool, run migrations and wrap it in a [`LocalStore`]
///
/// # Errors
///
/// Returns an error if the connection or the migrations fail
pub async fn open(database_url: &str) -> Result<LocalStore, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(LocalStore::new(pool))
}
