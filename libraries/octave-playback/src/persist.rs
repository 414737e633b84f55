//! Settings persistence helpers
//!
//! Reads are defensive: a missing key, an unreadable store or corrupt JSON
//! all yield the default. Writes are fire-and-forget; failures are logged
//! and the in-memory state stays authoritative.

use octave_core::SettingsStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Load and decode a setting, falling back to `T::default()`
pub async fn load_or_default<T>(store: &dyn SettingsStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    load(store, key).await.unwrap_or_default()
}

/// Load and decode a setting, `None` when absent or unreadable
///
/// Bare strings written without JSON quoting (e.g. `HIGH`) are accepted.
pub async fn load<T>(store: &dyn SettingsStore, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let raw = match store.get_raw(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read setting");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(json_err) => match serde_json::from_value(serde_json::Value::String(raw)) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key = %key, error = %json_err, "Ignoring corrupt setting");
                None
            }
        },
    }
}

/// Encode and store a setting; errors are logged, not returned
pub async fn save<T>(store: &dyn SettingsStore, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to encode setting");
            return;
        }
    };

    if let Err(e) = store.set_raw(key, &json).await {
        warn!(key = %key, error = %e, "Failed to persist setting");
    }
}
