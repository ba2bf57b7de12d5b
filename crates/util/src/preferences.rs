//! User preference persistence for Railnav.
//!
//! Preferences are a flat map of string keys to string values, mirroring the
//! browser storage slot the sidebar was designed around. The JSON-backed store
//! writes to the standard configuration directory
//! (`~/.config/railnav/preferences.json` on most platforms) and is safe to
//! share across threads thanks to the internal `Mutex`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::path_processing::resolve_config_file;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "RAILNAV_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing preferences fails.
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable string-keyed slot storage.
///
/// Values that were not written as strings read back as `None`.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferencesError>;
    fn remove(&self, key: &str) -> Result<(), PreferencesError>;
}

/// Thread-safe preferences store backed by a JSON file.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<BTreeMap<String, Value>>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Open the store at the default location (`RAILNAV_PREFERENCES_PATH` or
    /// the config directory).
    pub fn new() -> Result<Self, PreferencesError> {
        Self::with_path(default_preferences_path())
    }

    /// Open the store at an explicit path. A missing file is an empty store.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(BTreeMap::new()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file. Empty for ephemeral stores.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_persistent(&self) -> bool {
        self.persist_to_disk
    }

    fn save_locked(&self, payload: &BTreeMap<String, Value>) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        debug!(path = %self.path.display(), "Saved preferences");
        Ok(())
    }

    fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, Value>)) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        apply(&mut payload);
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }
}

impl PreferenceStore for UserPreferences {
    fn get(&self, key: &str) -> Option<String> {
        let payload = self.payload.lock().expect("preferences lock poisoned");
        payload.get(key).and_then(Value::as_str).map(str::to_string)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferencesError> {
        self.mutate(|payload| {
            payload.insert(key.to_string(), Value::String(value.to_string()));
        })
    }

    fn remove(&self, key: &str) -> Result<(), PreferencesError> {
        self.mutate(|payload| {
            payload.remove(key);
        })
    }
}

fn default_preferences_path() -> PathBuf {
    resolve_config_file(PREFERENCES_PATH_ENV, PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<BTreeMap<String, Value>, PreferencesError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(BTreeMap::new())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(error) => Err(PreferencesError::Io(error)),
    }
}
