//! Railnav utility helpers: preference persistence and path resolution.

pub mod path_processing;
pub mod preferences;

pub use path_processing::{expand_tilde, resolve_config_file};
pub use preferences::{PREFERENCES_PATH_ENV, PreferenceStore, PreferencesError, UserPreferences};
