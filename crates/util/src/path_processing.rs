use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name used under the platform config directory.
pub const APP_DIR_NAME: &str = "railnav";

/// Expand a leading `~` (Unix or Windows separator) to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home().join(rest);
    }
    PathBuf::from(trimmed)
}

/// Resolve a file path from `env_var` when set and non-blank, otherwise
/// `<config_dir>/railnav/<file_name>`.
pub fn resolve_config_file(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(env_var) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ENV: &str = "RAILNAV_PATH_PROCESSING_TEST";

    #[test]
    fn expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("  /tmp/prefs.json "), PathBuf::from("/tmp/prefs.json"));
        assert_eq!(expand_tilde("relative/file"), PathBuf::from("relative/file"));
    }

    #[test]
    fn expand_tilde_joins_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/a/b.json"), home.join("a/b.json"));
        }
    }

    #[test]
    fn env_override_wins() {
        temp_env::with_var(TEST_ENV, Some("/tmp/railnav/custom.json"), || {
            assert_eq!(resolve_config_file(TEST_ENV, "ignored.json"), PathBuf::from("/tmp/railnav/custom.json"));
        });
    }

    #[test]
    fn blank_env_falls_back_to_config_dir() {
        temp_env::with_var(TEST_ENV, Some("   "), || {
            let path = resolve_config_file(TEST_ENV, "prefs.json");
            assert!(path.ends_with("railnav/prefs.json"), "unexpected path {}", path.display());
        });
    }
}
