//! Where drawing preferences and session logs live.
//!
//! Running from a checkout keeps everything next to the working directory so a
//! sketching session leaves `sketch-settings.json` and `sketch-logs/` beside the
//! crate. Installed builds use the platform locations under `geosketch/`:
//! - Linux: `~/.config/geosketch/` for preferences, `~/.local/share/geosketch/` for logs
//! - Windows/macOS: the platform data directory for both

use std::path::PathBuf;

const APP_DIR: &str = "geosketch";

/// Persisted [`SketchConfigData`](crate::config::SketchConfigData)
pub const SETTINGS_FILE_NAME: &str = "sketch-settings.json";

const LOG_DIR_NAME: &str = "sketch-logs";

/// Appended to on every session
pub const LOG_FILE_NAME: &str = "geosketch.log";

/// True for `cargo run` and debug builds.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

fn local_or(platform: Option<PathBuf>) -> Option<PathBuf> {
    if is_dev_mode() {
        Some(PathBuf::from("."))
    } else {
        platform.map(|p| p.join(APP_DIR))
    }
}

/// Directory holding the drawing preferences.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        local_or(dirs::config_dir())
    }

    #[cfg(not(target_os = "linux"))]
    {
        data_dir()
    }
}

pub fn data_dir() -> Option<PathBuf> {
    local_or(dirs::data_dir())
}

pub fn config_file() -> PathBuf {
    config_dir()
        .map(|p| p.join(SETTINGS_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE_NAME))
}

pub fn logs_dir() -> PathBuf {
    data_dir()
        .map(|p| p.join(LOG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME))
}

/// Creates the installed-mode preference and log directories.
pub fn ensure_directories() -> std::io::Result<()> {
    if is_dev_mode() {
        return Ok(());
    }

    if let Some(config) = config_dir() {
        std::fs::create_dir_all(&config)?;
    }
    std::fs::create_dir_all(logs_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_file_name() {
        let path = config_file();
        assert!(path.to_string_lossy().ends_with("sketch-settings.json"));
    }

    #[test]
    fn test_dev_mode_keeps_files_local() {
        // debug_assertions are on under cargo test
        assert!(is_dev_mode());
        assert_eq!(config_dir(), Some(PathBuf::from(".")));
        assert_eq!(data_dir(), Some(PathBuf::from(".")));
        assert_eq!(logs_dir(), PathBuf::from("./sketch-logs"));
        assert!(ensure_directories().is_ok());
    }
}
