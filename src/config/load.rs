use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE: &str = "settings.json";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        let settings = Self::load_settings(Path::new(SETTINGS_FILE)).unwrap_or_else(|e| {
            warn!("Falling back to default settings: {e:#}");
            UserSettings::default()
        });

        Self { settings }
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Language;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Config::load_settings(&temp_dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, UserSettings::default());
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"language":"zh-TW","converter":{"max_width":80}}"#,
        )
        .unwrap();

        let settings = Config::load_settings(&path).unwrap();
        assert_eq!(settings.language, Language::ZhTw);
        assert_eq!(settings.converter.max_width, 80);
        assert_eq!(settings.converter.palette, " .,:;+*?%$#@");
        assert_eq!(settings.player.last_fps, 12);
    }

    #[test]
    fn test_invalid_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_settings(&path).is_err());
    }
}
