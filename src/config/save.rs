use crate::config::load::SETTINGS_FILE;
use crate::config::types::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings) -> Result<()> {
    save_settings_to(settings, Path::new(SETTINGS_FILE))
}

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 記住最後一次使用的 FPS，作為下次播放的預設值
pub fn remember_fps(settings: &mut UserSettings, fps: u32) -> bool {
    if settings.player.last_fps == fps {
        return false;
    }
    settings.player.last_fps = fps;
    true
}
