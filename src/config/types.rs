use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PALETTE: &str = " .,:;+*?%$#@";
pub const DEFAULT_MAX_WIDTH: u32 = 130;
pub const DEFAULT_CHAR_RATIO: f64 = 0.55;
pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const DEFAULT_FPS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 轉換流程的可調參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// ASCII 輸出的最大欄數
    pub max_width: u32,
    /// 字元格高寬比（字元高 / 字元寬）
    pub char_ratio: f64,
    pub max_workers: usize,
    /// 由暗到亮排列的字元
    pub palette: String,
    pub copy_to_clipboard: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            char_ratio: DEFAULT_CHAR_RATIO,
            max_workers: DEFAULT_MAX_WORKERS,
            palette: DEFAULT_PALETTE.to_string(),
            copy_to_clipboard: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub last_fps: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            last_fps: DEFAULT_FPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub gif_directory: PathBuf,
    pub output_file: PathBuf,
    pub converter: ConverterSettings,
    pub player: PlayerSettings,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            gif_directory: PathBuf::from("gifs"),
            output_file: PathBuf::from("frames.txt"),
            converter: ConverterSettings::default(),
            player: PlayerSettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
