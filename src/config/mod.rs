pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, ConverterSettings, DEFAULT_CHAR_RATIO, DEFAULT_FPS, DEFAULT_MAX_WIDTH,
    DEFAULT_MAX_WORKERS, DEFAULT_PALETTE, Language, PlayerSettings, UserSettings,
};
