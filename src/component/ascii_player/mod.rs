//! ASCII 動畫播放元件
//!
//! 讀取轉換產生的影格檔，依固定 FPS 循環播放，按 Enter 結束

mod main;
mod playback;

pub use main::AsciiPlayer;
pub use playback::{CURSOR_HOME, Playback, PlaybackReport, PlaybackState, frame_interval};
