use crate::component::{AsciiPlayer, GifConverter};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::Term;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 轉換失敗屬於致命錯誤，直接往上回傳
pub fn run_gif_converter(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let converter = GifConverter::new(config.settings.clone(), Arc::clone(shutdown_signal));
    converter.run()?;

    pause(term)?;
    Ok(())
}

pub fn run_ascii_player(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let player = AsciiPlayer::new(Arc::clone(shutdown_signal));
    player.run(term, &mut config.settings)
}
