use super::playback::Playback;
use crate::component::gif_converter::AsciiSequence;
use crate::config::UserSettings;
use crate::config::save::{remember_fps, save_settings};
use crate::signal::CancellationToken;
use anyhow::Result;
use console::Term;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use log::{debug, info, warn};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

/// ASCII 動畫播放元件
pub struct AsciiPlayer {
    shutdown_signal: Arc<AtomicBool>,
}

impl AsciiPlayer {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    /// 播放已儲存的影格檔，檔案不存在或為空時直接略過
    pub fn run(&self, term: &Term, settings: &mut UserSettings) -> Result<()> {
        let fps = self.prompt_fps(settings.player.last_fps)?;

        if remember_fps(settings, fps) {
            if let Err(e) = save_settings(settings) {
                warn!("Could not remember FPS: {e:#}");
            }
        }

        let sequence = match AsciiSequence::load(&settings.output_file) {
            Ok(sequence) if !sequence.is_empty() => sequence,
            Ok(_) => {
                info!("{} is empty, skipping animation", settings.output_file.display());
                return Ok(());
            }
            Err(e) => {
                info!("Skipping animation: {e:#}");
                return Ok(());
            }
        };

        self.clear(term);

        let cancel = CancellationToken::child_of(&self.shutdown_signal);
        spawn_enter_listener(cancel.clone());

        let mut playback = Playback::new(&sequence, fps, t!("player.stop_prompt"));
        let mut out = term.clone();
        match playback.run(&mut out, &cancel) {
            Ok(report) => info!(
                "Played {} frame(s) of {} at {fps} fps",
                report.frames_rendered,
                sequence.len()
            ),
            Err(e) => warn!("Playback aborted: {e}"),
        }

        self.clear(term);
        Ok(())
    }

    fn prompt_fps(&self, default_fps: u32) -> Result<u32> {
        let fps: u32 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("player.fps_prompt"))
            .default(default_fps.max(1))
            .validate_with(|input: &u32| -> Result<(), String> {
                if *input > 0 {
                    Ok(())
                } else {
                    Err(t!("player.fps_invalid").to_string())
                }
            })
            .interact_text()?;
        Ok(fps)
    }

    fn clear(&self, term: &Term) {
        if let Err(e) = term.clear_screen() {
            debug!("Failed to clear screen: {e}");
        }
    }
}

/// 背景等待 Enter，收到後取消播放
fn spawn_enter_listener(cancel: CancellationToken) {
    thread::spawn(move || {
        if let Err(e) = Term::stdout().read_line() {
            debug!("Enter listener stopped: {e}");
        }
        cancel.cancel();
    });
}
