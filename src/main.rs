use anyhow::Result;
use console::{Term, style};
use gif_ascii::config::types::Config;
use gif_ascii::init;
use gif_ascii::menu::show_main_menu;
use gif_ascii::signal::setup_shutdown_signal;
use log::{error, info};
use rust_i18n::t;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

rust_i18n::i18n!("locales", fallback = "en-US");

fn main() -> Result<ExitCode> {
    init::init();
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal()?;

    let mut config = Config::new();
    rust_i18n::set_locale(config.settings.language.as_str());

    loop {
        if shutdown_signal.load(Ordering::SeqCst) {
            info!("Shutdown requested, leaving main menu");
            break;
        }

        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                error!("Fatal error: {e:#}");
                eprintln!("{} {e:#}", style(t!("main_menu.error_prefix")).red().bold());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
