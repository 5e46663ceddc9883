use super::frame_extractor::FrameSource;
use super::pipeline::{ConversionOutput, ConversionPipeline, PipelineConfig};
use super::sequence::write_sequence_text;
use crate::config::UserSettings;
use crate::tools::{CopyTool, GifFileInfo, SystemClipboard, scan_gif_files, validate_file_readable};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use log::{info, warn};
use rust_i18n::t;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 預覽時顯示的最大字元數
const PREVIEW_CHARS: usize = 500;

/// 轉換結果摘要
#[derive(Debug)]
pub struct ConversionSummary {
    pub output: ConversionOutput,
    pub characters: usize,
    pub bytes_written: u64,
    pub copied_to_clipboard: bool,
}

/// GIF 轉 ASCII 元件
pub struct GifConverter {
    settings: UserSettings,
    shutdown_signal: Arc<AtomicBool>,
    clipboard: Box<dyn CopyTool>,
}

impl GifConverter {
    #[must_use]
    pub fn new(settings: UserSettings, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            settings,
            shutdown_signal,
            clipboard: Box::new(SystemClipboard::new()),
        }
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn CopyTool>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style(t!("converter.title")).cyan().bold());

        let gif_files = scan_gif_files(&self.settings.gif_directory)?;

        println!("{}", style(t!("converter.available")).bold());
        for (index, file) in gif_files.iter().enumerate() {
            println!(
                "{:>3}. {} {}",
                index + 1,
                file.file_name(),
                style(format!("({} bytes)", file.size)).dim()
            );
        }
        println!();

        let selected = self.prompt_gif_choice(&gif_files)?;
        println!(
            "\n{} {}\n",
            style("✓").green(),
            t!("converter.using", name = selected.file_name())
        );

        let summary = self.convert_file(&selected.path, &self.settings.output_file)?;
        self.print_summary(&summary);

        Ok(())
    }

    fn prompt_gif_choice<'a>(&self, gif_files: &'a [GifFileInfo]) -> Result<&'a GifFileInfo> {
        let count = gif_files.len();
        let choice: usize = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("converter.pick", count = count))
            .validate_with(|input: &usize| -> Result<(), String> {
                if (1..=count).contains(input) {
                    Ok(())
                } else {
                    Err(t!("converter.out_of_range").to_string())
                }
            })
            .interact_text()?;

        Ok(&gif_files[choice - 1])
    }

    /// 轉換單一 GIF 並寫出影格檔
    ///
    /// 任何致命錯誤都會在寫檔前回傳，不會留下部分輸出
    pub fn convert_file(&self, gif_path: &Path, output_path: &Path) -> Result<ConversionSummary> {
        let config = PipelineConfig::from_settings(&self.settings.converter)?;

        let file_size = validate_file_readable(gif_path)?;
        let source = FrameSource::open(gif_path)?;
        let (width, height) = source.dimensions();
        println!("  {}", t!("converter.file_size", bytes = file_size));
        println!("  {}", t!("converter.dimensions", width = width, height = height));

        let pipeline = ConversionPipeline::new(config, Arc::clone(&self.shutdown_signal));
        let output = pipeline.convert_frames(source.frames()?)?;

        println!(
            "{}",
            style(t!(
                "converter.converted",
                converted = output.sequence.len(),
                total = output.total_frames
            ))
            .green()
        );
        if !output.failed_frames.is_empty() {
            let indices: Vec<String> = output.failed_frames.iter().map(ToString::to_string).collect();
            println!(
                "{}",
                style(t!("converter.failed_frames", indices = indices.join(", "))).yellow()
            );
        }

        println!("\n{}\n", t!("converter.preview", grid = output.grid));
        if let Some(first) = output.sequence.first() {
            println!("{}\n", preview(first, PREVIEW_CHARS));
        }

        let text = output.sequence.to_text();

        let bytes_written = write_sequence_text(output_path, &text)?;
        info!(
            "Saved {} frame(s) to {} ({bytes_written} bytes)",
            output.sequence.len(),
            output_path.display()
        );

        let copied_to_clipboard =
            self.settings.converter.copy_to_clipboard && self.copy_to_clipboard(&text);

        Ok(ConversionSummary {
            characters: text.chars().count(),
            output,
            bytes_written,
            copied_to_clipboard,
        })
    }

    /// 剪貼簿只是附加功能，失敗時只警告
    fn copy_to_clipboard(&self, text: &str) -> bool {
        match self.clipboard.try_copy_text(text) {
            Ok(()) => true,
            Err(e) => {
                warn!("Clipboard copy via {} failed: {e:#}", self.clipboard.name());
                println!(
                    "{} {}",
                    style("⚠").yellow(),
                    t!("converter.clipboard_failed", error = e)
                );
                false
            }
        }
    }

    fn print_summary(&self, summary: &ConversionSummary) {
        println!();
        println!("{}", style(t!("converter.summary_title")).cyan().bold());
        if summary.copied_to_clipboard {
            println!(
                "  {}",
                t!(
                    "converter.copied",
                    frames = summary.output.sequence.len(),
                    characters = summary.characters
                )
            );
        }
        println!(
            "  {}",
            t!(
                "converter.saved",
                path = self.settings.output_file.display(),
                bytes = summary.bytes_written
            )
        );
        if !summary.output.failed_frames.is_empty() {
            println!(
                "  {}",
                style(t!("converter.failed_count", count = summary.output.failed_frames.len())).red()
            );
        }
        println!("\n{}", style(t!("converter.complete")).green().bold());
    }
}

/// 取前 `limit` 個字元，過長時加上 `...`
fn preview(frame: &str, limit: usize) -> String {
    match frame.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &frame[..cut]),
        None => frame.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_frame_untouched() {
        assert_eq!(preview("ab\ncd", 500), "ab\ncd");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("abcdef", 4), "abcd...");
        assert_eq!(preview("abcd", 4), "abcd");
    }
}
