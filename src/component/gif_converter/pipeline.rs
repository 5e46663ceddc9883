use super::frame_extractor::{FrameIndex, RawFrame};
use super::rasterizer::{AsciiFrame, Palette, TargetGrid, rasterize};
use super::sequence::AsciiSequence;
use crate::config::{ConverterSettings, DEFAULT_CHAR_RATIO, DEFAULT_MAX_WIDTH, DEFAULT_MAX_WORKERS};
use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use rust_i18n::t;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// 轉換流程設定，建構後不可變
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub palette: Palette,
    pub max_width: u32,
    pub char_ratio: f64,
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            max_width: DEFAULT_MAX_WIDTH,
            char_ratio: DEFAULT_CHAR_RATIO,
            workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl PipelineConfig {
    pub fn from_settings(settings: &ConverterSettings) -> Result<Self> {
        let palette = Palette::new(&settings.palette).context("Invalid palette in settings")?;

        if settings.max_width == 0 {
            bail!("max_width must be at least 1");
        }
        if !settings.char_ratio.is_finite() || settings.char_ratio <= 0.0 {
            bail!("char_ratio must be a positive number, got {}", settings.char_ratio);
        }
        if settings.max_workers == 0 {
            bail!("max_workers must be at least 1");
        }

        Ok(Self {
            palette,
            max_width: settings.max_width,
            char_ratio: settings.char_ratio,
            workers: settings.max_workers,
        })
    }

    #[must_use]
    pub fn target_grid(&self, orig_width: u32, orig_height: u32) -> TargetGrid {
        TargetGrid::from_source(orig_width, orig_height, self.max_width, self.char_ratio)
    }
}

/// 一次轉換的結果
#[derive(Debug)]
pub struct ConversionOutput {
    pub grid: TargetGrid,
    pub sequence: AsciiSequence,
    /// 從來源讀到的影格數（含失敗）
    pub total_frames: usize,
    pub failed_frames: Vec<FrameIndex>,
}

#[derive(Debug, Default)]
struct FrameResults {
    frames: BTreeMap<FrameIndex, AsciiFrame>,
    failed: Vec<FrameIndex>,
}

impl FrameResults {
    fn record(mut self, (index, result): (FrameIndex, Result<AsciiFrame>)) -> Self {
        match result {
            Ok(frame) => {
                self.frames.insert(index, frame);
            }
            Err(e) => {
                error!("Failed to rasterize frame {index}: {e:#}");
                self.failed.push(index);
            }
        }
        self
    }

    fn merge(mut self, other: Self) -> Self {
        self.frames.extend(other.frames);
        self.failed.extend(other.failed);
        self
    }
}

/// 解碼 → 計算網格 → 平行轉換 → 依索引重組
///
/// 解碼在呼叫端執行緒依序進行；影格經由容量等於工作執行緒數的通道
/// 交給固定大小的 rayon 執行緒池，同時存在於記憶體中的影格數因此有上限
pub struct ConversionPipeline {
    config: PipelineConfig,
    shutdown_signal: Arc<AtomicBool>,
}

impl ConversionPipeline {
    #[must_use]
    pub const fn new(config: PipelineConfig, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn convert_frames<I>(&self, mut frames: I) -> Result<ConversionOutput>
    where
        I: Iterator<Item = Result<RawFrame>>,
    {
        let first = frames
            .next()
            .ok_or_else(|| anyhow!("No frames found in GIF"))?
            .context("Failed to decode the first frame")?;

        let (orig_width, orig_height) = first.dimensions();
        let grid = self.config.target_grid(orig_width, orig_height);
        debug!("Target grid {grid} from first frame {orig_width}x{orig_height}");

        let workers = self.config.workers;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rasterizer-{i}"))
            .build()
            .context("Failed to build rasterizer thread pool")?;

        let progress_bar = ProgressBar::no_length();
        progress_bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} frame(s) {msg}")?,
        );
        progress_bar.set_message(t!("converter.converting", workers = workers).to_string());

        let (sender, receiver) = mpsc::sync_channel::<RawFrame>(workers);
        let mut total_frames = 0;
        let mut decode_failures = Vec::new();
        let mut interrupted = false;

        let results = thread::scope(|scope| {
            let pool = &pool;
            let palette = &self.config.palette;
            let progress_bar = &progress_bar;
            let collector = scope.spawn(move || {
                pool.install(|| rasterize_all(receiver, grid, palette, progress_bar))
            });

            for (position, item) in std::iter::once(Ok(first)).chain(frames).enumerate() {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    warn!("Shutdown requested, no more frames will be dispatched");
                    interrupted = true;
                    break;
                }

                total_frames = position + 1;
                match item {
                    Ok(frame) => {
                        if sender.send(frame).is_err() {
                            error!("Rasterizer workers stopped accepting frames");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Skipping frame {position}: {e:#}");
                        decode_failures.push(position);
                    }
                }
            }
            drop(sender);

            collector.join()
        })
        .map_err(|_| anyhow!("A rasterizer worker panicked"))?;

        progress_bar.finish_with_message(t!("common.done").to_string());

        if interrupted {
            bail!("Conversion interrupted");
        }

        let FrameResults {
            frames: converted,
            mut failed,
        } = results;
        failed.extend(decode_failures);
        failed.sort_unstable();

        if converted.is_empty() {
            bail!("None of the {total_frames} frame(s) could be converted");
        }

        info!(
            "Converted {}/{} frame(s) at {grid}, {} failed",
            converted.len(),
            total_frames,
            failed.len()
        );

        Ok(ConversionOutput {
            grid,
            sequence: AsciiSequence::from_indexed(converted),
            total_frames,
            failed_frames: failed,
        })
    }
}

fn rasterize_all(
    receiver: Receiver<RawFrame>,
    grid: TargetGrid,
    palette: &Palette,
    progress_bar: &ProgressBar,
) -> FrameResults {
    receiver
        .into_iter()
        .par_bridge()
        .map(|frame| {
            let result = rasterize(&frame.image, grid, palette);
            progress_bar.inc(1);
            (frame.index, result)
        })
        .fold(FrameResults::default, FrameResults::record)
        .reduce(FrameResults::default, FrameResults::merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gray_frame(index: FrameIndex, width: u32, height: u32, level: u8) -> RawFrame {
        RawFrame::new(
            index,
            RgbaImage::from_pixel(width, height, Rgba([level, level, level, 255])),
        )
    }

    fn pipeline(config: PipelineConfig) -> ConversionPipeline {
        ConversionPipeline::new(config, Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn test_from_settings_validation() {
        let mut settings = ConverterSettings::default();
        assert!(PipelineConfig::from_settings(&settings).is_ok());

        settings.max_workers = 0;
        assert!(PipelineConfig::from_settings(&settings).is_err());

        let settings = ConverterSettings {
            char_ratio: f64::NAN,
            ..ConverterSettings::default()
        };
        assert!(PipelineConfig::from_settings(&settings).is_err());

        let settings = ConverterSettings {
            palette: String::new(),
            ..ConverterSettings::default()
        };
        assert!(PipelineConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_output_preserves_frame_order() {
        let levels: Vec<u8> = (0..40).map(|i| if i % 2 == 0 { 0 } else { 255 }).collect();
        let frames = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| Ok::<_, anyhow::Error>(gray_frame(i, 8, 8, level)));
        let config = PipelineConfig {
            char_ratio: 1.0,
            ..PipelineConfig::default()
        };

        let output = pipeline(config).convert_frames(frames).unwrap();

        assert_eq!(output.total_frames, 40);
        assert!(output.failed_frames.is_empty());
        assert_eq!(output.sequence.len(), 40);
        for (i, frame) in output.sequence.frames().iter().enumerate() {
            let expected = if i % 2 == 0 { ' ' } else { '@' };
            assert!(frame.chars().filter(|&c| c != '\n').all(|c| c == expected));
        }
    }

    #[test]
    fn test_grid_comes_from_first_frame() {
        let frames: Vec<Result<RawFrame>> = vec![
            Ok(gray_frame(0, 20, 10, 128)),
            Ok(gray_frame(1, 60, 60, 128)),
        ];
        let config = PipelineConfig {
            char_ratio: 1.0,
            ..PipelineConfig::default()
        };

        let output = pipeline(config).convert_frames(frames.into_iter()).unwrap();

        assert_eq!(output.grid, TargetGrid { width: 20, height: 10 });
        for frame in output.sequence.frames() {
            let rows: Vec<&str> = frame.split('\n').collect();
            assert_eq!(rows.len(), 10);
            assert!(rows.iter().all(|row| row.chars().count() == 20));
        }
    }

    #[test]
    fn test_failed_frame_is_dropped() {
        let frames: Vec<Result<RawFrame>> = vec![
            Ok(gray_frame(0, 4, 4, 0)),
            Ok(RawFrame::new(1, RgbaImage::new(0, 0))),
            Ok(gray_frame(2, 4, 4, 255)),
        ];
        let config = PipelineConfig {
            char_ratio: 1.0,
            ..PipelineConfig::default()
        };

        let output = pipeline(config)
            .convert_frames(frames.into_iter())
            .unwrap();

        assert_eq!(output.total_frames, 3);
        assert_eq!(output.failed_frames, vec![1]);
        assert_eq!(output.sequence.len(), 2);
        assert!(output.sequence.frames()[0].starts_with(' '));
        assert!(output.sequence.frames()[1].starts_with('@'));
    }

    #[test]
    fn test_decode_error_after_first_frame_is_recorded() {
        let frames: Vec<Result<RawFrame>> = vec![
            Ok(gray_frame(0, 4, 4, 0)),
            Err(anyhow!("corrupt frame")),
        ];

        let output = pipeline(PipelineConfig::default())
            .convert_frames(frames.into_iter())
            .unwrap();

        assert_eq!(output.sequence.len(), 1);
        assert_eq!(output.failed_frames, vec![1]);
    }

    #[test]
    fn test_no_frames_is_fatal() {
        let result = pipeline(PipelineConfig::default())
            .convert_frames(std::iter::empty::<Result<RawFrame>>());
        assert!(result.is_err());
    }

    #[test]
    fn test_first_frame_decode_error_is_fatal() {
        let frames: Vec<Result<RawFrame>> = vec![Err(anyhow!("broken header"))];
        let result = pipeline(PipelineConfig::default()).convert_frames(frames.into_iter());
        assert!(result.is_err());
    }

    #[test]
    fn test_all_frames_failing_is_fatal() {
        let frames: Vec<Result<RawFrame>> = vec![
            Ok(RawFrame::new(0, RgbaImage::new(0, 0))),
            Ok(RawFrame::new(1, RgbaImage::new(0, 0))),
        ];
        let result = pipeline(PipelineConfig::default()).convert_frames(frames.into_iter());
        assert!(result.is_err());
    }

    #[test]
    fn test_shutdown_signal_interrupts() {
        let frames: Vec<Result<RawFrame>> = vec![Ok(gray_frame(0, 4, 4, 0))];
        let pipeline = ConversionPipeline::new(
            PipelineConfig::default(),
            Arc::new(AtomicBool::new(true)),
        );
        assert!(pipeline.convert_frames(frames.into_iter()).is_err());
    }

    #[test]
    fn test_single_worker_pool() {
        let frames = (0..5).map(|i| Ok::<_, anyhow::Error>(gray_frame(i, 3, 3, (i * 50) as u8)));
        let config = PipelineConfig {
            workers: 1,
            ..PipelineConfig::default()
        };

        let output = pipeline(config).convert_frames(frames).unwrap();
        assert_eq!(output.sequence.len(), 5);
    }
}
