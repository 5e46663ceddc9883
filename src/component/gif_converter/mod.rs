//! GIF 轉 ASCII 元件
//!
//! 四個階段：
//! A. 依序解碼影格（`frame_extractor`）
//! B. 由第一個影格計算字元網格
//! C. 在固定大小的執行緒池中平行轉換（`rasterizer`）
//! D. 依影格索引重組並寫出（`sequence`）

mod frame_extractor;
mod main;
mod pipeline;
mod rasterizer;
mod sequence;

pub use frame_extractor::{ExtractedFrames, FrameIndex, FrameSource, RawFrame};
pub use main::{ConversionSummary, GifConverter};
pub use pipeline::{ConversionOutput, ConversionPipeline, PipelineConfig};
pub use rasterizer::{AsciiFrame, Palette, TargetGrid, luminance, rasterize};
pub use sequence::{AsciiSequence, FRAME_SEPARATOR, write_sequence_text};
