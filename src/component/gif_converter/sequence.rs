use super::frame_extractor::FrameIndex;
use super::rasterizer::AsciiFrame;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 影格之間以一個空行分隔
pub const FRAME_SEPARATOR: &str = "\n\n";

/// 依原始影格順序排列的 ASCII 影格
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsciiSequence {
    frames: Vec<AsciiFrame>,
}

impl AsciiSequence {
    #[must_use]
    pub const fn new(frames: Vec<AsciiFrame>) -> Self {
        Self { frames }
    }

    /// 依影格索引遞增排列，與完成順序無關
    #[must_use]
    pub fn from_indexed(frames: BTreeMap<FrameIndex, AsciiFrame>) -> Self {
        Self {
            frames: frames.into_values().collect(),
        }
    }

    #[must_use]
    pub fn frames(&self) -> &[AsciiFrame] {
        &self.frames
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&AsciiFrame> {
        self.frames.first()
    }

    /// 影格以空行連接，檔尾只有一個換行
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.frames.is_empty() {
            return String::new();
        }
        let mut text = self.frames.join(FRAME_SEPARATOR);
        text.push('\n');
        text
    }

    #[must_use]
    pub fn parse(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if body.is_empty() {
            return Self::default();
        }

        Self {
            frames: body.split(FRAME_SEPARATOR).map(str::to_string).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read frames from {}", path.display()))?;
        Ok(Self::parse(&text))
    }
}

/// 寫出已序列化的影格文字，回傳寫入的位元組數
pub fn write_sequence_text(path: &Path, text: &str) -> Result<u64> {
    fs::write(path, text)
        .with_context(|| format!("Failed to write frames to {}", path.display()))?;
    Ok(fs::metadata(path)?.len())
}
