use anyhow::{Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frames, ImageDecoder, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// 影格在原始動畫中的位置（從 0 起算）
pub type FrameIndex = usize;

/// 解碼後的單一影格，統一為 RGBA
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub index: FrameIndex,
    pub image: RgbaImage,
}

impl RawFrame {
    #[must_use]
    pub const fn new(index: FrameIndex, image: RgbaImage) -> Self {
        Self { index, image }
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// 可重複開啟的 GIF 影格來源
#[derive(Debug, Clone)]
pub struct FrameSource {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl FrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        let decoder = Self::decoder(path)?;
        let (width, height) = decoder.dimensions();

        Ok(Self {
            path: path.to_path_buf(),
            width,
            height,
        })
    }

    fn decoder(path: &Path) -> Result<GifDecoder<BufReader<File>>> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        GifDecoder::new(BufReader::new(file))
            .with_context(|| format!("Not a readable GIF: {}", path.display()))
    }

    /// 畫布尺寸（GIF 邏輯螢幕大小）
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 從頭開始解碼，每次呼叫都會重新開啟檔案
    pub fn frames(&self) -> Result<ExtractedFrames<'static>> {
        let decoder = Self::decoder(&self.path)?;
        Ok(ExtractedFrames {
            frames: decoder.into_frames(),
            next_index: 0,
            finished: false,
        })
    }
}

/// 依時間順序逐一產生影格
///
/// 解碼器是有狀態的，遇到錯誤後無法重新同步，因此回傳一次錯誤後就結束
pub struct ExtractedFrames<'a> {
    frames: Frames<'a>,
    next_index: FrameIndex,
    finished: bool,
}

impl Iterator for ExtractedFrames<'_> {
    type Item = Result<RawFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let index = self.next_index;
        match self.frames.next() {
            None => {
                self.finished = true;
                None
            }
            Some(Ok(frame)) => {
                self.next_index += 1;
                Some(Ok(RawFrame::new(index, frame.into_buffer())))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(anyhow::Error::new(e).context(format!("Failed to decode frame {index}"))))
            }
        }
    }
}
