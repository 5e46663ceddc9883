use crate::config::DEFAULT_PALETTE;
use anyhow::{Result, bail};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::borrow::Cow;
use std::fmt;

/// 一個轉換完成的影格：`height` 行、每行 `width` 個字元，以換行連接
pub type AsciiFrame = String;

/// 縮放使用的濾鏡（雙三次），鄰近取樣會讓輸出呈現明顯鋸齒
const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// 由暗到亮排列的字元表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    chars: Vec<char>,
}

impl Palette {
    pub fn new(chars: &str) -> Result<Self> {
        if chars.is_empty() {
            bail!("Palette must contain at least one character");
        }
        if chars.contains(['\n', '\r']) {
            bail!("Palette must not contain line breaks");
        }

        Ok(Self {
            chars: chars.chars().collect(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 可用的亮度階數（字元數 - 1）
    #[must_use]
    pub fn levels(&self) -> usize {
        self.chars.len() - 1
    }

    /// `floor(p * levels / 255)`，並夾在最後一個字元
    #[must_use]
    pub fn index_for(&self, luminance: u8) -> usize {
        let levels = self.levels();
        (usize::from(luminance) * levels / 255).min(levels)
    }

    #[must_use]
    pub fn char_for(&self, luminance: u8) -> char {
        self.chars[self.index_for(luminance)]
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            chars: DEFAULT_PALETTE.chars().collect(),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// 所有影格共用的字元網格尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetGrid {
    pub width: u32,
    pub height: u32,
}

impl TargetGrid {
    /// 由第一個影格的原始尺寸計算網格
    ///
    /// 寬度超過 `max_width` 時等比縮小；高度再乘上字元高寬比。兩者至少為 1
    #[must_use]
    pub fn from_source(orig_width: u32, orig_height: u32, max_width: u32, char_ratio: f64) -> Self {
        let scale = (f64::from(max_width) / f64::from(orig_width)).min(1.0);

        let width = if orig_width > max_width {
            max_width
        } else {
            orig_width
        };
        let height = (f64::from(orig_height) * scale * char_ratio).floor() as u32;

        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl fmt::Display for TargetGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// ITU-R 601-2 亮度，整數運算並四捨五入
#[must_use]
pub fn luminance(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    let weighted = u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114;
    ((weighted + 500) / 1000) as u8
}

/// 每列字元加一個換行；在 usize 中計算避免 u32 溢位
fn output_capacity(grid: TargetGrid) -> usize {
    (grid.width as usize)
        .saturating_add(1)
        .saturating_mul(grid.height as usize)
}

/// 將影格縮放到網格大小後量化為字元
pub fn rasterize(image: &RgbaImage, grid: TargetGrid, palette: &Palette) -> Result<AsciiFrame> {
    if image.width() == 0 || image.height() == 0 {
        bail!("Frame has no pixels");
    }

    let resized: Cow<'_, RgbaImage> = if image.dimensions() == (grid.width, grid.height) {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(imageops::resize(image, grid.width, grid.height, RESIZE_FILTER))
    };

    let mut output = String::with_capacity(output_capacity(grid));
    for (y, row) in resized.rows().enumerate() {
        if y > 0 {
            output.push('\n');
        }
        output.extend(row.map(|pixel| palette.char_for(luminance(pixel))));
    }

    Ok(output)
}
