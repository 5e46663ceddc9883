use crate::tools::validate_directory_exists;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct GifFileInfo {
    pub path: PathBuf,
    pub size: u64,
}

impl GifFileInfo {
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

#[must_use]
pub fn is_gif_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}

/// 列出資料夾第一層的 .gif 檔案，依檔名排序
///
/// 找不到任何候選檔案時回傳錯誤，轉換流程無法繼續
pub fn scan_gif_files(directory: &Path) -> Result<Vec<GifFileInfo>> {
    validate_directory_exists(directory)?;

    let mut gif_files: Vec<GifFileInfo> = WalkDir::new(directory)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_gif_file(entry.path()))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(GifFileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    if gif_files.is_empty() {
        bail!("No .gif files found in {}", directory.display());
    }

    gif_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(gif_files)
}
