mod clipboard;
mod gif_scanner;
mod path_validator;

pub use clipboard::{CommandCopyTool, CopyTool, SystemClipboard};
pub use gif_scanner::{GifFileInfo, is_gif_file, scan_gif_files};
pub use path_validator::{validate_directory_exists, validate_file_readable};
