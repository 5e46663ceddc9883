use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Path is not a directory: {}", path.display());
    }
    Ok(())
}

pub fn validate_file_readable(path: &Path) -> Result<u64> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path is not a file: {}", path.display());
    }
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&temp_dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_validate_file_readable() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.gif");
        std::fs::write(&file, b"12345").unwrap();

        assert_eq!(validate_file_readable(&file).unwrap(), 5);
        assert!(validate_file_readable(temp_dir.path()).is_err());
        assert!(validate_file_readable(&temp_dir.path().join("b.gif")).is_err());
    }
}
