//! Atomic file replacement.

use std::path::{Path, PathBuf};

use letmein_core::{LetmeinError, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Replaces the file at `path` with `contents`.
///
/// Writes a hidden temporary file next to the target, fsyncs it and renames
/// it over the target, so readers see either the old or the new contents.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let tmp_path = temp_path(path)?;
    let mut tmp_file = fs::File::create(&tmp_path).await?;
    tmp_file.write_all(contents).await?;
    tmp_file.sync_all().await?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).await?;
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| LetmeinError::storage("Path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| LetmeinError::storage("Path has no file name"))?;

    Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("value.json");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");
        assert!(!path.with_file_name(".value.json.tmp").exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let tmp = temp_path(Path::new("/data/state/key.json")).unwrap();
        assert_eq!(tmp, PathBuf::from("/data/state/.key.json.tmp"));
    }
}
