//! Atomic output writes

use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Hidden sibling used while the output is being written
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `contents` to `path`, replacing any existing file
///
/// The data lands in a temporary sibling first and is renamed into place, so
/// a failed write never leaves a truncated file behind.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    let result: std::io::Result<()> = async {
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(source) = result {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temporary file {:?}: {}", tmp, e);
            }
        }
        return Err(ConvertError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}
