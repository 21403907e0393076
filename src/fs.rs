use std::path::Path;

use crate::error::UploadError;

/// Filesystem access needed to turn a descriptor into an upload request.
///
/// Size and contents are two separate lookups; nothing ties them together.
pub trait AssetFs {
    async fn stat_size(&self, path: &Path) -> Result<u64, UploadError>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, UploadError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl AssetFs for LocalFs {
    async fn stat_size(&self, path: &Path) -> Result<u64, UploadError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| UploadError::file_access(path, e))?;
        Ok(metadata.len())
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, UploadError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| UploadError::file_access(path, e))
    }
}
