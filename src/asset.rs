use std::path::PathBuf;

use tracing::debug;

use crate::{error::UploadError, fs::AssetFs};

/// One asset to upload: where its bytes live and how to register it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub path: PathBuf,
    pub name: String,
    pub content_type: String,
}

impl AssetDescriptor {
    /// Batch of exactly one asset, used when no manifest is given. The
    /// values come from required inputs, which are already non-empty.
    pub fn build_single(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Vec<AssetDescriptor> {
        vec![AssetDescriptor {
            path: path.into(),
            name: name.into(),
            content_type: content_type.into(),
        }]
    }
}

/// A descriptor with everything the upload call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    pub name: String,
    pub content_type: String,
    pub content_length: u64,
    pub file: Vec<u8>,
}

/// Resolves size and contents of the descriptor's file.
///
/// `content_length` is whatever the size lookup saw; it is not re-derived
/// from the bytes read afterwards, so files must not change mid-run.
pub async fn assemble<F: AssetFs>(
    fs: &F,
    descriptor: &AssetDescriptor,
    url: &str,
) -> Result<UploadRequest, UploadError> {
    let content_length = fs.stat_size(&descriptor.path).await?;
    let file = fs.read_file(&descriptor.path).await?;

    debug!(
        path = %descriptor.path.display(),
        name = %descriptor.name,
        content_length,
        "Assembled upload request"
    );

    Ok(UploadRequest {
        url: url.to_string(),
        name: descriptor.name.clone(),
        content_type: descriptor.content_type.clone(),
        content_length,
        file,
    })
}
