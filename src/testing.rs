//! In-memory stand-ins for the filesystem, the upload API and the failure
//! reporter.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use reqwest::StatusCode;
use tokio::sync::Barrier;
use url::Url;

use crate::{
    asset::UploadRequest, client::AssetUploader, error::UploadError, fs::AssetFs,
    rest_types::ReleaseAsset, ui::FailureReporter,
};

#[derive(Default)]
pub struct FakeFs {
    files: HashMap<PathBuf, Vec<u8>>,
    reported_sizes: HashMap<PathBuf, u64>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        self.files.insert(path.into(), contents.to_vec());
        self
    }

    pub fn without_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.remove(path.as_ref());
        self.reported_sizes.remove(path.as_ref());
        self
    }

    /// Size the stat lookup reports, independent of the stored bytes.
    pub fn with_reported_size(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        self.reported_sizes.insert(path.into(), size);
        self
    }

    fn lookup(&self, path: &Path) -> Result<&Vec<u8>, UploadError> {
        self.files.get(path).ok_or_else(|| {
            UploadError::file_access(
                path,
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )
        })
    }
}

impl AssetFs for FakeFs {
    async fn stat_size(&self, path: &Path) -> Result<u64, UploadError> {
        let contents = self.lookup(path)?;
        Ok(self
            .reported_sizes
            .get(path)
            .copied()
            .unwrap_or(contents.len() as u64))
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, UploadError> {
        self.lookup(path).cloned()
    }
}

#[derive(Default)]
pub struct RecordingUploader {
    calls: Mutex<Vec<UploadRequest>>,
    rejections: HashMap<String, (StatusCode, String)>,
    started: Option<Barrier>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, name: &str, status: StatusCode, message: &str) -> Self {
        self.rejections
            .insert(name.to_string(), (status, message.to_string()));
        self
    }

    /// Every call blocks until `count` calls are in flight at once.
    pub fn holding_until_started(mut self, count: usize) -> Self {
        self.started = Some(Barrier::new(count));
        self
    }

    pub fn calls(&self) -> Vec<UploadRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl AssetUploader for RecordingUploader {
    async fn upload_asset(&self, request: UploadRequest) -> Result<ReleaseAsset, UploadError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(started) = &self.started {
            started.wait().await;
        }

        if let Some((status, message)) = self.rejections.get(&request.name) {
            return Err(UploadError::UploadRejected {
                name: request.name,
                status: *status,
                message: message.clone(),
            });
        }

        let id = self.calls.lock().unwrap().len() as u64;
        Ok(ReleaseAsset {
            id,
            browser_download_url: Url::parse("https://downloads.example/")
                .unwrap()
                .join(&request.name)
                .unwrap(),
            name: request.name,
            size: request.content_length,
            state: "uploaded".to_string(),
        })
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl FailureReporter for RecordingReporter {
    fn report_failure(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
