use std::path::PathBuf;

use futures::future::{join_all, try_join_all};
use tracing::{error, info};

use crate::{
    asset::{AssetDescriptor, assemble},
    client::{AssetUploader, parse_upload_url},
    config::{
        ASSET_CONTENT_TYPE, ASSET_NAME, ASSET_PATH, ASSETS_FROM_FILE, InputSource, UPLOAD_URL,
    },
    error::UploadError,
    fs::AssetFs,
    manifest::parse_manifest,
    rest_types::ReleaseAsset,
    ui::FailureReporter,
};

/// Assets from the manifest when `assets_from_file` is set, otherwise the
/// single asset described by `asset_path`, `asset_name` and
/// `asset_content_type`.
pub async fn select_descriptors<I, F>(
    inputs: &I,
    fs: &F,
) -> Result<Vec<AssetDescriptor>, UploadError>
where
    I: InputSource,
    F: AssetFs,
{
    let assets_from_file = inputs.get_input(ASSETS_FROM_FILE, false)?;

    if !assets_from_file.is_empty() {
        info!(manifest = %assets_from_file, "Reading assets from file");
        let path = PathBuf::from(assets_from_file);
        let raw = fs.read_file(&path).await?;
        let raw = String::from_utf8(raw).map_err(|_| UploadError::ManifestEncoding { path })?;
        return parse_manifest(&raw);
    }

    let path = inputs.get_input(ASSET_PATH, true)?;
    let name = inputs.get_input(ASSET_NAME, true)?;
    let content_type = inputs.get_input(ASSET_CONTENT_TYPE, true)?;

    Ok(AssetDescriptor::build_single(path, name, content_type))
}

/// Uploads every descriptor to `url`.
///
/// All requests are assembled first, so a missing file stops the batch
/// before anything is sent. Uploads are then started together in input
/// order and all of them are awaited. The batch succeeds only if every
/// upload did; otherwise the error of the first failed asset (in input
/// order) is returned and the others are logged.
pub async fn upload_all<F, U>(
    descriptors: &[AssetDescriptor],
    url: &str,
    fs: &F,
    uploader: &U,
) -> Result<Vec<ReleaseAsset>, UploadError>
where
    F: AssetFs,
    U: AssetUploader,
{
    let requests = try_join_all(
        descriptors
            .iter()
            .map(|descriptor| assemble(fs, descriptor, url)),
    )
    .await?;

    let outcomes = join_all(requests.into_iter().map(|request| async move {
        let name = request.name.clone();
        info!(
            name = %name,
            content_type = %request.content_type,
            content_length = request.content_length,
            "Uploading asset"
        );
        (name, uploader.upload_asset(request).await)
    }))
    .await;

    let mut uploaded = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for (name, outcome) in outcomes {
        match outcome {
            Ok(asset) => {
                info!(
                    name = %asset.name,
                    id = asset.id,
                    state = %asset.state,
                    url = %asset.browser_download_url,
                    "Uploaded asset"
                );
                uploaded.push(asset);
            }
            Err(e) => {
                error!(name = %name, "{e}");
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(uploaded),
    }
}

pub async fn run<I, F, U>(
    inputs: &I,
    fs: &F,
    uploader: &U,
) -> Result<Vec<ReleaseAsset>, UploadError>
where
    I: InputSource,
    F: AssetFs,
    U: AssetUploader,
{
    let upload_url = inputs.get_input(UPLOAD_URL, true)?;
    parse_upload_url(&upload_url)?;
    let descriptors = select_descriptors(inputs, fs).await?;

    info!(count = descriptors.len(), "Uploading release assets");
    upload_all(&descriptors, &upload_url, fs, uploader).await
}

/// Runs the batch and hands any failure to `reporter`, exactly once.
/// Returns the uploaded assets on success.
pub async fn execute<I, F, U, R>(
    inputs: &I,
    fs: &F,
    uploader: &U,
    reporter: &R,
) -> Option<Vec<ReleaseAsset>>
where
    I: InputSource,
    F: AssetFs,
    U: AssetUploader,
    R: FailureReporter,
{
    match run(inputs, fs, uploader).await {
        Ok(assets) => Some(assets),
        Err(e) => {
            reporter.report_failure(&e.to_string());
            None
        }
    }
}
