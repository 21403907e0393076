use anyhow::Result;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE},
};
use url::Url;

use crate::{
    asset::UploadRequest,
    error::UploadError,
    rest_types::{ApiErrorBody, ReleaseAsset},
};

const USER_AGENT: &str = concat!("upload-release-asset/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// The network side of an upload: one call per asset, no retries.
pub trait AssetUploader {
    async fn upload_asset(&self, request: UploadRequest) -> Result<ReleaseAsset, UploadError>;
}

pub struct ReleaseClient {
    client: Client,
    auth_token: Option<String>,
}

impl ReleaseClient {
    pub fn new(auth_token: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self::with_client(client, auth_token))
    }

    fn with_client(client: Client, auth_token: Option<String>) -> Self {
        Self { client, auth_token }
    }
}

impl AssetUploader for ReleaseClient {
    async fn upload_asset(&self, request: UploadRequest) -> Result<ReleaseAsset, UploadError> {
        let UploadRequest {
            url,
            name,
            content_type,
            content_length,
            file,
        } = request;

        let url = expand_upload_url(&url, &name)?;

        let mut builder = self
            .client
            .post(url)
            .header(ACCEPT, GITHUB_JSON)
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, content_length)
            .body(file);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| UploadError::Transport {
                name: name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::UploadRejected {
                name,
                status,
                message: api_error_message(&body),
            });
        }

        response
            .json::<ReleaseAsset>()
            .await
            .map_err(|source| UploadError::Transport { name, source })
    }
}

/// Parses a release upload URL, ignoring a trailing URI template such as
/// `{?name,label}`. Only http(s) URLs are accepted.
pub fn parse_upload_url(template: &str) -> Result<Url, UploadError> {
    let base = template
        .split_once('{')
        .map_or(template, |(base, _)| base);

    let invalid = |reason: String| UploadError::InvalidUploadUrl {
        url: template.to_string(),
        reason,
    };

    let url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    Ok(url)
}

/// Turns the upload URL handed out for a release into the URL for one
/// asset: `name` is set as a query parameter, replacing any `name` already
/// present.
pub fn expand_upload_url(template: &str, name: &str) -> Result<Url, UploadError> {
    let mut url = parse_upload_url(template)?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "name")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("name", name);

    Ok(url)
}

/// Best effort: the API's `message` plus any error codes, else the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => {
            let codes: Vec<String> = error
                .errors
                .iter()
                .filter_map(|detail| match (&detail.field, &detail.code) {
                    (Some(field), Some(code)) => Some(format!("{field} {code}")),
                    (None, Some(code)) => Some(code.clone()),
                    _ => detail.resource.clone(),
                })
                .collect();
            if codes.is_empty() {
                error.message
            } else {
                format!("{} ({})", error.message, codes.join(", "))
            }
        }
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
