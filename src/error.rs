use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a run can fail. The `Display` text is the message handed to
/// the failure reporter, so it has to read well on its own.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(String),

    #[error(
        "Assets from file seem broken, it must contain 3 columns for every line (line {line} has {fields})"
    )]
    MalformedManifest { line: usize, fields: usize },

    #[error("Assets from file seem broken, line {line} has an empty {field} column")]
    EmptyManifestField { line: usize, field: &'static str },

    #[error("Assets file {} is not valid UTF-8", path.display())]
    ManifestEncoding { path: PathBuf },

    #[error("{}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid upload URL '{url}': {reason}")]
    InvalidUploadUrl { url: String, reason: String },

    #[error("Failed to upload {name}: {status} - {message}")]
    UploadRejected {
        name: String,
        status: StatusCode,
        message: String,
    },

    #[error("Failed to upload {name}: {source}")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UploadError {
    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        UploadError::FileAccess {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_manifest_message_names_the_column_rule() {
        let err = UploadError::MalformedManifest { line: 1, fields: 2 };
        assert!(
            err.to_string()
                .starts_with("Assets from file seem broken, it must contain 3 columns for every line")
        );
    }

    #[test]
    fn file_access_message_includes_path() {
        let err = UploadError::file_access(
            "dist/app.tar.gz",
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert_eq!(err.to_string(), "dist/app.tar.gz: No such file or directory");
    }

    #[test]
    fn rejected_upload_message() {
        let err = UploadError::UploadRejected {
            name: "app.zip".to_string(),
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Validation Failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to upload app.zip: 422 Unprocessable Entity - Validation Failed"
        );
    }
}
