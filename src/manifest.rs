use std::path::PathBuf;

use crate::{asset::AssetDescriptor, error::UploadError};

const COLUMNS: [&str; 3] = ["path", "name", "content-type"];

/// Parses a tab-separated assets file: `path<TAB>name<TAB>content-type`
/// per line, no header.
///
/// A leading byte-order mark is dropped and the whole text is trimmed
/// before splitting on `\n`. Every line is checked before any descriptor
/// is built, so one bad line rejects the whole batch. An empty file is a
/// single empty line and is rejected too.
pub fn parse_manifest(raw: &str) -> Result<Vec<AssetDescriptor>, UploadError> {
    let rows: Vec<Vec<&str>> = raw
        .trim_start_matches('\u{feff}')
        .trim()
        .split('\n')
        .map(|line| line.split('\t').collect())
        .collect();

    for (index, fields) in rows.iter().enumerate() {
        if fields.len() != COLUMNS.len() {
            return Err(UploadError::MalformedManifest {
                line: index + 1,
                fields: fields.len(),
            });
        }
        if let Some(column) = fields.iter().position(|f| f.is_empty()) {
            return Err(UploadError::EmptyManifestField {
                line: index + 1,
                field: COLUMNS[column],
            });
        }
    }

    Ok(rows
        .into_iter()
        .map(|fields| AssetDescriptor {
            path: PathBuf::from(fields[0]),
            name: fields[1].to_string(),
            content_type: fields[2].to_string(),
        })
        .collect())
}
