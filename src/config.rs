use std::collections::HashMap;

use serde::Deserialize;

use crate::error::UploadError;

pub const UPLOAD_URL: &str = "upload_url";
pub const ASSETS_FROM_FILE: &str = "assets_from_file";
pub const ASSET_PATH: &str = "asset_path";
pub const ASSET_NAME: &str = "asset_name";
pub const ASSET_CONTENT_TYPE: &str = "asset_content_type";

/// Where named inputs come from. Values are trimmed; a required input
/// that is missing or blank is an error, an optional one is `""`.
pub trait InputSource {
    fn get_input(&self, name: &str, required: bool) -> Result<String, UploadError>;
}

/// Inputs as a workflow runner passes them: `INPUT_UPLOAD_URL` and so on.
#[derive(Debug, Deserialize, Default)]
pub struct InputsEnv {
    pub upload_url: Option<String>,
    pub assets_from_file: Option<String>,
    pub asset_path: Option<String>,
    pub asset_name: Option<String>,
    pub asset_content_type: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Inputs {
    values: HashMap<String, String>,
}

impl Inputs {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl InputSource for Inputs {
    fn get_input(&self, name: &str, required: bool) -> Result<String, UploadError> {
        let value = self
            .values
            .get(name)
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        if required && value.is_empty() {
            return Err(UploadError::MissingInput(name.to_string()));
        }

        Ok(value)
    }
}

/// Command-line values win over the environment.
pub fn merge_inputs(base: InputsEnv, override_inputs: InputsEnv) -> Inputs {
    let pairs = [
        (UPLOAD_URL, override_inputs.upload_url.or(base.upload_url)),
        (
            ASSETS_FROM_FILE,
            override_inputs.assets_from_file.or(base.assets_from_file),
        ),
        (ASSET_PATH, override_inputs.asset_path.or(base.asset_path)),
        (ASSET_NAME, override_inputs.asset_name.or(base.asset_name)),
        (
            ASSET_CONTENT_TYPE,
            override_inputs
                .asset_content_type
                .or(base.asset_content_type),
        ),
    ];

    Inputs::from_pairs(
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v))),
    )
}

/// Reads `INPUT_*` variables; expects `.env` to have been loaded already.
pub fn read_inputs(cli: InputsEnv) -> Inputs {
    let env_inputs = envy::prefixed("INPUT_")
        .from_env::<InputsEnv>()
        .unwrap_or_default();

    merge_inputs(env_inputs, cli)
}
