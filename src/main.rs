use std::{io, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use dotenvy::dotenv;
use iocraft::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::{
    client::ReleaseClient,
    config::InputsEnv,
    fs::LocalFs,
    ui::{ConsoleReporter, UploadSummary, report_on_error},
};

mod asset;
mod batch;
mod client;
mod config;
mod error;
mod fs;
mod manifest;
mod rest_types;
#[cfg(test)]
mod testing;
mod ui;

/// Upload assets to a GitHub release.
///
/// Every option can also be given as a workflow input, i.e. an
/// `INPUT_<NAME>` environment variable such as `INPUT_UPLOAD_URL`.
#[derive(Parser)]
#[command(name = "upload-release-asset")]
#[command(version)]
struct Cli {
    /// Upload URL of the release (may be a `{?name,label}` template)
    #[arg(long, value_hint = ValueHint::Url)]
    upload_url: Option<String>,
    /// Tab-separated file of `path<TAB>name<TAB>content-type` lines
    #[arg(long, value_hint = ValueHint::FilePath)]
    assets_from_file: Option<String>,
    /// Path of the single asset to upload
    #[arg(long, value_hint = ValueHint::FilePath)]
    asset_path: Option<String>,
    /// Name to register the asset under
    #[arg(long)]
    asset_name: Option<String>,
    /// Content type of the asset, e.g. application/zip
    #[arg(long)]
    asset_content_type: Option<String>,
    /// API token used for the upload
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn inputs(&self) -> InputsEnv {
        InputsEnv {
            upload_url: self.upload_url.clone(),
            assets_from_file: self.assets_from_file.clone(),
            asset_path: self.asset_path.clone(),
            asset_name: self.asset_name.clone(),
            asset_content_type: self.asset_content_type.clone(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _ = dotenv();
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let reporter = ConsoleReporter::from_env();
    let inputs = config::read_inputs(cli.inputs());
    let client = ReleaseClient::new(cli.token).context("Failed to build HTTP client");
    let Some(client) = report_on_error(client, &reporter) else {
        return Ok(ExitCode::FAILURE);
    };

    let uploaded = rt.block_on(batch::execute(&inputs, &LocalFs, &client, &reporter));

    match uploaded {
        Some(assets) => {
            element!(UploadSummary(assets: assets)).print();
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .with_ansi(!ui::running_in_workflow())
        .with_target(false)
        .init();
}
