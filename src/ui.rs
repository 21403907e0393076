use std::env;

use iocraft::prelude::*;

use crate::rest_types::ReleaseAsset;

/// Receives the single message describing why a run failed.
pub trait FailureReporter {
    fn report_failure(&self, message: &str);
}

pub struct ConsoleReporter {
    in_workflow: bool,
}

impl ConsoleReporter {
    pub fn from_env() -> Self {
        Self {
            in_workflow: running_in_workflow(),
        }
    }
}

impl FailureReporter for ConsoleReporter {
    fn report_failure(&self, message: &str) {
        if self.in_workflow {
            println!("{}", workflow_error_command(message));
        } else {
            element!(ErrorMessage(message: message.to_string())).print();
        }
    }
}

/// Unwraps a setup result, reporting the error the same way a failed
/// upload is reported.
pub fn report_on_error<T, R>(result: anyhow::Result<T>, reporter: &R) -> Option<T>
where
    R: FailureReporter,
{
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            reporter.report_failure(&format!("{e:#}"));
            None
        }
    }
}

pub fn running_in_workflow() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// `::error::` workflow command, which marks the step as failed in the run log.
pub fn workflow_error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

#[derive(Default, Props)]
pub struct ErrorMessageProps {
    pub message: String,
}

#[component]
pub fn ErrorMessage(props: &ErrorMessageProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Row) {
            Text(color: Color::Red, weight: Weight::Bold, content: "✗ ")
            Text(content: props.message.clone())
        }
    }
}

#[derive(Default, Props)]
pub struct UploadSummaryProps {
    pub assets: Vec<ReleaseAsset>,
}

#[component]
pub fn UploadSummary(props: &UploadSummaryProps) -> impl Into<AnyElement<'static>> {
    element! {
        View(flex_direction: FlexDirection::Column) {
            #(props.assets.iter().map(|asset| {
                element! {
                    View(flex_direction: FlexDirection::Row) {
                        Text(color: Color::Green, content: "◆ ")
                        Text(weight: Weight::Bold, content: asset.name.clone())
                        Text(content: format!(" ({} bytes) {}", asset.size, asset.browser_download_url))
                    }
                }
            }))
        }
    }
}
