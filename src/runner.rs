use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::debug;

use crate::http::HttpClient;
use crate::request::{RequestConfig, Side};
use crate::response::{ContentKind, ExecutionResult};

/// Syntax mode shared by every view of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Json,
    Html,
}

impl DisplayFormat {
    /// `html` if either side is html, otherwise `json`. Plaintext reuses json mode.
    pub fn derive(a: &ExecutionResult, b: &ExecutionResult) -> Self {
        if a.content_kind == ContentKind::Html || b.content_kind == ContentKind::Html {
            DisplayFormat::Html
        } else {
            DisplayFormat::Json
        }
    }
}

impl Display for DisplayFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayFormat::Json => write!(f, "json"),
            DisplayFormat::Html => write!(f, "html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairedResults {
    pub result_a: ExecutionResult,
    pub result_b: ExecutionResult,
    pub display_format: DisplayFormat,
}

impl PairedResults {
    pub fn new(result_a: ExecutionResult, result_b: ExecutionResult) -> Self {
        let display_format = DisplayFormat::derive(&result_a, &result_b);
        PairedResults {
            result_a,
            result_b,
            display_format,
        }
    }

    pub fn get(&self, side: Side) -> &ExecutionResult {
        match side {
            Side::A => &self.result_a,
            Side::B => &self.result_b,
        }
    }

    pub fn bodies_match(&self) -> bool {
        self.result_a.data == self.result_b.data
    }
}

/// Runs both configs concurrently, each on its own task.
///
/// Neither side waits for or cancels the other. The only error is a task
/// that failed to complete, which callers treat as a generic run failure.
pub async fn run_pair(
    client: &HttpClient,
    config_a: RequestConfig,
    config_b: RequestConfig,
) -> Result<PairedResults> {
    let client_a = client.clone();
    let client_b = client.clone();

    let task_a = tokio::spawn(async move { client_a.execute(&config_a).await });
    let task_b = tokio::spawn(async move { client_b.execute(&config_b).await });

    let (result_a, result_b) = tokio::join!(task_a, task_b);
    let result_a = result_a.context("Request task for A did not complete")?;
    let result_b = result_b.context("Request task for B did not complete")?;

    debug!(
        status_a = result_a.status,
        status_b = result_b.status,
        "both requests settled"
    );

    Ok(PairedResults::new(result_a, result_b))
}
