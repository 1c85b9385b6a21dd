use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

use crate::utils::error_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Json,
    Html,
    Plaintext,
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentKind::Json => "json",
            ContentKind::Html => "html",
            ContentKind::Plaintext => "plaintext",
        };
        write!(f, "{s}")
    }
}

/// The outcome of one executed request. `status` is 0 when no response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: u16,
    pub data: String,
    pub duration_ms: u64,
    pub content_kind: ContentKind,
}

impl ExecutionResult {
    pub fn failure(message: &str) -> Self {
        ExecutionResult {
            status: 0,
            data: error_json(message),
            duration_ms: 0,
            content_kind: ContentKind::Json,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_failure(&self) -> bool {
        self.status == 0
    }
}

/// Classifies a response body and normalizes it for display.
///
/// JSON is re-serialized with 2-space indentation; anything else is returned
/// untouched as html or plaintext.
pub fn classify_body(text: String, content_type: &str) -> (ContentKind, String) {
    if let Ok(value) = serde_json::from_str::<Value>(&text) {
        if let Ok(pretty) = serde_json::to_string_pretty(&value) {
            return (ContentKind::Json, pretty);
        }
    }

    if content_type.to_ascii_lowercase().contains("html") || text.trim_start().starts_with('<') {
        (ContentKind::Html, text)
    } else {
        (ContentKind::Plaintext, text)
    }
}
