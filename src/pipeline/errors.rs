//! Structured errors for summary spec validation.

use super::error_code::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One problem found in a summary spec, located by a JSON pointer.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {}: {message}", display_path(.path))]
pub struct PipelineSpecError {
    pub code: ErrorCode,
    /// JSON pointer to the offending field (empty for the document root)
    pub path: String,
    pub message: String,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl PipelineSpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    /// Attach a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
