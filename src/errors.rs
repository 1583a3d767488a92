//! Error types for biased_lexrank

use crate::pipeline::errors::PipelineSpecError;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LexRankError>;

/// Errors surfaced by ranking, selection and configuration
#[derive(Debug, Error)]
pub enum LexRankError {
    /// Malformed topic or sentence data, or mismatched artifacts
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A configuration option outside its domain
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Power iteration hit its iteration cap before converging
    #[error(
        "power iteration did not converge after {iterations} iterations \
         (delta {delta:e}, epsilon {epsilon:e})"
    )]
    Convergence {
        iterations: usize,
        delta: f64,
        epsilon: f64,
    },

    /// A summary spec document failed validation
    #[error("invalid summary spec: {}", join_spec_errors(.0))]
    InvalidSpec(Vec<PipelineSpecError>),

    /// A summary spec document could not be parsed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LexRankError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

fn join_spec_errors(errors: &[PipelineSpecError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
