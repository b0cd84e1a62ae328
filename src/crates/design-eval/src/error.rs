//! Error types for design evaluation.

use llm::LlmError;
use thiserror::Error;

/// Result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Errors surfaced by [`crate::GraphicDesignEvaluator`] and its helpers.
///
/// Every failure reaches the caller of `evaluate` directly; none are retried.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Neither a design principle nor a custom prompt was usable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A principle name did not match any built-in principle.
    #[error("Unknown design principle '{0}' (expected alignment, overlap or whitespace)")]
    UnknownPrinciple(String),

    /// A system prompt template could not embed the evaluative instruction.
    #[error("Template error: {0}")]
    Template(String),

    /// The LLM client failed. Passed through as reported by the client.
    #[error(transparent)]
    Upstream(#[from] LlmError),

    /// The model reply was not a `{score, explanation}` JSON object.
    #[error("Failed to parse model response: {reason}")]
    ResponseParse {
        /// What was wrong with the reply.
        reason: String,
        /// The raw reply text.
        raw: String,
    },

    /// The image payload could not be read or encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration file or value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EvalError {
    pub(crate) fn parse(reason: impl Into<String>, raw: &str) -> Self {
        EvalError::ResponseParse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Whether the failure came from the LLM client rather than this crate.
    pub fn is_upstream(&self) -> bool {
        matches!(self, EvalError::Upstream(_))
    }
}

impl From<image::ImageError> for EvalError {
    fn from(err: image::ImageError) -> Self {
        EvalError::Image(err.to_string())
    }
}

impl From<toml::de::Error> for EvalError {
    fn from(err: toml::de::Error) -> Self {
        EvalError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for EvalError {
    fn from(err: serde_yaml::Error) -> Self {
        EvalError::Config(err.to_string())
    }
}
