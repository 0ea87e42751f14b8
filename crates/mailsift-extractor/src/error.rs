//! Error types for the extraction engine

use mailsift_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Extraction service failed transiently; the conversation is retried
    /// on a later run.
    #[error("Extraction service error: {0}")]
    Provider(String),

    /// The primary tier is structurally unusable (not configured, model or
    /// credentials rejected); the fallback tier takes over.
    #[error("Extraction service unavailable: {0}")]
    Unavailable(String),

    /// The service call exceeded the configured per-call ceiling
    #[error("Extraction timed out")]
    Timeout,

    /// Body exceeds the configured maximum length
    #[error("Body too long: {0} chars (max: {1})")]
    BodyTooLong(usize, usize),

    /// The service reply was not the expected JSON shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// True for failures that mean the primary tier cannot work at all,
    /// as opposed to a transient fault worth retrying next run.
    pub fn is_structural(&self) -> bool {
        matches!(self, ExtractError::Unavailable(_))
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::JsonParse(e.to_string())
    }
}

impl From<LlmError> for ExtractError {
    fn from(e: LlmError) -> Self {
        if e.is_unavailable() {
            ExtractError::Unavailable(e.to_string())
        } else {
            ExtractError::Provider(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_classification() {
        let e: ExtractError = LlmError::ModelNotAvailable("m".into()).into();
        assert!(e.is_structural());

        let e: ExtractError = LlmError::Communication("refused".into()).into();
        assert!(!e.is_structural());
        assert!(matches!(e, ExtractError::Provider(_)));
    }
}
