//! Error types for the Vigil system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Provisioning failed: {0}")]
    Provisioning(String),
}

impl VigilError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by caller-supplied data.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

pub type VigilResult<T> = Result<T, VigilError>;
