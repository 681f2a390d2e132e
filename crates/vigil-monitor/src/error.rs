//! Input validation error types.

use thiserror::Error;
use vigil_core::error::VigilError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("user id must be 1-100 characters of letters, digits, '@', '.', '_' or '-'")]
    InvalidUserId,

    #[error("resource must be 1-500 characters of letters, digits, '/', '_', '.' or '-' without '..'")]
    InvalidResource,

    #[error("'{0}' is not a valid IP address")]
    InvalidIpAddress(String),

    #[error("period start is after period end")]
    InvalidTimeRange,
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidUserId => "user_id",
            Self::InvalidResource => "resource",
            Self::InvalidIpAddress(_) => "source_ip",
            Self::InvalidTimeRange => "period",
        }
    }
}

impl From<ValidationError> for VigilError {
    fn from(err: ValidationError) -> Self {
        VigilError::InvalidInput {
            field: err.field().into(),
            reason: err.to_string(),
        }
    }
}
