//! Dashboard provisioning error types.

use thiserror::Error;
use vigil_core::error::VigilError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to serialize dashboard body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("provisioner error: {0}")]
    Provisioner(String),
}

impl From<DashboardError> for VigilError {
    fn from(err: DashboardError) -> Self {
        VigilError::Provisioning(err.to_string())
    }
}
