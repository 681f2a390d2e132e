//! Vigil Dashboards — security overview and compliance dashboards plus
//! the alarm set, built from the metrics the monitor emits.

pub mod config;
pub mod definitions;
pub mod error;
pub mod provision;

pub use config::DashboardConfig;
pub use definitions::{AlarmDefinition, DashboardDefinition};
pub use error::DashboardError;
pub use provision::{DashboardProvisioner, ProvisioningOutcome, provision_all};
