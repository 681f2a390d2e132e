//! Vigil Monitor — the in-memory security event store.
//!
//! Records security events and audit trails, flags threshold-based
//! anomalies, scores events against compliance frameworks and builds
//! summaries. Delivery to log and metrics backends goes through the
//! sink traits from `vigil-core`.

pub mod anomaly;
pub mod compliance;
pub mod config;
pub mod error;
pub mod monitor;
pub mod sink;
pub mod summary;
pub mod validation;

pub use config::{AnomalyThresholds, EmptyPeriodPolicy, Environment, MonitorConfig};
pub use error::ValidationError;
pub use monitor::{
    AuditFilter, AuthenticationEvent, AuthorizationEvent, DataAccessEvent, EventFilter,
    NewAuditTrail, NewSecurityEvent, SecurityAlert, SecurityMonitor,
};
