//! Audit trail domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::compliance::ComplianceFramework;

/// Seven years, the retention most frameworks ask for.
pub const DEFAULT_RETENTION_DAYS: u32 = 2557;

/// A before/after change record attributed to an actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditTrail {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_email: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_type: String,
    /// Snapshot before the change, stored verbatim.
    pub old_value: Option<serde_json::Value>,
    /// Snapshot after the change, stored verbatim.
    pub new_value: Option<serde_json::Value>,
    pub source_ip: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub compliance_frameworks: Vec<ComplianceFramework>,
    pub retention_period_days: u32,
}

impl AuditTrail {
    /// Earliest instant at which the entry may be discarded.
    pub fn retain_until(&self) -> DateTime<Utc> {
        self.timestamp + chrono::Duration::days(i64::from(self.retention_period_days))
    }
}
