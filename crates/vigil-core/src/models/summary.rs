//! Aggregated security summary.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compliance::ComplianceFramework;
use super::event::{SecurityEventType, SecurityLevel};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecuritySummary {
    /// Trailing window in hours; `None` covers the full history.
    pub window_hours: Option<u32>,
    pub generated_at: Option<DateTime<Utc>>,
    pub total_events: usize,
    pub events_by_type: BTreeMap<SecurityEventType, usize>,
    pub events_by_level: BTreeMap<SecurityLevel, usize>,
    pub failed_authentications: usize,
    /// Events at `high` or `critical`.
    pub high_severity_events: usize,
    pub data_access_events: usize,
    pub audit_trails_created: usize,
    pub anomalies_detected: usize,
    pub compliance_frameworks: BTreeSet<ComplianceFramework>,
}

impl SecuritySummary {
    pub fn count_of(&self, event_type: SecurityEventType) -> usize {
        self.events_by_type.get(&event_type).copied().unwrap_or(0)
    }

    pub fn count_at(&self, level: SecurityLevel) -> usize {
        self.events_by_level.get(&level).copied().unwrap_or(0)
    }
}
