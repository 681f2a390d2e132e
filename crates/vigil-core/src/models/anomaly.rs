//! Security anomaly domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::SecurityLevel;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    ExcessiveFailedAuthentication,
    PrivilegeEscalationPattern,
    UnusualAccessPattern,
}

impl AnomalyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExcessiveFailedAuthentication => "excessive_failed_authentication",
            Self::PrivilegeEscalationPattern => "privilege_escalation_pattern",
            Self::UnusualAccessPattern => "unusual_access_pattern",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pattern flagged by one of the threshold rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityAnomaly {
    pub id: Uuid,
    pub kind: AnomalyKind,
    pub description: String,
    pub security_level: SecurityLevel,
    /// Confidence in `[0, 1]`.
    pub confidence_score: f64,
    pub affected_user: Option<String>,
    pub mitigation_actions: Vec<String>,
    pub detected_at: DateTime<Utc>,
    /// Number of events that triggered the rule.
    pub supporting_events: usize,
}
