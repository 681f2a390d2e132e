//! Compliance framework and report domain model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::SecurityLevel;
use crate::error::VigilError;

/// Supported compliance frameworks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFramework {
    Soc2,
    Gdpr,
    Hipaa,
    PciDss,
    Iso27001,
    Nist,
}

impl ComplianceFramework {
    pub const ALL: [ComplianceFramework; 6] = [
        Self::Soc2,
        Self::Gdpr,
        Self::Hipaa,
        Self::PciDss,
        Self::Iso27001,
        Self::Nist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soc2 => "soc2",
            Self::Gdpr => "gdpr",
            Self::Hipaa => "hipaa",
            Self::PciDss => "pci_dss",
            Self::Iso27001 => "iso27001",
            Self::Nist => "nist",
        }
    }
}

impl fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceFramework {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                VigilError::invalid_input("framework", format!("unknown framework '{s}'"))
            })
    }
}

/// Kind of compliance violation found while evaluating a framework.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingFailureReason,
    MissingConsent,
    UntrackedSecurityIncident,
    ExcessiveFailedAuthentication,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingFailureReason => "missing_failure_reason",
            Self::MissingConsent => "missing_consent",
            Self::UntrackedSecurityIncident => "untracked_security_incident",
            Self::ExcessiveFailedAuthentication => "excessive_failed_authentication",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub description: String,
    pub severity: SecurityLevel,
    /// The offending event, for per-event violations.
    pub event_id: Option<Uuid>,
    /// Number of supporting events, for aggregate violations.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub id: Uuid,
    pub framework: ComplianceFramework,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub total_events: usize,
    pub compliant_events: usize,
    pub non_compliant_events: usize,
    /// `compliant_events / total_events`; the empty-period value is a
    /// configured policy.
    pub compliance_score: f64,
    pub violations: Vec<Violation>,
    pub recommendations: Vec<String>,
}

impl ComplianceReport {
    /// Occurrences per violation kind. Aggregate records contribute their
    /// `count`, per-event records contribute one each.
    pub fn violation_counts(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.kind).or_insert(0) += v.count.unwrap_or(1);
        }
        counts
    }

    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}
