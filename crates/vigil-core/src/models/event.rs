//! Security event domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::compliance::ComplianceFramework;

/// Category of a recorded security event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    AuthenticationSuccess,
    AuthenticationFailure,
    AuthorizationSuccess,
    AuthorizationFailure,
    DataAccess,
    SensitiveDataAccess,
    ConfigurationChange,
    PrivilegeEscalation,
    SuspiciousActivity,
    ComplianceViolation,
    SecurityAlert,
}

impl SecurityEventType {
    pub const ALL: [SecurityEventType; 11] = [
        Self::AuthenticationSuccess,
        Self::AuthenticationFailure,
        Self::AuthorizationSuccess,
        Self::AuthorizationFailure,
        Self::DataAccess,
        Self::SensitiveDataAccess,
        Self::ConfigurationChange,
        Self::PrivilegeEscalation,
        Self::SuspiciousActivity,
        Self::ComplianceViolation,
        Self::SecurityAlert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationSuccess => "authentication_success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::AuthorizationSuccess => "authorization_success",
            Self::AuthorizationFailure => "authorization_failure",
            Self::DataAccess => "data_access",
            Self::SensitiveDataAccess => "sensitive_data_access",
            Self::ConfigurationChange => "configuration_change",
            Self::PrivilegeEscalation => "privilege_escalation",
            Self::SuspiciousActivity => "suspicious_activity",
            Self::ComplianceViolation => "compliance_violation",
            Self::SecurityAlert => "security_alert",
        }
    }

    /// Compliance frameworks every event of this type is tagged with.
    ///
    /// Tags are fixed at creation time; sensitivity is already encoded
    /// in the type (`SensitiveDataAccess` always carries GDPR).
    pub fn compliance_frameworks(self) -> &'static [ComplianceFramework] {
        use ComplianceFramework::*;
        match self {
            Self::AuthenticationSuccess
            | Self::AuthenticationFailure
            | Self::AuthorizationSuccess
            | Self::AuthorizationFailure
            | Self::ConfigurationChange => &[Soc2, Iso27001],
            Self::DataAccess => &[Soc2],
            Self::SensitiveDataAccess => &[Soc2, Gdpr],
            Self::PrivilegeEscalation => &[Soc2, Iso27001, Nist],
            Self::SuspiciousActivity | Self::SecurityAlert => &[Soc2, Nist],
            Self::ComplianceViolation => &[Soc2],
        }
    }

    /// Lowest severity an event of this type may be recorded at.
    pub fn minimum_level(self) -> SecurityLevel {
        match self {
            Self::SensitiveDataAccess => SecurityLevel::High,
            _ => SecurityLevel::Low,
        }
    }

    pub fn is_authorization(self) -> bool {
        matches!(
            self,
            Self::AuthorizationSuccess | Self::AuthorizationFailure
        )
    }

    /// Plain and sensitive data access both count as data access.
    pub fn is_data_access(self) -> bool {
        matches!(self, Self::DataAccess | Self::SensitiveDataAccess)
    }
}

impl fmt::Display for SecurityEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity classification. Variants are ordered from least to most
/// severe so levels can be compared directly.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn is_high_or_above(self) -> bool {
        self >= Self::High
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventResult {
    #[default]
    Success,
    Failure,
}

impl EventResult {
    pub fn from_success(success: bool) -> Self {
        if success { Self::Success } else { Self::Failure }
    }
}

/// A recorded security event. Append-only once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    pub id: Uuid,
    pub event_type: SecurityEventType,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub result: EventResult,
    pub security_level: SecurityLevel,
    /// Free-form key-value details supplied by the caller.
    pub details: serde_json::Map<String, serde_json::Value>,
    pub compliance_frameworks: Vec<ComplianceFramework>,
}

impl SecurityEvent {
    pub fn has_detail(&self, key: &str) -> bool {
        self.details.contains_key(key)
    }

    pub fn is_tagged(&self, framework: ComplianceFramework) -> bool {
        self.compliance_frameworks.contains(&framework)
    }

    /// Inclusive range check on the event timestamp.
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.timestamp >= start && self.timestamp <= end
    }
}
