//! Compliance evaluation over recorded events.
//!
//! SOC2, GDPR and ISO27001 have evaluation rules and are scored over
//! every event in the period; other frameworks only count the events
//! tagged with them and never report violations.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vigil_core::models::anomaly::{AnomalyKind, SecurityAnomaly};
use vigil_core::models::compliance::{
    ComplianceFramework, ComplianceReport, Violation, ViolationKind,
};
use vigil_core::models::event::{SecurityEvent, SecurityEventType, SecurityLevel};

use crate::config::EmptyPeriodPolicy;

pub const FAILURE_REASON_KEY: &str = "reason";
pub const CONSENT_KEY: &str = "consent_id";
pub const INCIDENT_KEY: &str = "incident_id";

/// Frameworks with a dedicated evaluation rule.
pub fn has_rules(framework: ComplianceFramework) -> bool {
    matches!(
        framework,
        ComplianceFramework::Soc2 | ComplianceFramework::Gdpr | ComplianceFramework::Iso27001
    )
}

/// Build a report for `framework` over `[start, end]` (inclusive).
///
/// The caller validates that `start <= end`.
pub fn evaluate(
    framework: ComplianceFramework,
    events: &[SecurityEvent],
    anomalies: &[SecurityAnomaly],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    policy: EmptyPeriodPolicy,
) -> ComplianceReport {
    let in_scope: Vec<&SecurityEvent> = events
        .iter()
        .filter(|e| e.within(start, end))
        .filter(|e| has_rules(framework) || e.is_tagged(framework))
        .collect();

    let mut violations: Vec<Violation> = in_scope
        .iter()
        .filter_map(|e| event_violation(framework, e))
        .collect();

    let non_compliant_events = violations
        .iter()
        .filter_map(|v| v.event_id)
        .collect::<BTreeSet<_>>()
        .len();

    violations.extend(anomaly_violations(framework, anomalies, start, end));

    let total_events = in_scope.len();
    let compliant_events = total_events - non_compliant_events;
    let compliance_score = if total_events == 0 {
        policy.score()
    } else {
        compliant_events as f64 / total_events as f64
    };

    let recommendations = recommendations(&violations, total_events);

    ComplianceReport {
        id: Uuid::new_v4(),
        framework,
        period_start: start,
        period_end: end,
        generated_at: Utc::now(),
        total_events,
        compliant_events,
        non_compliant_events,
        compliance_score,
        violations,
        recommendations,
    }
}

/// Per-event rule for `framework`, if any.
pub fn event_violation(framework: ComplianceFramework, event: &SecurityEvent) -> Option<Violation> {
    let (kind, severity, description) = match framework {
        ComplianceFramework::Soc2
            if event.event_type == SecurityEventType::AuthenticationFailure
                && !event.has_detail(FAILURE_REASON_KEY) =>
        {
            (
                ViolationKind::MissingFailureReason,
                SecurityLevel::Medium,
                "Authentication failure recorded without a failure reason",
            )
        }
        ComplianceFramework::Gdpr
            if event.event_type == SecurityEventType::SensitiveDataAccess
                && !event.has_detail(CONSENT_KEY) =>
        {
            (
                ViolationKind::MissingConsent,
                SecurityLevel::High,
                "Sensitive data accessed without a recorded consent id",
            )
        }
        ComplianceFramework::Iso27001
            if event.event_type == SecurityEventType::SecurityAlert
                && event.security_level.is_high_or_above()
                && !event.has_detail(INCIDENT_KEY) =>
        {
            (
                ViolationKind::UntrackedSecurityIncident,
                SecurityLevel::High,
                "High-severity security alert not linked to an incident record",
            )
        }
        _ => return None,
    };

    Some(Violation {
        kind,
        description: description.to_string(),
        severity,
        event_id: Some(event.id),
        count: None,
    })
}

/// Aggregate violations derived from anomalies detected in the period.
///
/// Anomalies may be recorded more than once for the same user (real-time
/// check plus explicit scans); the largest count per user wins.
fn anomaly_violations(
    framework: ComplianceFramework,
    anomalies: &[SecurityAnomaly],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Violation> {
    if !matches!(
        framework,
        ComplianceFramework::Soc2 | ComplianceFramework::Iso27001
    ) {
        return Vec::new();
    }

    let mut per_user: BTreeMap<&str, usize> = BTreeMap::new();
    for anomaly in anomalies.iter().filter(|a| {
        a.kind == AnomalyKind::ExcessiveFailedAuthentication
            && a.detected_at >= start
            && a.detected_at <= end
    }) {
        let user = anomaly.affected_user.as_deref().unwrap_or("unknown");
        let entry = per_user.entry(user).or_insert(0);
        *entry = (*entry).max(anomaly.supporting_events);
    }

    per_user
        .into_iter()
        .map(|(user, count)| Violation {
            kind: ViolationKind::ExcessiveFailedAuthentication,
            description: format!("Repeated failed authentication for user {user}"),
            severity: SecurityLevel::High,
            event_id: None,
            count: Some(count),
        })
        .collect()
}

fn recommendations(violations: &[Violation], total_events: usize) -> Vec<String> {
    let kinds: BTreeSet<ViolationKind> = violations.iter().map(|v| v.kind).collect();

    if kinds.is_empty() {
        let text = if total_events == 0 {
            "No events recorded for this period; verify that event collection is enabled"
        } else {
            "Controls are operating as expected; continue periodic review"
        };
        return vec![text.to_string()];
    }

    kinds
        .into_iter()
        .map(|kind| recommendation_for(kind).to_string())
        .collect()
}

fn recommendation_for(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::MissingFailureReason => {
            "Record a failure reason for every failed authentication attempt"
        }
        ViolationKind::MissingConsent => "Implement consent tracking for sensitive data access",
        ViolationKind::UntrackedSecurityIncident => {
            "Link high-severity security alerts to an incident record"
        }
        ViolationKind::ExcessiveFailedAuthentication => {
            "Enforce account lockout and MFA for accounts with repeated failed logins"
        }
    }
}
