//! Threshold-based anomaly rules.
//!
//! Every rule is a pure read over the event history. Rules group by
//! user id and ignore events without one; results are ordered by rule
//! and then by user id.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use uuid::Uuid;
use vigil_core::models::anomaly::{AnomalyKind, SecurityAnomaly};
use vigil_core::models::event::{SecurityEvent, SecurityEventType, SecurityLevel};

use crate::config::AnomalyThresholds;

/// Authorization action that marks a privilege escalation attempt.
pub const PRIVILEGE_ESCALATION_ACTION: &str = "privilege_escalation";

/// Run every rule over `events`.
pub fn detect(events: &[SecurityEvent], thresholds: &AnomalyThresholds) -> Vec<SecurityAnomaly> {
    let mut anomalies = excessive_failed_authentication(events, thresholds.failed_auth_threshold);
    anomalies.extend(privilege_escalation_pattern(
        events,
        thresholds.privilege_escalation_threshold,
    ));
    anomalies.extend(unusual_access_pattern(
        events,
        thresholds.distinct_resource_threshold,
    ));
    anomalies
}

pub fn excessive_failed_authentication(
    events: &[SecurityEvent],
    threshold: usize,
) -> Vec<SecurityAnomaly> {
    count_by_user(
        events
            .iter()
            .filter(|e| e.event_type == SecurityEventType::AuthenticationFailure),
    )
    .into_iter()
    .filter(|(_, count)| *count > threshold)
    .map(|(user, count)| failed_authentication_anomaly(user, count))
    .collect()
}

/// Real-time variant of the failed-authentication rule for one user.
///
/// Fires only when the user's failure count is exactly one past the
/// threshold, so a burst of failures is reported once.
pub fn check_failed_authentication(
    events: &[SecurityEvent],
    user_id: &str,
    threshold: usize,
) -> Option<SecurityAnomaly> {
    let count = events
        .iter()
        .filter(|e| {
            e.event_type == SecurityEventType::AuthenticationFailure
                && e.user_id.as_deref() == Some(user_id)
        })
        .count();
    (count == threshold + 1).then(|| failed_authentication_anomaly(user_id, count))
}

pub fn privilege_escalation_pattern(
    events: &[SecurityEvent],
    threshold: usize,
) -> Vec<SecurityAnomaly> {
    count_by_user(events.iter().filter(|e| is_privilege_escalation(e)))
        .into_iter()
        .filter(|(_, count)| *count > threshold)
        .map(|(user, count)| {
            let security_level = if count > threshold * 2 {
                SecurityLevel::Critical
            } else {
                SecurityLevel::High
            };
            anomaly(
                AnomalyKind::PrivilegeEscalationPattern,
                format!("{count} privilege escalation attempts by user {user}"),
                security_level,
                0.8,
                user,
                count,
                &[
                    "Review recent role and permission changes",
                    "Revoke unneeded elevated privileges",
                    "Require approval for privilege escalation",
                ],
            )
        })
        .collect()
}

pub fn unusual_access_pattern(events: &[SecurityEvent], threshold: usize) -> Vec<SecurityAnomaly> {
    let mut resources: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.event_type.is_data_access()) {
        if let (Some(user), Some(resource)) = (event.user_id.as_deref(), event.resource.as_deref())
        {
            resources.entry(user).or_default().insert(resource);
        }
    }

    resources
        .into_iter()
        .filter(|(_, accessed)| accessed.len() > threshold)
        .map(|(user, accessed)| {
            anomaly(
                AnomalyKind::UnusualAccessPattern,
                format!("User {user} accessed {} distinct resources", accessed.len()),
                SecurityLevel::Medium,
                0.7,
                user,
                accessed.len(),
                &[
                    "Confirm the access pattern with the user's manager",
                    "Apply least-privilege data access policies",
                    "Enable data loss prevention monitoring",
                ],
            )
        })
        .collect()
}

fn is_privilege_escalation(event: &SecurityEvent) -> bool {
    event.event_type == SecurityEventType::PrivilegeEscalation
        || (event.event_type.is_authorization()
            && event.action.as_deref() == Some(PRIVILEGE_ESCALATION_ACTION))
}

fn count_by_user<'a>(events: impl Iterator<Item = &'a SecurityEvent>) -> BTreeMap<&'a str, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        if let Some(user) = event.user_id.as_deref() {
            *counts.entry(user).or_insert(0) += 1;
        }
    }
    counts
}

fn failed_authentication_anomaly(user: &str, count: usize) -> SecurityAnomaly {
    anomaly(
        AnomalyKind::ExcessiveFailedAuthentication,
        format!("{count} failed authentication attempts for user {user}"),
        SecurityLevel::High,
        0.9,
        user,
        count,
        &[
            "Lock the account temporarily",
            "Require MFA for the next sign-in",
            "Review source IP addresses of the attempts",
        ],
    )
}

fn anomaly(
    kind: AnomalyKind,
    description: String,
    security_level: SecurityLevel,
    confidence_score: f64,
    user: &str,
    supporting_events: usize,
    mitigations: &[&str],
) -> SecurityAnomaly {
    SecurityAnomaly {
        id: Uuid::new_v4(),
        kind,
        description,
        security_level,
        confidence_score,
        affected_user: Some(user.to_string()),
        mitigation_actions: mitigations.iter().map(|m| m.to_string()).collect(),
        detected_at: Utc::now(),
        supporting_events,
    }
}
