//! Security summary aggregation.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use vigil_core::models::anomaly::SecurityAnomaly;
use vigil_core::models::audit::AuditTrail;
use vigil_core::models::event::{SecurityEvent, SecurityEventType};
use vigil_core::models::summary::SecuritySummary;

/// Aggregate everything recorded at or after `now - window_hours`.
/// `None`, or a window reaching past the earliest representable time,
/// covers the whole history.
///
/// Anomalies are counted once per kind and user, since the real-time
/// check and a later scan can both record the same burst.
pub fn summarize(
    events: &[SecurityEvent],
    audits: &[AuditTrail],
    anomalies: &[SecurityAnomaly],
    window_hours: Option<u32>,
    now: DateTime<Utc>,
) -> SecuritySummary {
    let since = window_hours.and_then(|h| window_start(now, h));
    let in_window = |ts: DateTime<Utc>| since.is_none_or(|s| ts >= s);

    let mut summary = SecuritySummary {
        window_hours,
        generated_at: Some(now),
        ..Default::default()
    };

    for event in events.iter().filter(|e| in_window(e.timestamp)) {
        summary.total_events += 1;
        *summary.events_by_type.entry(event.event_type).or_insert(0) += 1;
        *summary
            .events_by_level
            .entry(event.security_level)
            .or_insert(0) += 1;

        if event.event_type == SecurityEventType::AuthenticationFailure {
            summary.failed_authentications += 1;
        }
        if event.security_level.is_high_or_above() {
            summary.high_severity_events += 1;
        }
        if event.event_type.is_data_access() {
            summary.data_access_events += 1;
        }
        summary
            .compliance_frameworks
            .extend(event.compliance_frameworks.iter().copied());
    }

    for audit in audits.iter().filter(|a| in_window(a.timestamp)) {
        summary.audit_trails_created += 1;
        summary
            .compliance_frameworks
            .extend(audit.compliance_frameworks.iter().copied());
    }

    summary.anomalies_detected = anomalies
        .iter()
        .filter(|a| in_window(a.detected_at))
        .map(|a| (a.kind, a.affected_user.as_deref()))
        .collect::<BTreeSet<_>>()
        .len();

    summary
}

fn window_start(now: DateTime<Utc>, hours: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(TimeDelta::try_hours(i64::from(hours))?)
}
