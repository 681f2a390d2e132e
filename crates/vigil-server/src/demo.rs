//! Scripted security session used by the binary.

use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};
use tracing::info;
use vigil_core::error::VigilResult;
use vigil_core::models::anomaly::SecurityAnomaly;
use vigil_core::models::compliance::{ComplianceFramework, ComplianceReport};
use vigil_core::models::event::SecurityLevel;
use vigil_core::models::summary::SecuritySummary;
use vigil_core::sink::{LogSink, MetricsSink};
use vigil_monitor::{
    AuthenticationEvent, AuthorizationEvent, DataAccessEvent, NewAuditTrail, SecurityAlert,
    SecurityMonitor,
};

/// Frameworks reported on at the end of the session.
pub const REPORTED_FRAMEWORKS: [ComplianceFramework; 3] = [
    ComplianceFramework::Soc2,
    ComplianceFramework::Gdpr,
    ComplianceFramework::Iso27001,
];

/// Everything the session produced.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub anomalies: Vec<SecurityAnomaly>,
    pub reports: Vec<ComplianceReport>,
    pub summary: SecuritySummary,
}

fn detail(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

/// Replay a short session: a brute-force burst against one account,
/// normal analyst activity, a configuration change and an alert.
pub fn run_scenario<L: LogSink, M: MetricsSink>(
    monitor: &SecurityMonitor<L, M>,
) -> VigilResult<ScenarioOutcome> {
    let started = Utc::now();

    monitor.log_authentication_event(AuthenticationEvent {
        user_id: "analyst@example.com".into(),
        success: true,
        source_ip: Some("10.20.0.15".into()),
        user_agent: Some("vigil-demo/0.1".into()),
        session_id: Some("sess-analyst".into()),
        ..Default::default()
    })?;

    for attempt in 1..=6 {
        monitor.log_authentication_event(AuthenticationEvent {
            user_id: "trader-07".into(),
            success: false,
            source_ip: Some("203.0.113.42".into()),
            details: detail("attempt", json!(attempt)),
            ..Default::default()
        })?;
    }

    monitor.log_authorization_event(AuthorizationEvent {
        user_id: "analyst@example.com".into(),
        resource: "/portfolios/growth-fund".into(),
        action: "read".into(),
        success: true,
        session_id: Some("sess-analyst".into()),
        ..Default::default()
    })?;

    monitor.log_data_access_event(DataAccessEvent {
        user_id: "analyst@example.com".into(),
        resource: "/customers/4711/statements".into(),
        action: "read".into(),
        is_sensitive: true,
        details: detail("consent_id", json!("consent-4711-2026")),
        ..Default::default()
    })?;
    monitor.log_data_access_event(DataAccessEvent {
        user_id: "analyst@example.com".into(),
        resource: "/customers/5120/statements".into(),
        action: "read".into(),
        is_sensitive: true,
        ..Default::default()
    })?;

    monitor.create_audit_trail(NewAuditTrail {
        user_id: "ops-admin".into(),
        action: "update".into(),
        resource: "/config/agents/risk-limits".into(),
        resource_type: "configuration".into(),
        old_value: Some(json!({ "max_position_usd": 250_000 })),
        new_value: Some(json!({ "max_position_usd": 500_000 })),
        compliance_frameworks: vec![ComplianceFramework::Soc2],
        ..Default::default()
    })?;

    monitor.log_security_alert(SecurityAlert {
        alert_type: "brute_force".into(),
        description: "Repeated failed sign-ins for trader-07".into(),
        security_level: SecurityLevel::High,
        user_id: Some("trader-07".into()),
        source_ip: Some("203.0.113.42".into()),
        ..Default::default()
    })?;

    let anomalies = monitor.detect_anomalies();

    let ended = Utc::now() + Duration::seconds(1);
    let reports = REPORTED_FRAMEWORKS
        .into_iter()
        .map(|framework| monitor.generate_compliance_report(framework, started, ended))
        .collect::<VigilResult<Vec<_>>>()?;

    let summary = monitor.security_summary_default();
    info!(
        events = summary.total_events,
        anomalies = anomalies.len(),
        "Scenario complete"
    );

    Ok(ScenarioOutcome {
        anomalies,
        reports,
        summary,
    })
}
