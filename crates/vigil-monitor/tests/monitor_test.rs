//! Integration tests for the security monitor.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Map, Value, json};
use vigil_core::error::VigilError;
use vigil_core::models::anomaly::AnomalyKind;
use vigil_core::models::compliance::{ComplianceFramework, ViolationKind};
use vigil_core::models::event::{EventResult, SecurityEventType, SecurityLevel};
use vigil_core::sink::{LogRecord, LogSink, RecordKind, SinkError};
use vigil_monitor::sink::{MemoryLogSink, MemoryMetricsSink, NoopLogSink, NoopMetricsSink};
use vigil_monitor::{
    AuditFilter, AuthenticationEvent, AuthorizationEvent, DataAccessEvent, EmptyPeriodPolicy,
    EventFilter, MonitorConfig, NewAuditTrail, NewSecurityEvent, SecurityAlert, SecurityMonitor,
};

type TestMonitor = SecurityMonitor<Arc<MemoryLogSink>, Arc<MemoryMetricsSink>>;

fn setup_with(config: MonitorConfig) -> (TestMonitor, Arc<MemoryLogSink>, Arc<MemoryMetricsSink>) {
    let logs = Arc::new(MemoryLogSink::new());
    let metrics = Arc::new(MemoryMetricsSink::new());
    let monitor = SecurityMonitor::new(config, logs.clone(), metrics.clone());
    (monitor, logs, metrics)
}

fn setup() -> (TestMonitor, Arc<MemoryLogSink>, Arc<MemoryMetricsSink>) {
    setup_with(MonitorConfig::default())
}

fn login(user_id: &str, success: bool) -> AuthenticationEvent {
    AuthenticationEvent {
        user_id: user_id.into(),
        success,
        source_ip: Some("192.168.1.100".into()),
        ..Default::default()
    }
}

fn details(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn window() -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let now = Utc::now();
    (now - Duration::hours(1), now + Duration::hours(1))
}

struct FailingLogSink;

impl LogSink for FailingLogSink {
    fn emit(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Err(SinkError::Unavailable("log service down".into()))
    }
}

// ---------------------------------------------------------------------------
// Event logging
// ---------------------------------------------------------------------------

#[test]
fn authentication_events_have_expected_type_and_severity() {
    let (monitor, _, _) = setup();

    let ok = monitor
        .log_authentication_event(login("alice@example.com", true))
        .unwrap();
    let failed = monitor
        .log_authentication_event(login("alice@example.com", false))
        .unwrap();
    assert_ne!(ok, failed);
    assert_eq!(monitor.event_count(), 2);

    let events = monitor.security_events(EventFilter::default());
    assert_eq!(events[0].id, ok);
    assert_eq!(events[0].event_type, SecurityEventType::AuthenticationSuccess);
    assert_eq!(events[0].security_level, SecurityLevel::Low);
    assert_eq!(events[0].result, EventResult::Success);
    assert_eq!(events[1].event_type, SecurityEventType::AuthenticationFailure);
    assert_eq!(events[1].security_level, SecurityLevel::Medium);
    assert_eq!(events[1].result, EventResult::Failure);
    assert!(events[1].is_tagged(ComplianceFramework::Soc2));
    assert!(events[1].is_tagged(ComplianceFramework::Iso27001));
}

#[test]
fn authorization_event_keeps_resource_and_action() {
    let (monitor, _, _) = setup();
    monitor
        .log_authorization_event(AuthorizationEvent {
            user_id: "bob".into(),
            resource: "/api/agents/42".into(),
            action: "delete".into(),
            success: false,
            ..Default::default()
        })
        .unwrap();

    let event = &monitor.security_events(EventFilter::default())[0];
    assert_eq!(event.event_type, SecurityEventType::AuthorizationFailure);
    assert_eq!(event.security_level, SecurityLevel::Medium);
    assert_eq!(event.resource.as_deref(), Some("/api/agents/42"));
    assert_eq!(event.action.as_deref(), Some("delete"));
}

#[test]
fn sensitive_data_access_is_high_and_gdpr_tagged() {
    let (monitor, _, _) = setup();
    monitor
        .log_data_access_event(DataAccessEvent {
            user_id: "carol".into(),
            resource: "/data/customers/pii".into(),
            action: "read".into(),
            is_sensitive: true,
            ..Default::default()
        })
        .unwrap();
    monitor
        .log_data_access_event(DataAccessEvent {
            user_id: "carol".into(),
            resource: "/data/reports/weekly".into(),
            action: "read".into(),
            ..Default::default()
        })
        .unwrap();

    let events = monitor.security_events(EventFilter::default());
    assert_eq!(events[0].event_type, SecurityEventType::SensitiveDataAccess);
    assert_eq!(events[0].security_level, SecurityLevel::High);
    assert!(events[0].is_tagged(ComplianceFramework::Gdpr));
    assert_eq!(events[1].event_type, SecurityEventType::DataAccess);
    assert_eq!(events[1].security_level, SecurityLevel::Low);
    assert!(!events[1].is_tagged(ComplianceFramework::Gdpr));
}

#[test]
fn security_alert_folds_type_and_description_into_details() {
    let (monitor, _, _) = setup();
    monitor
        .log_security_alert(SecurityAlert {
            alert_type: "brute_force".into(),
            description: "Repeated failures from one address".into(),
            security_level: SecurityLevel::Critical,
            source_ip: Some("10.0.0.7".into()),
            ..Default::default()
        })
        .unwrap();

    let event = &monitor.security_events(EventFilter::default())[0];
    assert_eq!(event.event_type, SecurityEventType::SecurityAlert);
    assert_eq!(event.security_level, SecurityLevel::Critical);
    assert_eq!(event.details["alert_type"], json!("brute_force"));
    assert_eq!(
        event.details["description"],
        json!("Repeated failures from one address")
    );
    assert!(event.user_id.is_none());
}

#[test]
fn generic_event_accepts_any_type() {
    let (monitor, _, _) = setup();
    monitor
        .log_security_event(NewSecurityEvent {
            user_id: Some("ops-admin".into()),
            resource: Some("/config/agents.yaml".into()),
            ..NewSecurityEvent::new(SecurityEventType::ConfigurationChange, SecurityLevel::Medium)
        })
        .unwrap();

    let event = &monitor.security_events(EventFilter::default())[0];
    assert_eq!(event.event_type, SecurityEventType::ConfigurationChange);
    assert!(event.is_tagged(ComplianceFramework::Iso27001));
}

#[test]
fn generic_sensitive_access_is_raised_to_high() {
    let (monitor, _, metrics) = setup();
    monitor
        .log_security_event(NewSecurityEvent {
            user_id: Some("carol".into()),
            resource: Some("/data/customers/pii".into()),
            ..NewSecurityEvent::new(SecurityEventType::SensitiveDataAccess, SecurityLevel::Low)
        })
        .unwrap();
    monitor
        .log_security_event(NewSecurityEvent::new(
            SecurityEventType::SensitiveDataAccess,
            SecurityLevel::Critical,
        ))
        .unwrap();

    let events = monitor.security_events(EventFilter::default());
    assert_eq!(events[0].security_level, SecurityLevel::High);
    assert_eq!(events[1].security_level, SecurityLevel::Critical);
    assert_eq!(metrics.data()[0].dimension("SecurityLevel"), Some("high"));
}

#[test]
fn details_are_sanitized() {
    let (monitor, _, _) = setup();
    let long = "x".repeat(2000);
    monitor
        .log_authentication_event(AuthenticationEvent {
            details: details(&[
                ("reason", json!("bad\u{0}password\n")),
                ("blob", json!(long)),
                ("attempt", json!(3)),
            ]),
            ..login("alice", false)
        })
        .unwrap();

    let event = &monitor.security_events(EventFilter::default())[0];
    assert_eq!(event.details["reason"], json!("badpassword"));
    assert_eq!(event.details["blob"].as_str().unwrap().len(), 1024);
    assert_eq!(event.details["attempt"], json!(3));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn script_user_id_is_rejected_without_side_effects() {
    let (monitor, logs, metrics) = setup();
    let err = monitor
        .log_authentication_event(login("<script>", false))
        .unwrap_err();
    assert!(matches!(err, VigilError::InvalidInput { ref field, .. } if field == "user_id"));
    assert_eq!(monitor.event_count(), 0);
    assert!(logs.is_empty());
    assert!(metrics.data().is_empty());
}

#[test]
fn traversal_resource_is_rejected() {
    let (monitor, _, _) = setup();
    let err = monitor
        .log_authorization_event(AuthorizationEvent {
            user_id: "bob".into(),
            resource: "/data/../etc/passwd".into(),
            action: "read".into(),
            success: true,
            ..Default::default()
        })
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(monitor.event_count(), 0);
}

#[test]
fn empty_resource_is_rejected_for_authorization() {
    let (monitor, _, _) = setup();
    let result = monitor.log_authorization_event(AuthorizationEvent {
        user_id: "bob".into(),
        action: "read".into(),
        ..Default::default()
    });
    assert!(result.unwrap_err().is_invalid_input());
}

#[test]
fn malformed_source_ip_is_rejected() {
    let (monitor, _, _) = setup();
    let err = monitor
        .log_authentication_event(AuthenticationEvent {
            source_ip: Some("999.1.1.1".into()),
            ..login("alice", true)
        })
        .unwrap_err();
    assert!(matches!(err, VigilError::InvalidInput { ref field, .. } if field == "source_ip"));
    assert_eq!(monitor.event_count(), 0);
}

#[test]
fn invalid_audit_trail_is_rejected() {
    let (monitor, _, _) = setup();
    let err = monitor
        .create_audit_trail(NewAuditTrail {
            user_id: "ops admin".into(),
            action: "update".into(),
            resource: "/config/main".into(),
            resource_type: "configuration".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(monitor.audit_count(), 0);
}

// ---------------------------------------------------------------------------
// Audit trails
// ---------------------------------------------------------------------------

#[test]
fn audit_trail_keeps_snapshots_and_dedupes_tags() {
    let (monitor, logs, metrics) = setup();
    let id = monitor
        .create_audit_trail(NewAuditTrail {
            user_id: "ops-admin".into(),
            action: "update".into(),
            resource: "/config/agents/retry".into(),
            resource_type: "configuration".into(),
            old_value: Some(json!({"max_retries": 3})),
            new_value: Some(json!({"max_retries": 5})),
            compliance_frameworks: vec![
                ComplianceFramework::Soc2,
                ComplianceFramework::Gdpr,
                ComplianceFramework::Soc2,
            ],
            ..Default::default()
        })
        .unwrap();

    let audits = monitor.audit_trails(AuditFilter::default());
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].id, id);
    assert_eq!(audits[0].old_value, Some(json!({"max_retries": 3})));
    assert_eq!(audits[0].new_value, Some(json!({"max_retries": 5})));
    assert_eq!(
        audits[0].compliance_frameworks,
        vec![ComplianceFramework::Soc2, ComplianceFramework::Gdpr]
    );
    assert_eq!(audits[0].retention_period_days, 2557);

    let records = logs.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, RecordKind::AuditTrail);
    assert_eq!(records[0].group, "/vigil/audit/development");
    assert_eq!(metrics.total("AuditTrailEntries"), 1.0);
    assert_eq!(
        metrics.data()[0].dimension("ResourceType"),
        Some("configuration")
    );
}

#[test]
fn audit_retention_follows_config() {
    let (monitor, _, _) = setup_with(MonitorConfig {
        audit_retention_days: 365,
        ..Default::default()
    });
    monitor
        .create_audit_trail(NewAuditTrail {
            user_id: "ops-admin".into(),
            action: "delete".into(),
            resource: "/users/42".into(),
            resource_type: "user".into(),
            ..Default::default()
        })
        .unwrap();
    let audit = &monitor.audit_trails(AuditFilter::default())[0];
    assert_eq!(audit.retention_period_days, 365);
    assert_eq!(audit.retain_until(), audit.timestamp + Duration::days(365));
}

// ---------------------------------------------------------------------------
// Sinks and metrics
// ---------------------------------------------------------------------------

#[test]
fn events_are_forwarded_and_counted() {
    let (monitor, logs, metrics) = setup();
    monitor.log_authentication_event(login("alice", true)).unwrap();
    monitor.log_authentication_event(login("alice", false)).unwrap();

    let records = logs.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.kind == RecordKind::SecurityEvent));
    assert!(records.iter().all(|r| r.group == "/vigil/security/development"));
    assert_eq!(
        records[1].payload["event_type"],
        json!("authentication_failure")
    );

    assert_eq!(metrics.total("SecurityEvents"), 2.0);
    let failure = &metrics.data()[1];
    assert_eq!(failure.dimension("EventType"), Some("authentication_failure"));
    assert_eq!(failure.dimension("SecurityLevel"), Some("medium"));
}

#[test]
fn failing_log_sink_still_retains_record() {
    let monitor = SecurityMonitor::new(MonitorConfig::default(), FailingLogSink, NoopMetricsSink);
    let id = monitor.log_authentication_event(login("alice", true)).unwrap();
    assert_eq!(monitor.event_count(), 1);
    assert_eq!(monitor.security_events(EventFilter::default())[0].id, id);
}

#[test]
fn disabled_metrics_are_not_recorded() {
    let (monitor, _, metrics) = setup_with(MonitorConfig {
        metrics_enabled: false,
        ..Default::default()
    });
    monitor.log_authentication_event(login("alice", true)).unwrap();
    let (start, end) = window();
    monitor
        .generate_compliance_report(ComplianceFramework::Soc2, start, end)
        .unwrap();
    assert!(metrics.data().is_empty());
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

#[test]
fn retrieval_filters_and_limits() {
    let (monitor, _, _) = setup();
    for _ in 0..3 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    let last_bob = (0..4)
        .map(|_| monitor.log_authentication_event(login("bob", true)).unwrap())
        .last()
        .unwrap();

    let bob = monitor.security_events(EventFilter {
        user_id: Some("bob".into()),
        ..Default::default()
    });
    assert_eq!(bob.len(), 4);

    let failures = monitor.security_events(EventFilter {
        event_type: Some(SecurityEventType::AuthenticationFailure),
        ..Default::default()
    });
    assert_eq!(failures.len(), 3);

    let recent = monitor.security_events(EventFilter {
        limit: 2,
        ..Default::default()
    });
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[1].id, last_bob);
    assert!(recent[0].timestamp <= recent[1].timestamp);
}

#[test]
fn zero_limit_returns_nothing() {
    let (monitor, _, _) = setup();
    monitor.log_authentication_event(login("alice", true)).unwrap();
    let events = monitor.security_events(EventFilter {
        limit: 0,
        ..Default::default()
    });
    assert!(events.is_empty());
    assert_eq!(monitor.event_count(), 1);
}

#[test]
fn audit_retrieval_filters_by_resource_type() {
    let (monitor, _, _) = setup();
    for (resource, resource_type) in [("/users/1", "user"), ("/config/a", "configuration")] {
        monitor
            .create_audit_trail(NewAuditTrail {
                user_id: "ops-admin".into(),
                action: "update".into(),
                resource: resource.into(),
                resource_type: resource_type.into(),
                ..Default::default()
            })
            .unwrap();
    }
    let users = monitor.audit_trails(AuditFilter {
        resource_type: Some("user".into()),
        ..Default::default()
    });
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].resource, "/users/1");
}

// ---------------------------------------------------------------------------
// Anomaly detection
// ---------------------------------------------------------------------------

#[test]
fn six_failures_yield_one_anomaly() {
    let (monitor, _, _) = setup();
    for _ in 0..6 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    let found = monitor.detect_anomalies();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, AnomalyKind::ExcessiveFailedAuthentication);
    assert_eq!(found[0].confidence_score, 0.9);
    assert_eq!(found[0].affected_user.as_deref(), Some("alice"));
}

#[test]
fn five_failures_yield_none() {
    let (monitor, _, _) = setup();
    for _ in 0..5 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    assert!(monitor.detect_anomalies().is_empty());
    assert!(monitor.anomalies().is_empty());
}

#[test]
fn realtime_check_records_anomaly_while_logging() {
    let (monitor, _, _) = setup();
    for _ in 0..7 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    let recorded = monitor.anomalies();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].supporting_events, 6);
}

#[test]
fn realtime_check_can_be_disabled() {
    let (monitor, _, _) = setup_with(MonitorConfig {
        realtime_detection: false,
        ..Default::default()
    });
    for _ in 0..7 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    assert!(monitor.anomalies().is_empty());
    assert_eq!(monitor.detect_anomalies().len(), 1);
    assert_eq!(monitor.anomalies().len(), 1);
}

#[test]
fn privilege_escalation_and_unusual_access_are_detected() {
    let (monitor, _, _) = setup();
    for _ in 0..4 {
        monitor
            .log_authorization_event(AuthorizationEvent {
                user_id: "mallory".into(),
                resource: "/admin/roles".into(),
                action: "privilege_escalation".into(),
                success: false,
                ..Default::default()
            })
            .unwrap();
    }
    for i in 0..21 {
        monitor
            .log_data_access_event(DataAccessEvent {
                user_id: "bob".into(),
                resource: format!("/data/records/{i}"),
                action: "read".into(),
                ..Default::default()
            })
            .unwrap();
    }

    let kinds: Vec<_> = monitor.detect_anomalies().into_iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AnomalyKind::PrivilegeEscalationPattern,
            AnomalyKind::UnusualAccessPattern,
        ]
    );
}

// ---------------------------------------------------------------------------
// Compliance
// ---------------------------------------------------------------------------

#[test]
fn soc2_flags_failure_without_reason() {
    let (monitor, _, metrics) = setup();
    monitor.log_authentication_event(login("alice", false)).unwrap();
    let (start, end) = window();

    let report = monitor
        .generate_compliance_report(ComplianceFramework::Soc2, start, end)
        .unwrap();
    assert_eq!(report.total_events, 1);
    assert_eq!(report.non_compliant_events, 1);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::MissingFailureReason);
    assert!(report.compliance_score < 1.0);
    assert_eq!(metrics.total("ComplianceScore"), 0.0);
    assert_eq!(metrics.data()[1].dimension("Framework"), Some("soc2"));
}

#[test]
fn soc2_accepts_failure_with_reason() {
    let (monitor, _, _) = setup();
    monitor
        .log_authentication_event(AuthenticationEvent {
            details: details(&[("reason", json!("invalid_password"))]),
            ..login("alice", false)
        })
        .unwrap();
    monitor.log_authentication_event(login("alice", true)).unwrap();
    let (start, end) = window();

    let report = monitor
        .generate_compliance_report(ComplianceFramework::Soc2, start, end)
        .unwrap();
    assert_eq!(report.total_events, 2);
    assert_eq!(report.compliant_events, 2);
    assert!(report.violations.is_empty());
    assert_eq!(report.compliance_score, 1.0);
}

#[test]
fn gdpr_flags_sensitive_access_without_consent() {
    let (monitor, _, _) = setup();
    for consent in [None, Some("c-123")] {
        let details = consent
            .map(|c| details(&[("consent_id", json!(c))]))
            .unwrap_or_default();
        monitor
            .log_data_access_event(DataAccessEvent {
                user_id: "carol".into(),
                resource: "/data/customers/pii".into(),
                action: "read".into(),
                is_sensitive: true,
                details,
                ..Default::default()
            })
            .unwrap();
    }
    let (start, end) = window();

    let report = monitor
        .generate_compliance_report(ComplianceFramework::Gdpr, start, end)
        .unwrap();
    assert_eq!(report.total_events, 2);
    assert_eq!(report.non_compliant_events, 1);
    assert!(report.has_violation(ViolationKind::MissingConsent));
    assert_eq!(report.compliance_score, 0.5);
    assert!(
        report
            .recommendations
            .iter()
            .any(|r| r.contains("consent tracking"))
    );
}

#[test]
fn iso27001_flags_untracked_high_alerts() {
    let (monitor, _, _) = setup();
    monitor
        .log_security_alert(SecurityAlert {
            alert_type: "intrusion".into(),
            description: "Unexpected shell on host".into(),
            security_level: SecurityLevel::High,
            ..Default::default()
        })
        .unwrap();
    let (start, end) = window();

    let report = monitor
        .generate_compliance_report(ComplianceFramework::Iso27001, start, end)
        .unwrap();
    assert!(report.has_violation(ViolationKind::UntrackedSecurityIncident));
}

#[test]
fn empty_period_scores_by_policy() {
    let (monitor, _, _) = setup();
    let (start, end) = window();
    let report = monitor
        .generate_compliance_report(ComplianceFramework::Hipaa, start, end)
        .unwrap();
    assert_eq!(report.total_events, 0);
    assert_eq!(report.compliance_score, 1.0);

    let (strict, _, _) = setup_with(MonitorConfig {
        empty_period_policy: EmptyPeriodPolicy::NonCompliant,
        ..Default::default()
    });
    let report = strict
        .generate_compliance_report(ComplianceFramework::Hipaa, start, end)
        .unwrap();
    assert_eq!(report.compliance_score, 0.0);
}

#[test]
fn out_of_range_events_are_excluded() {
    let (monitor, _, _) = setup();
    monitor.log_authentication_event(login("alice", false)).unwrap();
    let end = Utc::now() - Duration::hours(1);
    let start = end - Duration::hours(1);

    let report = monitor
        .generate_compliance_report(ComplianceFramework::Soc2, start, end)
        .unwrap();
    assert_eq!(report.total_events, 0);
}

#[test]
fn inverted_period_is_rejected() {
    let (monitor, _, _) = setup();
    let (start, end) = window();
    let err = monitor
        .generate_compliance_report(ComplianceFramework::Soc2, end, start)
        .unwrap_err();
    assert!(err.is_invalid_input());
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[test]
fn scripted_session_summary() {
    let (monitor, _, _) = setup();
    monitor.log_authentication_event(login("alice", true)).unwrap();
    monitor.log_authentication_event(login("alice", false)).unwrap();
    monitor
        .log_authorization_event(AuthorizationEvent {
            user_id: "alice".into(),
            resource: "/api/agents".into(),
            action: "list".into(),
            success: true,
            ..Default::default()
        })
        .unwrap();
    monitor
        .log_data_access_event(DataAccessEvent {
            user_id: "alice".into(),
            resource: "/data/customers/pii".into(),
            action: "read".into(),
            is_sensitive: true,
            ..Default::default()
        })
        .unwrap();
    monitor
        .log_security_alert(SecurityAlert {
            alert_type: "suspicious_login".into(),
            description: "Login from new country".into(),
            security_level: SecurityLevel::High,
            user_id: Some("alice".into()),
            ..Default::default()
        })
        .unwrap();

    let summary = monitor.security_summary_default();
    assert_eq!(summary.window_hours, Some(24));
    assert_eq!(summary.total_events, 5);
    assert_eq!(summary.failed_authentications, 1);
    assert_eq!(summary.high_severity_events, 2);
    assert_eq!(summary.data_access_events, 1);
    assert_eq!(summary.count_of(SecurityEventType::SecurityAlert), 1);
    assert!(
        summary
            .compliance_frameworks
            .contains(&ComplianceFramework::Gdpr)
    );

    let all = monitor.security_summary(None);
    assert_eq!(all.total_events, 5);
}

#[test]
fn summary_counts_audits_and_anomalies() {
    let monitor = SecurityMonitor::new(MonitorConfig::default(), NoopLogSink, NoopMetricsSink);
    for _ in 0..6 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    monitor
        .create_audit_trail(NewAuditTrail {
            user_id: "ops-admin".into(),
            action: "update".into(),
            resource: "/config/main".into(),
            resource_type: "configuration".into(),
            compliance_frameworks: vec![ComplianceFramework::Hipaa],
            ..Default::default()
        })
        .unwrap();

    let summary = monitor.security_summary(Some(1));
    assert_eq!(summary.audit_trails_created, 1);
    assert_eq!(summary.anomalies_detected, 1);
    assert!(
        summary
            .compliance_frameworks
            .contains(&ComplianceFramework::Hipaa)
    );
}

#[test]
fn summary_accepts_oversized_window() {
    let (monitor, _, _) = setup();
    monitor.log_authentication_event(login("alice", true)).unwrap();

    let summary = monitor.security_summary(Some(u32::MAX));
    assert_eq!(summary.window_hours, Some(u32::MAX));
    assert_eq!(summary.total_events, 1);
}

#[test]
fn burst_seen_twice_counts_once_in_summary() {
    let (monitor, _, _) = setup();
    for _ in 0..6 {
        monitor.log_authentication_event(login("alice", false)).unwrap();
    }
    assert_eq!(monitor.detect_anomalies().len(), 1);
    assert_eq!(monitor.anomalies().len(), 2);

    assert_eq!(monitor.security_summary(None).anomalies_detected, 1);
}
