//! The security monitor service: event and audit recording, anomaly
//! scans, compliance reports and summaries.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;
use vigil_core::error::VigilResult;
use vigil_core::models::anomaly::SecurityAnomaly;
use vigil_core::models::audit::AuditTrail;
use vigil_core::models::compliance::{ComplianceFramework, ComplianceReport};
use vigil_core::models::event::{EventResult, SecurityEvent, SecurityEventType, SecurityLevel};
use vigil_core::models::summary::SecuritySummary;
use vigil_core::sink::{LogRecord, LogSink, MetricDatum, MetricsSink, RecordKind};

use crate::anomaly;
use crate::compliance;
use crate::config::MonitorConfig;
use crate::error::ValidationError;
use crate::summary;
use crate::validation;

/// Default number of records returned by the retrieval methods.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Generic event input used by every typed logging call.
#[derive(Debug, Clone)]
pub struct NewSecurityEvent {
    pub event_type: SecurityEventType,
    pub security_level: SecurityLevel,
    pub result: EventResult,
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub details: Map<String, Value>,
}

impl NewSecurityEvent {
    pub fn new(event_type: SecurityEventType, security_level: SecurityLevel) -> Self {
        Self {
            event_type,
            security_level,
            result: EventResult::Success,
            user_id: None,
            user_email: None,
            source_ip: None,
            user_agent: None,
            session_id: None,
            trace_id: None,
            resource: None,
            action: None,
            details: Map::new(),
        }
    }
}

/// Input for [`SecurityMonitor::log_authentication_event`].
#[derive(Debug, Clone, Default)]
pub struct AuthenticationEvent {
    pub user_id: String,
    pub success: bool,
    pub user_email: Option<String>,
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub details: Map<String, Value>,
}

/// Input for [`SecurityMonitor::log_authorization_event`].
#[derive(Debug, Clone, Default)]
pub struct AuthorizationEvent {
    pub user_id: String,
    pub resource: String,
    pub action: String,
    pub success: bool,
    pub user_email: Option<String>,
    pub source_ip: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub details: Map<String, Value>,
}

/// Input for [`SecurityMonitor::log_data_access_event`].
#[derive(Debug, Clone, Default)]
pub struct DataAccessEvent {
    pub user_id: String,
    pub resource: String,
    pub action: String,
    pub is_sensitive: bool,
    pub user_email: Option<String>,
    pub source_ip: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub details: Map<String, Value>,
}

/// Input for [`SecurityMonitor::create_audit_trail`].
#[derive(Debug, Clone, Default)]
pub struct NewAuditTrail {
    pub user_id: String,
    pub user_email: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_type: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub source_ip: Option<String>,
    pub session_id: Option<String>,
    pub trace_id: Option<String>,
    pub compliance_frameworks: Vec<ComplianceFramework>,
}

/// Input for [`SecurityMonitor::log_security_alert`].
#[derive(Debug, Clone, Default)]
pub struct SecurityAlert {
    pub alert_type: String,
    pub description: String,
    pub security_level: SecurityLevel,
    pub user_id: Option<String>,
    pub resource: Option<String>,
    pub source_ip: Option<String>,
    pub details: Map<String, Value>,
}

/// Filter for [`SecurityMonitor::security_events`].
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub event_type: Option<SecurityEventType>,
    pub user_id: Option<String>,
    /// Maximum number of most recent matches returned. `0` returns none.
    pub limit: usize,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            event_type: None,
            user_id: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Filter for [`SecurityMonitor::audit_trails`].
#[derive(Debug, Clone)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    pub resource_type: Option<String>,
    /// Maximum number of most recent matches returned. `0` returns none.
    pub limit: usize,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_type: None,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

#[derive(Debug, Default)]
struct MonitorState {
    events: Vec<SecurityEvent>,
    audits: Vec<AuditTrail>,
    anomalies: Vec<SecurityAnomaly>,
}

/// In-memory security event store.
///
/// Generic over its sinks so the engine has no dependency on a concrete
/// log or metrics backend. All lists sit behind one lock; sink calls are
/// made after the lock is released and never fail the operation.
pub struct SecurityMonitor<L: LogSink, M: MetricsSink> {
    config: MonitorConfig,
    log_sink: L,
    metrics_sink: M,
    security_log_group: String,
    audit_log_group: String,
    state: RwLock<MonitorState>,
}

impl<L: LogSink, M: MetricsSink> SecurityMonitor<L, M> {
    pub fn new(config: MonitorConfig, log_sink: L, metrics_sink: M) -> Self {
        let security_log_group = config.security_log_group();
        let audit_log_group = config.audit_log_group();
        info!(
            environment = %config.environment,
            security_log_group = %security_log_group,
            audit_log_group = %audit_log_group,
            "Security monitor initialized"
        );
        Self {
            config,
            log_sink,
            metrics_sink,
            security_log_group,
            audit_log_group,
            state: RwLock::new(MonitorState::default()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Event and audit logging
    // -----------------------------------------------------------------------

    /// Record a security event of any type.
    ///
    /// User id, resource and source IP are validated when present; on
    /// failure nothing is recorded. The severity is raised to the type's
    /// [`minimum_level`](SecurityEventType::minimum_level) if lower.
    pub fn log_security_event(&self, input: NewSecurityEvent) -> VigilResult<Uuid> {
        validation::validate_actor(
            input.user_id.as_deref(),
            input.resource.as_deref(),
            input.source_ip.as_deref(),
        )?;

        let event = SecurityEvent {
            id: Uuid::new_v4(),
            event_type: input.event_type,
            timestamp: Utc::now(),
            user_id: input.user_id,
            user_email: input.user_email,
            source_ip: input.source_ip,
            user_agent: input.user_agent,
            session_id: input.session_id,
            trace_id: input.trace_id,
            resource: input.resource,
            action: input.action,
            result: input.result,
            security_level: input.security_level.max(input.event_type.minimum_level()),
            details: validation::sanitize_details(input.details),
            compliance_frameworks: input.event_type.compliance_frameworks().to_vec(),
        };

        let realtime = {
            let mut state = self.state.write();
            state.events.push(event.clone());
            self.realtime_check(&mut state, &event)
        };

        info!(
            event_id = %event.id,
            event_type = %event.event_type,
            security_level = %event.security_level,
            "Security event logged"
        );

        self.forward(RecordKind::SecurityEvent, &self.security_log_group, &event);
        self.count(
            MetricDatum::count("SecurityEvents", 1.0)
                .with_dimension("EventType", event.event_type.as_str())
                .with_dimension("SecurityLevel", event.security_level.as_str()),
        );
        if let Some(anomaly) = realtime {
            warn!(
                anomaly_id = %anomaly.id,
                kind = %anomaly.kind,
                user = anomaly.affected_user.as_deref().unwrap_or_default(),
                "Anomaly detected while logging"
            );
        }

        Ok(event.id)
    }

    /// Record a login attempt. Failures are `medium`, successes `low`.
    pub fn log_authentication_event(&self, input: AuthenticationEvent) -> VigilResult<Uuid> {
        let (event_type, level) = if input.success {
            (SecurityEventType::AuthenticationSuccess, SecurityLevel::Low)
        } else {
            (SecurityEventType::AuthenticationFailure, SecurityLevel::Medium)
        };

        self.log_security_event(NewSecurityEvent {
            result: EventResult::from_success(input.success),
            user_id: Some(input.user_id),
            user_email: input.user_email,
            source_ip: input.source_ip,
            user_agent: input.user_agent,
            session_id: input.session_id,
            trace_id: input.trace_id,
            details: input.details,
            ..NewSecurityEvent::new(event_type, level)
        })
    }

    /// Record an access-control decision on a resource.
    pub fn log_authorization_event(&self, input: AuthorizationEvent) -> VigilResult<Uuid> {
        let (event_type, level) = if input.success {
            (SecurityEventType::AuthorizationSuccess, SecurityLevel::Low)
        } else {
            (SecurityEventType::AuthorizationFailure, SecurityLevel::Medium)
        };
        validation::validate_resource(&input.resource)?;

        self.log_security_event(NewSecurityEvent {
            result: EventResult::from_success(input.success),
            user_id: Some(input.user_id),
            user_email: input.user_email,
            source_ip: input.source_ip,
            session_id: input.session_id,
            trace_id: input.trace_id,
            resource: Some(input.resource),
            action: Some(input.action),
            details: input.details,
            ..NewSecurityEvent::new(event_type, level)
        })
    }

    /// Record a data read or write. Sensitive access is always `high`
    /// and tagged for GDPR.
    pub fn log_data_access_event(&self, input: DataAccessEvent) -> VigilResult<Uuid> {
        let (event_type, level) = if input.is_sensitive {
            (SecurityEventType::SensitiveDataAccess, SecurityLevel::High)
        } else {
            (SecurityEventType::DataAccess, SecurityLevel::Low)
        };
        validation::validate_resource(&input.resource)?;

        self.log_security_event(NewSecurityEvent {
            user_id: Some(input.user_id),
            user_email: input.user_email,
            source_ip: input.source_ip,
            session_id: input.session_id,
            trace_id: input.trace_id,
            resource: Some(input.resource),
            action: Some(input.action),
            details: input.details,
            ..NewSecurityEvent::new(event_type, level)
        })
    }

    /// Record an alert at the caller's severity. `alert_type` and
    /// `description` are stored in the details under those keys.
    pub fn log_security_alert(&self, input: SecurityAlert) -> VigilResult<Uuid> {
        let mut details = input.details;
        details.insert("alert_type".into(), Value::String(input.alert_type));
        details.insert("description".into(), Value::String(input.description));

        self.log_security_event(NewSecurityEvent {
            user_id: input.user_id,
            source_ip: input.source_ip,
            resource: input.resource,
            details,
            ..NewSecurityEvent::new(SecurityEventType::SecurityAlert, input.security_level)
        })
    }

    /// Record a before/after change. Snapshots are kept verbatim.
    pub fn create_audit_trail(&self, input: NewAuditTrail) -> VigilResult<Uuid> {
        validation::validate_user_id(&input.user_id)?;
        validation::validate_resource(&input.resource)?;
        if let Some(ip) = input.source_ip.as_deref() {
            validation::validate_ip_address(ip)?;
        }

        let mut frameworks = Vec::with_capacity(input.compliance_frameworks.len());
        for framework in input.compliance_frameworks {
            if !frameworks.contains(&framework) {
                frameworks.push(framework);
            }
        }

        let audit = AuditTrail {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: input.user_id,
            user_email: input.user_email,
            action: input.action,
            resource: input.resource,
            resource_type: input.resource_type,
            old_value: input.old_value,
            new_value: input.new_value,
            source_ip: input.source_ip,
            session_id: input.session_id,
            trace_id: input.trace_id,
            compliance_frameworks: frameworks,
            retention_period_days: self.config.audit_retention_days,
        };

        self.state.write().audits.push(audit.clone());

        info!(
            audit_id = %audit.id,
            action = %audit.action,
            resource_type = %audit.resource_type,
            "Audit trail created"
        );

        self.forward(RecordKind::AuditTrail, &self.audit_log_group, &audit);
        self.count(
            MetricDatum::count("AuditTrailEntries", 1.0)
                .with_dimension("ResourceType", &audit.resource_type),
        );

        Ok(audit.id)
    }

    // -----------------------------------------------------------------------
    // Anomalies, compliance, summaries
    // -----------------------------------------------------------------------

    /// Run every anomaly rule over the retained history. Results are
    /// returned and appended to the anomaly list.
    pub fn detect_anomalies(&self) -> Vec<SecurityAnomaly> {
        let found = {
            let state = self.state.read();
            debug!(events = state.events.len(), "Scanning events for anomalies");
            anomaly::detect(&state.events, &self.config.anomaly)
        };

        for a in &found {
            warn!(
                anomaly_id = %a.id,
                kind = %a.kind,
                severity = %a.security_level,
                user = a.affected_user.as_deref().unwrap_or_default(),
                confidence = a.confidence_score,
                "Security anomaly detected"
            );
        }

        if !found.is_empty() {
            self.state.write().anomalies.extend(found.iter().cloned());
        }
        found
    }

    /// Score events in `[start, end]` against `framework`.
    pub fn generate_compliance_report(
        &self,
        framework: ComplianceFramework,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> VigilResult<ComplianceReport> {
        if start > end {
            return Err(ValidationError::InvalidTimeRange.into());
        }

        let report = {
            let state = self.state.read();
            compliance::evaluate(
                framework,
                &state.events,
                &state.anomalies,
                start,
                end,
                self.config.empty_period_policy,
            )
        };

        debug!(
            report_id = %report.id,
            framework = %framework,
            total = report.total_events,
            violations = report.violations.len(),
            score = report.compliance_score,
            "Compliance report generated"
        );

        self.count(
            MetricDatum::percent("ComplianceScore", report.compliance_score * 100.0)
                .with_dimension("Framework", framework.as_str()),
        );

        Ok(report)
    }

    /// Summary over the trailing `window_hours`, or everything for `None`.
    pub fn security_summary(&self, window_hours: Option<u32>) -> SecuritySummary {
        let state = self.state.read();
        summary::summarize(
            &state.events,
            &state.audits,
            &state.anomalies,
            window_hours,
            Utc::now(),
        )
    }

    /// Summary over the configured default window.
    pub fn security_summary_default(&self) -> SecuritySummary {
        self.security_summary(Some(self.config.summary_window_hours))
    }

    // -----------------------------------------------------------------------
    // Retrieval
    // -----------------------------------------------------------------------

    /// Most recent events matching `filter`, oldest first.
    pub fn security_events(&self, filter: EventFilter) -> Vec<SecurityEvent> {
        let state = self.state.read();
        let matching: Vec<&SecurityEvent> = state
            .events
            .iter()
            .filter(|e| filter.event_type.is_none_or(|t| e.event_type == t))
            .filter(|e| {
                filter
                    .user_id
                    .as_deref()
                    .is_none_or(|u| e.user_id.as_deref() == Some(u))
            })
            .collect();
        tail(&matching, filter.limit)
    }

    /// Most recent audit trails matching `filter`, oldest first.
    pub fn audit_trails(&self, filter: AuditFilter) -> Vec<AuditTrail> {
        let state = self.state.read();
        let matching: Vec<&AuditTrail> = state
            .audits
            .iter()
            .filter(|a| filter.user_id.as_deref().is_none_or(|u| a.user_id == u))
            .filter(|a| {
                filter
                    .resource_type
                    .as_deref()
                    .is_none_or(|t| a.resource_type == t)
            })
            .collect();
        tail(&matching, filter.limit)
    }

    pub fn anomalies(&self) -> Vec<SecurityAnomaly> {
        self.state.read().anomalies.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state.read().events.len()
    }

    pub fn audit_count(&self) -> usize {
        self.state.read().audits.len()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn realtime_check(
        &self,
        state: &mut MonitorState,
        event: &SecurityEvent,
    ) -> Option<SecurityAnomaly> {
        if !self.config.realtime_detection
            || event.event_type != SecurityEventType::AuthenticationFailure
        {
            return None;
        }
        let user_id = event.user_id.as_deref()?;
        let found = anomaly::check_failed_authentication(
            &state.events,
            user_id,
            self.config.anomaly.failed_auth_threshold,
        )?;
        state.anomalies.push(found.clone());
        Some(found)
    }

    fn forward<T: Serialize>(&self, kind: RecordKind, group: &str, record: &T) {
        let payload = match serde_json::to_value(record) {
            Ok(v) => v,
            Err(e) => {
                warn!(log_type = %kind, error = %e, "Failed to serialize record for log sink");
                return;
            }
        };
        let record = LogRecord {
            kind,
            group: group.to_string(),
            payload,
        };
        if let Err(e) = self.log_sink.emit(&record) {
            warn!(log_type = %kind, group, error = %e, "Log sink delivery failed");
        }
    }

    fn count(&self, datum: MetricDatum) {
        if !self.config.metrics_enabled {
            return;
        }
        let name = datum.name.clone();
        if let Err(e) = self.metrics_sink.record(datum) {
            warn!(metric = %name, error = %e, "Metrics sink delivery failed");
        }
    }
}

fn tail<T: Clone>(items: &[&T], limit: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(limit);
    items[skip..].iter().map(|item| (*item).clone()).collect()
}
