//! Dashboard bodies and alarm definitions.
//!
//! Dashboards use the widget JSON layout accepted by CloudWatch-style
//! backends: a `widgets` array of `metric` and `log` panels positioned
//! on a 24-column grid.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use vigil_core::models::compliance::ComplianceFramework;
use vigil_core::models::event::{SecurityEventType, SecurityLevel};

use crate::config::DashboardConfig;
use crate::error::DashboardError;

/// Alarm evaluation window in seconds.
pub const ALARM_PERIOD_SECS: u32 = 300;

/// Frameworks charted on the compliance dashboard.
pub const CHARTED_FRAMEWORKS: [ComplianceFramework; 4] = [
    ComplianceFramework::Soc2,
    ComplianceFramework::Gdpr,
    ComplianceFramework::Hipaa,
    ComplianceFramework::Iso27001,
];

/// Resource types charted on the compliance dashboard.
pub const CHARTED_RESOURCE_TYPES: [&str; 4] = ["agent", "configuration", "data", "user"];

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardDefinition {
    pub name: String,
    pub body: Value,
}

impl DashboardDefinition {
    pub fn body_json(&self) -> Result<String, DashboardError> {
        Ok(serde_json::to_string(&self.body)?)
    }

    pub fn widgets(&self) -> &[Value] {
        self.body["widgets"].as_array().map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmDimension {
    pub name: String,
    pub value: String,
}

/// Threshold alarm on a single metric, serialized with the field names
/// a `PutMetricAlarm` request expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmDefinition {
    pub alarm_name: String,
    pub alarm_description: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<AlarmDimension>,
    pub statistic: String,
    pub period: u32,
    pub evaluation_periods: u32,
    pub threshold: f64,
    pub comparison_operator: String,
    pub unit: String,
    pub actions_enabled: bool,
    pub alarm_actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

/// Event types, severities, auth outcomes and a recent-events table.
pub fn overview_dashboard(config: &DashboardConfig) -> DashboardDefinition {
    let event_types: Vec<&str> = SecurityEventType::ALL.iter().map(|t| t.as_str()).collect();
    let levels: Vec<&str> = SecurityLevel::ALL.iter().map(|l| l.as_str()).collect();
    let auth = [
        SecurityEventType::AuthenticationSuccess.as_str(),
        SecurityEventType::AuthenticationFailure.as_str(),
    ];

    let query = format!(
        "SOURCE '{}'\n\
         | fields @timestamp, log_type, data.event_type, data.security_level, data.user_id, data.resource\n\
         | filter log_type = \"SecurityEvent\"\n\
         | sort @timestamp desc\n\
         | limit 100",
        config.security_log_group
    );

    let body = json!({
        "widgets": [
            metric_widget(
                config,
                (0, 0, 12, 6),
                "Security Events by Type",
                json!({
                    "metrics": metric_rows(&config.namespace, "SecurityEvents", "EventType", &event_types),
                    "view": "timeSeries",
                    "stacked": false,
                    "period": 300,
                    "stat": "Sum",
                }),
            ),
            metric_widget(
                config,
                (12, 0, 12, 6),
                "Security Events by Severity Level",
                json!({
                    "metrics": metric_rows(&config.namespace, "SecurityEvents", "SecurityLevel", &levels),
                    "view": "pie",
                    "period": 3600,
                    "stat": "Sum",
                }),
            ),
            metric_widget(
                config,
                (0, 6, 8, 6),
                "Authentication Success vs Failure",
                json!({
                    "metrics": metric_rows(&config.namespace, "SecurityEvents", "EventType", &auth),
                    "view": "timeSeries",
                    "stacked": true,
                    "period": 300,
                    "stat": "Sum",
                }),
            ),
            {
                "type": "log",
                "x": 0, "y": 12, "width": 24, "height": 6,
                "properties": {
                    "query": query,
                    "region": config.region,
                    "title": "Recent Security Events",
                    "view": "table",
                },
            },
        ]
    });

    DashboardDefinition {
        name: config.overview_dashboard_name(),
        body,
    }
}

/// Compliance scores per framework and audit volume per resource type.
pub fn compliance_dashboard(config: &DashboardConfig) -> DashboardDefinition {
    let frameworks: Vec<&str> = CHARTED_FRAMEWORKS.iter().map(|f| f.as_str()).collect();

    let body = json!({
        "widgets": [
            metric_widget(
                config,
                (0, 0, 12, 6),
                "Compliance Scores by Framework",
                json!({
                    "metrics": metric_rows(&config.namespace, "ComplianceScore", "Framework", &frameworks),
                    "view": "timeSeries",
                    "stacked": false,
                    "period": 3600,
                    "stat": "Average",
                    "yAxis": { "left": { "min": 0, "max": 100 } },
                }),
            ),
            metric_widget(
                config,
                (12, 0, 12, 6),
                "Audit Trail Entries by Resource Type",
                json!({
                    "metrics": metric_rows(&config.namespace, "AuditTrailEntries", "ResourceType", &CHARTED_RESOURCE_TYPES),
                    "view": "timeSeries",
                    "stacked": true,
                    "period": 300,
                    "stat": "Sum",
                }),
            ),
        ]
    });

    DashboardDefinition {
        name: config.compliance_dashboard_name(),
        body,
    }
}

// ---------------------------------------------------------------------------
// Alarms
// ---------------------------------------------------------------------------

/// High-severity volume alarm and any-critical alarm.
pub fn security_alarms(config: &DashboardConfig) -> Vec<AlarmDefinition> {
    vec![
        level_alarm(
            config,
            "HighSeveritySecurityEvents",
            "Alert when high severity security events exceed threshold",
            SecurityLevel::High,
            5.0,
        ),
        level_alarm(
            config,
            "CriticalSecurityEvents",
            "Alert on any critical security event",
            SecurityLevel::Critical,
            0.0,
        ),
    ]
}

fn level_alarm(
    config: &DashboardConfig,
    name: &str,
    description: &str,
    level: SecurityLevel,
    threshold: f64,
) -> AlarmDefinition {
    AlarmDefinition {
        alarm_name: format!("Vigil-{name}-{}", config.environment),
        alarm_description: description.to_string(),
        namespace: config.namespace.clone(),
        metric_name: "SecurityEvents".into(),
        dimensions: vec![AlarmDimension {
            name: "SecurityLevel".into(),
            value: level.as_str().into(),
        }],
        statistic: "Sum".into(),
        period: ALARM_PERIOD_SECS,
        evaluation_periods: 1,
        threshold,
        comparison_operator: "GreaterThanThreshold".into(),
        unit: "Count".into(),
        actions_enabled: true,
        alarm_actions: config.alarm_topic.iter().cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// Widget helpers
// ---------------------------------------------------------------------------

/// First row names the metric in full; later rows repeat it with `"."`.
fn metric_rows(namespace: &str, metric: &str, dimension: &str, values: &[&str]) -> Vec<Value> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if i == 0 {
                json!([namespace, metric, dimension, value])
            } else {
                json!([".", ".", ".", value])
            }
        })
        .collect()
}

fn metric_widget(
    config: &DashboardConfig,
    (x, y, width, height): (u32, u32, u32, u32),
    title: &str,
    mut properties: Value,
) -> Value {
    if let Some(props) = properties.as_object_mut() {
        props.insert("region".into(), json!(config.region));
        props.insert("title".into(), json!(title));
    }
    json!({
        "type": "metric",
        "x": x, "y": y, "width": width, "height": height,
        "properties": properties,
    })
}
