//! Dashboard configuration.

/// Configuration for dashboard and alarm provisioning.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Deployment environment name, appended to every dashboard and alarm.
    pub environment: String,
    /// Metrics namespace the monitor publishes under (default: `Vigil/Security`).
    pub namespace: String,
    /// Region rendered into each widget (default: `us-west-2`).
    pub region: String,
    /// Notification topic for alarm actions. `None` creates alarms with
    /// no actions.
    pub alarm_topic: Option<String>,
    /// Log group queried by the recent-events table.
    pub security_log_group: String,
}

impl DashboardConfig {
    /// Defaults with the environment name and log group filled in.
    pub fn for_environment(environment: impl Into<String>) -> Self {
        let environment = environment.into();
        Self {
            security_log_group: format!("/vigil/security/{environment}"),
            environment,
            ..Default::default()
        }
    }

    pub fn overview_dashboard_name(&self) -> String {
        format!("Vigil-Security-Overview-{}", self.environment)
    }

    pub fn compliance_dashboard_name(&self) -> String {
        format!("Vigil-Compliance-{}", self.environment)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            namespace: "Vigil/Security".into(),
            region: "us-west-2".into(),
            alarm_topic: None,
            security_log_group: "/vigil/security/development".into(),
        }
    }
}
