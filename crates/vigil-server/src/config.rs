//! Server configuration.

use std::time::Duration;

use vigil_core::error::{VigilError, VigilResult};
use vigil_dashboards::DashboardConfig;
use vigil_monitor::MonitorConfig;

/// Top-level configuration for the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub monitor: MonitorConfig,
    pub dashboards: DashboardConfig,
    /// Interval between background metric flushes (default: 60 s).
    pub metrics_flush_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> VigilResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monitor settings come from [`MonitorConfig::from_lookup`]; the
    /// dashboard environment always follows the monitor's.
    pub fn from_lookup<F>(lookup: F) -> VigilResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let monitor = MonitorConfig::from_lookup(&lookup)?;

        let mut dashboards = DashboardConfig::for_environment(monitor.environment.as_str());
        dashboards.security_log_group = monitor.security_log_group();
        if let Some(namespace) = lookup("VIGIL_METRICS_NAMESPACE") {
            dashboards.namespace = namespace;
        }
        if let Some(region) = lookup("VIGIL_REGION") {
            dashboards.region = region;
        }
        dashboards.alarm_topic = lookup("VIGIL_ALARM_TOPIC").filter(|t| !t.is_empty());

        let flush_secs = match lookup("VIGIL_METRICS_FLUSH_SECS") {
            None => 60,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(VigilError::Configuration(format!(
                        "VIGIL_METRICS_FLUSH_SECS: expected a positive number of seconds, got '{raw}'"
                    )));
                }
                Ok(secs) => secs,
            },
        };

        Ok(Self {
            monitor,
            dashboards,
            metrics_flush_interval: Duration::from_secs(flush_secs),
        })
    }
}
