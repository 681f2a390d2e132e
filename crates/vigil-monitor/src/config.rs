//! Monitor configuration.

use std::fmt;
use std::str::FromStr;

use vigil_core::error::{VigilError, VigilResult};
use vigil_core::models::audit::DEFAULT_RETENTION_DAYS;

/// Largest accepted summary window: ten years.
pub const MAX_SUMMARY_WINDOW_HOURS: u32 = 87_600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(VigilError::Configuration(format!(
                "environment must be one of development, staging, production (got '{other}')"
            ))),
        }
    }
}

/// Thresholds for the anomaly rules. A rule fires when a user's count
/// is strictly greater than its threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyThresholds {
    /// Failed authentications per user (default: 5).
    pub failed_auth_threshold: usize,
    /// Privilege-escalation authorizations per user (default: 3).
    pub privilege_escalation_threshold: usize,
    /// Distinct resources accessed per user (default: 20).
    pub distinct_resource_threshold: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            failed_auth_threshold: 5,
            privilege_escalation_threshold: 3,
            distinct_resource_threshold: 20,
        }
    }
}

/// Score assigned to a compliance report covering zero events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyPeriodPolicy {
    /// Nothing happened, nothing was violated: score 1.0.
    #[default]
    VacuouslyCompliant,
    /// Absence of evidence counts against the period: score 0.0.
    NonCompliant,
}

impl EmptyPeriodPolicy {
    pub fn score(self) -> f64 {
        match self {
            Self::VacuouslyCompliant => 1.0,
            Self::NonCompliant => 0.0,
        }
    }
}

/// Configuration for the security monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Deployment environment; selects the log group names.
    pub environment: Environment,
    /// Emit counters and gauges to the metrics sink (default: true).
    pub metrics_enabled: bool,
    /// Check the failed-authentication rule while logging (default: true).
    pub realtime_detection: bool,
    pub anomaly: AnomalyThresholds,
    /// Retention stamped on audit trails (default: 2557 days).
    pub audit_retention_days: u32,
    /// Window used by `security_summary_default` (default: 24 hours).
    pub summary_window_hours: u32,
    pub empty_period_policy: EmptyPeriodPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            metrics_enabled: true,
            realtime_detection: true,
            anomaly: AnomalyThresholds::default(),
            audit_retention_days: DEFAULT_RETENTION_DAYS,
            summary_window_hours: 24,
            empty_period_policy: EmptyPeriodPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Load from `VIGIL_*` environment variables. Unset variables keep
    /// their defaults.
    pub fn from_env() -> VigilResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> VigilResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            environment: parse_var(&lookup, "VIGIL_ENVIRONMENT", defaults.environment)?,
            metrics_enabled: parse_var(&lookup, "VIGIL_METRICS_ENABLED", defaults.metrics_enabled)?,
            realtime_detection: parse_var(
                &lookup,
                "VIGIL_REALTIME_DETECTION",
                defaults.realtime_detection,
            )?,
            anomaly: AnomalyThresholds {
                failed_auth_threshold: parse_var(
                    &lookup,
                    "VIGIL_FAILED_AUTH_THRESHOLD",
                    defaults.anomaly.failed_auth_threshold,
                )?,
                privilege_escalation_threshold: parse_var(
                    &lookup,
                    "VIGIL_PRIVILEGE_ESCALATION_THRESHOLD",
                    defaults.anomaly.privilege_escalation_threshold,
                )?,
                distinct_resource_threshold: parse_var(
                    &lookup,
                    "VIGIL_DISTINCT_RESOURCE_THRESHOLD",
                    defaults.anomaly.distinct_resource_threshold,
                )?,
            },
            audit_retention_days: parse_var(
                &lookup,
                "VIGIL_AUDIT_RETENTION_DAYS",
                defaults.audit_retention_days,
            )?,
            summary_window_hours: parse_var(
                &lookup,
                "VIGIL_SUMMARY_WINDOW_HOURS",
                defaults.summary_window_hours,
            )?,
            empty_period_policy: defaults.empty_period_policy,
        };

        if config.audit_retention_days == 0 {
            return Err(VigilError::Configuration(
                "VIGIL_AUDIT_RETENTION_DAYS must be positive".into(),
            ));
        }

        if config.summary_window_hours > MAX_SUMMARY_WINDOW_HOURS {
            return Err(VigilError::Configuration(format!(
                "VIGIL_SUMMARY_WINDOW_HOURS must be at most {MAX_SUMMARY_WINDOW_HOURS}"
            )));
        }

        Ok(config)
    }

    pub fn security_log_group(&self) -> String {
        format!("/vigil/security/{}", self.environment)
    }

    pub fn audit_log_group(&self) -> String {
        format!("/vigil/audit/{}", self.environment)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> VigilResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            VigilError::Configuration(format!("{key}: cannot parse '{raw}': {e}"))
        }),
    }
}
