//! Pushing dashboards and alarms to a monitoring backend.

use serde::Serialize;
use tracing::{error, info};
use vigil_core::error::VigilResult;

use crate::config::DashboardConfig;
use crate::definitions::{self, AlarmDefinition};
use crate::error::DashboardError;

/// Backend that stores dashboards and alarms.
pub trait DashboardProvisioner: Send + Sync {
    fn put_dashboard(&self, name: &str, body: &str) -> Result<(), DashboardError>;

    fn put_alarm(&self, alarm: &AlarmDefinition) -> Result<(), DashboardError>;
}

/// Names of everything created by [`provision_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvisioningOutcome {
    pub overview: String,
    pub compliance: String,
    pub alarms: Vec<String>,
}

/// Create both dashboards and the alarm set.
///
/// A dashboard failure aborts with [`VigilError::Provisioning`](vigil_core::error::VigilError::Provisioning).
/// A failed alarm is logged and left out of the outcome.
pub fn provision_all<P: DashboardProvisioner + ?Sized>(
    provisioner: &P,
    config: &DashboardConfig,
) -> VigilResult<ProvisioningOutcome> {
    let mut outcome = ProvisioningOutcome::default();

    for (slot, dashboard) in [
        (&mut outcome.overview, definitions::overview_dashboard(config)),
        (&mut outcome.compliance, definitions::compliance_dashboard(config)),
    ] {
        let body = dashboard.body_json()?;
        provisioner.put_dashboard(&dashboard.name, &body).map_err(|e| {
            error!(dashboard = %dashboard.name, error = %e, "Failed to create dashboard");
            e
        })?;
        info!(dashboard = %dashboard.name, "Created dashboard");
        *slot = dashboard.name;
    }

    for alarm in definitions::security_alarms(config) {
        match provisioner.put_alarm(&alarm) {
            Ok(()) => {
                info!(alarm = %alarm.alarm_name, "Created alarm");
                outcome.alarms.push(alarm.alarm_name);
            }
            Err(e) => error!(alarm = %alarm.alarm_name, error = %e, "Failed to create alarm"),
        }
    }

    info!(
        environment = %config.environment,
        alarms = outcome.alarms.len(),
        "Security dashboards provisioned"
    );
    Ok(outcome)
}
