//! Dry-run backends that report what would be sent to the monitoring
//! service instead of calling it.

use tracing::info;
use vigil_core::sink::{MetricDatum, SinkError};
use vigil_dashboards::{AlarmDefinition, DashboardError, DashboardProvisioner};
use vigil_monitor::sink::MetricsPublisher;

/// Logs each metric batch as one structured event.
#[derive(Debug, Default)]
pub struct LoggingMetricsPublisher;

impl MetricsPublisher for LoggingMetricsPublisher {
    fn publish(&self, namespace: &str, batch: &[MetricDatum]) -> Result<(), SinkError> {
        let payload = serde_json::to_string(batch)
            .map_err(|e| SinkError::Rejected(format!("serialize metrics: {e}")))?;
        info!(
            target: "vigil::metrics",
            namespace,
            size = batch.len(),
            data = %payload,
            "publish metric batch"
        );
        Ok(())
    }
}

/// Logs dashboard and alarm definitions without provisioning them.
#[derive(Debug, Default)]
pub struct LoggingProvisioner;

impl DashboardProvisioner for LoggingProvisioner {
    fn put_dashboard(&self, name: &str, body: &str) -> Result<(), DashboardError> {
        info!(target: "vigil::dashboards", dashboard = name, bytes = body.len(), "put dashboard (dry run)");
        Ok(())
    }

    fn put_alarm(&self, alarm: &AlarmDefinition) -> Result<(), DashboardError> {
        let request = serde_json::to_string(alarm)?;
        info!(target: "vigil::dashboards", alarm = %alarm.alarm_name, request = %request, "put alarm (dry run)");
        Ok(())
    }
}
