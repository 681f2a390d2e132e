//! Vigil Server — runs a scripted security session against the monitor
//! and prints the resulting summary and compliance reports.

mod backend;
mod config;
mod demo;

use std::sync::Arc;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use vigil_core::error::VigilResult;
use vigil_monitor::SecurityMonitor;
use vigil_monitor::sink::{BufferedMetricsSink, TracingLogSink};

use crate::backend::{LoggingMetricsPublisher, LoggingProvisioner};
use crate::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vigil=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting Vigil server...");

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        tracing::error!(error = %e, "Vigil server failed");
        std::process::exit(1);
    }

    tracing::info!("Vigil server stopped.");
}

fn run(config: ServerConfig) -> VigilResult<()> {
    let outcome = vigil_dashboards::provision_all(&LoggingProvisioner, &config.dashboards)?;
    tracing::info!(
        overview = %outcome.overview,
        compliance = %outcome.compliance,
        alarms = outcome.alarms.len(),
        "Dashboards ready"
    );

    let metrics = Arc::new(BufferedMetricsSink::new(
        config.dashboards.namespace.clone(),
        LoggingMetricsPublisher,
    ));
    let monitor = SecurityMonitor::new(config.monitor.clone(), TracingLogSink, metrics.clone());

    let flusher = {
        let metrics = metrics.clone();
        let period = config.metrics_flush_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let flushed = metrics.flush();
                if !flushed.is_complete() {
                    tracing::warn!(failed = flushed.failed, "Periodic metrics flush incomplete");
                }
            }
        })
    };

    let scenario = demo::run_scenario(&monitor)?;

    let report = json!({
        "summary": scenario.summary,
        "anomalies": scenario.anomalies,
        "compliance_reports": scenario.reports,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "Failed to render report"),
    }

    flusher.abort();
    let flushed = metrics.flush();
    tracing::info!(
        sent = flushed.sent,
        failed = flushed.failed,
        "Final metrics flush"
    );

    Ok(())
}
