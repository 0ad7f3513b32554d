//! Toronto Hydro to InfluxDB2 Exporter
//!
//! This application logs into the Toronto Hydro customer portal, downloads the
//! hourly usage and cost of every meter on the account, and writes the hours
//! InfluxDB does not hold yet.
//!
//! # Architecture
//!
//! Each cycle runs strictly sequentially: one portal session, one meter and
//! one day at a time, followed by a single reconciliation per meter. Cycles
//! repeat every `COLLECTOR_SLEEP_DURATION_MIN` minutes, or run once when it
//! is 0.
//!
//! # Features
//!
//! - Duplicate-free re-export of a sliding lookback window
//! - Tiered, time-of-use and ultra-low-overnight tariffs
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Restart of the export task after a panic
//! - An in-process mock portal (`TORONTO_HYDRO_MOCK=true`)

mod config;
mod error;
mod influxdb;
mod model;
mod orchestrator;
mod portal;
mod reconcile;

#[cfg(test)]
mod test_utils;

use crate::error::Result;
use anyhow::anyhow;
use crate::model::ConsumptionStore;
use crate::orchestrator::{CycleOptions, Orchestrator};
use crate::portal::{Credentials, PortalClient};
use std::sync::Arc;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinError;
use tokio::time::{sleep, Duration};

/// Application entry point.
///
/// Loads configuration, builds the exporter, and supervises the export task
/// with signal handling for graceful shutdown.
#[tokio::main]
async fn main() {
    let app_config = config::load_app_config().expect("Failed to load AppConfig");
    tracing_subscriber::fmt()
        .with_max_level(app_config.log_level())
        .init();

    let collector_config = config::load_collector_config().expect("Failed to load CollectorConfig");
    let interval = collector_config.sleep_duration();
    let orchestrator = Arc::new(
        build_orchestrator(&collector_config)
            .await
            .expect("Failed to initialise the exporter"),
    );

    let create_export_task = || -> tokio::task::JoinHandle<()> {
        tokio::spawn(run_cycles(Arc::clone(&orchestrator), interval))
    };
    let mut export_task = create_export_task();

    let mut sig_term = signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    tracing::info!("Running... Press Ctrl-C or send SIGTERM to terminate.");
    loop {
        tokio::select! {
            _ = sig_term.recv() => {
                tracing::info!("Received SIGTERM. Exiting...");
                break;
            }
            _ = ctrl_c() => {
                tracing::info!("Received SIGINT. Exiting...");
                break;
            }
            result = &mut export_task => {
                let panicked = handle_task_result("export", result);
                if interval.is_none() && !panicked {
                    break;
                }
                export_task = create_export_task();
            }
        }
    }
}

async fn build_orchestrator(
    collector_config: &config::CollectorConfig,
) -> Result<Orchestrator<influxdb::Client>> {
    let portal_config = config::load_toronto_hydro_config()?;
    let influx_config = config::load_influx_config()?;

    let options = CycleOptions::from_config(collector_config, &portal_config)?;
    if portal_config.mock {
        portal::mock::spawn(portal_config.mock_listen_addr()?, options.timezone)
            .await
            .map_err(|e| anyhow!("Failed to start the mock portal: {}", e))?;
    }
    let client = PortalClient::from_config(&portal_config)?;
    tracing::info!("Using Toronto Hydro portal at {}", portal_config.base_url());

    Ok(Orchestrator::new(
        client,
        Credentials::from(&portal_config),
        influxdb::Client::new(influx_config),
        options,
    ))
}

/// Runs export cycles until `interval` is `None`, sleeping `interval` between
/// cycles. A failed cycle is logged and retried on the next tick.
async fn run_cycles<S: ConsumptionStore + 'static>(
    orchestrator: Arc<Orchestrator<S>>,
    interval: Option<Duration>,
) {
    loop {
        let today = orchestrator.today();
        if let Err(e) = orchestrator.run_cycle(today).await {
            tracing::error!("Export cycle for {} failed: {}", today, e);
        }

        match interval {
            Some(interval) => sleep(interval).await,
            None => break,
        }
    }
}

/// Logs the result of a finished task and reports whether it panicked or was
/// cancelled.
fn handle_task_result(task_name: &str, result: std::result::Result<(), JoinError>) -> bool {
    match result {
        Ok(_) => {
            tracing::debug!("Task {} completed.", task_name);
            false
        }
        Err(e) => {
            tracing::error!("Task {} failed: {:?}", task_name, e);
            true
        }
    }
}
