//! Client pool entry point.
//!
//! Loads `DriverConfig` from the environment, drives the selected store until
//! the clients finish, the run duration elapses or Ctrl-C arrives, then
//! prints the run report.

use anyhow::{Context, Result};
use client_pool::{init_logging, DriverConfig, WorkloadRuntime};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DriverConfig::from_env().context("Failed to load configuration")?;
    init_logging(&config.log).context("Failed to initialize logging")?;

    info!(
        strategy = %config.strategy,
        readers = config.pool.reader_count,
        writers = config.pool.writer_count,
        run_duration_ms = config
            .run_duration
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        "Starting client pool run"
    );

    let report_json = config.report_json;
    let runtime = WorkloadRuntime::new(config);
    let report = runtime.run_until(ctrl_c()).await?;

    if report_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
    } else {
        println!("{}", report.render_text());
    }

    Ok(())
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, stopping clients"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl+C, relying on run limits");
            std::future::pending::<()>().await;
        }
    }
}
