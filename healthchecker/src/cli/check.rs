//! check subcommand
//!
//! Runs one fetch-and-filter cycle and prints the resulting snapshot.

use super::serve::MonitorArgs;
use crate::health::HealthMonitor;
use anyhow::Context;
use clap::Args;

/// Arguments for the check subcommand
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Monitor settings
    #[command(flatten)]
    pub monitor: MonitorArgs,
}

/// Execute the check command
///
/// Returns `Ok(false)` when the Event Reader was not reachable.
pub async fn execute(args: &CheckArgs) -> Result<bool, anyhow::Error> {
    let config = args
        .monitor
        .to_config()
        .context("invalid monitor configuration")?;
    let monitor = HealthMonitor::new(&config).context("invalid monitor configuration")?;

    let snapshot = monitor.determine_health().await;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{}", json);

    Ok(snapshot.reachable)
}
