//! CLI module for publish-healthchecker
//!
//! Provides the command-line interface for running the health checker.

pub mod check;
pub mod serve;

use clap::{Parser, Subcommand};

/// Annotations publish health checker - reports publishes that did not complete within the SLA window
#[derive(Parser, Debug)]
#[command(name = "publish-healthchecker")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    EVENT_READER_URL        Event Reader address (deprecated: SPLUNK_EVENT_READER)
    SLA_WINDOW              SLA window in minutes (default: 2)
    CHECK_INTERVAL          Check interval in seconds (default: 60)
    FAILURE_THRESHOLD       Failures reported as a degradation (default: 2)
    FETCH_TIMEOUT           Event Reader request timeout in seconds (default: none)
    APP_HOST                Bind address (default: 0.0.0.0)
    APP_PORT                Listen port (default: 8083)
    APP_SYSTEM_CODE         System code reported by /__health
    APP_NAME                Application name reported by /__health
    PUBHC_LOG_LEVEL         Log level (default: info)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the health checker server
    Serve(serve::ServeArgs),
    /// Run a single check and print the snapshot
    Check(check::CheckArgs),
}
