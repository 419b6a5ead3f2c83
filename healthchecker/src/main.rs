//! Publish Health Checker Entry Point

use anyhow::Context;
use clap::Parser;
use publish_healthchecker::cli::{Cli, Commands};
use publish_healthchecker::common::ConfigError;
use publish_healthchecker::config::{
    get_env_with_fallback_or, get_env_with_fallback_parse, MonitorConfig,
};
use publish_healthchecker::health::checks::AppInfo;
use publish_healthchecker::health::HealthMonitor;
use publish_healthchecker::shutdown::ShutdownController;
use publish_healthchecker::{logging, server, AppState};
use std::process::ExitCode;
use tracing::info;

#[derive(Clone, Debug)]
struct ServerConfig {
    host: String,
    port: u16,
    app_info: AppInfo,
    monitor: MonitorConfig,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = get_env_with_fallback_or("APP_HOST", "APP_HOST", "0.0.0.0");
        let port = get_env_with_fallback_parse("APP_PORT", "PORT", 8083);
        let defaults = AppInfo::default();
        let app_info = AppInfo {
            system_code: get_env_with_fallback_or(
                "APP_SYSTEM_CODE",
                "APP_SYSTEM_CODE",
                &defaults.system_code,
            ),
            name: get_env_with_fallback_or("APP_NAME", "APP_NAME", &defaults.name),
            ..defaults
        };
        Ok(Self {
            host,
            port,
            app_info,
            monitor: MonitorConfig::from_env()?,
        })
    }

    fn from_args(
        args: &publish_healthchecker::cli::serve::ServeArgs,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: args.host.clone(),
            port: args.port,
            app_info: args.app_info(),
            monitor: args.monitor.to_config()?,
        })
    }

    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Publish health checker could not start: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    };

    // バッファ済みのログを書き出してから終了する
    drop(log_guard);
    code
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Some(Commands::Check(args)) => {
            let reachable = publish_healthchecker::cli::check::execute(&args).await?;
            Ok(if reachable {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Commands::Serve(args)) => {
            let config =
                ServerConfig::from_args(&args).context("invalid monitor configuration")?;
            run_server(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        // No subcommand - default to serve
        None => {
            let config = ServerConfig::from_env().context("invalid monitor configuration")?;
            run_server(config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    info!(
        system_code = %config.app_info.system_code,
        app_name = %config.app_info.name,
        port = config.port,
        "[Startup] publish-healthchecker is starting"
    );

    let monitor =
        HealthMonitor::new(&config.monitor).context("invalid monitor configuration")?;
    // 最初のチェックを公開してからリクエストを受け付ける
    let monitor_handle = monitor.start().await?;

    let state = AppState {
        monitor,
        app_info: config.app_info.clone(),
        failure_threshold: config.monitor.failure_threshold,
        shutdown: ShutdownController::default(),
    };

    let result = server::run(state, &config.bind_addr())
        .await
        .with_context(|| format!("failed to serve on {}", config.bind_addr()));

    info!("[Shutdown] publish-healthchecker is shutting down");
    monitor_handle.shutdown().await;

    result
}
