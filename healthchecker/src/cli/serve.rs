//! serve サブコマンド
//!
//! ヘルスチェッカーサーバーを起動します。

use crate::common::ConfigError;
use crate::config::{
    env_check_interval_secs, env_event_reader_url, sla_window_from_mins, MonitorConfig,
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_SLA_WINDOW_MINS,
};
use crate::health::checks::AppInfo;
use clap::Args;
use std::time::Duration;

/// モニター設定の引数（serve / check 共通）
///
/// 未指定の項目は旧名の環境変数も含めて `MonitorConfig::from_env` と同じ
/// 規則で補う。
#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    /// Event Reader address [default: http://localhost:8083/__splunk-event-reader]
    #[arg(long = "event-reader", env = "EVENT_READER_URL")]
    pub event_reader: Option<String>,

    /// Time period to ignore when there is no information about a publish yet, in minutes
    #[arg(long, default_value_t = DEFAULT_SLA_WINDOW_MINS, env = "SLA_WINDOW")]
    pub sla_window: u64,

    /// Interval between checks, in seconds [default: 60]
    #[arg(long, env = "CHECK_INTERVAL")]
    pub check_interval: Option<u64>,

    /// Number of failed transactions reported as a degradation
    #[arg(long, default_value_t = DEFAULT_FAILURE_THRESHOLD, env = "FAILURE_THRESHOLD")]
    pub failure_threshold: usize,

    /// Event Reader request timeout, in seconds (transport default when unset)
    #[arg(long, env = "FETCH_TIMEOUT")]
    pub fetch_timeout: Option<u64>,
}

impl MonitorArgs {
    /// 引数からモニター設定を組み立てる
    pub fn to_config(&self) -> Result<MonitorConfig, ConfigError> {
        let event_reader_url = self
            .event_reader
            .clone()
            .unwrap_or_else(env_event_reader_url);
        let check_interval_secs = self
            .check_interval
            .unwrap_or_else(env_check_interval_secs);

        Ok(MonitorConfig {
            event_reader_url,
            sla_window: sla_window_from_mins(self.sla_window)?,
            check_interval: Duration::from_secs(check_interval_secs),
            failure_threshold: self.failure_threshold,
            fetch_timeout: self.fetch_timeout.map(Duration::from_secs),
            ..MonitorConfig::default()
        })
    }
}

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "8083", env = "APP_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "APP_HOST")]
    pub host: String,

    /// System code of the application
    #[arg(long, default_value = "annotations-publish-healthchecker", env = "APP_SYSTEM_CODE")]
    pub app_system_code: String,

    /// Application name
    #[arg(long, default_value = "Annotations Publish Healthchecker", env = "APP_NAME")]
    pub app_name: String,

    /// Monitor settings
    #[command(flatten)]
    pub monitor: MonitorArgs,
}

impl ServeArgs {
    /// ヘルスJSONに載せるアプリケーション情報
    pub fn app_info(&self) -> AppInfo {
        AppInfo {
            system_code: self.app_system_code.clone(),
            name: self.app_name.clone(),
            ..AppInfo::default()
        }
    }
}
