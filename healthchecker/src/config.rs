//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and the typed monitor
//! configuration built from them.

use crate::common::{ConfigError, LookbackWindow};
use std::time::Duration;

/// デフォルトのEvent Readerアドレス
pub const DEFAULT_EVENT_READER_URL: &str = "http://localhost:8083/__splunk-event-reader";

/// デフォルトのコンテンツタイプ（URLパスの一部）
pub const DEFAULT_CONTENT_TYPE: &str = "annotations";

/// デフォルトのSLAウィンドウ（分）
pub const DEFAULT_SLA_WINDOW_MINS: u64 = 2;

/// デフォルトのチェック間隔（秒）
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// デグレード判定の失敗件数しきい値
pub const DEFAULT_FAILURE_THRESHOLD: usize = 2;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Example
/// ```
/// use publish_healthchecker::config::get_env_with_fallback;
///
/// let url = get_env_with_fallback("EVENT_READER_URL", "SPLUNK_EVENT_READER");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// ヘルスモニター設定
///
/// 起動時に一度だけ組み立て、以降は読み取り専用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Event Reader のベースアドレス
    pub event_reader_url: String,
    /// 問い合わせ対象のコンテンツタイプ
    pub content_type: String,
    /// 問い合わせ期間
    pub lookback: LookbackWindow,
    /// SLAウィンドウ（この時間内のトランザクションは失敗とみなさない）
    pub sla_window: Duration,
    /// チェック間隔
    pub check_interval: Duration,
    /// デグレード判定の失敗件数しきい値
    pub failure_threshold: usize,
    /// 取得タイムアウト（None ならトランスポートの既定値）
    pub fetch_timeout: Option<Duration>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            event_reader_url: DEFAULT_EVENT_READER_URL.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            lookback: LookbackWindow::default(),
            sla_window: Duration::from_secs(DEFAULT_SLA_WINDOW_MINS * 60),
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            fetch_timeout: None,
        }
    }
}

/// Event Reader アドレス（`EVENT_READER_URL`、旧: `SPLUNK_EVENT_READER`）
pub fn env_event_reader_url() -> String {
    get_env_with_fallback_or(
        "EVENT_READER_URL",
        "SPLUNK_EVENT_READER",
        DEFAULT_EVENT_READER_URL,
    )
}

/// チェック間隔の秒数（`CHECK_INTERVAL`、旧: `CHECK_FREQUENCY`）
pub fn env_check_interval_secs() -> u64 {
    get_env_with_fallback_parse(
        "CHECK_INTERVAL",
        "CHECK_FREQUENCY",
        DEFAULT_CHECK_INTERVAL_SECS,
    )
}

/// 分単位のSLAウィンドウを Duration に変換する
pub fn sla_window_from_mins(mins: u64) -> Result<Duration, ConfigError> {
    mins.checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::OutOfRange {
            name: "sla_window",
            reason: format!("{} minutes is too large", mins),
        })
}

impl MonitorConfig {
    /// Load monitor configuration from environment variables.
    ///
    /// `SLA_WINDOW` is given in minutes, `CHECK_INTERVAL` and
    /// `FETCH_TIMEOUT` in seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let sla_window_mins =
            get_env_with_fallback_parse("SLA_WINDOW", "SLA_WINDOW", DEFAULT_SLA_WINDOW_MINS);
        let failure_threshold = get_env_with_fallback_parse(
            "FAILURE_THRESHOLD",
            "FAILURE_THRESHOLD",
            DEFAULT_FAILURE_THRESHOLD,
        );
        let fetch_timeout = get_env_with_fallback("FETCH_TIMEOUT", "FETCH_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Ok(Self {
            event_reader_url: env_event_reader_url(),
            sla_window: sla_window_from_mins(sla_window_mins)?,
            check_interval: Duration::from_secs(env_check_interval_secs()),
            failure_threshold,
            fetch_timeout,
            ..Self::default()
        })
    }

    /// 起動前の検証
    ///
    /// アドレスの書式はここでは検証しない。不正なアドレスは各サイクルの
    /// 取得失敗としてログに残る。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_reader_url.trim().is_empty() {
            return Err(ConfigError::InvalidEventReader(
                "address must not be empty".to_string(),
            ));
        }
        if self.check_interval.is_zero() {
            return Err(ConfigError::OutOfRange {
                name: "check_interval",
                reason: "must be greater than zero".to_string(),
            });
        }
        if chrono::Duration::from_std(self.sla_window).is_err() {
            return Err(ConfigError::OutOfRange {
                name: "sla_window",
                reason: format!("{:?} is too large", self.sla_window),
            });
        }
        if matches!(self.fetch_timeout, Some(t) if t.is_zero()) {
            return Err(ConfigError::OutOfRange {
                name: "fetch_timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// SLAウィンドウを chrono の Duration で返す
    pub fn sla_window_duration(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.sla_window).map_err(|_| ConfigError::OutOfRange {
            name: "sla_window",
            reason: format!("{:?} is too large", self.sla_window),
        })
    }
}
