//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// Event Reader からの取得失敗
///
/// どの失敗も1サイクル分の取得を打ち切るだけで、プロセスを止めることはない。
#[derive(Debug, Error)]
pub enum FetchError {
    /// アドレスが不正
    #[error("invalid event reader address {url}: {source}")]
    InvalidUrl {
        /// 組み立てたURL
        url: String,
        /// パースエラー
        #[source]
        source: reqwest::Error,
    },

    /// 接続失敗・未対応スキーム等
    #[error("failed to retrieve transactions from {url}: {source}")]
    Transport {
        /// リクエスト先URL
        url: String,
        /// reqwestエラー
        #[source]
        source: reqwest::Error,
    },

    /// 200以外のステータス
    #[error("failed to retrieve transactions from {url} with status code {status}")]
    Status {
        /// リクエスト先URL
        url: String,
        /// 受信したステータス
        status: reqwest::StatusCode,
    },

    /// レスポンスボディの読み込み失敗
    #[error("error reading transaction body for url {url}: {source}")]
    Body {
        /// リクエスト先URL
        url: String,
        /// reqwestエラー
        #[source]
        source: reqwest::Error,
    },

    /// JSONデシリアライズ失敗
    #[error("error unmarshalling transaction log messages for url {url}: {source}")]
    Decode {
        /// リクエスト先URL
        url: String,
        /// serdeエラー
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// 失敗したリクエストのURL
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::Decode { url, .. } => url,
        }
    }
}

/// 起動時設定の検証エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Event Reader アドレスが不正
    #[error("invalid event reader address: {0}")]
    InvalidEventReader(String),

    /// 値が範囲外
    #[error("invalid value for {name}: {reason}")]
    OutOfRange {
        /// 設定項目名
        name: &'static str,
        /// 理由
        reason: String,
    },

    /// HTTPクライアント生成失敗
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// モニター操作のエラー
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 既に起動済み
    #[error("health monitor is already running")]
    AlreadyStarted,
}
