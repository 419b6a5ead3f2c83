//! Annotations Publish Health Checker
//!
//! 公開パイプラインが SLA ウィンドウ内に処理を完了しているかを、
//! Event Reader のオープントランザクションを定期的に確認して報告する。

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// ヘルスチェック監視
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// CLIインターフェース
pub mod cli;

/// 停止シグナル
pub mod shutdown;

/// axumサーバー起動
pub mod server;

/// アプリケーション状態
#[derive(Clone, Debug)]
pub struct AppState {
    /// ヘルスモニター（スナップショットの所有者）
    pub monitor: health::HealthMonitor,
    /// ヘルスJSONに載せるアプリケーション情報
    pub app_info: health::checks::AppInfo,
    /// デグレード判定の失敗件数しきい値
    pub failure_threshold: usize,
    /// サーバー停止シグナル
    pub shutdown: shutdown::ShutdownController,
}
