//! ヘルスチェックモニター
//!
//! Event Reader をプル型で定期的に問い合わせ、SLAウィンドウを過ぎても
//! クローズされていない公開トランザクションを検出する。

pub mod checks;
pub mod fetcher;
pub mod monitor;
pub mod sla;

pub use fetcher::TransactionFetcher;
pub use monitor::{HealthMonitor, MonitorHandle};
pub use sla::filter_failed_transactions;
