//! ロギング初期化ユーティリティ
//!
//! `PUBHC_LOG_LEVEL`（旧: `LOG_LEVEL`）でレベルを指定する。`RUST_LOG` が
//! 設定されていればそちらを優先する。

use crate::config::get_env_with_fallback_or;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// デフォルトのログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ログフィルタを組み立てる
pub fn build_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = get_env_with_fallback_or("PUBHC_LOG_LEVEL", "LOG_LEVEL", DEFAULT_LOG_LEVEL);
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    })
}

/// グローバルサブスクライバーを初期化する
///
/// 標準出力へはノンブロッキングで書き込む。返り値のガードはプロセス終了まで
/// 保持すること（drop 時に残りのログをフラッシュする）。
pub fn init() -> Result<WorkerGuard, tracing_subscriber::util::TryInitError> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    tracing_subscriber::registry()
        .with(build_filter())
        .with(fmt::layer().with_writer(writer).with_target(true))
        .try_init()?;

    Ok(guard)
}
