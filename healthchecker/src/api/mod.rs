//! REST APIハンドラー
//!
//! スナップショット詳細、ヘルス、GTG、ビルド情報

pub mod details;
pub mod status;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// `/__details` のパス
pub const DETAILS_PATH: &str = "/__details";
/// `/__health` のパス
pub const HEALTH_PATH: &str = "/__health";
/// `/__gtg` のパス
pub const GTG_PATH: &str = "/__gtg";
/// `/__build-info` のパス
pub const BUILD_INFO_PATH: &str = "/__build-info";

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(DETAILS_PATH, get(details::get_details))
        .route(HEALTH_PATH, get(status::get_health))
        .route(GTG_PATH, get(status::get_gtg))
        .route(BUILD_INFO_PATH, get(status::get_build_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
