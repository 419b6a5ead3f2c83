//! ヘルス・GTG・ビルド情報 API

use crate::health::checks::{gtg, health_report, HealthReport};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BuildInfoResponse {
    name: &'static str,
    version: &'static str,
}

/// GET /__health
///
/// 常に200を返し、判定結果は `ok` フィールドで表す。
pub async fn get_health(State(state): State<AppState>) -> Json<HealthReport> {
    let snapshot = state.monitor.snapshot().await;
    Json(health_report(
        &state.app_info,
        &snapshot,
        state.failure_threshold,
    ))
}

/// GET /__gtg
pub async fn get_gtg(State(state): State<AppState>) -> Response {
    let snapshot = state.monitor.snapshot().await;
    let status = gtg(&snapshot);

    let no_cache = [(header::CACHE_CONTROL, "no-cache")];
    if status.good_to_go {
        (StatusCode::OK, no_cache, "OK").into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            no_cache,
            status.message.unwrap_or_default(),
        )
            .into_response()
    }
}

/// GET /__build-info
pub async fn get_build_info() -> Response {
    Json(BuildInfoResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
    .into_response()
}
