//! スナップショット詳細 API

use crate::common::HealthSnapshot;
use crate::AppState;
use axum::{extract::State, Json};

/// GET /__details
///
/// 最新スナップショットをそのまま返す。読み取りロックを取るだけで、
/// Event Reader への問い合わせは行わない。
pub async fn get_details(State(state): State<AppState>) -> Json<HealthSnapshot> {
    Json(state.monitor.snapshot().await)
}
