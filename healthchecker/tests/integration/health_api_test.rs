//! Integration Test: GET /__health, /__gtg, /__build-info

use crate::support::event_reader::{
    monitor_config, start_event_reader, start_failing_event_reader, transaction_json,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use publish_healthchecker::api::create_app;
use publish_healthchecker::health::checks::AppInfo;
use publish_healthchecker::health::{HealthMonitor, MonitorHandle};
use publish_healthchecker::shutdown::ShutdownController;
use publish_healthchecker::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn started_app(event_reader_url: &str) -> (Router, MonitorHandle) {
    let monitor = HealthMonitor::new(&monitor_config(event_reader_url)).unwrap();
    let handle = monitor.start().await.unwrap();
    let app = create_app(AppState {
        monitor,
        app_info: AppInfo::default(),
        failure_threshold: 2,
        shutdown: ShutdownController::default(),
    });
    (app, handle)
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

fn check<'a>(report: &'a Value, id: &str) -> &'a Value {
    report["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == id)
        .unwrap_or_else(|| panic!("check {id} missing"))
}

#[tokio::test]
async fn test_health_all_ok() {
    let server = start_event_reader(json!([])).await;
    let (app, handle) = started_app(&server.uri()).await;

    let (status, _, body) = get(app, "/__health").await;
    handle.shutdown().await;

    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["schemaVersion"], 1);
    assert_eq!(report["systemCode"], "annotations-publish-healthchecker");
    assert_eq!(report["ok"], true);
    assert_eq!(report["checks"].as_array().unwrap().len(), 2);
    assert!(report["checks"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["ok"] == true));
}

#[tokio::test]
async fn test_health_reports_degradation_at_threshold() {
    let server = start_event_reader(json!([
        transaction_json("tid1", "uuid1", "2017-02-13T11:50:00.000Z"),
        transaction_json("tid2", "uuid2", "2017-02-13T11:51:00.000Z"),
    ]))
    .await;
    let (app, handle) = started_app(&server.uri()).await;

    let (status, _, body) = get(app, "/__health").await;
    handle.shutdown().await;

    // 判定結果に関わらず200
    assert_eq!(status, StatusCode::OK);
    let report: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(report["ok"], false);

    let reachability = check(&report, "event-reader-reachable");
    assert_eq!(reachability["ok"], true);

    let failures = check(&report, "annotations-publish-failures");
    assert_eq!(failures["ok"], false);
    assert!(failures["checkOutput"]
        .as_str()
        .unwrap()
        .starts_with("Degradation detected. NO of failures: 2."));
}

#[tokio::test]
async fn test_health_reports_unreachable_event_reader() {
    let server = start_failing_event_reader(500).await;
    let (app, handle) = started_app(&server.uri()).await;

    let (_, _, body) = get(app, "/__health").await;
    handle.shutdown().await;

    let report: Value = serde_json::from_slice(&body).unwrap();
    let reachability = check(&report, "event-reader-reachable");
    assert_eq!(reachability["ok"], false);
    assert!(reachability["checkOutput"]
        .as_str()
        .unwrap()
        .starts_with("Event Reader was not reachable."));
}

#[tokio::test]
async fn test_gtg_ok_when_reachable() {
    let server = start_event_reader(json!([transaction_json(
        "tid1",
        "uuid1",
        "2017-02-13T11:50:00.000Z"
    )]))
    .await;
    let (app, handle) = started_app(&server.uri()).await;

    let (status, headers, body) = get(app, "/__gtg").await;
    handle.shutdown().await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_gtg_unavailable_when_unreachable() {
    let server = start_failing_event_reader(503).await;
    let (app, handle) = started_app(&server.uri()).await;

    let (status, headers, body) = get(app, "/__gtg").await;
    handle.shutdown().await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_build_info() {
    let server = start_event_reader(json!([])).await;
    let (app, handle) = started_app(&server.uri()).await;

    let (status, _, body) = get(app, "/__build-info").await;
    handle.shutdown().await;

    assert_eq!(status, StatusCode::OK);
    let info: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(info["name"], "publish-healthchecker");
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
}
