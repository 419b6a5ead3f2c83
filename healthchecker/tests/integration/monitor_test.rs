//! Integration Test: ヘルスモニター
//!
//! 定期チェック → スナップショット更新 → 停止後は問い合わせなし

use crate::support::event_reader::{monitor_config, transaction_json, TRANSACTIONS_PATH};
use publish_healthchecker::config::MonitorConfig;
use publish_healthchecker::health::HealthMonitor;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_until<F, Fut>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_monitor_queries_lookback_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TRANSACTIONS_PATH))
        .and(query_param("earliestTime", "-15m"))
        .and(query_param("latestTime", "-5m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1..)
        .mount(&server)
        .await;

    let monitor = HealthMonitor::new(&monitor_config(&server.uri())).unwrap();
    let handle = monitor.start().await.unwrap();
    handle.shutdown().await;

    let snapshot = monitor.snapshot().await;
    assert!(snapshot.reachable);
    assert_eq!(snapshot.checking_period, "Between -15m and -5m");
}

#[tokio::test]
async fn test_monitor_refreshes_periodically() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TRANSACTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json(
            "tid_stuck",
            "uuid1",
            "2017-02-13T11:50:00.000Z"
        )])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TRANSACTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let monitor = HealthMonitor::new(&monitor_config(&server.uri())).unwrap();
    let handle = monitor.start().await.unwrap();

    let initial = monitor.snapshot().await;
    assert_eq!(initial.failure_count(), 1);
    assert_eq!(initial.open_transactions[0].transaction_id, "tid_stuck");

    let refreshed = wait_until(Duration::from_secs(3), || {
        let monitor = monitor.clone();
        async move { monitor.snapshot().await.failure_count() == 0 }
    })
    .await;
    assert!(refreshed, "snapshot was not refreshed by the background loop");

    let later = monitor.snapshot().await;
    assert!(later.checked_at > initial.checked_at);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_monitor_reports_unreachable_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([transaction_json(
            "tid1",
            "uuid1",
            "2017-02-13T11:50:00.000Z"
        )])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let monitor = HealthMonitor::new(&monitor_config(&server.uri())).unwrap();
    let handle = monitor.start().await.unwrap();
    assert!(monitor.snapshot().await.reachable);

    let flipped = wait_until(Duration::from_secs(3), || {
        let monitor = monitor.clone();
        async move { !monitor.snapshot().await.reachable }
    })
    .await;
    assert!(flipped, "snapshot never reported the Event Reader as unreachable");

    // 到達不能時は前回の失敗リストを引き継がない
    let snapshot = monitor.snapshot().await;
    assert!(snapshot.open_transactions.is_empty());
    assert!(snapshot.checked_at.is_some());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_monitor_stops_querying_after_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let monitor = HealthMonitor::new(&monitor_config(&server.uri())).unwrap();
    let handle = monitor.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    handle.shutdown().await;
    let after_stop = server.received_requests().await.unwrap().len();
    assert!(after_stop >= 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), after_stop);
}

#[tokio::test]
async fn test_stop_request_is_observable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let monitor = HealthMonitor::new(&monitor_config(&server.uri())).unwrap();
    let handle = monitor.start().await.unwrap();
    assert!(!handle.is_stop_requested());

    handle.stop();
    assert!(handle.is_stop_requested());
    handle.shutdown().await;
}

#[tokio::test]
async fn test_fetch_timeout_marks_event_reader_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = MonitorConfig {
        fetch_timeout: Some(Duration::from_millis(100)),
        ..monitor_config(&server.uri())
    };
    let monitor = HealthMonitor::new(&config).unwrap();
    let snapshot = monitor.refresh().await;

    assert!(!snapshot.reachable);
    assert_eq!(monitor.snapshot().await, snapshot);
}
