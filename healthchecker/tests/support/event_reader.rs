//! Event Reader のモック

use publish_healthchecker::config::MonitorConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 既定のコンテンツタイプに対するトランザクション一覧のパス
pub const TRANSACTIONS_PATH: &str = "/annotations/transactions";

/// Event Reader が返すトランザクション1件分のJSON
pub fn transaction_json(transaction_id: &str, uuid: &str, start_time: &str) -> Value {
    json!({
        "transaction_id": transaction_id,
        "uuid": uuid,
        "start_time": start_time,
    })
}

/// 指定したボディを200で返す Event Reader を起動する
pub async fn start_event_reader(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TRANSACTIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// 常に指定ステータスを返す Event Reader を起動する
#[allow(dead_code)]
pub async fn start_failing_event_reader(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// モックを向いた短い間隔のモニター設定
pub fn monitor_config(event_reader_url: &str) -> MonitorConfig {
    MonitorConfig {
        event_reader_url: event_reader_url.to_string(),
        check_interval: Duration::from_millis(50),
        ..MonitorConfig::default()
    }
}
