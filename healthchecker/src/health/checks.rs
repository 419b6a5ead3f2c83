//! ヘルスチェック集約
//!
//! スナップショットから `/__health` 用のチェック結果と GTG（good to go）を作る。
//! どれもスナップショットだけを見る純粋関数で、I/O は行わない。

use crate::common::HealthSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// ヘルスJSONのスキーマバージョン
pub const HEALTH_SCHEMA_VERSION: u32 = 1;

const PANIC_GUIDE: &str = "https://dewey.ft.com/annotations-publish-healthchecker.html";

/// 1件のチェック結果
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// チェックID
    pub id: &'static str,
    /// チェック名
    pub name: &'static str,
    /// 成否
    pub ok: bool,
    /// 重要度（1が最も高い）
    pub severity: u8,
    /// ビジネス影響
    pub business_impact: &'static str,
    /// 技術的概要
    pub technical_summary: &'static str,
    /// 対応手順
    pub panic_guide: &'static str,
    /// 出力メッセージ
    pub check_output: String,
    /// 判定に使ったスナップショットの時刻
    pub last_updated: Option<DateTime<Utc>>,
}

/// ヘルスJSON全体
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// スキーマバージョン
    pub schema_version: u32,
    /// システムコード
    pub system_code: String,
    /// アプリケーション名
    pub name: String,
    /// 説明
    pub description: String,
    /// チェック結果
    pub checks: Vec<CheckResult>,
    /// 全チェックが成功したか
    pub ok: bool,
}

/// GTG判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodToGo {
    /// 利用可能か
    pub good_to_go: bool,
    /// 不可の場合の理由
    pub message: Option<String>,
}

/// Event Reader 到達性チェック
pub fn reachability_check(snapshot: &HealthSnapshot) -> CheckResult {
    let latest = format!("Latest check at: {}", snapshot.checked_at_display());
    let check_output = if snapshot.reachable {
        format!("Event Reader was reachable. {}", latest)
    } else {
        format!("Event Reader was not reachable. {}", latest)
    };

    CheckResult {
        id: "event-reader-reachable",
        name: "Event Reader is reachable",
        ok: snapshot.reachable,
        severity: 1,
        business_impact:
            "Shows whether this service can monitor the success of the annotations publishing",
        technical_summary: "This check verifies whether the latest call to the event reader was successful, hence the results are relevant",
        panic_guide: PANIC_GUIDE,
        check_output,
        last_updated: snapshot.checked_at,
    }
}

/// 公開失敗件数チェック
///
/// 失敗件数が `threshold` 以上ならデグレードとみなす。
pub fn failed_transactions_check(snapshot: &HealthSnapshot, threshold: usize) -> CheckResult {
    let count = snapshot.failure_count();
    let summary = format!(
        "NO of failures: {}. Latest check at: {}",
        count,
        snapshot.checked_at_display()
    );
    let degraded = count >= threshold;
    let check_output = if degraded {
        format!("Degradation detected. {}", summary)
    } else {
        format!("No degradation detected. {}", summary)
    };

    CheckResult {
        id: "annotations-publish-failures",
        name: "Annotations Publish Failures",
        ok: !degraded,
        severity: 1,
        business_impact: "Publish failures were detected for the latest check. This will reflect in the SLA measurement.",
        technical_summary: "Annotations publishes failed. There is a degradation in the annotations publish or monitoring services. Check the /__details endpoint.",
        panic_guide: PANIC_GUIDE,
        check_output,
        last_updated: snapshot.checked_at,
    }
}

/// GTG判定（到達性チェックのみで決まる）
pub fn gtg(snapshot: &HealthSnapshot) -> GoodToGo {
    let check = reachability_check(snapshot);
    if check.ok {
        GoodToGo {
            good_to_go: true,
            message: None,
        }
    } else {
        GoodToGo {
            good_to_go: false,
            message: Some(check.check_output),
        }
    }
}

/// アプリケーション情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    /// システムコード
    pub system_code: String,
    /// アプリケーション名
    pub name: String,
    /// 説明
    pub description: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            system_code: "annotations-publish-healthchecker".to_string(),
            name: "Annotations Publish Healthchecker".to_string(),
            description:
                "Service that reports whether the annotations publishing flow works as expected."
                    .to_string(),
        }
    }
}

/// ヘルスJSONを組み立てる
pub fn health_report(app: &AppInfo, snapshot: &HealthSnapshot, threshold: usize) -> HealthReport {
    let checks = vec![
        reachability_check(snapshot),
        failed_transactions_check(snapshot, threshold),
    ];
    let ok = checks.iter().all(|c| c.ok);

    HealthReport {
        schema_version: HEALTH_SCHEMA_VERSION,
        system_code: app.system_code.clone(),
        name: app.name.clone(),
        description: app.description.clone(),
        checks,
        ok,
    }
}
