//! トランザクション・スナップショット型定義
//!
//! Event Reader から取得するトランザクションと、公開されるヘルススナップショット

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event Reader が返すオープン（未クローズ）トランザクション
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// トランザクションID
    pub transaction_id: String,
    /// コンテンツUUID
    pub uuid: String,
    /// 最終更新時刻（RFC 3339、ナノ秒精度）
    ///
    /// パースできない値もそのまま保持する。
    #[serde(rename = "start_time")]
    pub last_modified: String,
}

impl Transaction {
    /// 新しいトランザクションを作成
    pub fn new(
        transaction_id: impl Into<String>,
        uuid: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            uuid: uuid.into(),
            last_modified: last_modified.into(),
        }
    }

    /// 最終更新時刻をパースする
    pub fn last_modified_at(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.last_modified).map(|t| t.with_timezone(&Utc))
    }
}

/// 問い合わせ期間（現在時刻からの相対指定）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookbackWindow {
    /// 開始（例: "-15m"）
    pub earliest: String,
    /// 終了（例: "-5m"）
    pub latest: String,
}

impl LookbackWindow {
    /// 新しい問い合わせ期間を作成
    pub fn new(earliest: impl Into<String>, latest: impl Into<String>) -> Self {
        Self {
            earliest: earliest.into(),
            latest: latest.into(),
        }
    }

    /// スナップショットに載せる期間の説明
    pub fn describe(&self) -> String {
        format!("Between {} and {}", self.earliest, self.latest)
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self::new("-15m", "-5m")
    }
}

/// 直近のヘルスチェック結果
///
/// 常に丸ごと置き換えられ、フィールド単位で更新されることはない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthSnapshot {
    /// SLA ウィンドウを超えて未クローズのトランザクション
    #[serde(rename = "failed_transactions")]
    pub open_transactions: Vec<Transaction>,
    /// 問い合わせ期間の説明（例: "Between -15m and -5m"）
    #[serde(rename = "event_reader_checking_period")]
    pub checking_period: String,
    /// チェック実行時刻（未チェックなら None）
    #[serde(rename = "event_reader_checking_time")]
    pub checked_at: Option<DateTime<Utc>>,
    /// Event Reader に到達できたか
    #[serde(rename = "event_reader_was_reachable")]
    pub reachable: bool,
}

impl HealthSnapshot {
    /// 起動直後の未チェック状態
    pub fn unchecked(checking_period: impl Into<String>) -> Self {
        Self {
            open_transactions: Vec::new(),
            checking_period: checking_period.into(),
            checked_at: None,
            reachable: false,
        }
    }

    /// 取得に成功したチェック結果
    pub fn reachable(
        open_transactions: Vec<Transaction>,
        checking_period: impl Into<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            open_transactions,
            checking_period: checking_period.into(),
            checked_at: Some(checked_at),
            reachable: true,
        }
    }

    /// 取得に失敗したチェック結果（失敗リストは常に空）
    pub fn unreachable(checking_period: impl Into<String>, checked_at: DateTime<Utc>) -> Self {
        Self {
            open_transactions: Vec::new(),
            checking_period: checking_period.into(),
            checked_at: Some(checked_at),
            reachable: false,
        }
    }

    /// 失敗トランザクション数
    pub fn failure_count(&self) -> usize {
        self.open_transactions.len()
    }

    /// ヘルスチェック出力用のチェック時刻表記
    pub fn checked_at_display(&self) -> String {
        match self.checked_at {
            Some(t) => t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            None => "never".to_string(),
        }
    }
}
