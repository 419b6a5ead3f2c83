//! SLAウィンドウによるフィルタリング
//!
//! 問い合わせ時点でまだクローズされていなくても、SLAウィンドウ内に
//! 更新されたトランザクションは処理中とみなして失敗から除外する。
//!
//! 判定: `reference - last_modified < sla_window` なら除外。
//! 差がちょうど `sla_window` のものは失敗として残す。
//! 基準時刻は問い合わせ期間の終端オフセットでずらさない。

use crate::common::Transaction;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// トランザクションがまだSLAウィンドウ内かどうか
///
/// タイムスタンプをパースできない場合は `None`。
pub fn is_within_sla(
    tx: &Transaction,
    reference: DateTime<Utc>,
    sla_window: Duration,
) -> Option<bool> {
    tx.last_modified_at()
        .ok()
        .map(|modified| reference - modified < sla_window)
}

/// SLAウィンドウ内のトランザクションを除外し、失敗とみなすものだけを返す
///
/// 入力順を保持する。タイムスタンプをパースできないものは失敗として残し、
/// 1件ごとに警告ログを出す。
pub fn filter_failed_transactions(
    txs: Vec<Transaction>,
    reference: DateTime<Utc>,
    sla_window: Duration,
) -> Vec<Transaction> {
    txs.into_iter()
        .filter(|tx| match is_within_sla(tx, reference, sla_window) {
            Some(within) => !within,
            None => {
                warn!(
                    transaction_id = %tx.transaction_id,
                    timestamp = %tx.last_modified,
                    "Transaction timestamp is not parsable, keeping it as a failure"
                );
                true
            }
        })
        .collect()
}
