//! トランザクション取得
//!
//! Event Reader に期間指定でオープントランザクションを1回だけ問い合わせる。
//! リトライはしない（次のチェックがリトライを兼ねる）。

use crate::common::{FetchError, LookbackWindow, Transaction};
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

/// 期間開始のクエリパラメータ名
pub const EARLIEST_TIME_PARAM: &str = "earliestTime";

/// 期間終了のクエリパラメータ名
pub const LATEST_TIME_PARAM: &str = "latestTime";

/// Event Reader クライアント
#[derive(Debug, Clone)]
pub struct TransactionFetcher {
    client: Client,
    base_url: String,
}

impl TransactionFetcher {
    /// 新しいフェッチャーを作成
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// ベースアドレス
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// ログ出力用のURL（パース前の文字列）
    pub fn transactions_url(&self, content_type: &str, window: &LookbackWindow) -> String {
        format!(
            "{}/{}/transactions?{}={}&{}={}",
            self.base_url.trim_end_matches('/'),
            content_type,
            EARLIEST_TIME_PARAM,
            window.earliest,
            LATEST_TIME_PARAM,
            window.latest
        )
    }

    /// 期間内に更新されたトランザクションを取得
    ///
    /// 失敗した場合はURL付きでエラーログを1件出し、エラーを返す。
    pub async fn fetch(
        &self,
        content_type: &str,
        window: &LookbackWindow,
    ) -> Result<Vec<Transaction>, FetchError> {
        let result = self.fetch_inner(content_type, window).await;
        match &result {
            Ok(txs) => {
                debug!(
                    base_url = %self.base_url,
                    count = txs.len(),
                    "Retrieved transactions from event reader"
                );
            }
            Err(e) => {
                error!(url = %e.url(), error = %e, "Failed to retrieve transactions");
            }
        }
        result
    }

    async fn fetch_inner(
        &self,
        content_type: &str,
        window: &LookbackWindow,
    ) -> Result<Vec<Transaction>, FetchError> {
        let raw_url = format!(
            "{}/{}/transactions",
            self.base_url.trim_end_matches('/'),
            content_type
        );

        let request = self
            .client
            .get(&raw_url)
            .query(&[
                (EARLIEST_TIME_PARAM, window.earliest.as_str()),
                (LATEST_TIME_PARAM, window.latest.as_str()),
            ])
            .build()
            .map_err(|source| FetchError::InvalidUrl {
                url: self.transactions_url(content_type, window),
                source,
            })?;
        let url = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        // 接続を再利用できるよう、ステータスに関係なくボディを最後まで読み切る
        let body = response.bytes().await;

        if status != StatusCode::OK {
            return Err(FetchError::Status { url, status });
        }

        let body = body.map_err(|source| FetchError::Body {
            url: url.clone(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}
