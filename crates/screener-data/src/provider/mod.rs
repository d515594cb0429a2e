//! 市場データプロバイダ.
//!
//! ファンダメンタルデータの取得元を trait で抽象化し、
//! 指数バックオフ付きの再試行ラッパを提供します。

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, warn};

use screener_core::types::FinancialRecord;

use crate::error::Result;

mod yahoo;

pub use yahoo::YahooFundamentalClient;

/// ファンダメンタルデータの Provider trait.
#[async_trait]
pub trait FundamentalProvider: Send + Sync {
    /// Provider 名.
    fn name(&self) -> &str;

    /// 1 銘柄分のファンダメンタルデータ (3 期分の利益履歴を含む) を取得.
    ///
    /// 財務フィールドが 1 つも得られない応答は `DataError::NoData` とします。
    async fn fetch_fundamental(&self, ticker: &str) -> Result<FinancialRecord>;
}

/// 指数バックオフ付きでファンダメンタルデータを取得します。
///
/// 最大 `max_retries` 回試行し、試行間に 2^attempt 秒
/// (1 秒 → 2 秒 → 4 秒) 待機します。全試行が失敗した銘柄は
/// None を返し、呼び出し側で出力から除外します (実行全体は継続)。
pub async fn fetch_with_retry(
    provider: &dyn FundamentalProvider,
    ticker: &str,
    max_retries: u32,
) -> Option<FinancialRecord> {
    for attempt in 0..max_retries {
        match provider.fetch_fundamental(ticker).await {
            Ok(record) => {
                debug!(
                    ticker = ticker,
                    fields = record.non_null_fields(),
                    "取得成功"
                );
                return Some(record);
            }
            Err(e) => {
                if attempt + 1 < max_retries {
                    let wait = Duration::from_secs(1u64 << attempt);
                    warn!(
                        ticker = ticker,
                        attempt = attempt + 1,
                        max_retries = max_retries,
                        wait_secs = wait.as_secs(),
                        error = %e,
                        "取得失敗、再試行します"
                    );
                    tokio::time::sleep(wait).await;
                } else {
                    error!(
                        ticker = ticker,
                        max_retries = max_retries,
                        error = %e,
                        "全試行失敗、銘柄をスキップします"
                    );
                }
            }
        }
    }

    None
}
