//! ファンダメンタル財務レコード.
//!
//! 市場データプロバイダから取得した 1 銘柄分の財務データを保持します。
//! 全フィールドは欠損を許容し (`Option`)、欠損はそのまま下流の
//! 指標計算に null として伝播します (補完・既定値代入は行いません)。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 1 銘柄分のファンダメンタル財務データ.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// ティッカーコード (取得元の形式ではなく元のコード。例: 7203)
    pub ticker: String,

    // 市場データ
    /// 時価総額
    pub market_cap: Option<Decimal>,

    // 貸借対照表
    /// 現金及び現金同等物
    pub total_cash: Option<Decimal>,
    /// 有利子負債
    pub total_debt: Option<Decimal>,
    /// 総資産
    pub total_assets: Option<Decimal>,
    /// 純資産 (株主資本)
    pub book_value: Option<Decimal>,

    // キャッシュフロー
    /// 営業キャッシュフロー
    pub operating_cash_flow: Option<Decimal>,
    /// 設備投資額 (資本的支出)
    pub capex: Option<Decimal>,

    // 損益計算書
    /// EBIT (利払前・税引前利益)
    pub ebit: Option<Decimal>,
    /// 売上総利益
    pub gross_profit: Option<Decimal>,
    /// 当期純利益
    pub net_income: Option<Decimal>,
    /// 売上高
    pub total_revenue: Option<Decimal>,

    // バリュエーション/配当
    /// 配当利回り
    pub dividend_yield: Option<Decimal>,
    /// 実績 PER
    pub trailing_pe: Option<Decimal>,
    /// 利益成長率 (小数。0.15 = 15%)
    pub earnings_growth: Option<Decimal>,
    /// 配当性向
    pub payout_ratio: Option<Decimal>,

    // 過去利益 (直近 3 期)
    /// 直近期の純利益
    pub earnings_y0: Option<Decimal>,
    /// 前期の純利益
    pub earnings_y1: Option<Decimal>,
    /// 前々期の純利益
    pub earnings_y2: Option<Decimal>,

    // メタデータ
    /// 取得時刻
    pub fetched_at: DateTime<Utc>,
}

impl FinancialRecord {
    /// 空のレコードを生成します。
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            fetched_at: Utc::now(),
            ..Default::default()
        }
    }

    /// 非 null の財務フィールド数を返します (ticker と取得時刻は数えません)。
    ///
    /// プロバイダ応答が実質的に空かどうかの判定に使用します。
    pub fn non_null_fields(&self) -> usize {
        [
            self.market_cap,
            self.total_cash,
            self.total_debt,
            self.total_assets,
            self.book_value,
            self.operating_cash_flow,
            self.capex,
            self.ebit,
            self.gross_profit,
            self.net_income,
            self.total_revenue,
            self.dividend_yield,
            self.trailing_pe,
            self.earnings_growth,
            self.payout_ratio,
            self.earnings_y0,
            self.earnings_y1,
            self.earnings_y2,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    /// 実質的にデータを持たないレコードかどうか。
    pub fn is_empty(&self) -> bool {
        self.non_null_fields() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_null_fields() {
        let mut record = FinancialRecord::new("7203");
        assert_eq!(record.non_null_fields(), 0);
        assert!(record.is_empty());

        record.market_cap = Some(dec!(1000000));
        record.total_cash = Some(dec!(500000));
        assert_eq!(record.non_null_fields(), 2);
        assert!(!record.is_empty());
    }
}
