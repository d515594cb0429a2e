//! 派生指標の付与.
//!
//! 取得した `FinancialRecord` にレシオエンジンの派生指標列を追加します。
//! EV 系指標が参照するため `enterprise_value` を最初に計算します。
//! PSR・PEG レシオはエクスポート用の派生値としてこの層で計算します。

use rust_decimal::Decimal;

use screener_core::types::{FinancialRecord, StockMeta};

use crate::indicators;

/// 1 銘柄分の派生指標.
#[derive(Debug, Clone, Default)]
pub struct DerivedIndicators {
    /// ネットキャッシュ比率
    pub net_cash_ratio: Option<Decimal>,
    /// 企業価値 (EV)
    pub enterprise_value: Option<Decimal>,
    /// Gross Profitability
    pub gross_profitability: Option<Decimal>,
    /// FCF 利回り
    pub fcf_yield: Option<Decimal>,
    /// PBR
    pub pbr: Option<Decimal>,
    /// EV/EBIT
    pub ev_ebit: Option<Decimal>,
    /// EV/FCF
    pub ev_fcf: Option<Decimal>,
    /// PSR (時価総額 / 売上高)
    pub psr: Option<Decimal>,
    /// PEG レシオ (実績 PER / 利益成長率%)
    pub peg_ratio: Option<Decimal>,
}

impl DerivedIndicators {
    /// 財務レコードから全派生指標を計算します。
    pub fn compute(record: &FinancialRecord) -> Self {
        // EV を先に計算し、EV 系指標に渡す
        let enterprise_value =
            indicators::enterprise_value(record.market_cap, record.total_debt, record.total_cash);

        Self {
            net_cash_ratio: indicators::net_cash_ratio(
                record.total_cash,
                record.total_debt,
                record.market_cap,
            ),
            gross_profitability: indicators::gross_profitability(
                record.gross_profit,
                record.total_assets,
            ),
            fcf_yield: indicators::fcf_yield(
                record.operating_cash_flow,
                record.capex,
                record.market_cap,
            ),
            pbr: indicators::pbr(record.market_cap, record.book_value),
            ev_ebit: indicators::ev_ebit(enterprise_value, record.ebit),
            ev_fcf: indicators::ev_fcf(
                enterprise_value,
                record.operating_cash_flow,
                record.capex,
            ),
            psr: psr(record.market_cap, record.total_revenue),
            peg_ratio: peg_ratio(record.trailing_pe, record.earnings_growth),
            enterprise_value,
        }
    }
}

/// PSR (Price to Sales Ratio) = 時価総額 / 売上高.
fn psr(market_cap: Option<Decimal>, total_revenue: Option<Decimal>) -> Option<Decimal> {
    market_cap?.checked_div(total_revenue?)
}

/// PEG レシオ = 実績 PER / 利益成長率 (%).
///
/// `earnings_growth` は小数 (0.15 = 15%) のため 100 倍してから除算します。
fn peg_ratio(trailing_pe: Option<Decimal>, earnings_growth: Option<Decimal>) -> Option<Decimal> {
    let growth_pct = earnings_growth?.checked_mul(Decimal::ONE_HUNDRED)?;
    trailing_pe?.checked_div(growth_pct)
}

/// 3 期連続増益フラグ.
///
/// 3 期全てが非 null かつ y0 > y1 > y2 の場合のみ true。
/// それ以外 (欠損を含む) は false を返します (null にはしません)。
pub fn consecutive_earnings_growth(
    earnings_y0: Option<Decimal>,
    earnings_y1: Option<Decimal>,
    earnings_y2: Option<Decimal>,
) -> bool {
    match (earnings_y0, earnings_y1, earnings_y2) {
        (Some(y0), Some(y1), Some(y2)) => y0 > y1 && y1 > y2,
        _ => false,
    }
}

/// エクスポート 1 行分のデータ.
///
/// 銘柄メタデータ、取得した財務レコード、派生指標、連続増益フラグを
/// 1 銘柄分にまとめた単位です。実行ごとに構築され、CSV 出力後は
/// 保持されません。
#[derive(Debug, Clone)]
pub struct ExportRow {
    /// 銘柄メタデータ (上場銘柄一覧から結合)
    pub meta: StockMeta,
    /// 取得した財務レコード
    pub record: FinancialRecord,
    /// 派生指標
    pub indicators: DerivedIndicators,
    /// 3 期連続増益フラグ
    pub consecutive_earnings_growth: bool,
}

impl ExportRow {
    /// メタデータと財務レコードから行を組み立てます。
    pub fn new(meta: StockMeta, record: FinancialRecord) -> Self {
        let indicators = DerivedIndicators::compute(&record);
        let growth = consecutive_earnings_growth(
            record.earnings_y0,
            record.earnings_y1,
            record.earnings_y2,
        );

        Self {
            meta,
            record,
            indicators,
            consecutive_earnings_growth: growth,
        }
    }
}
