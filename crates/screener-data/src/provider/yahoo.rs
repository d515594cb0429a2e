//! Yahoo Finance ファンダメンタル取得クライアント.
//!
//! quote summary API (v10) から 1 銘柄分の財務データを取得します。
//! 日本株は数字のみのティッカーに `.T` (東証) サフィックスを付与して
//! 照会します (例: 7203 → 7203.T)。
//!
//! ## 取得モジュール
//! - `price`: 時価総額
//! - `summaryDetail`: 配当利回り、実績 PER、配当性向
//! - `financialData`: 現金、負債、売上高、営業 CF、利益成長率
//! - `defaultKeyStatistics`: 純資産、純利益
//! - `incomeStatementHistory` / `balanceSheetHistory` /
//!   `cashflowStatementHistory`: EBIT、売上総利益、総資産、設備投資
//! - `earnings`: 年次利益履歴 (直近 3 期)

use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use screener_core::types::FinancialRecord;

use crate::error::{DataError, Result};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const MODULES: &str = "price,summaryDetail,financialData,defaultKeyStatistics,\
incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory,earnings";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// f64 を Decimal に変換し小数点以下 4 桁に丸める.
///
/// 金額系フィールド用。浮動小数点変換で生じる無限小数を抑えます。
fn round_decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(4))
}

/// f64 を Decimal に変換し小数点以下 6 桁に丸める.
///
/// 利回り・成長率など小数で表される比率フィールド用。
fn round_decimal_from_f64_dp6(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp(6))
}

// ==================== quote summary 応答構造 ====================

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    code: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "incomeStatementHistory")]
    income_statement_history: Option<IncomeStatementHistoryModule>,
    #[serde(rename = "balanceSheetHistory")]
    balance_sheet_history: Option<BalanceSheetHistoryModule>,
    #[serde(rename = "cashflowStatementHistory")]
    cashflow_statement_history: Option<CashflowStatementHistoryModule>,
    earnings: Option<EarningsModule>,
}

/// `{"raw": 123.0, "fmt": "123"}` 形式の数値フィールド.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawValue {
    raw: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PriceModule {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryDetailModule {
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "payoutRatio")]
    payout_ratio: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FinancialDataModule {
    #[serde(rename = "totalCash")]
    total_cash: Option<RawValue>,
    #[serde(rename = "totalDebt")]
    total_debt: Option<RawValue>,
    #[serde(rename = "totalRevenue")]
    total_revenue: Option<RawValue>,
    #[serde(rename = "operatingCashflow")]
    operating_cashflow: Option<RawValue>,
    #[serde(rename = "grossProfits")]
    gross_profits: Option<RawValue>,
    #[serde(rename = "earningsGrowth")]
    earnings_growth: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeyStatisticsModule {
    #[serde(rename = "bookValue")]
    book_value: Option<RawValue>,
    #[serde(rename = "netIncomeToCommon")]
    net_income_to_common: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncomeStatementHistoryModule {
    #[serde(rename = "incomeStatementHistory")]
    statements: Vec<IncomeStatement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncomeStatement {
    ebit: Option<RawValue>,
    #[serde(rename = "grossProfit")]
    gross_profit: Option<RawValue>,
    #[serde(rename = "netIncome")]
    net_income: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BalanceSheetHistoryModule {
    #[serde(rename = "balanceSheetStatements")]
    statements: Vec<BalanceSheetStatement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BalanceSheetStatement {
    #[serde(rename = "totalAssets")]
    total_assets: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CashflowStatementHistoryModule {
    #[serde(rename = "cashflowStatements")]
    statements: Vec<CashflowStatement>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CashflowStatement {
    #[serde(rename = "capitalExpenditures")]
    capital_expenditures: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EarningsModule {
    #[serde(rename = "financialsChart")]
    financials_chart: Option<FinancialsChart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FinancialsChart {
    yearly: Vec<YearlyEarnings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct YearlyEarnings {
    date: Option<i64>,
    earnings: Option<RawValue>,
}

// ==================== クライアント ====================

/// Yahoo Finance ファンダメンタル取得クライアント.
#[derive(Clone)]
pub struct YahooFundamentalClient {
    client: Client,
    base_url: String,
}

impl YahooFundamentalClient {
    /// 新しいクライアントを生成します。
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::ConnectionError(format!("HTTP クライアント生成失敗: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// ベース URL を差し替えます (テスト・プロキシ用)。
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Yahoo Finance 照会用シンボルを生成.
    ///
    /// 数字のみのティッカーは東証銘柄として `.T` を付与します。
    fn yahoo_symbol(ticker: &str) -> String {
        if !ticker.is_empty() && ticker.chars().all(|c| c.is_ascii_digit()) {
            format!("{}.T", ticker)
        } else {
            ticker.to_string()
        }
    }

    /// quote summary から応答本体を取得してパース.
    async fn fetch_quote_summary(&self, ticker: &str) -> Result<QuoteSummaryResult> {
        let symbol = Self::yahoo_symbol(ticker);
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        debug!(ticker = ticker, symbol = %symbol, "quote summary 照会");

        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES)])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::FetchError(format!(
                "Yahoo Finance API error: {} - {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let parsed: QuoteSummaryResponse = serde_json::from_str(&body)
            .map_err(|e| DataError::ParseError(format!("quote summary パース失敗: {}", e)))?;

        if let Some(error) = parsed.quote_summary.error {
            return Err(DataError::FetchError(format!(
                "Yahoo Finance error: {} - {}",
                error.code, error.description
            )));
        }

        parsed
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::NoData {
                ticker: ticker.to_string(),
            })
    }

    /// 応答モジュール群から FinancialRecord を組み立て.
    fn build_record(ticker: &str, result: QuoteSummaryResult) -> FinancialRecord {
        let mut record = FinancialRecord::new(ticker);

        if let Some(price) = &result.price {
            record.market_cap = raw_decimal(&price.market_cap);
        }

        if let Some(detail) = &result.summary_detail {
            record.dividend_yield = raw_rate(&detail.dividend_yield);
            record.trailing_pe = raw_decimal(&detail.trailing_pe);
            record.payout_ratio = raw_rate(&detail.payout_ratio);
        }

        if let Some(fin) = &result.financial_data {
            record.total_cash = raw_decimal(&fin.total_cash);
            record.total_debt = raw_decimal(&fin.total_debt);
            record.total_revenue = raw_decimal(&fin.total_revenue);
            record.operating_cash_flow = raw_decimal(&fin.operating_cashflow);
            record.earnings_growth = raw_rate(&fin.earnings_growth);
            record.gross_profit = raw_decimal(&fin.gross_profits);
        }

        if let Some(stats) = &result.key_statistics {
            record.book_value = raw_decimal(&stats.book_value);
            record.net_income = raw_decimal(&stats.net_income_to_common);
        }

        if let Some(history) = &result.income_statement_history {
            if let Some(latest) = history.statements.first() {
                record.ebit = raw_decimal(&latest.ebit);
                // financialData に無い場合は損益計算書から補完
                if record.gross_profit.is_none() {
                    record.gross_profit = raw_decimal(&latest.gross_profit);
                }
                if record.net_income.is_none() {
                    record.net_income = raw_decimal(&latest.net_income);
                }
            }
        }

        if let Some(history) = &result.balance_sheet_history {
            if let Some(latest) = history.statements.first() {
                record.total_assets = raw_decimal(&latest.total_assets);
            }
        }

        if let Some(history) = &result.cashflow_statement_history {
            if let Some(latest) = history.statements.first() {
                record.capex = raw_decimal(&latest.capital_expenditures);
            }
        }

        if let Some(earnings) = result.earnings {
            if let Some(chart) = earnings.financials_chart {
                // 新しい年度が先頭になるよう降順に並べ替え
                let mut yearly = chart.yearly;
                yearly.sort_by(|a, b| b.date.cmp(&a.date));

                let mut values = yearly.iter().map(|y| raw_decimal(&y.earnings));
                record.earnings_y0 = values.next().flatten();
                record.earnings_y1 = values.next().flatten();
                record.earnings_y2 = values.next().flatten();
            }
        }

        record
    }
}

impl YahooFundamentalClient {
    /// 1 銘柄分のファンダメンタルデータを取得します。
    pub async fn fetch(&self, ticker: &str) -> Result<FinancialRecord> {
        let result = self.fetch_quote_summary(ticker).await?;
        let record = Self::build_record(ticker, result);

        if record.is_empty() {
            warn!(ticker = ticker, "財務データなし");
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
            });
        }

        info!(
            ticker = ticker,
            fields = record.non_null_fields(),
            "ファンダメンタル取得成功"
        );

        Ok(record)
    }
}

#[async_trait::async_trait]
impl super::FundamentalProvider for YahooFundamentalClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_fundamental(&self, ticker: &str) -> Result<FinancialRecord> {
        self.fetch(ticker).await
    }
}

/// 金額系 RawValue を Decimal へ.
fn raw_decimal(value: &Option<RawValue>) -> Option<Decimal> {
    value
        .as_ref()
        .and_then(|v| v.raw)
        .and_then(round_decimal_from_f64)
}

/// 比率系 RawValue を Decimal へ.
fn raw_rate(value: &Option<RawValue>) -> Option<Decimal> {
    value
        .as_ref()
        .and_then(|v| v.raw)
        .and_then(round_decimal_from_f64_dp6)
}
