//! CSV 出力・読み戻しモジュール.
//!
//! エクスポート行をタイムスタンプ付きファイル名
//! (`stock_data_YYYYMMDD_HHMMSS.csv`) で書き出します。列順は固定です:
//! ティッカー → メタデータ → 配当指標 → 利益履歴と連続増益フラグ →
//! バリュエーション → 生の財務フィールド → 派生指標。
//! null セルは空文字列で表現します。

use anyhow::{Context, Result};
use chrono::Local;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use screener_analytics::{AnalysisRow, ExportRow};

/// エクスポート CSV の列順 (固定).
pub const EXPORT_COLUMNS: [&str; 33] = [
    // ティッカー
    "ticker",
    // メタデータ
    "stock_name",
    "market_category",
    "sector_33",
    "sector_17",
    // 配当指標
    "dividend_yield",
    "payout_ratio",
    // 利益履歴と連続増益フラグ
    "earnings_y0",
    "earnings_y1",
    "earnings_y2",
    "consecutive_earnings_growth",
    // バリュエーション
    "trailing_pe",
    "psr",
    "peg_ratio",
    // 生の財務フィールド (取得順)
    "market_cap",
    "total_cash",
    "total_debt",
    "total_assets",
    "book_value",
    "operating_cash_flow",
    "capex",
    "ebit",
    "gross_profit",
    "net_income",
    "total_revenue",
    "earnings_growth",
    // 派生指標
    "net_cash_ratio",
    "enterprise_value",
    "gross_profitability",
    "fcf_yield",
    "pbr",
    "ev_ebit",
    "ev_fcf",
];

/// タイムスタンプ付きの出力パスを生成.
fn export_path(output_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("stock_data_{}.csv", timestamp))
}

/// エクスポート行を CSV ファイルに書き出します。
///
/// 出力ディレクトリが無ければ作成します。書き出したパスを返します。
pub fn write_rows(output_dir: &Path, rows: &[ExportRow]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("出力ディレクトリを作成できません: {}", output_dir.display()))?;

    let path = export_path(output_dir);
    let file = File::create(&path)
        .with_context(|| format!("出力ファイルを作成できません: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", EXPORT_COLUMNS.join(","))?;

    for row in rows {
        writeln!(writer, "{}", row_cells(row).join(","))?;
    }

    writer.flush()?;

    info!(rows = rows.len(), path = %path.display(), "CSV エクスポート完了");

    Ok(path)
}

/// 1 行分のセル値を列順どおりに並べる.
fn row_cells(row: &ExportRow) -> Vec<String> {
    let record = &row.record;
    let derived = &row.indicators;

    vec![
        row.meta.ticker.clone(),
        row.meta.name.clone(),
        row.meta.market_category.clone(),
        row.meta.sector_33.clone().unwrap_or_default(),
        row.meta.sector_17.clone().unwrap_or_default(),
        cell(record.dividend_yield),
        cell(record.payout_ratio),
        cell(record.earnings_y0),
        cell(record.earnings_y1),
        cell(record.earnings_y2),
        row.consecutive_earnings_growth.to_string(),
        cell(record.trailing_pe),
        cell(derived.psr),
        cell(derived.peg_ratio),
        cell(record.market_cap),
        cell(record.total_cash),
        cell(record.total_debt),
        cell(record.total_assets),
        cell(record.book_value),
        cell(record.operating_cash_flow),
        cell(record.capex),
        cell(record.ebit),
        cell(record.gross_profit),
        cell(record.net_income),
        cell(record.total_revenue),
        cell(record.earnings_growth),
        cell(derived.net_cash_ratio),
        cell(derived.enterprise_value),
        cell(derived.gross_profitability),
        cell(derived.fcf_yield),
        cell(derived.pbr),
        cell(derived.ev_ebit),
        cell(derived.ev_fcf),
    ]
}

/// null セルは空文字列.
fn cell(value: Option<Decimal>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}

/// エクスポート済み CSV を分析用の行として読み戻します。
///
/// 列はヘッダ名で参照するため、列順の変更には追従します。
pub fn read_analysis_rows(path: &Path) -> Result<Vec<AnalysisRow>> {
    let file = File::open(path)
        .with_context(|| format!("入力ファイルを開けません: {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .context("ヘッダ行がありません")?;
    let index: HashMap<String, usize> = header
        .split(',')
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();

    let mut rows = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split(',').collect();

        rows.push(AnalysisRow {
            ticker: column_text(&cols, &index, "ticker"),
            net_cash_ratio: column_decimal(&cols, &index, "net_cash_ratio"),
            fcf_yield: column_decimal(&cols, &index, "fcf_yield"),
            pbr: column_decimal(&cols, &index, "pbr"),
            ev_ebit: column_decimal(&cols, &index, "ev_ebit"),
            gross_profitability: column_decimal(&cols, &index, "gross_profitability"),
        });
    }

    Ok(rows)
}

fn column_text(cols: &[&str], index: &HashMap<String, usize>, name: &str) -> String {
    index
        .get(name)
        .and_then(|&i| cols.get(i))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn column_decimal(cols: &[&str], index: &HashMap<String, usize>, name: &str) -> Option<Decimal> {
    index
        .get(name)
        .and_then(|&i| cols.get(i))
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use screener_core::types::{FinancialRecord, StockMeta};

    fn sample_row(ticker: &str) -> ExportRow {
        let meta = StockMeta {
            ticker: ticker.to_string(),
            name: "テスト銘柄".to_string(),
            market_category: "プライム（内国株式）".to_string(),
            sector_33: Some("水産・農林業".to_string()),
            sector_17: None,
        };
        let mut record = FinancialRecord::new(ticker);
        record.market_cap = Some(dec!(1000000));
        record.total_cash = Some(dec!(500000));
        record.total_debt = Some(dec!(300000));
        ExportRow::new(meta, record)
    }

    #[test]
    fn test_round_trip_preserves_tickers() {
        let dir = std::env::temp_dir().join("screener_csv_round_trip");
        let rows = vec![sample_row("1301"), sample_row("6758"), sample_row("7203")];

        let path = write_rows(&dir, &rows).unwrap();
        let read_back = read_analysis_rows(&path).unwrap();

        assert_eq!(read_back.len(), rows.len());
        let tickers: Vec<&str> = read_back.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["1301", "6758", "7203"]);
        // 派生指標も値ごと往復する
        assert_eq!(read_back[0].net_cash_ratio, Some(dec!(0.2)));
    }

    #[test]
    fn test_header_matches_column_order() {
        let dir = std::env::temp_dir().join("screener_csv_header");
        let path = write_rows(&dir, &[sample_row("1301")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, EXPORT_COLUMNS.join(","));
        assert!(header.starts_with("ticker,stock_name,market_category"));
    }

    #[test]
    fn test_null_cells_are_empty() {
        let dir = std::env::temp_dir().join("screener_csv_nulls");
        // sample_row は ebit 未設定のため EV/EBIT は null
        let path = write_rows(&dir, &[sample_row("1301")]).unwrap();
        let read_back = read_analysis_rows(&path).unwrap();

        assert_eq!(read_back[0].ev_ebit, None);
        // net_cash_ratio は値を持つ
        assert!(read_back[0].net_cash_ratio.is_some());
    }
}
