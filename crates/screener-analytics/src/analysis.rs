//! 指標分析パイプライン.
//!
//! エクスポート済みデータに対する探索的分析を、明示的な設定オブジェクトと
//! 型付きのステージで実行します:
//!
//! 1. **指標統計量**: 指標ごとの平均・標準偏差・非 null 件数
//! 2. **相関行列**: 指標間の Pearson 相関 (両方が非 null の行のみ使用)
//! 3. **ポートフォリオ抽出**: ネットキャッシュ比率上位 N 銘柄と平均値
//!
//! 可視化・回帰分析はスコープ外です (結果はテキストレポートとして
//! 呼び出し側が整形します)。

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 分析設定.
///
/// 分析パラメータを 1 箇所に明示します。`random_seed` は将来の
/// 機械学習ステージの再現性確保のために記録されます (現状の分析は
/// 乱数を消費しません)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 乱数シード (再現性の記録用)
    pub random_seed: u64,
    /// ネットキャッシュ比率上位 N 銘柄
    pub top_n: usize,
    /// データ取得期間ラベル
    pub lookback_period: String,
    /// 片道取引コスト (小数。0.003 = 0.3%)
    pub transaction_cost: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            random_seed: 42,
            top_n: 30,
            lookback_period: "5y".to_string(),
            transaction_cost: Decimal::new(3, 3), // 0.003
        }
    }
}

/// 分析対象の 1 銘柄分の指標値.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRow {
    /// ティッカーコード
    pub ticker: String,
    /// ネットキャッシュ比率
    pub net_cash_ratio: Option<Decimal>,
    /// FCF 利回り
    pub fcf_yield: Option<Decimal>,
    /// PBR
    pub pbr: Option<Decimal>,
    /// EV/EBIT
    pub ev_ebit: Option<Decimal>,
    /// Gross Profitability
    pub gross_profitability: Option<Decimal>,
}

/// 指標 1 列分の統計量.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSummary {
    /// 指標名
    pub indicator: String,
    /// 平均 (非 null 値が無い場合 None)
    pub mean: Option<f64>,
    /// 標本標準偏差 (非 null 値が 2 件未満の場合 None)
    pub std_dev: Option<f64>,
    /// 非 null 件数
    pub count: usize,
}

/// 指標間の相関行列.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 指標名 (行/列の順序)
    pub indicators: Vec<String>,
    /// 相関係数行列 (N×N、計算不能なセルは None)
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// 上位ポートフォリオの 1 銘柄.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// ティッカーコード
    pub ticker: String,
    /// ネットキャッシュ比率
    pub net_cash_ratio: f64,
    /// FCF 利回り
    pub fcf_yield: Option<f64>,
    /// PBR
    pub pbr: Option<f64>,
}

/// ポートフォリオ統計.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// 銘柄数
    pub total_stocks: usize,
    /// 平均ネットキャッシュ比率
    pub avg_net_cash_ratio: Option<f64>,
    /// 平均 FCF 利回り
    pub avg_fcf_yield: Option<f64>,
    /// 平均 PBR
    pub avg_pbr: Option<f64>,
}

/// 分析レポート.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// 使用した設定
    pub config: AnalysisConfig,
    /// 指標ごとの統計量
    pub summaries: Vec<IndicatorSummary>,
    /// 指標間の相関行列
    pub correlations: CorrelationMatrix,
    /// ネットキャッシュ比率上位 N 銘柄
    pub top_portfolio: Vec<PortfolioEntry>,
    /// ポートフォリオ統計
    pub portfolio_summary: PortfolioSummary,
}

/// 分析対象の指標列名 (固定順).
const INDICATOR_COLUMNS: [&str; 5] = [
    "net_cash_ratio",
    "fcf_yield",
    "pbr",
    "ev_ebit",
    "gross_profitability",
];

/// 分析パイプラインを実行します。
pub fn run_analysis(rows: &[AnalysisRow], config: &AnalysisConfig) -> AnalysisReport {
    // ステージ 1: 列抽出
    let columns: Vec<(String, Vec<Option<f64>>)> = INDICATOR_COLUMNS
        .iter()
        .map(|&name| (name.to_string(), extract_column(rows, name)))
        .collect();

    // ステージ 2: 指標統計量
    let summaries = columns
        .iter()
        .map(|(name, values)| summarize(name, values))
        .collect();

    // ステージ 3: 相関行列
    let correlations = correlation_matrix(&columns);

    // ステージ 4: 上位ポートフォリオ
    let top_portfolio = select_top_by_net_cash(rows, config.top_n);
    let portfolio_summary = summarize_portfolio(&top_portfolio);

    AnalysisReport {
        config: config.clone(),
        summaries,
        correlations,
        top_portfolio,
        portfolio_summary,
    }
}

/// 指標名で列値を抽出.
fn extract_column(rows: &[AnalysisRow], name: &str) -> Vec<Option<f64>> {
    rows.iter()
        .map(|row| {
            let value = match name {
                "net_cash_ratio" => row.net_cash_ratio,
                "fcf_yield" => row.fcf_yield,
                "pbr" => row.pbr,
                "ev_ebit" => row.ev_ebit,
                "gross_profitability" => row.gross_profitability,
                _ => None,
            };
            value.and_then(|d| d.to_f64())
        })
        .collect()
}

/// 1 列分の統計量 (平均・標本標準偏差・非 null 件数) を計算.
pub fn summarize(name: &str, values: &[Option<f64>]) -> IndicatorSummary {
    let valid: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let count = valid.len();

    if count == 0 {
        return IndicatorSummary {
            indicator: name.to_string(),
            mean: None,
            std_dev: None,
            count: 0,
        };
    }

    let mean = valid.iter().sum::<f64>() / count as f64;

    let std_dev = if count < 2 {
        None
    } else {
        let var = valid.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(var.sqrt())
    };

    IndicatorSummary {
        indicator: name.to_string(),
        mean: Some(mean),
        std_dev,
        count,
    }
}

/// Pearson 相関係数を計算.
///
/// データ不足 (2 点未満) または分散ゼロの場合は None。
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 変動が無い列は相関を定義できない
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// 指標列間の相関行列を計算.
///
/// 各ペアについて両方が非 null の行のみを使用します。
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                // 対角は定義上 1 (有効値がある場合)
                let has_values = columns[i].1.iter().any(|v| v.is_some());
                matrix[i][j] = if has_values { Some(1.0) } else { None };
                continue;
            }

            let pairs: (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1.iter())
                .filter_map(|(a, b)| a.zip(*b))
                .unzip();

            matrix[i][j] = pearson_correlation(&pairs.0, &pairs.1);
        }
    }

    CorrelationMatrix {
        indicators: columns.iter().map(|(name, _)| name.clone()).collect(),
        matrix,
    }
}

/// ネットキャッシュ比率上位 N 銘柄を抽出.
///
/// null の銘柄は除外し、降順に並べて N 件に切り詰めます。
pub fn select_top_by_net_cash(rows: &[AnalysisRow], top_n: usize) -> Vec<PortfolioEntry> {
    let mut candidates: Vec<PortfolioEntry> = rows
        .iter()
        .filter_map(|row| {
            let ratio = row.net_cash_ratio.and_then(|d| d.to_f64())?;
            Some(PortfolioEntry {
                ticker: row.ticker.clone(),
                net_cash_ratio: ratio,
                fcf_yield: row.fcf_yield.and_then(|d| d.to_f64()),
                pbr: row.pbr.and_then(|d| d.to_f64()),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.net_cash_ratio
            .partial_cmp(&a.net_cash_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(top_n);
    candidates
}

/// ポートフォリオ統計を計算.
fn summarize_portfolio(entries: &[PortfolioEntry]) -> PortfolioSummary {
    PortfolioSummary {
        total_stocks: entries.len(),
        avg_net_cash_ratio: mean_of(entries.iter().map(|e| Some(e.net_cash_ratio))),
        avg_fcf_yield: mean_of(entries.iter().map(|e| e.fcf_yield)),
        avg_pbr: mean_of(entries.iter().map(|e| e.pbr)),
    }
}

/// 非 null 値の平均.
fn mean_of(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let valid: Vec<f64> = values.flatten().collect();
    if valid.is_empty() {
        None
    } else {
        Some(valid.iter().sum::<f64>() / valid.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(ticker: &str, ncr: Option<Decimal>, fcf: Option<Decimal>, pbr: Option<Decimal>) -> AnalysisRow {
        AnalysisRow {
            ticker: ticker.to_string(),
            net_cash_ratio: ncr,
            fcf_yield: fcf,
            pbr,
            ev_ebit: None,
            gross_profitability: None,
        }
    }

    #[test]
    fn test_summarize_null_aware() {
        let values = vec![Some(1.0), None, Some(3.0)];
        let summary = summarize("net_cash_ratio", &values);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(2.0));
        assert!(summary.std_dev.is_some());

        let empty = summarize("pbr", &[None, None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.std_dev, None);
    }

    #[test]
    fn test_pearson_correlation() {
        // 完全な正相関
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let corr = pearson_correlation(&x, &y).unwrap();
        assert!((corr - 1.0).abs() < 1e-10);

        // 完全な負相関
        let y_neg = [8.0, 6.0, 4.0, 2.0];
        let corr = pearson_correlation(&x, &y_neg).unwrap();
        assert!((corr + 1.0).abs() < 1e-10);

        // 分散ゼロ
        let flat = [5.0, 5.0, 5.0, 5.0];
        assert_eq!(pearson_correlation(&x, &flat), None);

        // データ不足
        assert_eq!(pearson_correlation(&[1.0], &[2.0]), None);
    }

    #[test]
    fn test_correlation_matrix_pairwise_nulls() {
        let columns = vec![
            (
                "a".to_string(),
                vec![Some(1.0), Some(2.0), Some(3.0), None],
            ),
            (
                "b".to_string(),
                vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0)],
            ),
        ];

        let matrix = correlation_matrix(&columns);
        assert_eq!(matrix.indicators, vec!["a", "b"]);
        assert_eq!(matrix.matrix[0][0], Some(1.0));
        // null の行を除いた 3 点で計算される
        let corr = matrix.matrix[0][1].unwrap();
        assert!((corr - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_select_top_by_net_cash() {
        let rows = vec![
            row("1301", Some(dec!(0.1)), Some(dec!(0.05)), Some(dec!(1.2))),
            row("6758", Some(dec!(0.5)), None, Some(dec!(2.0))),
            row("7203", Some(dec!(0.3)), Some(dec!(0.08)), None),
            row("9999", None, Some(dec!(0.02)), Some(dec!(0.8))),
        ];

        let top = select_top_by_net_cash(&rows, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].ticker, "6758");
        assert_eq!(top[1].ticker, "7203");
    }

    #[test]
    fn test_run_analysis_report() {
        let rows = vec![
            row("1301", Some(dec!(0.1)), Some(dec!(0.05)), Some(dec!(1.2))),
            row("6758", Some(dec!(0.5)), Some(dec!(0.03)), Some(dec!(2.0))),
            row("7203", Some(dec!(0.3)), Some(dec!(0.08)), Some(dec!(1.5))),
        ];

        let config = AnalysisConfig {
            top_n: 2,
            ..Default::default()
        };
        let report = run_analysis(&rows, &config);

        assert_eq!(report.summaries.len(), 5);
        assert_eq!(report.correlations.indicators.len(), 5);
        assert_eq!(report.top_portfolio.len(), 2);
        assert_eq!(report.portfolio_summary.total_stocks, 2);
        let avg = report.portfolio_summary.avg_net_cash_ratio.unwrap();
        assert!((avg - 0.4).abs() < 1e-10);
    }
}
