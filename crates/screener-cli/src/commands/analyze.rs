//! 指標分析命令.
//!
//! エクスポート済み CSV を読み戻し、指標統計・相関行列・
//! ネットキャッシュ比率上位ポートフォリオをテキストで出力します。

use anyhow::{bail, Result};
use std::path::Path;

use screener_analytics::{run_analysis, AnalysisConfig, AnalysisReport};

use crate::csv;

/// 分析を実行しレポートを表示します。
pub fn run_analyze(input: &Path, config: &AnalysisConfig) -> Result<AnalysisReport> {
    if !input.exists() {
        bail!("入力ファイルが存在しません: {}", input.display());
    }

    let rows = csv::read_analysis_rows(input)?;
    if rows.is_empty() {
        bail!("分析対象の行がありません: {}", input.display());
    }

    let report = run_analysis(&rows, config);
    print_report(&report, rows.len());

    Ok(report)
}

/// レポートをテキスト整形して出力.
fn print_report(report: &AnalysisReport, row_count: usize) {
    println!("\n分析対象: {} 銘柄", row_count);
    println!(
        "設定: top_n={}, 期間={}, 取引コスト={}, シード={}",
        report.config.top_n,
        report.config.lookback_period,
        report.config.transaction_cost,
        report.config.random_seed
    );

    println!("\n指標の統計量:");
    println!("{:-<64}", "");
    println!(
        "  {:<20} {:>10} {:>10} {:>8}",
        "指標", "平均", "標準偏差", "件数"
    );
    for summary in &report.summaries {
        println!(
            "  {:<20} {:>10} {:>10} {:>8}",
            summary.indicator,
            format_stat(summary.mean),
            format_stat(summary.std_dev),
            summary.count
        );
    }

    println!("\n指標間の相関行列:");
    println!("{:-<64}", "");
    for (i, name) in report.correlations.indicators.iter().enumerate() {
        let cells: Vec<String> = report.correlations.matrix[i]
            .iter()
            .map(|c| format_stat(*c))
            .collect();
        println!("  {:<20} {}", name, cells.join(" "));
    }

    println!(
        "\nネットキャッシュ比率上位 {} 銘柄:",
        report.config.top_n
    );
    println!("{:-<64}", "");
    for entry in &report.top_portfolio {
        println!(
            "  {} net_cash_ratio={:.4} fcf_yield={} pbr={}",
            entry.ticker,
            entry.net_cash_ratio,
            format_stat(entry.fcf_yield),
            format_stat(entry.pbr)
        );
    }

    let summary = &report.portfolio_summary;
    println!("\nポートフォリオ統計:");
    println!("  銘柄数: {}", summary.total_stocks);
    println!("  平均ネットキャッシュ比率: {}", format_stat(summary.avg_net_cash_ratio));
    println!("  平均 FCF 利回り: {}", format_stat(summary.avg_fcf_yield));
    println!("  平均 PBR: {}", format_stat(summary.avg_pbr));
}

/// 統計値の表示形式 (欠損は "-").
fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
