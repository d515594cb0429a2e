//! 財務データエクスポート命令.
//!
//! パイプライン: 入力検証 → ユニバース読み取り → 銘柄ごとの取得
//! (再試行付き、逐次) → メタデータ結合 → 派生指標付与 → 列順整列 →
//! タイムスタンプ付き CSV 出力。
//!
//! 取得に失敗した銘柄は出力から除外されますが実行は継続します。
//! 入力検証エラーと取得 0 件は実行全体の失敗 (非ゼロ終了) です。

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use screener_analytics::ExportRow;
use screener_data::{fetch_with_retry, read_universe, FundamentalProvider, UniverseOptions};

use crate::config::FetchConfig;
use crate::csv;
use crate::stats::ExportStats;

/// エクスポート実行パラメータ.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// 上場銘柄一覧 TSV のパス
    pub input: PathBuf,
    /// 処理する最大銘柄数 (None で全件)
    pub limit: Option<usize>,
    /// CSV 出力ディレクトリ
    pub output_dir: PathBuf,
    /// ETF・ETN を含めるか
    pub include_funds: bool,
}

/// エクスポート結果.
#[derive(Debug)]
pub struct ExportOutcome {
    /// 書き出した CSV のパス
    pub path: PathBuf,
    /// 実行統計
    pub stats: ExportStats,
}

/// エクスポートパイプラインを実行します。
pub async fn run_export(
    config: &ExportConfig,
    fetch_config: &FetchConfig,
    provider: &dyn FundamentalProvider,
) -> Result<ExportOutcome> {
    info!(
        input = %config.input.display(),
        limit = ?config.limit,
        output = %config.output_dir.display(),
        include_funds = config.include_funds,
        provider = provider.name(),
        "エクスポート開始"
    );

    // 入力検証: ここで失敗した場合は部分出力を作らない
    if !config.input.exists() {
        bail!("入力ファイルが存在しません: {}", config.input.display());
    }
    if !config.input.is_file() {
        bail!("入力パスがファイルではありません: {}", config.input.display());
    }
    if let Some(0) = config.limit {
        bail!("limit は正の整数で指定してください");
    }

    // ユニバース読み取り
    let universe = read_universe(
        &config.input,
        &UniverseOptions {
            limit: config.limit,
            include_funds: config.include_funds,
        },
    )
    .with_context(|| format!("ユニバース読み取り失敗: {}", config.input.display()))?;

    if universe.is_empty() {
        bail!("対象銘柄がありません");
    }

    // 銘柄ごとに逐次取得 (再試行付き)
    let started = Instant::now();
    let mut stats = ExportStats::new();
    let mut rows: Vec<ExportRow> = Vec::with_capacity(universe.len());

    let pb = ProgressBar::new(universe.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let total = universe.len();
    for (idx, meta) in universe.into_iter().enumerate() {
        pb.set_message(meta.ticker.clone());
        stats.total += 1;

        let fetched = fetch_with_retry(provider, &meta.ticker, fetch_config.max_retries).await;
        match fetched {
            Some(record) => {
                rows.push(ExportRow::new(meta, record));
                stats.success += 1;
            }
            None => {
                stats.errors += 1;
            }
        }

        pb.inc(1);

        // 要求間ディレイ (最後の銘柄の後は不要)
        if idx + 1 < total && fetch_config.request_delay_ms > 0 {
            tokio::time::sleep(fetch_config.request_delay()).await;
        }
    }

    pb.finish_with_message(format!("{}/{} 銘柄取得", stats.success, stats.total));

    if rows.is_empty() {
        bail!("1 銘柄も取得できませんでした");
    }

    // CSV 出力
    let path = csv::write_rows(&config.output_dir, &rows)?;

    stats.elapsed = started.elapsed();
    stats.log_summary("エクスポート");

    Ok(ExportOutcome { path, stats })
}
