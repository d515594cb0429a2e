//! 日本株ファンダメンタルスクリーナー CLI.
//!
//! # 使用例
//!
//! ```bash
//! # 先頭 5 銘柄だけエクスポート (動作確認用)
//! screener export --input data/data_j.tsv --limit 5
//!
//! # 全銘柄をエクスポート (ETF・ETN は除外)
//! screener export --output data/exports
//!
//! # ETF・ETN も含める
//! screener export --include-etf
//!
//! # 処理対象のプレビュー
//! screener universe --limit 20
//!
//! # エクスポート済み CSV の指標分析
//! screener analyze --input data/exports/stock_data_20240105_093000.csv
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use screener_analytics::AnalysisConfig;
use screener_cli::commands;
use screener_cli::commands::export::{run_export, ExportConfig};
use screener_cli::config::FetchConfig;
use screener_core::logging::{init_logging, LogConfig};
use screener_data::YahooFundamentalClient;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "日本株スクリーナー - ファンダメンタル指標付き CSV エクスポート", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// ログレベル (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 財務データを取得し指標付き CSV をエクスポート
    Export {
        /// 上場銘柄一覧 TSV のパス
        #[arg(short, long, default_value = "data/data_j.tsv")]
        input: PathBuf,

        /// 処理する最大銘柄数 (未指定で全件)
        #[arg(short, long)]
        limit: Option<usize>,

        /// CSV 出力ディレクトリ (自動作成)
        #[arg(short, long, default_value = "data/exports")]
        output: PathBuf,

        /// ETF・ETN を含める (デフォルト: 個別株のみ)
        #[arg(long, default_value = "false")]
        include_etf: bool,
    },

    /// エクスポートの処理対象となる銘柄一覧を表示
    Universe {
        /// 上場銘柄一覧 TSV のパス
        #[arg(short, long, default_value = "data/data_j.tsv")]
        input: PathBuf,

        /// 表示する最大銘柄数 (未指定で全件)
        #[arg(short, long)]
        limit: Option<usize>,

        /// ETF・ETN を含める
        #[arg(long, default_value = "false")]
        include_etf: bool,
    },

    /// エクスポート済み CSV の指標分析
    Analyze {
        /// エクスポート済み CSV のパス
        #[arg(short, long)]
        input: PathBuf,

        /// ネットキャッシュ比率上位 N 銘柄 (デフォルト: 30)
        #[arg(long)]
        top_n: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ロギング初期化
    init_logging(LogConfig::new(cli.log_level.as_str()))?;

    match cli.command {
        Commands::Export {
            input,
            limit,
            output,
            include_etf,
        } => {
            let fetch_config = FetchConfig::from_env();
            let provider = YahooFundamentalClient::new()?;

            let export_config = ExportConfig {
                input,
                limit,
                output_dir: output,
                include_funds: include_etf,
            };

            match run_export(&export_config, &fetch_config, &provider).await {
                Ok(outcome) => {
                    info!(
                        path = %outcome.path.display(),
                        success = outcome.stats.success,
                        "Export completed"
                    );
                    println!("\nエクスポート完了: {}", outcome.path.display());
                    println!(
                        "取得: {}/{} 銘柄 (失敗 {})",
                        outcome.stats.success, outcome.stats.total, outcome.stats.errors
                    );
                }
                Err(e) => {
                    error!("Export failed: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::Universe {
            input,
            limit,
            include_etf,
        } => match commands::universe::print_universe(&input, limit, include_etf) {
            Ok(count) => {
                info!(count = count, "Universe listed");
            }
            Err(e) => {
                error!("Universe listing failed: {}", e);
                return Err(e.into());
            }
        },

        Commands::Analyze { input, top_n } => {
            let mut config = AnalysisConfig::default();
            if let Some(n) = top_n {
                config.top_n = n;
            }

            match commands::analyze::run_analyze(&input, &config) {
                Ok(_) => {
                    info!("Analysis completed");
                }
                Err(e) => {
                    error!("Analysis failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
