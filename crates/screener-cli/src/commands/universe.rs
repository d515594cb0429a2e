//! ティッカーユニバース表示命令.
//!
//! エクスポートの処理対象となる銘柄一覧をプレビューします。

use anyhow::{bail, Result};
use std::path::Path;

use screener_data::{read_universe, UniverseOptions};

/// ユニバースを読み取り一覧表示します。件数を返します。
pub fn print_universe(input: &Path, limit: Option<usize>, include_funds: bool) -> Result<usize> {
    if !input.exists() {
        bail!("入力ファイルが存在しません: {}", input.display());
    }
    if let Some(0) = limit {
        bail!("limit は正の整数で指定してください");
    }

    let universe = read_universe(
        input,
        &UniverseOptions {
            limit,
            include_funds,
        },
    )?;

    if universe.is_empty() {
        bail!("対象銘柄がありません");
    }

    println!("\n処理対象銘柄:");
    println!("{:-<60}", "");
    for meta in &universe {
        match &meta.sector_33 {
            Some(sector) => println!("  {} - {} [{}] {}", meta.ticker, meta.name, meta.market_category, sector),
            None => println!("  {} - {} [{}]", meta.ticker, meta.name, meta.market_category),
        }
    }
    println!("{:-<60}", "");
    println!("合計: {} 銘柄", universe.len());

    Ok(universe.len())
}
