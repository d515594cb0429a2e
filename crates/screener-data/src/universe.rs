//! ティッカーユニバース読み取りモジュール.
//!
//! 東証の上場銘柄一覧 (タブ区切り、ヘッダ行あり) から処理対象の
//! 銘柄メタデータを読み取ります。列は 0 始まりの位置で参照します:
//! - 列 1: ティッカーコード
//! - 列 2: 銘柄名
//! - 列 3: 市場・商品区分 (`ETF・ETN` が除外対象)
//! - 列 5: 33業種区分
//! - 列 7: 17業種区分

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

use screener_core::types::StockMeta;

use crate::error::{DataError, Result};

/// ティッカーコードの列位置
const COL_TICKER: usize = 1;
/// 銘柄名の列位置
const COL_NAME: usize = 2;
/// 市場・商品区分の列位置
const COL_MARKET: usize = 3;
/// 33業種区分の列位置
const COL_SECTOR_33: usize = 5;
/// 17業種区分の列位置
const COL_SECTOR_17: usize = 7;

/// ユニバース読み取りオプション.
#[derive(Debug, Clone)]
pub struct UniverseOptions {
    /// 最大銘柄数 (None で全件)。除外フィルタ適用後に切り詰めます。
    pub limit: Option<usize>,
    /// ETF・ETN を含めるか (デフォルト: 含めない)
    pub include_funds: bool,
}

impl Default for UniverseOptions {
    fn default() -> Self {
        Self {
            limit: None,
            include_funds: false,
        }
    }
}

/// 上場銘柄一覧 TSV から銘柄メタデータを読み取ります。
///
/// 不完全な行 (列数不足、ティッカー空) は警告の上スキップします。
/// `include_funds` が false の場合、市場区分が ETF・ETN の行を除外します。
pub fn read_universe(path: &Path, options: &UniverseOptions) -> Result<Vec<StockMeta>> {
    let file = File::open(path)
        .map_err(|e| DataError::Io(format!("{} を開けません: {}", path.display(), e)))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    let mut excluded_funds = 0usize;
    let mut skipped_rows = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;

        // ヘッダ行
        if line_no == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() <= COL_SECTOR_17 {
            debug!(line = line_no + 1, columns = cols.len(), "列数不足の行をスキップ");
            skipped_rows += 1;
            continue;
        }

        let ticker = cols[COL_TICKER].trim();
        if ticker.is_empty() {
            skipped_rows += 1;
            continue;
        }

        let meta = StockMeta {
            ticker: ticker.to_string(),
            name: cols[COL_NAME].trim().to_string(),
            market_category: cols[COL_MARKET].trim().to_string(),
            sector_33: non_empty(cols[COL_SECTOR_33]),
            sector_17: non_empty(cols[COL_SECTOR_17]),
        };

        if !options.include_funds && meta.segment().is_fund() {
            excluded_funds += 1;
            continue;
        }

        rows.push(meta);
    }

    if skipped_rows > 0 {
        warn!(skipped = skipped_rows, "不完全な行をスキップしました");
    }

    let total_before_limit = rows.len();
    if let Some(limit) = options.limit {
        rows.truncate(limit);
    }

    info!(
        count = rows.len(),
        total = total_before_limit,
        excluded_funds = excluded_funds,
        path = %path.display(),
        "ユニバース読み取り完了"
    );

    Ok(rows)
}

/// 空文字列・プレースホルダを None に正規化.
fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || s == "-" {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "日付\tコード\t銘柄名\t市場・商品区分\t33業種コード\t33業種区分\t17業種コード\t17業種区分\t規模コード\t規模区分";

    fn write_tsv(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        write!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_read_universe_excludes_funds() {
        let path = write_tsv(
            "universe_exclude_funds.tsv",
            "20240105\t1301\t極洋\tプライム（内国株式）\t50\t水産・農林業\t1\t食品\t7\tTOPIX Small 2\n\
             20240105\t1320\tiシェアーズ・コア 日経225ETF\tETF・ETN\t-\t-\t-\t-\t-\t-\n",
        );

        let rows = read_universe(&path, &UniverseOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "1301");

        let rows = read_universe(
            &path,
            &UniverseOptions {
                include_funds: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_read_universe_limit_after_filter() {
        let path = write_tsv(
            "universe_limit.tsv",
            "20240105\t1320\tETF銘柄\tETF・ETN\t-\t-\t-\t-\t-\t-\n\
             20240105\t1301\t極洋\tプライム（内国株式）\t50\t水産・農林業\t1\t食品\t7\tTOPIX Small 2\n\
             20240105\t1332\tニッスイ\tプライム（内国株式）\t50\t水産・農林業\t1\t食品\t6\tTOPIX Mid400\n",
        );

        let rows = read_universe(
            &path,
            &UniverseOptions {
                limit: Some(1),
                include_funds: false,
            },
        )
        .unwrap();
        // 除外後の先頭 1 件 (ETF は limit の消費対象にならない)
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "1301");
    }

    #[test]
    fn test_read_universe_sector_columns() {
        let path = write_tsv(
            "universe_sectors.tsv",
            "20240105\t1301\t極洋\tプライム（内国株式）\t50\t水産・農林業\t1\t食品\t7\tTOPIX Small 2\n",
        );

        let rows = read_universe(&path, &UniverseOptions::default()).unwrap();
        assert_eq!(rows[0].sector_33.as_deref(), Some("水産・農林業"));
        assert_eq!(rows[0].sector_17.as_deref(), Some("食品"));
    }

    #[test]
    fn test_read_universe_missing_file() {
        let err = read_universe(
            Path::new("/nonexistent/data_j.tsv"),
            &UniverseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn test_read_universe_skips_short_rows() {
        let path = write_tsv(
            "universe_short_rows.tsv",
            "20240105\t1301\t極洋\n\
             20240105\t1332\tニッスイ\tプライム（内国株式）\t50\t水産・農林業\t1\t食品\t6\tTOPIX Mid400\n",
        );

        let rows = read_universe(&path, &UniverseOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "1332");
    }
}
