//! 銘柄メタデータと市場区分の定義.
//!
//! このモジュールは東証上場銘柄に関する型を定義します:
//! - `MarketSegment` - 市場区分 (プライム/スタンダード/グロース/ETF・ETN 等)
//! - `StockMeta` - 上場銘柄一覧から得られる静的メタデータ

use serde::{Deserialize, Serialize};
use std::fmt;

/// 市場区分 (東証の区分表記に基づく).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarketSegment {
    /// プライム市場
    Prime,
    /// スタンダード市場
    Standard,
    /// グロース市場
    Growth,
    /// ETF (上場投資信託) / ETN (上場投資証券)
    EtfEtn,
    /// REIT・インフラファンド等
    Reit,
    /// TOKYO PRO Market
    ProMarket,
    /// その他/不明
    #[default]
    Unknown,
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prime => write!(f, "プライム"),
            Self::Standard => write!(f, "スタンダード"),
            Self::Growth => write!(f, "グロース"),
            Self::EtfEtn => write!(f, "ETF・ETN"),
            Self::Reit => write!(f, "REIT"),
            Self::ProMarket => write!(f, "PRO Market"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl MarketSegment {
    /// 上場一覧の市場・商品区分文字列から市場区分をパース.
    pub fn parse(s: &str) -> Self {
        if s.contains("ETF") || s.contains("ETN") {
            Self::EtfEtn
        } else if s.contains("プライム") {
            Self::Prime
        } else if s.contains("スタンダード") {
            Self::Standard
        } else if s.contains("グロース") {
            Self::Growth
        } else if s.contains("REIT") || s.contains("インフラファンド") {
            Self::Reit
        } else if s.contains("PRO Market") {
            Self::ProMarket
        } else {
            Self::Unknown
        }
    }

    /// 個別株ではなくファンド商品 (ETF・ETN) かどうか。
    ///
    /// エクスポートのデフォルト除外対象です。
    pub fn is_fund(&self) -> bool {
        matches!(self, Self::EtfEtn)
    }
}

/// 上場銘柄の静的メタデータ.
///
/// 上場銘柄一覧 TSV から読み取り、取得した財務データに
/// ティッカーコードで結合されます。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMeta {
    /// ティッカーコード (例: 7203, 1301)
    pub ticker: String,
    /// 銘柄名 (例: トヨタ自動車)
    pub name: String,
    /// 市場・商品区分の生文字列 (例: プライム（内国株式）)
    pub market_category: String,
    /// 33業種区分
    pub sector_33: Option<String>,
    /// 17業種区分
    pub sector_17: Option<String>,
}

impl StockMeta {
    /// 市場区分をパースして返します。
    pub fn segment(&self) -> MarketSegment {
        MarketSegment::parse(&self.market_category)
    }
}
