//! # Screener Core
//!
//! 日本株スクリーナーの中核ドメインモデルおよび型を提供します。
//!
//! このクレートはスクリーナー全体で使用される基本型を提供します:
//! - 銘柄メタデータと市場区分の定義
//! - ファンダメンタル財務レコード
//! - ロギングインフラ

pub mod logging;
pub mod types;

pub use logging::*;
pub use types::*;
