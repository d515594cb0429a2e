//! # Screener Analytics
//!
//! ファンダメンタル指標の計算エンジンを提供します。
//!
//! ## 設計原則
//!
//! - **純粋計算**: このクレートは外部システムを知らない純粋ロジック層です。
//!   `screener-core` (ドメイン型) のみに依存します。
//! - **null 伝播**: 全ての計算は欠損入力・ゼロ除算に対して例外を送出せず、
//!   該当セルのみ null (`None`) を返します。
//!
//! ## 公開 API
//!
//! - `indicators`: 指標計算関数群 (レシオエンジン)
//! - `fscore`: Piotroski F スコア
//! - `enrich`: 取得レコードへの派生指標付与
//! - `analysis`: 指標の統計・相関・ポートフォリオ分析

pub mod analysis;
pub mod enrich;
pub mod fscore;
pub mod indicators;

pub use analysis::{run_analysis, AnalysisConfig, AnalysisReport, AnalysisRow};
pub use enrich::{consecutive_earnings_growth, DerivedIndicators, ExportRow};
pub use fscore::{piotroski_f_score, FScoreInput};
