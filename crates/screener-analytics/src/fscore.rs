//! Piotroski F スコア計算モジュール.
//!
//! 9 つの財務基準 (各 0/1 点) の合計で財務健全性を 0〜9 点に採点します:
//!
//! 1. **収益性 (4 点)**: 純利益 > 0、営業CF > 0、ROA 前年比改善、
//!    営業CF > 純利益
//! 2. **レバレッジ/流動性 (3 点)**: 長期負債の前年比減少、流動比率の
//!    前年比改善、発行済株式数が増加していない
//! 3. **営業効率 (2 点)**: 売上総利益率の前年比改善、総資産回転率の
//!    前年比改善
//!
//! 入力のいずれかが欠損している場合、スコア全体を `None` とします
//! (部分合計は行いません。欠損を 0 点扱いするとスコアの意味が
//! 変わるため、他の指標と同じ null 伝播ルールに揃えています)。

use rust_decimal::Decimal;

/// F スコア計算の入力.
///
/// 当期値と前期値のペアで構成されます。全フィールドが揃って
/// 初めてスコアが定義されます。
#[derive(Debug, Clone, Default)]
pub struct FScoreInput {
    /// 当期純利益
    pub net_income: Option<Decimal>,
    /// 営業キャッシュフロー
    pub operating_cash_flow: Option<Decimal>,
    /// 当期 ROA
    pub roa: Option<Decimal>,
    /// 前期 ROA
    pub roa_prev: Option<Decimal>,
    /// 当期長期負債
    pub long_term_debt: Option<Decimal>,
    /// 前期長期負債
    pub long_term_debt_prev: Option<Decimal>,
    /// 当期流動比率
    pub current_ratio: Option<Decimal>,
    /// 前期流動比率
    pub current_ratio_prev: Option<Decimal>,
    /// 当期発行済株式数
    pub shares_outstanding: Option<Decimal>,
    /// 前期発行済株式数
    pub shares_outstanding_prev: Option<Decimal>,
    /// 当期売上総利益率
    pub gross_margin: Option<Decimal>,
    /// 前期売上総利益率
    pub gross_margin_prev: Option<Decimal>,
    /// 当期総資産回転率
    pub asset_turnover: Option<Decimal>,
    /// 前期総資産回転率
    pub asset_turnover_prev: Option<Decimal>,
}

/// Piotroski F スコア (0〜9) を計算します。
///
/// 入力のいずれかが欠損している場合は `None` を返します。
pub fn piotroski_f_score(input: &FScoreInput) -> Option<u8> {
    let net_income = input.net_income?;
    let operating_cash_flow = input.operating_cash_flow?;
    let roa = input.roa?;
    let roa_prev = input.roa_prev?;
    let long_term_debt = input.long_term_debt?;
    let long_term_debt_prev = input.long_term_debt_prev?;
    let current_ratio = input.current_ratio?;
    let current_ratio_prev = input.current_ratio_prev?;
    let shares_outstanding = input.shares_outstanding?;
    let shares_outstanding_prev = input.shares_outstanding_prev?;
    let gross_margin = input.gross_margin?;
    let gross_margin_prev = input.gross_margin_prev?;
    let asset_turnover = input.asset_turnover?;
    let asset_turnover_prev = input.asset_turnover_prev?;

    let mut score = 0u8;

    // 収益性 (4 点)
    score += u8::from(net_income > Decimal::ZERO);
    score += u8::from(operating_cash_flow > Decimal::ZERO);
    score += u8::from(roa > roa_prev);
    score += u8::from(operating_cash_flow > net_income);

    // レバレッジ/流動性 (3 点)
    score += u8::from(long_term_debt < long_term_debt_prev);
    score += u8::from(current_ratio > current_ratio_prev);
    score += u8::from(shares_outstanding <= shares_outstanding_prev);

    // 営業効率 (2 点)
    score += u8::from(gross_margin > gross_margin_prev);
    score += u8::from(asset_turnover > asset_turnover_prev);

    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    /// 全基準を満たす入力 (9 点).
    fn perfect_input() -> FScoreInput {
        FScoreInput {
            net_income: Some(dec!(100)),
            operating_cash_flow: Some(dec!(150)),
            roa: Some(dec!(0.08)),
            roa_prev: Some(dec!(0.05)),
            long_term_debt: Some(dec!(400)),
            long_term_debt_prev: Some(dec!(500)),
            current_ratio: Some(dec!(1.8)),
            current_ratio_prev: Some(dec!(1.5)),
            shares_outstanding: Some(dec!(1000)),
            shares_outstanding_prev: Some(dec!(1000)),
            gross_margin: Some(dec!(0.35)),
            gross_margin_prev: Some(dec!(0.30)),
            asset_turnover: Some(dec!(0.9)),
            asset_turnover_prev: Some(dec!(0.8)),
        }
    }

    #[test]
    fn test_perfect_score() {
        assert_eq!(piotroski_f_score(&perfect_input()), Some(9));
    }

    #[test]
    fn test_zero_score() {
        let input = FScoreInput {
            net_income: Some(dec!(-100)),
            operating_cash_flow: Some(dec!(-150)),
            roa: Some(dec!(0.03)),
            roa_prev: Some(dec!(0.05)),
            long_term_debt: Some(dec!(600)),
            long_term_debt_prev: Some(dec!(500)),
            current_ratio: Some(dec!(1.2)),
            current_ratio_prev: Some(dec!(1.5)),
            shares_outstanding: Some(dec!(1100)),
            shares_outstanding_prev: Some(dec!(1000)),
            gross_margin: Some(dec!(0.25)),
            gross_margin_prev: Some(dec!(0.30)),
            asset_turnover: Some(dec!(0.7)),
            asset_turnover_prev: Some(dec!(0.8)),
        };
        assert_eq!(piotroski_f_score(&input), Some(0));
    }

    #[test]
    fn test_partial_criteria() {
        // 純利益プラス・営業CF プラス・営業CF > 純利益のみ満たす (3 点)
        let input = FScoreInput {
            net_income: Some(dec!(100)),
            operating_cash_flow: Some(dec!(150)),
            roa: Some(dec!(0.03)),
            roa_prev: Some(dec!(0.05)),
            long_term_debt: Some(dec!(600)),
            long_term_debt_prev: Some(dec!(500)),
            current_ratio: Some(dec!(1.2)),
            current_ratio_prev: Some(dec!(1.5)),
            shares_outstanding: Some(dec!(1100)),
            shares_outstanding_prev: Some(dec!(1000)),
            gross_margin: Some(dec!(0.25)),
            gross_margin_prev: Some(dec!(0.30)),
            asset_turnover: Some(dec!(0.7)),
            asset_turnover_prev: Some(dec!(0.8)),
        };
        assert_eq!(piotroski_f_score(&input), Some(3));
    }

    #[test]
    fn test_missing_input_yields_none() {
        let mut input = perfect_input();
        input.asset_turnover_prev = None;
        assert_eq!(piotroski_f_score(&input), None);

        let mut input = perfect_input();
        input.net_income = None;
        assert_eq!(piotroski_f_score(&input), None);
    }

    #[test]
    fn test_score_in_range() {
        // 株式数横ばいは「増加していない」として加点される
        let mut input = perfect_input();
        input.shares_outstanding = Some(dec!(999));
        let score = piotroski_f_score(&input).unwrap();
        assert!(score <= 9);
    }
}
