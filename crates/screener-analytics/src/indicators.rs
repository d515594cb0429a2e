//! ファンダメンタル指標計算モジュール (レシオエンジン).
//!
//! 全ての関数は入力を変更せず、欠損入力 (`None`)・ゼロ除算・
//! 算術オーバーフローに対して `None` を返します (null-in, null-out)。
//! 補完や既定値の代入は行いません。
//!
//! # 指標一覧
//!
//! | 指標 | 式 |
//! |---|---|
//! | ネットキャッシュ比率 | (現金等価物 − 有利子負債) / 時価総額 |
//! | 企業価値 (EV) | 時価総額 + (有利子負債 − 現金等価物) |
//! | ROIC | NOPAT / 投下資本 |
//! | CROIC | (営業CF − CAPEX) / 投下資本 |
//! | Gross Profitability | 売上総利益 / 総資産 |
//! | EV/EBIT | EV / EBIT |
//! | FCF 利回り | (営業CF − CAPEX) / 時価総額 |
//! | PBR | 時価総額 / 純資産 |
//! | EV/FCF | EV / (営業CF − CAPEX) |
//! | 株主還元利回り | (配当 + 自社株買い純額 + 負債削減額) / 時価総額 |
//!
//! EV 系指標 (EV/EBIT, EV/FCF) は先に計算した `enterprise_value` を
//! 引数に取ります。計算順は呼び出し側 (`enrich`) が保証します。

use rust_decimal::Decimal;

/// ネットキャッシュ比率を計算.
///
/// Formula: (現金及び現金同等物 − 有利子負債) / 時価総額
///
/// 負の値はネット負債を意味します。時価総額がゼロの場合は None。
pub fn net_cash_ratio(
    total_cash: Option<Decimal>,
    total_debt: Option<Decimal>,
    market_cap: Option<Decimal>,
) -> Option<Decimal> {
    let net_cash = total_cash?.checked_sub(total_debt?)?;
    net_cash.checked_div(market_cap?)
}

/// 企業価値 (EV: Enterprise Value) を計算.
///
/// Formula: 時価総額 + 純有利子負債
///
/// EV 系指標の前提値です。
pub fn enterprise_value(
    market_cap: Option<Decimal>,
    total_debt: Option<Decimal>,
    total_cash: Option<Decimal>,
) -> Option<Decimal> {
    let net_debt = total_debt?.checked_sub(total_cash?)?;
    market_cap?.checked_add(net_debt)
}

/// ROIC (Return on Invested Capital) を計算.
///
/// Formula: NOPAT / 投下資本
pub fn roic(nopat: Option<Decimal>, invested_capital: Option<Decimal>) -> Option<Decimal> {
    nopat?.checked_div(invested_capital?)
}

/// CROIC (Cash Return on Invested Capital) を計算.
///
/// Formula: (営業CF − CAPEX) / 投下資本
pub fn croic(
    operating_cash_flow: Option<Decimal>,
    capex: Option<Decimal>,
    invested_capital: Option<Decimal>,
) -> Option<Decimal> {
    let cash_return = operating_cash_flow?.checked_sub(capex?)?;
    cash_return.checked_div(invested_capital?)
}

/// Gross Profitability (売上総利益 / 総資産) を計算.
pub fn gross_profitability(
    gross_profit: Option<Decimal>,
    total_assets: Option<Decimal>,
) -> Option<Decimal> {
    gross_profit?.checked_div(total_assets?)
}

/// EV/EBIT を計算.
pub fn ev_ebit(enterprise_value: Option<Decimal>, ebit: Option<Decimal>) -> Option<Decimal> {
    enterprise_value?.checked_div(ebit?)
}

/// FCF 利回り (Free Cash Flow Yield) を計算.
///
/// Formula: (営業CF − CAPEX) / 時価総額
pub fn fcf_yield(
    operating_cash_flow: Option<Decimal>,
    capex: Option<Decimal>,
    market_cap: Option<Decimal>,
) -> Option<Decimal> {
    let fcf = operating_cash_flow?.checked_sub(capex?)?;
    fcf.checked_div(market_cap?)
}

/// PBR (株価純資産倍率) を計算.
///
/// Formula: 時価総額 / 純資産
pub fn pbr(market_cap: Option<Decimal>, book_value: Option<Decimal>) -> Option<Decimal> {
    market_cap?.checked_div(book_value?)
}

/// EV/FCF を計算.
///
/// Formula: EV / (営業CF − CAPEX)
pub fn ev_fcf(
    enterprise_value: Option<Decimal>,
    operating_cash_flow: Option<Decimal>,
    capex: Option<Decimal>,
) -> Option<Decimal> {
    let fcf = operating_cash_flow?.checked_sub(capex?)?;
    enterprise_value?.checked_div(fcf)
}

/// 株主還元利回り (Shareholder Yield) を計算.
///
/// Formula: (年間配当総額 + 自社株買い純額 + 負債削減額) / 時価総額
pub fn shareholder_yield(
    dividends: Option<Decimal>,
    net_buyback: Option<Decimal>,
    debt_reduction: Option<Decimal>,
    market_cap: Option<Decimal>,
) -> Option<Decimal> {
    let total_return = dividends?
        .checked_add(net_buyback?)?
        .checked_add(debt_reduction?)?;
    total_return.checked_div(market_cap?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_net_cash_ratio() {
        let result = net_cash_ratio(
            Some(dec!(500000)),
            Some(dec!(300000)),
            Some(dec!(1000000)),
        );
        assert_eq!(result, Some(dec!(0.2)));
    }

    #[test]
    fn test_net_cash_ratio_negative_is_net_debt() {
        let result = net_cash_ratio(
            Some(dec!(100000)),
            Some(dec!(300000)),
            Some(dec!(1000000)),
        );
        assert_eq!(result, Some(dec!(-0.2)));
    }

    #[test]
    fn test_net_cash_ratio_zero_market_cap() {
        let result = net_cash_ratio(Some(dec!(500000)), Some(dec!(300000)), Some(Decimal::ZERO));
        assert_eq!(result, None);
    }

    #[test]
    fn test_net_cash_ratio_null_operand() {
        assert_eq!(
            net_cash_ratio(None, Some(dec!(300000)), Some(dec!(1000000))),
            None
        );
        assert_eq!(
            net_cash_ratio(Some(dec!(500000)), None, Some(dec!(1000000))),
            None
        );
        assert_eq!(
            net_cash_ratio(Some(dec!(500000)), Some(dec!(300000)), None),
            None
        );
    }

    #[test]
    fn test_enterprise_value_identity() {
        // EV = 時価総額 + 有利子負債 − 現金等価物 (厳密一致)
        let ev = enterprise_value(
            Some(dec!(1000000)),
            Some(dec!(300000)),
            Some(dec!(500000)),
        );
        assert_eq!(ev, Some(dec!(800000)));

        let ev = enterprise_value(Some(dec!(1000000)), Some(dec!(500000)), Some(dec!(300000)));
        assert_eq!(ev, Some(dec!(1200000)));
    }

    #[test]
    fn test_enterprise_value_null_operand() {
        assert_eq!(
            enterprise_value(None, Some(dec!(300000)), Some(dec!(500000))),
            None
        );
    }

    #[test]
    fn test_roic_and_croic() {
        assert_eq!(roic(Some(dec!(120)), Some(dec!(1000))), Some(dec!(0.12)));
        assert_eq!(roic(Some(dec!(120)), Some(Decimal::ZERO)), None);
        assert_eq!(
            croic(Some(dec!(200)), Some(dec!(80)), Some(dec!(1000))),
            Some(dec!(0.12))
        );
        assert_eq!(croic(Some(dec!(200)), None, Some(dec!(1000))), None);
    }

    #[test]
    fn test_gross_profitability() {
        assert_eq!(
            gross_profitability(Some(dec!(300)), Some(dec!(1000))),
            Some(dec!(0.3))
        );
        assert_eq!(gross_profitability(Some(dec!(300)), Some(Decimal::ZERO)), None);
    }

    #[test]
    fn test_ev_ratios() {
        let ev = Some(dec!(800000));
        assert_eq!(ev_ebit(ev, Some(dec!(100000))), Some(dec!(8)));
        assert_eq!(ev_ebit(ev, Some(Decimal::ZERO)), None);
        assert_eq!(
            ev_fcf(ev, Some(dec!(150000)), Some(dec!(50000))),
            Some(dec!(8))
        );
        // FCF がゼロになる場合もゼロ除算として None
        assert_eq!(ev_fcf(ev, Some(dec!(50000)), Some(dec!(50000))), None);
    }

    #[test]
    fn test_fcf_yield() {
        assert_eq!(
            fcf_yield(Some(dec!(150000)), Some(dec!(50000)), Some(dec!(1000000))),
            Some(dec!(0.1))
        );
        assert_eq!(
            fcf_yield(Some(dec!(150000)), Some(dec!(50000)), Some(Decimal::ZERO)),
            None
        );
    }

    #[test]
    fn test_pbr() {
        assert_eq!(
            pbr(Some(dec!(1000000)), Some(dec!(800000))),
            Some(dec!(1.25))
        );
        assert_eq!(pbr(Some(dec!(1000000)), Some(Decimal::ZERO)), None);
        assert_eq!(pbr(None, Some(dec!(800000))), None);
    }

    #[test]
    fn test_shareholder_yield() {
        let result = shareholder_yield(
            Some(dec!(30000)),
            Some(dec!(10000)),
            Some(dec!(10000)),
            Some(dec!(1000000)),
        );
        assert_eq!(result, Some(dec!(0.05)));
        assert_eq!(
            shareholder_yield(Some(dec!(30000)), None, Some(dec!(10000)), Some(dec!(1000000))),
            None
        );
    }
}
