use crate::domain::attributes::StockAttributes;
use crate::domain::preferences::RiskAppetite;
use crate::domain::recommendation::{PriceGuidance, StrategyLabel};
use crate::engine::scorer::finite_or_zero;

const MIN_VOLATILITY_FACTOR: f64 = 0.5;

/// Base (buy discount, profit target, stop loss) fractions per risk tier,
/// before scaling by the volatility factor.
fn base_fractions(risk: RiskAppetite) -> (f64, f64, f64) {
    match risk {
        RiskAppetite::Low => (0.03, 0.08, 0.05),
        RiskAppetite::High => (0.08, 0.25, 0.12),
        RiskAppetite::Medium | RiskAppetite::Unrecognized => (0.05, 0.15, 0.08),
    }
}

/// Two decimals, exact ties to even.
fn round_price(v: f64) -> f64 {
    ((v * 100.0).round_ties_even() / 100.0).max(0.0)
}

/// Buy/sell/stop-loss targets and strategy labels for one symbol.
pub fn guidance(attrs: &StockAttributes, risk: RiskAppetite, horizon_years: u32) -> PriceGuidance {
    let beta = attrs.effective_beta();
    let price = finite_or_zero(attrs.current_price);
    let change = finite_or_zero(attrs.change_percent);
    let dividend_yield = finite_or_zero(attrs.dividend_yield);

    let volatility = beta.max(MIN_VOLATILITY_FACTOR);
    let (base_discount, base_target, base_stop) = base_fractions(risk);
    let mut buy_discount = base_discount * volatility;
    let mut profit_target = base_target * volatility;
    let mut stop_loss = base_stop * volatility;

    if change > 5.0 {
        buy_discount += 0.02;
    } else if change < -5.0 {
        buy_discount += 0.01;
        stop_loss += 0.02;
    }

    if horizon_years > 5 {
        profit_target *= 1.5;
        buy_discount *= 1.2;
    } else if horizon_years < 2 {
        profit_target *= 0.7;
        stop_loss *= 0.8;
    }

    PriceGuidance {
        buy_target: round_price(price * (1.0 - buy_discount)),
        sell_target: round_price(price * (1.0 + profit_target)),
        stop_loss: round_price(price * (1.0 - stop_loss)),
        labels: strategy_labels(beta, risk, horizon_years, dividend_yield, change),
    }
}

/// One core label, then the situational ones. Order matters: it is the order
/// of the joined strategy string.
fn strategy_labels(
    beta: f64,
    risk: RiskAppetite,
    horizon_years: u32,
    dividend_yield: f64,
    change: f64,
) -> Vec<StrategyLabel> {
    let core = if beta < 0.8 && risk == RiskAppetite::Low {
        StrategyLabel::BuyAndHold
    } else if beta > 1.5 && risk == RiskAppetite::High {
        StrategyLabel::MomentumTrading
    } else if beta > 1.2 && risk == RiskAppetite::Medium {
        StrategyLabel::SwingTrading
    } else {
        StrategyLabel::PositionTrading
    };

    let mut labels = vec![core];
    if dividend_yield * 100.0 >= 3.0 {
        labels.push(StrategyLabel::IncomeGenerator);
    }
    if change > 4.0 {
        labels.push(StrategyLabel::WaitForPullback);
    } else if change < -4.0 {
        labels.push(StrategyLabel::BuyIncrementally);
    }
    if horizon_years > 5 && beta < 1.3 {
        labels.push(StrategyLabel::LongTermInvestment);
    }
    if horizon_years < 2 {
        labels.push(StrategyLabel::MonitorClosely);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(price: f64, beta: f64, dividend_yield: f64, change_percent: f64) -> StockAttributes {
        StockAttributes {
            current_price: price,
            beta: Some(beta),
            dividend_yield,
            change_percent,
            market_cap: Some(1.0e10),
            sector: Some("technology".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn medium_risk_baseline_targets() {
        let g = guidance(&stock(100.0, 1.0, 0.0, 0.0), RiskAppetite::Medium, 4);
        assert_eq!(g.buy_target, 95.0);
        assert_eq!(g.sell_target, 115.0);
        assert_eq!(g.stop_loss, 92.0);
        assert_eq!(g.strategy(), "Position trading");
    }

    #[test]
    fn low_beta_is_floored_at_half() {
        let floored = guidance(&stock(100.0, 0.2, 0.0, 0.0), RiskAppetite::Low, 4);
        let half = guidance(&stock(100.0, 0.5, 0.0, 0.0), RiskAppetite::Low, 4);
        assert_eq!(floored.buy_target, half.buy_target);
        assert_eq!(floored.sell_target, half.sell_target);
        assert_eq!(floored.stop_loss, half.stop_loss);
        assert_eq!(floored.buy_target, 98.5);
    }

    #[test]
    fn short_horizon_tightens_stop_loss() {
        let short = guidance(&stock(100.0, 2.5, 0.0, 0.0), RiskAppetite::High, 1);
        let long = guidance(&stock(100.0, 2.5, 0.0, 0.0), RiskAppetite::High, 8);

        assert_eq!(short.stop_loss, 76.0);
        assert_eq!(long.stop_loss, 70.0);
        assert!(short.stop_loss > long.stop_loss);
        assert!(((100.0 - short.stop_loss) - 0.8 * (100.0 - long.stop_loss)).abs() < 1e-9);

        assert_eq!(short.sell_target, 143.75);
        assert_eq!(long.sell_target, 193.75);
        assert_eq!(long.buy_target, 76.0);
    }

    #[test]
    fn momentum_adjusts_discount_and_stop() {
        let rally = guidance(&stock(100.0, 1.0, 0.0, 6.0), RiskAppetite::Medium, 4);
        assert_eq!(rally.buy_target, 93.0);
        assert_eq!(rally.stop_loss, 92.0);

        let selloff = guidance(&stock(100.0, 1.0, 0.0, -6.0), RiskAppetite::Medium, 4);
        assert_eq!(selloff.buy_target, 94.0);
        assert_eq!(selloff.stop_loss, 90.0);
    }

    #[test]
    fn strategy_labels_follow_check_order() {
        let g = guidance(&stock(100.0, 0.7, 0.03, 1.0), RiskAppetite::Low, 7);
        assert_eq!(g.strategy(), "Buy and hold | Income generator | Long-term investment");

        let g = guidance(&stock(100.0, 1.8, 0.0, 4.5), RiskAppetite::High, 1);
        assert_eq!(g.strategy(), "Momentum trading | Wait for pullback | Monitor closely");

        let g = guidance(&stock(100.0, 1.25, 0.04, -4.5), RiskAppetite::Medium, 3);
        assert_eq!(g.strategy(), "Swing trading | Income generator | Buy incrementally");
    }

    #[test]
    fn core_label_requires_matching_risk() {
        let g = guidance(&stock(100.0, 1.8, 0.0, 0.0), RiskAppetite::Medium, 3);
        assert_eq!(g.labels, vec![StrategyLabel::SwingTrading]);

        let g = guidance(&stock(100.0, 1.8, 0.0, 0.0), RiskAppetite::Low, 3);
        assert_eq!(g.labels, vec![StrategyLabel::PositionTrading]);
    }

    #[test]
    fn buy_below_price_below_sell() {
        for beta in [0.3, 0.9, 1.4, 2.2] {
            for risk in [RiskAppetite::Low, RiskAppetite::Medium, RiskAppetite::High] {
                for horizon in [1, 4, 10] {
                    let g = guidance(&stock(250.0, beta, 0.01, 0.5), risk, horizon);
                    assert!(g.buy_target < 250.0, "{beta} {risk} {horizon}");
                    assert!(g.sell_target > 250.0, "{beta} {risk} {horizon}");
                    assert!(g.stop_loss < 250.0, "{beta} {risk} {horizon}");
                }
            }
        }
    }

    #[test]
    fn missing_price_and_beta_degrade_without_panicking() {
        let attrs = StockAttributes::default();
        let g = guidance(&attrs, RiskAppetite::Medium, 4);
        assert_eq!(g.buy_target, 0.0);
        assert_eq!(g.sell_target, 0.0);
        assert_eq!(g.stop_loss, 0.0);
        assert_eq!(g.labels, vec![StrategyLabel::PositionTrading]);
    }

    #[test]
    fn prices_never_go_negative() {
        let g = guidance(&stock(100.0, 12.0, 0.0, -10.0), RiskAppetite::High, 8);
        assert_eq!(g.buy_target, 0.0);
        assert_eq!(g.stop_loss, 0.0);
    }

    #[test]
    fn half_cent_ties_round_to_even() {
        assert_eq!(round_price(12.125), 12.12);
        assert_eq!(round_price(12.115), 12.12);

        // 12.5 * (1 - 0.03) lands exactly on 12.125.
        let g = guidance(&stock(12.5, 1.0, 0.0, 0.0), RiskAppetite::Low, 4);
        assert_eq!(g.buy_target, 12.12);
    }
}
