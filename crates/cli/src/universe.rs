use advisor_core::domain::attributes::{MarketSnapshot, StockAttributes};

struct DemoStock {
    symbol: &'static str,
    name: &'static str,
    sector: &'static str,
    price: f64,
    market_cap: f64,
    beta: f64,
    dividend_yield: f64,
    change_percent: f64,
}

// Deterministic placeholder universe for running without a data provider.
// Figures are illustrative, not market data.
const DEMO_UNIVERSE: &[DemoStock] = &[
    DemoStock { symbol: "TCS.NS", name: "Tata Consultancy Services", sector: "Technology", price: 3912.4, market_cap: 1.42e13, beta: 0.62, dividend_yield: 0.031, change_percent: 0.8 },
    DemoStock { symbol: "INFY.NS", name: "Infosys Ltd", sector: "Technology", price: 1524.9, market_cap: 6.3e12, beta: 0.74, dividend_yield: 0.027, change_percent: -1.2 },
    DemoStock { symbol: "WIPRO.NS", name: "Wipro Ltd", sector: "Technology", price: 486.3, market_cap: 2.5e12, beta: 0.81, dividend_yield: 0.002, change_percent: 2.1 },
    DemoStock { symbol: "HCLTECH.NS", name: "HCL Technologies", sector: "Technology", price: 1611.0, market_cap: 4.4e12, beta: 0.69, dividend_yield: 0.032, change_percent: 0.3 },
    DemoStock { symbol: "TECHM.NS", name: "Tech Mahindra", sector: "Technology", price: 1498.7, market_cap: 1.46e12, beta: 0.93, dividend_yield: 0.025, change_percent: -4.6 },
    DemoStock { symbol: "HAL.NS", name: "Hindustan Aeronautics Ltd", sector: "Defence", price: 4218.5, market_cap: 2.82e12, beta: 1.38, dividend_yield: 0.009, change_percent: 5.4 },
    DemoStock { symbol: "BEL.NS", name: "Bharat Electronics Ltd", sector: "Defence", price: 288.6, market_cap: 2.11e12, beta: 1.21, dividend_yield: 0.008, change_percent: 1.7 },
    DemoStock { symbol: "BEML.NS", name: "BEML Limited", sector: "Defence", price: 3650.2, market_cap: 1.52e11, beta: 1.74, dividend_yield: 0.006, change_percent: -2.9 },
    DemoStock { symbol: "COCHINSHIP.NS", name: "Cochin Shipyard", sector: "Defence", price: 1582.1, market_cap: 4.16e11, beta: 1.92, dividend_yield: 0.011, change_percent: 6.3 },
    DemoStock { symbol: "DATAPATTNS.NS", name: "Data Patterns India", sector: "Defence", price: 2210.0, market_cap: 1.24e11, beta: 1.55, dividend_yield: 0.003, change_percent: -5.8 },
    DemoStock { symbol: "SUZLON.NS", name: "Suzlon Energy", sector: "Environment", price: 61.4, market_cap: 8.4e11, beta: 2.05, dividend_yield: 0.0, change_percent: 3.2 },
    DemoStock { symbol: "TATAPOWER.NS", name: "Tata Power", sector: "Environment", price: 402.8, market_cap: 1.29e12, beta: 1.33, dividend_yield: 0.005, change_percent: -0.6 },
    DemoStock { symbol: "ADANIGREEN.NS", name: "Adani Green Energy", sector: "Environment", price: 1011.5, market_cap: 1.6e12, beta: 1.87, dividend_yield: 0.0, change_percent: -6.4 },
    DemoStock { symbol: "NTPC.NS", name: "NTPC Ltd", sector: "Environment", price: 352.7, market_cap: 3.42e12, beta: 0.88, dividend_yield: 0.022, change_percent: 0.4 },
    DemoStock { symbol: "JSWENERGY.NS", name: "JSW Energy", sector: "Environment", price: 615.9, market_cap: 1.07e12, beta: 1.46, dividend_yield: 0.003, change_percent: 1.1 },
];

pub fn demo_snapshot() -> MarketSnapshot {
    DEMO_UNIVERSE
        .iter()
        .map(|s| {
            (
                s.symbol,
                StockAttributes {
                    name: Some(s.name.to_string()),
                    current_price: s.price,
                    day_high: s.price * 1.012,
                    day_low: s.price * 0.988,
                    volume: (s.market_cap / s.price / 400.0).round(),
                    market_cap: Some(s.market_cap),
                    sector: Some(s.sector.to_string()),
                    beta: Some(s.beta),
                    dividend_yield: s.dividend_yield,
                    change_percent: s.change_percent,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::domain::preferences::{
        DividendPreference, InvestmentGoal, MarketCapPreference, RiskAppetite, SectorPreference,
        UserPreferences,
    };

    #[test]
    fn demo_snapshot_is_complete_and_ordered() {
        let snapshot = demo_snapshot();
        assert_eq!(snapshot.len(), DEMO_UNIVERSE.len());
        assert_eq!(snapshot.symbols().next(), Some("TCS.NS"));
        for (_, attrs) in snapshot.iter() {
            assert!(attrs.current_price > 0.0);
            assert!(attrs.day_low < attrs.current_price && attrs.current_price < attrs.day_high);
        }
    }

    #[test]
    fn every_demo_symbol_is_scorable() {
        let prefs = UserPreferences {
            risk_appetite: RiskAppetite::Medium,
            investment_horizon: 4,
            investment_goal: InvestmentGoal::Both,
            sector_preference: SectorPreference::All,
            market_cap_preference: MarketCapPreference::All,
            dividend_preference: DividendPreference::No,
            investment_amount: 10_000.0,
        };
        let ranked = advisor_core::score_all(&demo_snapshot(), &prefs);
        assert_eq!(ranked.len(), DEMO_UNIVERSE.len());
    }
}
