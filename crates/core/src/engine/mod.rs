//! The recommendation engine: scoring, threshold relaxation and price guidance.
//!
//! Everything here is a pure function of its inputs. No I/O, no shared state,
//! safe to call concurrently.

pub mod guidance;
pub mod listing;
pub mod recommender;
pub mod scorer;

use crate::domain::attributes::MarketSnapshot;
use crate::domain::preferences::UserPreferences;
use crate::domain::recommendation::{Recommendation, ScoredSymbol};

pub use guidance::guidance;
pub use listing::{stocks_by_sector, ListOrder, ListedStock};
pub use recommender::{RecommendOptions, Recommender, Selection, SelectionTier};
pub use scorer::{MarketCapBuckets, Scorer};

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub buckets: MarketCapBuckets,
    pub recommend: RecommendOptions,
}

impl EngineOptions {
    pub fn from_env() -> anyhow::Result<Self> {
        let buckets = MarketCapBuckets::from_env();
        buckets.validate()?;
        Ok(Self {
            buckets,
            recommend: RecommendOptions::from_env()?,
        })
    }

    pub fn recommender(&self) -> Recommender {
        Recommender::new(Scorer::new(self.buckets), self.recommend.clone())
    }
}

/// Rank every scorable symbol with the default bucket edges.
pub fn score_all(snapshot: &MarketSnapshot, prefs: &UserPreferences) -> Vec<ScoredSymbol> {
    Scorer::default().score_all(snapshot, prefs)
}

/// Up to ten recommendations with price guidance, using the default options.
pub fn recommend(snapshot: &MarketSnapshot, prefs: &UserPreferences) -> Vec<Recommendation> {
    Recommender::default().recommend(snapshot, prefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attributes::StockAttributes;
    use crate::domain::preferences::{
        DividendPreference, InvestmentGoal, MarketCapPreference, RiskAppetite, SectorPreference,
    };

    #[test]
    fn default_entry_points_agree_with_default_recommender() {
        let snapshot: MarketSnapshot = [
            (
                "AAA",
                StockAttributes {
                    current_price: 100.0,
                    market_cap: Some(6.0e10),
                    sector: Some("technology".to_string()),
                    beta: Some(0.7),
                    dividend_yield: 0.03,
                    change_percent: 1.0,
                    ..Default::default()
                },
            ),
            (
                "BBB",
                StockAttributes {
                    current_price: 40.0,
                    market_cap: Some(2.0e10),
                    sector: Some("energy".to_string()),
                    beta: Some(1.3),
                    ..Default::default()
                },
            ),
        ]
        .into_iter()
        .collect();
        let prefs = UserPreferences {
            risk_appetite: RiskAppetite::Medium,
            investment_horizon: 4,
            investment_goal: InvestmentGoal::Both,
            sector_preference: SectorPreference::All,
            market_cap_preference: MarketCapPreference::All,
            dividend_preference: DividendPreference::No,
            investment_amount: 1_000.0,
        };

        assert_eq!(score_all(&snapshot, &prefs).len(), 2);
        assert_eq!(
            recommend(&snapshot, &prefs),
            EngineOptions::default().recommender().recommend(&snapshot, &prefs)
        );
    }
}
