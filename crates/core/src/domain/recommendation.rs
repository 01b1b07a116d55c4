use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-dimension contributions to a suitability score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub risk: f64,
    pub market_cap: f64,
    pub sector: f64,
    pub dividend: f64,
    pub goal: f64,
    pub horizon_bonus: f64,
}

impl ScoreBreakdown {
    pub const MAX_TOTAL: f64 = 100.0;

    pub fn total(&self) -> f64 {
        let sum = self.risk
            + self.market_cap
            + self.sector
            + self.dividend
            + self.goal
            + self.horizon_bonus;
        sum.min(Self::MAX_TOTAL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSymbol {
    pub symbol: String,
    /// In `0.0..=100.0`.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyLabel {
    BuyAndHold,
    MomentumTrading,
    SwingTrading,
    PositionTrading,
    IncomeGenerator,
    WaitForPullback,
    BuyIncrementally,
    LongTermInvestment,
    MonitorClosely,
}

impl StrategyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuyAndHold => "Buy and hold",
            Self::MomentumTrading => "Momentum trading",
            Self::SwingTrading => "Swing trading",
            Self::PositionTrading => "Position trading",
            Self::IncomeGenerator => "Income generator",
            Self::WaitForPullback => "Wait for pullback",
            Self::BuyIncrementally => "Buy incrementally",
            Self::LongTermInvestment => "Long-term investment",
            Self::MonitorClosely => "Monitor closely",
        }
    }
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const STRATEGY_SEPARATOR: &str = " | ";

/// Buy/sell/stop-loss targets plus the ordered strategy labels for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGuidance {
    pub buy_target: f64,
    pub sell_target: f64,
    pub stop_loss: f64,
    pub labels: Vec<StrategyLabel>,
}

impl PriceGuidance {
    pub fn strategy(&self) -> String {
        self.labels
            .iter()
            .map(StrategyLabel::as_str)
            .collect::<Vec<_>>()
            .join(STRATEGY_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub buy_target: f64,
    pub sell_target: f64,
    pub stop_loss: f64,
    pub strategy: String,
    pub suitability_score: f64,
}

impl Recommendation {
    pub fn new(scored: &ScoredSymbol, guidance: &PriceGuidance) -> Self {
        Self {
            symbol: scored.symbol.clone(),
            buy_target: guidance.buy_target,
            sell_target: guidance.sell_target,
            stop_loss: guidance.stop_loss,
            strategy: guidance.strategy(),
            suitability_score: scored.score,
        }
    }
}
