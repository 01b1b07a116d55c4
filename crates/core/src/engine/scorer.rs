//! Suitability scoring.
//!
//! Each symbol gets five sub-scores (risk, market cap, sector, dividend, goal)
//! plus a horizon bonus. Every component is clamped to its own range before the
//! sum, and the sum is capped at 100. The arithmetic is a fixed heuristic, so
//! literal scores are stable across releases.

use crate::config::parse_var;
use crate::domain::attributes::{same_sector, MarketSnapshot, StockAttributes};
use crate::domain::preferences::{
    DividendPreference, InvestmentGoal, MarketCapPreference, RiskAppetite, SectorPreference,
    UserPreferences,
};
use crate::domain::recommendation::{ScoreBreakdown, ScoredSymbol};

pub const RISK_MAX: f64 = 25.0;
pub const MARKET_CAP_MAX: f64 = 15.0;
pub const MARKET_CAP_NEAR_MISS: f64 = 8.0;
pub const SECTOR_MAX: f64 = 20.0;
pub const DIVIDEND_MAX: f64 = 15.0;
pub const GOAL_MAX: f64 = 25.0;
pub const HORIZON_BONUS_MAX: f64 = 10.0;

/// Market-cap bucket edges, in absolute currency units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketCapBuckets {
    /// Large cap: `cap >= large_min`.
    pub large_min: f64,
    /// Mid cap: `mid_min <= cap < large_min`. Small cap is `cap < mid_min`.
    pub mid_min: f64,
    pub large_near_min: f64,
    pub mid_near_min: f64,
    pub small_near_max: f64,
}

impl MarketCapBuckets {
    pub const LARGE_CAP_MIN: f64 = 5.0e10;
    pub const MID_CAP_MIN: f64 = 1.0e10;
    pub const LARGE_CAP_NEAR_MIN: f64 = 3.0e10;
    pub const MID_CAP_NEAR_MIN: f64 = 5.0e9;
    pub const SMALL_CAP_NEAR_MAX: f64 = 2.0e10;

    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            large_min: parse_var("MARKET_CAP_LARGE_MIN", d.large_min),
            mid_min: parse_var("MARKET_CAP_MID_MIN", d.mid_min),
            large_near_min: parse_var("MARKET_CAP_LARGE_NEAR_MIN", d.large_near_min),
            mid_near_min: parse_var("MARKET_CAP_MID_NEAR_MIN", d.mid_near_min),
            small_near_max: parse_var("MARKET_CAP_SMALL_NEAR_MAX", d.small_near_max),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.mid_min < self.large_min,
            "mid-cap minimum ({}) must be below large-cap minimum ({})",
            self.mid_min,
            self.large_min
        );
        anyhow::ensure!(
            self.mid_near_min <= self.mid_min && self.large_near_min <= self.large_min,
            "near-miss minimums must not exceed their bucket minimums"
        );
        anyhow::ensure!(
            self.small_near_max >= self.mid_min,
            "small-cap near-miss maximum ({}) must be at least the mid-cap minimum ({})",
            self.small_near_max,
            self.mid_min
        );
        Ok(())
    }
}

impl Default for MarketCapBuckets {
    fn default() -> Self {
        Self {
            large_min: Self::LARGE_CAP_MIN,
            mid_min: Self::MID_CAP_MIN,
            large_near_min: Self::LARGE_CAP_NEAR_MIN,
            mid_near_min: Self::MID_CAP_NEAR_MIN,
            small_near_max: Self::SMALL_CAP_NEAR_MAX,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    buckets: MarketCapBuckets,
}

impl Scorer {
    pub fn new(buckets: MarketCapBuckets) -> Self {
        Self { buckets }
    }

    pub fn buckets(&self) -> &MarketCapBuckets {
        &self.buckets
    }

    /// Score every symbol, best first. Ties keep snapshot order.
    ///
    /// Symbols missing `beta`, `market_cap` or `sector` are left out.
    pub fn score_all(&self, snapshot: &MarketSnapshot, prefs: &UserPreferences) -> Vec<ScoredSymbol> {
        let mut out = Vec::with_capacity(snapshot.len());
        for (symbol, attrs) in snapshot.iter() {
            let Some(breakdown) = self.score_symbol(attrs, prefs) else {
                tracing::trace!(symbol, "missing beta/market_cap/sector; not scored");
                continue;
            };
            out.push(ScoredSymbol {
                symbol: symbol.to_string(),
                score: breakdown.total(),
                breakdown,
            });
        }

        // Stable: equal scores stay in snapshot order.
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        out
    }

    /// Score one symbol, or `None` if it lacks a required attribute.
    pub fn score_symbol(&self, attrs: &StockAttributes, prefs: &UserPreferences) -> Option<ScoreBreakdown> {
        let inputs = ScoringInputs::from_attributes(attrs)?;

        Some(ScoreBreakdown {
            risk: risk_score(prefs.risk_appetite, inputs.beta),
            market_cap: market_cap_score(prefs.market_cap_preference, inputs.market_cap, &self.buckets),
            sector: sector_score(&prefs.sector_preference, inputs.sector),
            dividend: dividend_score(prefs.dividend_preference, inputs.dividend_yield),
            goal: goal_score(
                prefs.investment_goal,
                inputs.beta,
                inputs.dividend_yield,
                inputs.change_percent,
            ),
            horizon_bonus: horizon_bonus(
                prefs.investment_horizon,
                prefs.investment_goal,
                inputs.beta,
                inputs.dividend_yield,
            ),
        })
    }
}

/// The attribute values scoring reads, with non-finite numbers resolved.
struct ScoringInputs<'a> {
    beta: f64,
    market_cap: f64,
    sector: &'a str,
    dividend_yield: f64,
    change_percent: f64,
}

impl<'a> ScoringInputs<'a> {
    fn from_attributes(attrs: &'a StockAttributes) -> Option<Self> {
        let beta = attrs.beta.filter(|b| b.is_finite())?;
        let market_cap = attrs.market_cap.filter(|c| c.is_finite())?;
        let sector = attrs.sector.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            beta,
            market_cap,
            sector,
            dividend_yield: finite_or_zero(attrs.dividend_yield),
            change_percent: finite_or_zero(attrs.change_percent),
        })
    }
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn bounded(v: f64, max: f64) -> f64 {
    v.clamp(0.0, max)
}

pub fn risk_score(risk: RiskAppetite, beta: f64) -> f64 {
    let raw = match risk {
        RiskAppetite::Low if beta < 1.5 => (25.0 - beta * 10.0).max(0.0),
        RiskAppetite::Low => 0.0,
        RiskAppetite::Medium => (25.0 - (beta - 1.0).abs() * 20.0).max(0.0),
        RiskAppetite::High if beta > 0.8 => (beta * 12.5).min(25.0),
        RiskAppetite::High | RiskAppetite::Unrecognized => 0.0,
    };
    bounded(raw, RISK_MAX)
}

pub fn market_cap_score(pref: MarketCapPreference, cap: f64, b: &MarketCapBuckets) -> f64 {
    let (in_bucket, near_miss) = match pref {
        MarketCapPreference::All => return MARKET_CAP_MAX,
        MarketCapPreference::LargeCap => (cap >= b.large_min, cap >= b.large_near_min),
        MarketCapPreference::MidCap => (
            cap >= b.mid_min && cap < b.large_min,
            cap >= b.mid_near_min,
        ),
        MarketCapPreference::SmallCap => (cap < b.mid_min, cap < b.small_near_max),
        MarketCapPreference::Unrecognized => (false, false),
    };

    if in_bucket {
        MARKET_CAP_MAX
    } else if near_miss {
        MARKET_CAP_NEAR_MISS
    } else {
        0.0
    }
}

pub fn sector_score(pref: &SectorPreference, sector: &str) -> f64 {
    match pref {
        SectorPreference::All => SECTOR_MAX,
        SectorPreference::Sector(want) if same_sector(sector, want) => SECTOR_MAX,
        SectorPreference::Sector(_) => 0.0,
    }
}

pub fn dividend_score(pref: DividendPreference, dividend_yield: f64) -> f64 {
    let raw = match pref {
        // Saturates around a 2% yield.
        DividendPreference::Yes => (dividend_yield * 750.0).min(15.0),
        DividendPreference::No => 15.0 - (dividend_yield * 300.0).min(10.0),
        DividendPreference::Unrecognized => 0.0,
    };
    bounded(raw, DIVIDEND_MAX)
}

pub fn goal_score(goal: InvestmentGoal, beta: f64, dividend_yield: f64, change_percent: f64) -> f64 {
    let raw = match goal {
        InvestmentGoal::Growth => {
            (beta * 8.0).min(15.0)
                + (15.0 - (dividend_yield * 375.0).min(15.0))
                + 0.5 * change_percent.clamp(-5.0, 10.0)
                + 2.5
        }
        InvestmentGoal::Dividends => {
            (dividend_yield * 1000.0).min(20.0)
                + 0.25 * (15.0 - ((beta - 0.8).abs() * 10.0).min(15.0))
        }
        InvestmentGoal::Both => {
            (dividend_yield * 500.0).min(12.5)
                + (15.0 - ((beta - 1.0).abs() * 15.0).min(15.0))
                + change_percent.clamp(0.0, 5.0)
        }
        InvestmentGoal::Unrecognized => 0.0,
    };
    bounded(raw, GOAL_MAX)
}

pub fn horizon_bonus(horizon_years: u32, goal: InvestmentGoal, beta: f64, dividend_yield: f64) -> f64 {
    let raw = match horizon_years {
        0..=2 if beta < 1.5 => (10.0 - beta * 5.0).max(0.0),
        0..=2 => 0.0,
        3..=5 => (10.0 - (beta - 1.0).abs() * 8.0).max(0.0),
        _ => match goal {
            InvestmentGoal::Growth if beta < 2.0 => (beta * 5.0).min(10.0),
            InvestmentGoal::Growth => 5.0,
            InvestmentGoal::Dividends => (dividend_yield * 500.0).min(10.0),
            InvestmentGoal::Both => (beta * 2.5 + dividend_yield * 250.0).min(10.0),
            InvestmentGoal::Unrecognized => 0.0,
        },
    };
    bounded(raw, HORIZON_BONUS_MAX)
}
