//! The user's preference vector.
//!
//! Every enum carries an `Unrecognized` variant: a value outside the documented
//! set still reaches the engine and simply contributes nothing to the matching
//! score dimension. Rejecting bad input is the caller's job (see
//! [`crate::domain::contract`]).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentGoal {
    Growth,
    Dividends,
    Both,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCapPreference {
    #[serde(rename = "large-cap")]
    LargeCap,
    #[serde(rename = "mid-cap")]
    MidCap,
    #[serde(rename = "small-cap")]
    SmallCap,
    #[serde(rename = "all")]
    All,
    #[serde(other, rename = "unrecognized")]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DividendPreference {
    Yes,
    No,
    #[serde(other)]
    Unrecognized,
}

/// Either every sector, or one sector name compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectorPreference {
    All,
    Sector(String),
}

impl RiskAppetite {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl InvestmentGoal {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "growth" => Self::Growth,
            "dividends" => Self::Dividends,
            "both" => Self::Both,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Dividends => "dividends",
            Self::Both => "both",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl MarketCapPreference {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "large-cap" => Self::LargeCap,
            "mid-cap" => Self::MidCap,
            "small-cap" => Self::SmallCap,
            "all" => Self::All,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LargeCap => "large-cap",
            Self::MidCap => "mid-cap",
            Self::SmallCap => "small-cap",
            Self::All => "all",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl DividendPreference {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl SectorPreference {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lowered = s.to_lowercase();
        if lowered == "all" {
            Self::All
        } else {
            Self::Sector(lowered)
        }
    }
}

impl From<String> for SectorPreference {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SectorPreference> for String {
    fn from(p: SectorPreference) -> Self {
        p.to_string()
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(RiskAppetite, InvestmentGoal, MarketCapPreference, DividendPreference);

impl fmt::Display for SectorPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Sector(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub risk_appetite: RiskAppetite,
    /// Years.
    pub investment_horizon: u32,
    pub investment_goal: InvestmentGoal,
    pub sector_preference: SectorPreference,
    pub market_cap_preference: MarketCapPreference,
    pub dividend_preference: DividendPreference,
    /// Not used for scoring; reserved for position sizing.
    pub investment_amount: f64,
}
