use crate::domain::preferences::{
    DividendPreference, InvestmentGoal, MarketCapPreference, RiskAppetite, SectorPreference,
    UserPreferences,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw recommendation request as accepted from callers (HTTP body, CLI flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub risk_appetite: String,
    pub investment_horizon: i64,
    pub investment_goal: String,
    pub sector_preference: String,
    pub market_cap_preference: String,
    pub dividend_preference: String,
    pub investment_amount: f64,
}

/// A request field that failed caller-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub field: &'static str,
    pub detail: String,
}

impl fmt::Display for ContractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.detail)
    }
}

impl std::error::Error for ContractError {}

fn reject(field: &'static str, detail: impl Into<String>) -> ContractError {
    ContractError {
        field,
        detail: detail.into(),
    }
}

impl RecommendRequest {
    /// Validate the fields the engine relies on callers to check, and convert.
    ///
    /// Risk appetite and goal must be known values. Market-cap and dividend
    /// preferences pass through unchecked; unknown values score 0 on that dimension.
    pub fn validate_and_into_preferences(self) -> Result<UserPreferences, ContractError> {
        let risk_appetite = RiskAppetite::parse(&self.risk_appetite);
        if risk_appetite == RiskAppetite::Unrecognized {
            return Err(reject(
                "risk_appetite",
                format!(
                    "expected one of low/medium/high (got {:?})",
                    self.risk_appetite.trim()
                ),
            ));
        }

        let investment_goal = InvestmentGoal::parse(&self.investment_goal);
        if investment_goal == InvestmentGoal::Unrecognized {
            return Err(reject(
                "investment_goal",
                format!(
                    "expected one of growth/dividends/both (got {:?})",
                    self.investment_goal.trim()
                ),
            ));
        }

        if self.investment_horizon <= 0 {
            return Err(reject(
                "investment_horizon",
                format!("must be a positive number of years (got {})", self.investment_horizon),
            ));
        }
        let investment_horizon = u32::try_from(self.investment_horizon).map_err(|_| {
            reject(
                "investment_horizon",
                format!("out of range (got {})", self.investment_horizon),
            )
        })?;

        if !(self.investment_amount.is_finite() && self.investment_amount > 0.0) {
            return Err(reject(
                "investment_amount",
                format!("must be greater than 0 (got {})", self.investment_amount),
            ));
        }

        let sector = self.sector_preference.trim();
        if sector.is_empty() {
            return Err(reject("sector_preference", "must be non-empty (use \"all\")"));
        }

        Ok(UserPreferences {
            risk_appetite,
            investment_horizon,
            investment_goal,
            sector_preference: SectorPreference::parse(sector),
            market_cap_preference: MarketCapPreference::parse(&self.market_cap_preference),
            dividend_preference: DividendPreference::parse(&self.dividend_preference),
            investment_amount: self.investment_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> RecommendRequest {
        RecommendRequest {
            risk_appetite: "Low".to_string(),
            investment_horizon: 7,
            investment_goal: " dividends ".to_string(),
            sector_preference: "Technology".to_string(),
            market_cap_preference: "large-cap".to_string(),
            dividend_preference: "yes".to_string(),
            investment_amount: 50_000.0,
        }
    }

    #[test]
    fn accepts_valid_request_and_normalizes_case() {
        let prefs = valid_request().validate_and_into_preferences().unwrap();
        assert_eq!(prefs.risk_appetite, RiskAppetite::Low);
        assert_eq!(prefs.investment_goal, InvestmentGoal::Dividends);
        assert_eq!(
            prefs.sector_preference,
            SectorPreference::Sector("technology".to_string())
        );
        assert_eq!(prefs.investment_horizon, 7);
        assert_eq!(prefs.investment_amount, 50_000.0);
    }

    #[test]
    fn rejects_unknown_risk_appetite() {
        let mut req = valid_request();
        req.risk_appetite = "yolo".to_string();
        let err = req.validate_and_into_preferences().unwrap_err();
        assert_eq!(err.field, "risk_appetite");
    }

    #[test]
    fn rejects_unknown_goal() {
        let mut req = valid_request();
        req.investment_goal = "income".to_string();
        let err = req.validate_and_into_preferences().unwrap_err();
        assert_eq!(err.field, "investment_goal");
    }

    #[test]
    fn rejects_non_positive_horizon_and_amount() {
        let mut req = valid_request();
        req.investment_horizon = 0;
        assert_eq!(
            req.validate_and_into_preferences().unwrap_err().field,
            "investment_horizon"
        );

        let mut req = valid_request();
        req.investment_amount = -5.0;
        assert_eq!(
            req.validate_and_into_preferences().unwrap_err().field,
            "investment_amount"
        );

        let mut req = valid_request();
        req.investment_amount = f64::NAN;
        assert!(req.validate_and_into_preferences().is_err());
    }

    #[test]
    fn passes_unknown_market_cap_and_dividend_through() {
        let mut req = valid_request();
        req.market_cap_preference = "mega-cap".to_string();
        req.dividend_preference = "sometimes".to_string();
        let prefs = req.validate_and_into_preferences().unwrap();
        assert_eq!(prefs.market_cap_preference, MarketCapPreference::Unrecognized);
        assert_eq!(prefs.dividend_preference, DividendPreference::Unrecognized);
    }

    #[test]
    fn missing_field_fails_to_deserialize() {
        let v = json!({
            "risk_appetite": "low",
            "investment_horizon": 3,
            "investment_goal": "growth",
            "sector_preference": "all",
            "market_cap_preference": "all",
            "dividend_preference": "no",
        });
        assert!(serde_json::from_value::<RecommendRequest>(v).is_err());
    }
}
