use crate::domain::attributes::{MarketSnapshot, StockAttributes};
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot document served by the data provider (or stored on disk).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub as_of_date: Option<NaiveDate>,
    pub items: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub day_high: Option<f64>,
    #[serde(default)]
    pub day_low: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

impl SnapshotItem {
    fn into_attributes(self) -> StockAttributes {
        let trimmed = |s: Option<String>| {
            s.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        StockAttributes {
            name: trimmed(self.name),
            current_price: self.current_price.unwrap_or(0.0),
            day_high: self.day_high.unwrap_or(0.0),
            day_low: self.day_low.unwrap_or(0.0),
            volume: self.volume.unwrap_or(0.0),
            market_cap: self.market_cap,
            sector: trimmed(self.sector),
            beta: self.beta,
            dividend_yield: self.dividend_yield.unwrap_or(0.0),
            change_percent: self.change_percent.unwrap_or(0.0),
        }
    }
}

/// A converted snapshot plus the provider's as-of date, if it sent one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSnapshot {
    pub as_of_date: Option<NaiveDate>,
    pub snapshot: MarketSnapshot,
}

impl SnapshotResponse {
    pub fn into_loaded(self) -> Result<LoadedSnapshot> {
        let as_of_date = self.as_of_date;
        Ok(LoadedSnapshot {
            as_of_date,
            snapshot: self.into_snapshot()?,
        })
    }

    /// Validate item keys and convert, keeping payload order.
    pub fn into_snapshot(self) -> Result<MarketSnapshot> {
        let mut snapshot = MarketSnapshot::new();
        for item in self.items {
            let symbol = item.symbol.trim().to_string();
            anyhow::ensure!(!symbol.is_empty(), "symbol must be non-empty");
            if snapshot.get(&symbol).is_some() {
                tracing::warn!(%symbol, "duplicate symbol in snapshot; keeping the last entry");
            }
            snapshot.insert(symbol, item.into_attributes());
        }
        Ok(snapshot)
    }
}
