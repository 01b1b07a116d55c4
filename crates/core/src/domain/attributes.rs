use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Beta reported for a symbol whose volatility coefficient is unknown.
pub const DEFAULT_BETA: f64 = 1.0;

/// Market attributes for one symbol, as delivered by the data provider.
///
/// `beta`, `market_cap` and `sector` are required for scoring; a symbol missing
/// any of them is skipped by the scorer rather than scored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: f64,
    #[serde(default)]
    pub day_high: f64,
    #[serde(default)]
    pub day_low: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub dividend_yield: f64,
    #[serde(default)]
    pub change_percent: f64,
}

impl StockAttributes {
    /// Beta for display and price guidance: the reported value, or [`DEFAULT_BETA`].
    pub fn effective_beta(&self) -> f64 {
        self.beta
            .filter(|b| b.is_finite())
            .unwrap_or(DEFAULT_BETA)
    }

    pub fn sector_matches(&self, sector: &str) -> bool {
        self.sector
            .as_deref()
            .is_some_and(|s| same_sector(s, sector))
    }
}

/// Case-insensitive sector comparison with full Unicode case folding.
pub fn same_sector(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Symbol -> attributes, iterated in insertion order.
///
/// Insertion order is the tie-break order of the scorer, so the snapshot keeps
/// the provider's ordering instead of sorting by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    entries: Vec<(String, StockAttributes)>,
    index: HashMap<String, usize>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `symbol`. A replaced symbol keeps its original position.
    pub fn insert(&mut self, symbol: impl Into<String>, attrs: StockAttributes) {
        let symbol = symbol.into();
        match self.index.get(&symbol) {
            Some(&pos) => self.entries[pos].1 = attrs,
            None => {
                self.index.insert(symbol.clone(), self.entries.len());
                self.entries.push((symbol, attrs));
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&StockAttributes> {
        self.index.get(symbol).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StockAttributes)> {
        self.entries.iter().map(|(s, a)| (s.as_str(), a))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, StockAttributes)> for MarketSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, StockAttributes)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (symbol, attrs) in iter {
            out.insert(symbol, attrs);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: f64) -> StockAttributes {
        StockAttributes {
            current_price: price,
            ..Default::default()
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let snapshot: MarketSnapshot = [("ZZZ", priced(1.0)), ("AAA", priced(2.0)), ("MMM", priced(3.0))]
            .into_iter()
            .collect();
        let symbols: Vec<_> = snapshot.symbols().collect();
        assert_eq!(symbols, vec!["ZZZ", "AAA", "MMM"]);
    }

    #[test]
    fn replacing_a_symbol_keeps_its_position() {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert("AAA", priced(1.0));
        snapshot.insert("BBB", priced(2.0));
        snapshot.insert("AAA", priced(9.0));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.symbols().collect::<Vec<_>>(), vec!["AAA", "BBB"]);
        assert_eq!(snapshot.get("AAA").map(|a| a.current_price), Some(9.0));
    }

    #[test]
    fn effective_beta_defaults_when_unknown() {
        let mut attrs = priced(10.0);
        assert_eq!(attrs.effective_beta(), DEFAULT_BETA);
        attrs.beta = Some(f64::NAN);
        assert_eq!(attrs.effective_beta(), DEFAULT_BETA);
        attrs.beta = Some(1.7);
        assert_eq!(attrs.effective_beta(), 1.7);
    }

    #[test]
    fn sector_match_ignores_case() {
        let attrs = StockAttributes {
            sector: Some("Technology".to_string()),
            ..Default::default()
        };
        assert!(attrs.sector_matches("technology"));
        assert!(attrs.sector_matches("TECHNOLOGY"));
        assert!(!attrs.sector_matches("tech"));
        assert!(!StockAttributes::default().sector_matches("technology"));
    }

    #[test]
    fn sector_match_folds_non_ascii_case() {
        let attrs = StockAttributes {
            sector: Some("énergie".to_string()),
            ..Default::default()
        };
        assert!(attrs.sector_matches("ÉNERGIE"));
        assert!(same_sector(" Énergie ", "ÉNERGIE"));
        assert!(!same_sector("énergie", "energie"));
    }

    #[test]
    fn lookup_stays_consistent_across_many_inserts() {
        let mut snapshot = MarketSnapshot::new();
        for i in 0..500u32 {
            snapshot.insert(format!("S{i}"), priced(f64::from(i)));
        }
        snapshot.insert("S250", priced(-1.0));

        assert_eq!(snapshot.len(), 500);
        assert_eq!(snapshot.get("S250").map(|a| a.current_price), Some(-1.0));
        assert_eq!(snapshot.get("S499").map(|a| a.current_price), Some(499.0));
        assert_eq!(snapshot.symbols().nth(250), Some("S250"));
        assert!(snapshot.get("S500").is_none());
    }
}
