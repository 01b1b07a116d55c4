use crate::domain::attributes::MarketSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListOrder {
    #[default]
    #[serde(rename = "A")]
    Ascending,
    #[serde(rename = "D")]
    Descending,
}

impl ListOrder {
    /// `"D"` (any case) is descending; anything else is ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("d") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedStock {
    pub symbol: String,
    pub name: Option<String>,
    pub price: f64,
    pub sector: String,
}

/// Symbols in `sector` (case-insensitive), ordered by price.
///
/// Unpriced symbols (price <= 0) sort as if infinitely expensive: last when
/// ascending, first when descending. Equal keys keep snapshot order.
pub fn stocks_by_sector(snapshot: &MarketSnapshot, sector: &str, order: ListOrder) -> Vec<ListedStock> {
    let mut out: Vec<ListedStock> = snapshot
        .iter()
        .filter(|(_, attrs)| attrs.sector_matches(sector))
        .map(|(symbol, attrs)| ListedStock {
            symbol: symbol.to_string(),
            name: attrs.name.clone(),
            price: attrs.current_price,
            sector: attrs.sector.clone().unwrap_or_default(),
        })
        .collect();

    let key = |s: &ListedStock| {
        if s.price > 0.0 {
            s.price
        } else {
            f64::INFINITY
        }
    };
    match order {
        ListOrder::Ascending => out.sort_by(|a, b| key(a).total_cmp(&key(b))),
        ListOrder::Descending => out.sort_by(|a, b| key(b).total_cmp(&key(a))),
    }
    out
}
