//! Price lookup.
//!
//! Same matching rules as seating: rectangular prices cover an inclusive
//! length range, square and round prices match one exact size. `None`
//! means "price unknown", never zero.

use serde::{Deserialize, Serialize};

use crate::shape::ShapeCategory;

/// Rectangular price, keyed by an inclusive length range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePrice {
    pub min: i32,
    pub max: i32,
    pub price: f64,
}

/// Square or round price, keyed by exact size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizePrice {
    pub size: i32,
    pub price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    #[serde(default)]
    pub rectangular: Vec<RangePrice>,
    #[serde(default)]
    pub square: Vec<SizePrice>,
    #[serde(default)]
    pub round: Vec<SizePrice>,
}

impl PriceTable {
    pub fn lookup(&self, category: ShapeCategory, primary: i32) -> Option<f64> {
        let exact = |rules: &[SizePrice]| {
            rules
                .iter()
                .find(|r| r.size == primary)
                .map(|r| r.price)
        };
        match category {
            ShapeCategory::Rectangular => self
                .rectangular
                .iter()
                .find(|r| primary >= r.min && primary <= r.max)
                .map(|r| r.price),
            ShapeCategory::Square => exact(&self.square),
            ShapeCategory::Round => exact(&self.round),
        }
    }
}

/// Price for a table, or `None` when the table is not loaded or no rule
/// matches.
pub fn get_price(
    table: Option<&PriceTable>,
    category: ShapeCategory,
    primary: i32,
) -> Option<f64> {
    let Some(table) = table else {
        log::debug!("Price table not loaded yet");
        return None;
    };
    let price = table.lookup(category, primary);
    if price.is_none() {
        log::warn!("No {category} price for {primary}mm");
    }
    price
}
