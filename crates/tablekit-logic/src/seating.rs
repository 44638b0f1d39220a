//! Seating capacity: how many chairs fit a table of a given size.
//!
//! The seating table gives two recommendations per size, a tight fit and
//! a comfortable fit. The chair-count ceiling is the tight fit when it is
//! set, else the comfortable fit, else zero.
//!
//! Rectangular tops match by inclusive length range; round and square tops
//! match only on an exact size. Width never takes part in the lookup.

use serde::{Deserialize, Serialize};

use crate::shape::ShapeCategory;

/// Chair ceiling used before the seating table has been resolved once.
pub const DEFAULT_MAXIMUM_CHAIRS: u32 = 12;

/// Chairs are added and removed in pairs.
pub const CHAIR_PAIR: i32 = 2;

/// Rectangular seating rule, keyed by an inclusive length range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSeating {
    pub min: i32,
    pub max: i32,
    pub tight_fit: Option<u32>,
    pub comfort_fit: Option<u32>,
}

/// Round seating rule, keyed by exact diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiameterSeating {
    pub diameter: i32,
    pub tight_fit: Option<u32>,
    pub comfort_fit: Option<u32>,
}

/// Square seating rule, keyed by exact side length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSeating {
    pub size: i32,
    pub tight_fit: Option<u32>,
    pub comfort_fit: Option<u32>,
}

/// The full seating table, one rule list per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatingTable {
    #[serde(default)]
    pub rectangular: Vec<RangeSeating>,
    #[serde(default)]
    pub round: Vec<DiameterSeating>,
    #[serde(default)]
    pub square: Vec<SizeSeating>,
}

/// Resolved tight/comfort recommendation. Missing values resolve to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingFit {
    pub tight_fit: u32,
    pub comfort_fit: u32,
}

impl SeatingFit {
    fn new(tight_fit: Option<u32>, comfort_fit: Option<u32>) -> Self {
        Self {
            tight_fit: tight_fit.unwrap_or(0),
            comfort_fit: comfort_fit.unwrap_or(0),
        }
    }

    /// Tight fit if non-zero, else comfort fit, else 0.
    pub fn ceiling(&self) -> u32 {
        if self.tight_fit != 0 {
            self.tight_fit
        } else {
            self.comfort_fit
        }
    }
}

impl SeatingTable {
    /// Find the rule for a category and primary dimension.
    pub fn lookup(&self, category: ShapeCategory, primary: i32) -> Option<SeatingFit> {
        match category {
            ShapeCategory::Rectangular => self
                .rectangular
                .iter()
                .find(|r| primary >= r.min && primary <= r.max)
                .map(|r| SeatingFit::new(r.tight_fit, r.comfort_fit)),
            ShapeCategory::Round => self
                .round
                .iter()
                .find(|r| r.diameter == primary)
                .map(|r| SeatingFit::new(r.tight_fit, r.comfort_fit)),
            ShapeCategory::Square => self
                .square
                .iter()
                .find(|r| r.size == primary)
                .map(|r| SeatingFit::new(r.tight_fit, r.comfort_fit)),
        }
    }
}

/// Resolve the fit for a table. Unmatched lookups and unclassified shapes
/// resolve to zero fits.
pub fn resolve_fit(
    table: &SeatingTable,
    category: Option<ShapeCategory>,
    primary: i32,
) -> SeatingFit {
    let Some(category) = category else {
        log::warn!("No seating for unclassified top shape (length {primary}mm)");
        return SeatingFit::default();
    };
    match table.lookup(category, primary) {
        Some(fit) => fit,
        None => {
            log::warn!("No {category} seating rule for {primary}mm");
            SeatingFit::default()
        }
    }
}

/// Chair count with its derived recommendations and ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChairCapacity {
    fit: SeatingFit,
    maximum: u32,
    number_of_chairs: u32,
}

impl Default for ChairCapacity {
    fn default() -> Self {
        Self {
            fit: SeatingFit::default(),
            maximum: DEFAULT_MAXIMUM_CHAIRS,
            number_of_chairs: 0,
        }
    }
}

impl ChairCapacity {
    pub fn tight_fit(&self) -> u32 {
        self.fit.tight_fit
    }

    pub fn comfort_fit(&self) -> u32 {
        self.fit.comfort_fit
    }

    pub fn maximum_number_of_chairs(&self) -> u32 {
        self.maximum
    }

    pub fn number_of_chairs(&self) -> u32 {
        self.number_of_chairs
    }

    /// Install a freshly resolved fit. The chair count drops to the new
    /// ceiling if it was above it.
    pub fn apply_fit(&mut self, fit: SeatingFit) {
        self.fit = fit;
        self.maximum = fit.ceiling();
        if self.number_of_chairs > self.maximum {
            log::debug!(
                "Chair count {} above new ceiling {}, clamping",
                self.number_of_chairs,
                self.maximum
            );
            self.number_of_chairs = self.maximum;
        }
    }

    /// Set the chair count, clamped to `[0, maximum]`.
    pub fn set_number_of_chairs(&mut self, n: u32) {
        self.number_of_chairs = n.min(self.maximum);
    }

    /// Add or remove chairs. Out-of-range results clamp; odd in-range
    /// results round up to the next even count.
    pub fn adjust_by(&mut self, delta: i32) {
        let maximum = self.maximum as i64;
        let next = self.number_of_chairs as i64 + delta as i64;
        let resolved = if next < 0 || next > maximum {
            next.clamp(0, maximum)
        } else if next % 2 != 0 {
            (next + 1).min(maximum)
        } else {
            next
        };
        self.number_of_chairs = resolved as u32;
    }

    pub fn add_pair(&mut self) {
        self.adjust_by(CHAIR_PAIR);
    }

    pub fn remove_pair(&mut self) {
        self.adjust_by(-CHAIR_PAIR);
    }

    /// True when a tight fit exists and the table is filled to it.
    pub fn is_tight(&self) -> bool {
        self.fit.tight_fit != 0 && self.fit.tight_fit == self.number_of_chairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(
        min: i32,
        max: i32,
        tight_fit: Option<u32>,
        comfort_fit: Option<u32>,
    ) -> RangeSeating {
        RangeSeating {
            min,
            max,
            tight_fit,
            comfort_fit,
        }
    }

    fn table() -> SeatingTable {
        SeatingTable {
            rectangular: vec![
                range(1200, 1599, Some(6), Some(4)),
                range(1600, 2399, None, Some(8)),
                range(2400, 3180, Some(12), Some(10)),
            ],
            round: vec![DiameterSeating {
                diameter: 1200,
                tight_fit: Some(6),
                comfort_fit: Some(4),
            }],
            square: vec![SizeSeating {
                size: 3180,
                tight_fit: Some(8),
                comfort_fit: Some(8),
            }],
        }
    }

    #[test]
    fn rectangular_range_is_inclusive() {
        let t = table();
        assert_eq!(t.lookup(ShapeCategory::Rectangular, 1200).unwrap().tight_fit, 6);
        assert_eq!(t.lookup(ShapeCategory::Rectangular, 1599).unwrap().tight_fit, 6);
        assert_eq!(t.lookup(ShapeCategory::Rectangular, 3180).unwrap().tight_fit, 12);
        assert!(t.lookup(ShapeCategory::Rectangular, 1000).is_none());
    }

    #[test]
    fn round_and_square_match_exactly() {
        let t = table();
        assert!(t.lookup(ShapeCategory::Round, 1200).is_some());
        assert!(t.lookup(ShapeCategory::Round, 1201).is_none());
        assert_eq!(t.lookup(ShapeCategory::Square, 3180).unwrap().tight_fit, 8);
        assert!(t.lookup(ShapeCategory::Square, 3100).is_none());
    }

    #[test]
    fn ceiling_prefers_tight_then_comfort() {
        let t = table();
        let fit = resolve_fit(&t, Some(ShapeCategory::Rectangular), 2000);
        assert_eq!(fit.tight_fit, 0);
        assert_eq!(fit.ceiling(), 8);
        let fit = resolve_fit(&t, Some(ShapeCategory::Rectangular), 1300);
        assert_eq!(fit.ceiling(), 6);
    }

    #[test]
    fn unmatched_resolves_to_zero() {
        let t = table();
        assert_eq!(resolve_fit(&t, Some(ShapeCategory::Round), 999), SeatingFit::default());
        assert_eq!(resolve_fit(&t, None, 1200), SeatingFit::default());
        assert_eq!(SeatingFit::default().ceiling(), 0);
    }

    #[test]
    fn default_ceiling_before_resolution() {
        let cap = ChairCapacity::default();
        assert_eq!(cap.maximum_number_of_chairs(), DEFAULT_MAXIMUM_CHAIRS);
        assert_eq!(cap.number_of_chairs(), 0);
    }

    #[test]
    fn new_ceiling_clamps_count() {
        let mut cap = ChairCapacity::default();
        cap.set_number_of_chairs(10);
        cap.apply_fit(SeatingFit { tight_fit: 8, comfort_fit: 6 });
        assert_eq!(cap.maximum_number_of_chairs(), 8);
        assert_eq!(cap.number_of_chairs(), 8);
        cap.apply_fit(SeatingFit::default());
        assert_eq!(cap.number_of_chairs(), 0);
    }

    #[test]
    fn set_clamps_to_ceiling() {
        let mut cap = ChairCapacity::default();
        cap.apply_fit(SeatingFit { tight_fit: 8, comfort_fit: 6 });
        cap.set_number_of_chairs(10);
        assert_eq!(cap.number_of_chairs(), 8);
    }

    #[test]
    fn pairs_never_produce_odd_counts() {
        let mut cap = ChairCapacity::default();
        for _ in 0..10 {
            cap.add_pair();
            assert_eq!(cap.number_of_chairs() % 2, 0);
        }
        assert_eq!(cap.number_of_chairs(), 12);
        for _ in 0..10 {
            cap.remove_pair();
        }
        assert_eq!(cap.number_of_chairs(), 0);
    }

    #[test]
    fn odd_results_round_up() {
        let mut cap = ChairCapacity::default();
        cap.adjust_by(3);
        assert_eq!(cap.number_of_chairs(), 4);
        cap.adjust_by(-1);
        assert_eq!(cap.number_of_chairs(), 4);
    }

    #[test]
    fn odd_ceiling_is_respected() {
        let mut cap = ChairCapacity::default();
        cap.apply_fit(SeatingFit { tight_fit: 7, comfort_fit: 6 });
        cap.set_number_of_chairs(6);
        cap.adjust_by(1);
        assert_eq!(cap.number_of_chairs(), 7);
        cap.add_pair();
        assert_eq!(cap.number_of_chairs(), 7);
    }

    #[test]
    fn tight_label() {
        let mut cap = ChairCapacity::default();
        cap.apply_fit(SeatingFit { tight_fit: 8, comfort_fit: 6 });
        cap.set_number_of_chairs(8);
        assert!(cap.is_tight());
        cap.remove_pair();
        assert!(!cap.is_tight());
    }

    #[test]
    fn parses_table_json() {
        let json = r#"{
            "rectangular": [{"min": 1200, "max": 1800, "tightFit": 6, "comfortFit": null}],
            "round": [{"diameter": 1200, "tightFit": null, "comfortFit": 4}],
            "square": []
        }"#;
        let t: SeatingTable = serde_json::from_str(json).unwrap();
        assert_eq!(t.rectangular[0].comfort_fit, None);
        assert_eq!(resolve_fit(&t, Some(ShapeCategory::Round), 1200).ceiling(), 4);
    }
}
