//! Top-shape classification.
//!
//! Every other module dispatches on [`ShapeCategory`], never on the raw
//! shape name. [`classify`] is the only place that knows which names map
//! to which family.

use serde::{Deserialize, Serialize};

use crate::constants::top_shapes;

/// Structural family of a table top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeCategory {
    Rectangular,
    Round,
    Square,
}

impl ShapeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeCategory::Rectangular => "rectangular",
            ShapeCategory::Round => "round",
            ShapeCategory::Square => "square",
        }
    }

    /// Round and square tops expose a single size; length and width move together.
    pub fn couples_axes(self) -> bool {
        matches!(self, ShapeCategory::Round | ShapeCategory::Square)
    }
}

impl std::fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a top-shape name to its category. Unknown, empty, or missing names
/// map to `None`.
pub fn classify(shape_name: Option<&str>) -> Option<ShapeCategory> {
    match shape_name? {
        top_shapes::RECTANGLE | top_shapes::OVAL | top_shapes::CAPSULE | top_shapes::OBLONG => {
            Some(ShapeCategory::Rectangular)
        }
        top_shapes::ROUND => Some(ShapeCategory::Round),
        top_shapes::SQUARE => Some(ShapeCategory::Square),
        _ => None,
    }
}

/// The oval top is rectangular by category but seats chairs on its arcs.
pub fn is_oval(shape_name: Option<&str>) -> bool {
    shape_name == Some(top_shapes::OVAL)
}
