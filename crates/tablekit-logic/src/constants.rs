//! Shape names that carry behavior.
//!
//! The catalog is data-driven, so most names are only ever compared
//! against each other. The ones below are matched explicitly by the
//! classifier, the placement engine, or the bounds rules.

pub mod top_shapes {
    pub const RECTANGLE: &str = "rectangle";
    pub const OVAL: &str = "oval";
    pub const CAPSULE: &str = "capsule";
    pub const OBLONG: &str = "oblong";
    pub const ROUND: &str = "round";
    pub const SQUARE: &str = "square";

    /// Every top shape the classifier recognizes.
    pub const ALL: [&str; 6] = [RECTANGLE, OVAL, CAPSULE, OBLONG, ROUND, SQUARE];
}

pub mod base_shapes {
    /// Base whose width range mirrors its length range.
    pub const LINEA_DOME: &str = "linea-dome";

    /// Returns true if selecting this base also replaces the width bounds.
    pub fn couples_width(name: &str) -> bool {
        name == LINEA_DOME
    }
}
