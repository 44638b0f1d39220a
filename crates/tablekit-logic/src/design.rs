//! Design state and the ordered change cascade.
//!
//! A shopper's design is a plain [`DesignState`]. Every user action is a
//! [`DesignChange`] applied by [`apply_change`], which runs the cascade in
//! a fixed order:
//!
//! 1. Classify: record the new base/top shape.
//! 2. Bounds: a base-shape change replaces the dimension bounds.
//! 3. Clamp: selected length/width reset or re-clamp into the bounds.
//! 4. Capacity: seating is re-resolved when `(length, top shape)` changed.
//! 5. Chair clamp: the chair count drops to the new ceiling.
//!
//! Chair placement is not stored; callers build a request with
//! [`chair_layout_request`] whenever they need transforms.
//!
//! ```
//! use tablekit_logic::catalog::{Catalog, CatalogSources};
//! use tablekit_logic::design::{apply_change, initial_state, DesignChange};
//!
//! let catalog = Catalog::from_sources(&CatalogSources {
//!     base_shapes: Some(r#"[{"name": "linea", "available_topShape": ["rectangle"],
//!                            "maxLength": 3180, "minLength": 1200}]"#),
//!     top_shapes: Some(r#"[{"name": "rectangle"}]"#),
//!     seating: Some(r#"{"rectangular": [{"min": 1200, "max": 3180, "tightFit": 10, "comfortFit": 8}]}"#),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut state = initial_state(&catalog);
//! apply_change(&mut state, &catalog, DesignChange::ChairCount(14));
//! assert_eq!(state.seating().number_of_chairs(), 10);
//! ```

use serde::Serialize;

use crate::catalog::{BaseShapeInfo, Catalog};
use crate::constants::base_shapes;
use crate::dimensions::{DimensionState, DEFAULT_MAX_WIDTH, DEFAULT_MIN_WIDTH};
use crate::placement::{BoundingBox, ChairLayoutRequest, LayoutMode, ScaleRatio};
use crate::pricing::get_price;
use crate::seating::{resolve_fit, ChairCapacity};
use crate::shape::{classify, ShapeCategory};

/// Everything the shopper has selected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DesignState {
    base_shape: Option<String>,
    top_shape: Option<String>,
    base_color: Option<String>,
    top_color: Option<String>,
    chair_model: Option<String>,
    chair_color: Option<String>,
    dimensions: DimensionState,
    seating: ChairCapacity,
    /// `(length, top shape)` the seating was last resolved for.
    #[serde(skip)]
    capacity_key: Option<(i32, Option<String>)>,
}

impl DesignState {
    pub fn base_shape(&self) -> Option<&str> {
        self.base_shape.as_deref()
    }

    pub fn top_shape(&self) -> Option<&str> {
        self.top_shape.as_deref()
    }

    pub fn base_color(&self) -> Option<&str> {
        self.base_color.as_deref()
    }

    pub fn top_color(&self) -> Option<&str> {
        self.top_color.as_deref()
    }

    pub fn chair_model(&self) -> Option<&str> {
        self.chair_model.as_deref()
    }

    pub fn chair_color(&self) -> Option<&str> {
        self.chair_color.as_deref()
    }

    pub fn dimensions(&self) -> &DimensionState {
        &self.dimensions
    }

    pub fn seating(&self) -> &ChairCapacity {
        &self.seating
    }

    pub fn category(&self) -> Option<ShapeCategory> {
        classify(self.top_shape())
    }
}

/// A single user action.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignChange {
    BaseShape(String),
    TopShape(String),
    BaseColor(String),
    TopColor(String),
    ChairModel(String),
    ChairColor(String),
    Length(i32),
    Width(i32),
    AdjustLength(i32),
    AdjustWidth(i32),
    /// Length and width together (square and round tops).
    Size(i32),
    AdjustSize(i32),
    ChairCount(u32),
    AdjustChairs(i32),
}

/// Defaults for a freshly loaded catalog: first base, the first top it
/// offers (in top-table order), first colors, first chair and its first
/// color. Bounds come from the chosen base.
pub fn initial_state(catalog: &Catalog) -> DesignState {
    let mut state = DesignState::default();

    if let Some(base) = catalog.base_shapes().first() {
        state.base_shape = Some(base.name.clone());
        state.top_shape = catalog.default_top_for(base).map(|t| t.name.clone());
        apply_base_bounds(&mut state.dimensions, base);
    }
    state.base_color = catalog
        .base_colors()
        .first()
        .and_then(|group| group.colors.first())
        .map(|c| c.name.clone());
    state.top_color = catalog
        .top_colors()
        .first()
        .and_then(|group| group.colors.first())
        .map(|c| c.name.clone());
    if let Some(chair) = catalog.chairs().first() {
        state.chair_model = Some(chair.name.clone());
        state.chair_color = chair.colors.first().map(|c| c.name.clone());
    }

    sync_capacity(&mut state, catalog);
    state
}

/// Apply one change and run the rest of the cascade.
pub fn apply_change(state: &mut DesignState, catalog: &Catalog, change: DesignChange) {
    log::debug!("Applying {change:?}");
    match change {
        DesignChange::BaseShape(name) => select_base_shape(state, catalog, &name),
        DesignChange::TopShape(name) => state.top_shape = Some(name),
        DesignChange::BaseColor(name) => state.base_color = Some(name),
        DesignChange::TopColor(name) => state.top_color = Some(name),
        DesignChange::ChairModel(name) => {
            state.chair_color = catalog
                .chair(&name)
                .and_then(|c| c.colors.first())
                .map(|c| c.name.clone());
            state.chair_model = Some(name);
        }
        DesignChange::ChairColor(name) => state.chair_color = Some(name),
        DesignChange::Length(v) => state.dimensions.set_selected_length(v),
        DesignChange::Width(v) => state.dimensions.set_selected_width(v),
        DesignChange::AdjustLength(d) => state.dimensions.adjust_length_by(d),
        DesignChange::AdjustWidth(d) => state.dimensions.adjust_width_by(d),
        DesignChange::Size(v) => state.dimensions.set_selected_size(v),
        DesignChange::AdjustSize(d) => state.dimensions.adjust_size_by(d),
        DesignChange::ChairCount(n) => state.seating.set_number_of_chairs(n),
        DesignChange::AdjustChairs(d) => state.seating.adjust_by(d),
    }
    sync_capacity(state, catalog);
}

/// Re-resolve seating even if `(length, top shape)` did not change, e.g.
/// after the seating table arrives.
pub fn refresh_capacity(state: &mut DesignState, catalog: &Catalog) {
    state.capacity_key = None;
    sync_capacity(state, catalog);
}

fn select_base_shape(state: &mut DesignState, catalog: &Catalog, name: &str) {
    let Some(base) = catalog.base_shape(name) else {
        log::warn!("Unknown base shape '{name}', keeping '{:?}'", state.base_shape);
        return;
    };
    state.base_shape = Some(base.name.clone());

    let offered = state.top_shape().is_some_and(|top| base.offers_top(top));
    if !offered {
        if let Some(first) = base.available_top_shapes.first() {
            log::debug!(
                "Top {:?} not offered by '{}', switching to '{first}'",
                state.top_shape,
                base.name
            );
            state.top_shape = Some(first.clone());
        }
    }

    apply_base_bounds(&mut state.dimensions, base);
}

/// Replace the bounds from a base shape and select its largest footprint.
fn apply_base_bounds(dims: &mut DimensionState, base: &BaseShapeInfo) {
    dims.replace_length_bounds(base.min_length, base.max_length);
    if base_shapes::couples_width(&base.name) {
        dims.replace_width_bounds(base.min_length, base.max_length);
    } else {
        dims.replace_width_bounds(DEFAULT_MIN_WIDTH, DEFAULT_MAX_WIDTH);
    }
    dims.set_selected_length(dims.max_length());
    dims.set_selected_width(dims.max_width());
    log::debug!(
        "Bounds for '{}': length {}..={}, width {}..={}",
        base.name,
        dims.min_length(),
        dims.max_length(),
        dims.min_width(),
        dims.max_width()
    );
}

fn sync_capacity(state: &mut DesignState, catalog: &Catalog) {
    let key = (state.dimensions.selected_length(), state.top_shape.clone());
    if state.capacity_key.as_ref() == Some(&key) {
        return;
    }
    let Some(seating) = catalog.seating_table() else {
        log::debug!(
            "Seating table not loaded, keeping ceiling {}",
            state.seating.maximum_number_of_chairs()
        );
        return;
    };
    let fit = resolve_fit(seating, classify(key.1.as_deref()), key.0);
    state.seating.apply_fit(fit);
    state.capacity_key = Some(key);
}

/// Build a placement request from the current design.
pub fn chair_layout_request(
    state: &DesignState,
    mode: LayoutMode,
    table_box: Option<BoundingBox>,
) -> ChairLayoutRequest<'_> {
    ChairLayoutRequest {
        mode,
        shape: state.top_shape(),
        number_of_chairs: state.seating.number_of_chairs(),
        table_box,
        scale: ScaleRatio::from_dimensions(&state.dimensions),
    }
}

/// How full the table is relative to its recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeatingLabel {
    Tight,
    Comfortable,
}

impl std::fmt::Display for SeatingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatingLabel::Tight => f.write_str("Tight"),
            SeatingLabel::Comfortable => f.write_str("Comfortable"),
        }
    }
}

/// Read-only summary of a design for the order screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignSummary {
    pub base_shape: Option<String>,
    pub top_shape: Option<String>,
    pub category: Option<ShapeCategory>,
    pub length: i32,
    pub width: i32,
    pub number_of_chairs: u32,
    pub tight_fit: u32,
    pub comfort_fit: u32,
    pub seating_label: SeatingLabel,
    /// `None` means the price is unknown, not free.
    pub price: Option<f64>,
}

pub fn summarize(state: &DesignState, catalog: &Catalog) -> DesignSummary {
    let category = state.category();
    let length = state.dimensions.selected_length();
    let price = category.and_then(|c| get_price(catalog.price_table(), c, length));
    let seating_label = if state.seating.is_tight() {
        SeatingLabel::Tight
    } else {
        SeatingLabel::Comfortable
    };

    DesignSummary {
        base_shape: state.base_shape.clone(),
        top_shape: state.top_shape.clone(),
        category,
        length,
        width: state.dimensions.selected_width(),
        number_of_chairs: state.seating.number_of_chairs(),
        tight_fit: state.seating.tight_fit(),
        comfort_fit: state.seating.comfort_fit(),
        seating_label,
        price,
    }
}
