//! Chair placement around a table.
//!
//! Layouts are computed against the table's bounding box at its maximum
//! footprint, then every position is scaled by `(ratio_x, 1, ratio_z)` to
//! the currently selected footprint. Relative spacing, and which edge each
//! chair sits on, therefore survive resizing.
//!
//! Placement is a pure function of the request: no state is kept between
//! calls and chairs have no identity across recomputations.
//!
//! # Layouts
//!
//! | Table | Rule |
//! |-------|------|
//! | rectangular | 1 chair per short end when n ≥ 4, rest split front/back |
//! | square | fixed split for 2/4/6/8, quartered otherwise, widened spacing |
//! | round | equal angular steps, first chair offset by half a step |
//! | oval | top and bottom arcs only, trimmed near the tips |
//! | showcase | two chairs facing each other, table ignored |
//!
//! ```
//! use glam::Vec3;
//! use tablekit_logic::placement::{place_chairs, BoundingBox, ChairLayoutRequest, ScaleRatio};
//!
//! let table = BoundingBox::new(Vec3::new(-1.0, 0.0, -0.5), Vec3::new(1.0, 0.75, 0.5));
//! let request = ChairLayoutRequest::table(Some("rectangle"), 6, Some(table), ScaleRatio::default());
//! assert_eq!(place_chairs(&request).len(), 6);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::dimensions::DimensionState;
use crate::shape::{classify, is_oval, ShapeCategory};

/// Distance from a rectangular table edge to the chair.
pub const RECTANGULAR_CLEARANCE: f32 = 0.275;
/// Distance from a square table edge to the chair.
pub const SQUARE_CLEARANCE: f32 = 0.15;
/// Added to the even spacing step on square tables.
pub const SQUARE_EXTRA_GAP: f32 = 0.15;
/// Added to both radii of a round table.
pub const ROUND_CLEARANCE: f32 = 0.12;
/// Added to both radii of an oval table before inflation.
pub const OVAL_CLEARANCE: f32 = 0.12;
/// Arc trimmed at each tip of an oval table, in radians.
pub const OVAL_END_MARGIN: f32 = 0.28;
/// Radial push applied to oval chairs.
pub const OVAL_INFLATION: f32 = 1.09;
/// Half the distance between the two showcase chairs.
pub const SHOWCASE_HALF_SPACING: f32 = 0.28;

const MIN_RADIUS: f32 = 1e-4;

/// Axis-aligned bounding box of the table model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on the origin in x/z, resting on the floor.
    pub fn centered(length: f32, height: f32, width: f32) -> Self {
        Self {
            min: Vec3::new(-length * 0.5, 0.0, -width * 0.5),
            max: Vec3::new(length * 0.5, height, width * 0.5),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }
}

/// Which layout the viewer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Chairs around the real table.
    Table,
    /// Fixed two-chair close-up.
    TwoChair,
}

/// Selected / maximum footprint per horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRatio {
    pub x: f32,
    pub z: f32,
}

impl Default for ScaleRatio {
    fn default() -> Self {
        Self { x: 1.0, z: 1.0 }
    }
}

impl ScaleRatio {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Length maps to x, width maps to z.
    pub fn from_dimensions(dims: &DimensionState) -> Self {
        Self {
            x: dims.length_ratio(),
            z: dims.width_ratio(),
        }
    }

    pub fn apply(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x * self.x, p.y, p.z * self.z)
    }
}

/// Everything the placement engine needs for one layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChairLayoutRequest<'a> {
    pub mode: LayoutMode,
    /// Top-shape name; classified internally.
    pub shape: Option<&'a str>,
    pub number_of_chairs: u32,
    /// Absent until the table model has loaded.
    pub table_box: Option<BoundingBox>,
    pub scale: ScaleRatio,
}

impl<'a> ChairLayoutRequest<'a> {
    pub fn table(
        shape: Option<&'a str>,
        number_of_chairs: u32,
        table_box: Option<BoundingBox>,
        scale: ScaleRatio,
    ) -> Self {
        Self {
            mode: LayoutMode::Table,
            shape,
            number_of_chairs,
            table_box,
            scale,
        }
    }

    pub fn showcase(number_of_chairs: u32) -> Self {
        Self {
            mode: LayoutMode::TwoChair,
            shape: None,
            number_of_chairs,
            table_box: None,
            scale: ScaleRatio::default(),
        }
    }
}

/// Where one chair goes and which way it faces (yaw only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChairPlacement {
    pub position: Vec3,
    pub rotation_y: f32,
}

/// Compute every chair placement for a request.
///
/// Returns an empty list when there are no chairs, when the table box is
/// missing, or when the shape is not recognized.
pub fn place_chairs(request: &ChairLayoutRequest) -> Vec<ChairPlacement> {
    let n = request.number_of_chairs;
    if n == 0 {
        return Vec::new();
    }

    if request.mode == LayoutMode::TwoChair {
        return showcase_pair();
    }

    let Some(category) = classify(request.shape) else {
        log::warn!(
            "Cannot place {n} chairs: unrecognized top shape {:?}",
            request.shape
        );
        return Vec::new();
    };
    let Some(table) = request.table_box else {
        log::debug!("Table bounds not available yet, skipping chair placement");
        return Vec::new();
    };

    let raw = if is_oval(request.shape) {
        place_oval(n, &table)
    } else {
        match category {
            ShapeCategory::Rectangular => facing_edges(place_rectangular(n, &table), &table),
            ShapeCategory::Square => facing_edges(place_square(n, &table), &table),
            ShapeCategory::Round => place_round(n, &table),
        }
    };

    raw.into_iter()
        .map(|p| ChairPlacement {
            position: request.scale.apply(p.position),
            rotation_y: p.rotation_y,
        })
        .collect()
}

fn showcase_pair() -> Vec<ChairPlacement> {
    vec![
        ChairPlacement {
            position: Vec3::new(-SHOWCASE_HALF_SPACING, 0.0, 0.0),
            rotation_y: 0.0,
        },
        ChairPlacement {
            position: Vec3::new(SHOWCASE_HALF_SPACING, 0.0, 0.0),
            rotation_y: PI,
        },
    ]
}

// ── Edge layouts (rectangular, square) ──────────────────────────────────

/// Yaw for a chair on a straight edge, derived from where it sits: chairs
/// within the table's x span face along z, the rest face along x.
fn edge_rotation(p: Vec3, table: &BoundingBox) -> f32 {
    let center = table.center();
    if p.x >= table.min.x && p.x <= table.max.x {
        if p.z > center.z {
            PI
        } else {
            0.0
        }
    } else if p.x > center.x {
        -FRAC_PI_2
    } else {
        FRAC_PI_2
    }
}

fn facing_edges(positions: Vec<Vec3>, table: &BoundingBox) -> Vec<ChairPlacement> {
    positions
        .into_iter()
        .map(|position| ChairPlacement {
            position,
            rotation_y: edge_rotation(position, table),
        })
        .collect()
}

/// Front/back along the long edges, one chair per short end once n ≥ 4.
fn place_rectangular(n: u32, table: &BoundingBox) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(n as usize);
    let length = table.max.x - table.min.x;
    let front_z = table.min.z - RECTANGULAR_CLEARANCE;
    let back_z = table.max.z + RECTANGULAR_CLEARANCE;

    let side_count = if n >= 4 { 2 } else { 0 };
    let remaining = n - side_count;
    let front_count = remaining.div_ceil(2);
    let back_count = remaining - front_count;

    for (count, z) in [(front_count, front_z), (back_count, back_z)] {
        let step = length / (count + 1) as f32;
        for i in 1..=count {
            positions.push(Vec3::new(table.min.x + step * i as f32, 0.0, z));
        }
    }

    if side_count == 2 {
        let mid_z = (table.min.z + table.max.z) * 0.5;
        positions.push(Vec3::new(table.min.x - RECTANGULAR_CLEARANCE, 0.0, mid_z));
        positions.push(Vec3::new(table.max.x + RECTANGULAR_CLEARANCE, 0.0, mid_z));
    }

    positions
}

/// Chairs on the length edges (front + back) and on the width edges
/// (left + right).
fn square_edge_totals(n: u32) -> (u32, u32) {
    match n {
        2 => (2, 0),
        4 => (2, 2),
        6 => (4, 2),
        8 => (4, 4),
        n if n < 4 => (n, 0),
        n => {
            // front, right, back, left; remainder goes round-robin from the front
            let mut per_side = [n / 4; 4];
            for side in per_side.iter_mut().take((n % 4) as usize) {
                *side += 1;
            }
            (per_side[0] + per_side[2], per_side[1] + per_side[3])
        }
    }
}

/// Evenly spaced along `[min, max]` with the extra square-table gap,
/// centered on the edge and clamped to its span.
fn spread_with_gap(count: u32, min: f32, max: f32) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![(min + max) * 0.5],
        _ => {
            let center = (min + max) * 0.5;
            let step = (max - min) / (count + 1) as f32 + SQUARE_EXTRA_GAP;
            let start = center - step * (count - 1) as f32 * 0.5;
            (0..count)
                .map(|i| (start + step * i as f32).clamp(min, max))
                .collect()
        }
    }
}

fn place_square(n: u32, table: &BoundingBox) -> Vec<Vec3> {
    let (length_total, width_total) = square_edge_totals(n);
    let front_count = length_total.div_ceil(2);
    let back_count = length_total - front_count;
    let left_count = width_total.div_ceil(2);
    let right_count = width_total - left_count;

    let (min, max) = (table.min, table.max);
    let mut positions = Vec::with_capacity(n as usize);

    for (count, z) in [
        (front_count, min.z - SQUARE_CLEARANCE),
        (back_count, max.z + SQUARE_CLEARANCE),
    ] {
        positions.extend(
            spread_with_gap(count, min.x, max.x)
                .into_iter()
                .map(|x| Vec3::new(x, 0.0, z)),
        );
    }
    for (count, x) in [
        (left_count, min.x - SQUARE_CLEARANCE),
        (right_count, max.x + SQUARE_CLEARANCE),
    ] {
        positions.extend(
            spread_with_gap(count, min.z, max.z)
                .into_iter()
                .map(|z| Vec3::new(x, 0.0, z)),
        );
    }

    positions
}

// ── Elliptical layouts (round, oval) ────────────────────────────────────

/// Equal angular steps around the table, chair `i` at `π/n · (2i + 1)`.
fn place_round(n: u32, table: &BoundingBox) -> Vec<ChairPlacement> {
    let half = table.half_extents();
    let center = table.center();
    let rx = half.x + ROUND_CLEARANCE;
    let rz = half.z + ROUND_CLEARANCE;
    let step = PI / n as f32;

    (0..n)
        .map(|i| {
            let angle = step * (2 * i + 1) as f32;
            let dx = angle.cos() * rx;
            let dz = angle.sin() * rz;
            ChairPlacement {
                position: Vec3::new(center.x + dx, 0.0, center.z + dz),
                rotation_y: (-dx).atan2(-dz),
            }
        })
        .collect()
}

/// Angle parameters for `count` chairs spread strictly inside an arc.
fn arc_angles(count: u32, start: f32, end: f32) -> impl Iterator<Item = f32> {
    (1..=count).map(move |i| {
        let t = i as f32 / (count + 1) as f32;
        start + (end - start) * t
    })
}

/// Top arc gets `ceil(n/2)` chairs, bottom arc the rest. Each chair faces
/// along the ellipse's inward normal.
fn place_oval(n: u32, table: &BoundingBox) -> Vec<ChairPlacement> {
    let half = table.half_extents();
    let center = table.center();
    let rx = (half.x + OVAL_CLEARANCE).max(MIN_RADIUS);
    let rz = (half.z + OVAL_CLEARANCE).max(MIN_RADIUS);
    let top_count = n.div_ceil(2);
    let bottom_count = n / 2;

    let top = arc_angles(top_count, PI - OVAL_END_MARGIN, OVAL_END_MARGIN);
    let bottom = arc_angles(bottom_count, PI + OVAL_END_MARGIN, 2.0 * PI - OVAL_END_MARGIN);

    top.chain(bottom)
        .map(|theta| {
            let dx = rx * theta.cos() * OVAL_INFLATION;
            let dz = rz * theta.sin() * OVAL_INFLATION;
            // gradient of x²/rx² + z²/rz², negated
            let inward_x = -dx / (rx * rx);
            let inward_z = -dz / (rz * rz);
            ChairPlacement {
                position: Vec3::new(center.x + dx, 0.0, center.z + dz),
                rotation_y: inward_x.atan2(inward_z),
            }
        })
        .collect()
}
