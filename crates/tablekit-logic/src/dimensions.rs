//! Table dimension bounds and selection.
//!
//! All values are integer millimeters. Every mutation leaves the state
//! with `min <= selected <= max` on both axes; out-of-range requests are
//! corrected, never rejected.
//!
//! # Snapping
//!
//! Selected values are clamped first. A clamped value that lands exactly
//! on a bound is kept as-is, so off-grid bounds (e.g. 3180) stay reachable.
//! Anything else snaps to a coarse grid when the snapped value stays in
//! range. When it doesn't, length falls back to its configured step and
//! width falls back to its maximum.
//!
//! ```
//! use tablekit_logic::dimensions::DimensionState;
//!
//! let mut dims = DimensionState::default();
//! dims.set_selected_length(2345);
//! assert_eq!(dims.selected_length(), 2300);
//! dims.set_selected_length(9999);
//! assert_eq!(dims.selected_length(), dims.max_length());
//! ```

use serde::Serialize;

pub const DEFAULT_MIN_LENGTH: i32 = 1200;
pub const DEFAULT_MAX_LENGTH: i32 = 3180;
pub const DEFAULT_MIN_WIDTH: i32 = 800;
pub const DEFAULT_MAX_WIDTH: i32 = 1300;
pub const DEFAULT_LENGTH_STEP: i32 = 80;
pub const DEFAULT_WIDTH_STEP: i32 = 30;

/// Preferred snapping grid for length.
pub const LENGTH_GRID: i32 = 100;
/// Preferred snapping grid for width.
pub const WIDTH_GRID: i32 = 50;

/// Increment applied by the length +/- buttons.
pub const LENGTH_BUTTON_DELTA: i32 = 100;
/// Increment applied by the width +/- buttons and the combined size buttons.
pub const WIDTH_BUTTON_DELTA: i32 = 50;

/// Length/width bounds plus the currently selected footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionState {
    min_length: i32,
    max_length: i32,
    min_width: i32,
    max_width: i32,
    selected_length: i32,
    selected_width: i32,
    length_step: i32,
    width_step: i32,
}

impl Default for DimensionState {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_LENGTH,
            DEFAULT_MAX_LENGTH,
            DEFAULT_MIN_WIDTH,
            DEFAULT_MAX_WIDTH,
        )
    }
}

impl DimensionState {
    /// Build a state with the given bounds, selecting the largest footprint.
    /// Swapped bounds are reordered.
    pub fn new(min_length: i32, max_length: i32, min_width: i32, max_width: i32) -> Self {
        let (min_length, max_length) = ordered(min_length, max_length);
        let (min_width, max_width) = ordered(min_width, max_width);
        Self {
            min_length,
            max_length,
            min_width,
            max_width,
            selected_length: max_length,
            selected_width: max_width,
            length_step: DEFAULT_LENGTH_STEP,
            width_step: DEFAULT_WIDTH_STEP,
        }
    }

    /// Override the fallback snapping steps. Non-positive steps become 1.
    pub fn with_steps(mut self, length_step: i32, width_step: i32) -> Self {
        self.length_step = length_step.max(1);
        self.width_step = width_step.max(1);
        self
    }

    pub fn min_length(&self) -> i32 {
        self.min_length
    }

    pub fn max_length(&self) -> i32 {
        self.max_length
    }

    pub fn min_width(&self) -> i32 {
        self.min_width
    }

    pub fn max_width(&self) -> i32 {
        self.max_width
    }

    pub fn selected_length(&self) -> i32 {
        self.selected_length
    }

    pub fn selected_width(&self) -> i32 {
        self.selected_width
    }

    pub fn length_step(&self) -> i32 {
        self.length_step
    }

    pub fn width_step(&self) -> i32 {
        self.width_step
    }

    // ── Bounds ──────────────────────────────────────────────────────────

    /// Set the maximum length. A minimum above it is pulled down with it.
    pub fn set_max_length(&mut self, length: i32) {
        self.max_length = length;
        self.min_length = self.min_length.min(length);
        self.selected_length = self.selected_length.min(length);
    }

    /// Set the minimum length. A maximum below it is pushed up with it.
    pub fn set_min_length(&mut self, length: i32) {
        self.min_length = length;
        self.max_length = self.max_length.max(length);
        self.selected_length = self.selected_length.max(length);
    }

    /// Set the maximum width. A minimum above it is pulled down with it.
    pub fn set_max_width(&mut self, width: i32) {
        self.max_width = width;
        self.min_width = self.min_width.min(width);
        self.selected_width = self.selected_width.min(width);
    }

    /// Set the minimum width. A maximum below it is pushed up with it.
    pub fn set_min_width(&mut self, width: i32) {
        self.min_width = width;
        self.max_width = self.max_width.max(width);
        self.selected_width = self.selected_width.max(width);
    }

    /// Replace both length bounds at once, then re-clamp the selection.
    pub fn replace_length_bounds(&mut self, min: i32, max: i32) {
        let (min, max) = ordered(min, max);
        self.min_length = min;
        self.max_length = max;
        self.selected_length = self.selected_length.clamp(min, max);
    }

    /// Replace both width bounds at once, then re-clamp the selection.
    pub fn replace_width_bounds(&mut self, min: i32, max: i32) {
        let (min, max) = ordered(min, max);
        self.min_width = min;
        self.max_width = max;
        self.selected_width = self.selected_width.clamp(min, max);
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select a length: clamp, keep exact bounds, else snap to the 100mm
    /// grid, else to the configured step.
    pub fn set_selected_length(&mut self, length: i32) {
        let (min, max) = (self.min_length, self.max_length);
        let clamped = length.clamp(min, max);

        if clamped == min || clamped == max {
            self.selected_length = clamped;
            return;
        }

        let coarse = snap(clamped, LENGTH_GRID);
        if (min..=max).contains(&coarse) {
            self.selected_length = coarse;
            return;
        }

        self.selected_length = snap(clamped, self.length_step).clamp(min, max);
    }

    /// Select a width: clamp, keep exact bounds, else snap to the 50mm
    /// grid, else fall back to the maximum width.
    pub fn set_selected_width(&mut self, width: i32) {
        let (min, max) = (self.min_width, self.max_width);
        let clamped = width.clamp(min, max);

        if clamped == min || clamped == max {
            self.selected_width = clamped;
            return;
        }

        let coarse = snap(clamped, WIDTH_GRID);
        if (min..=max).contains(&coarse) {
            self.selected_width = coarse;
            return;
        }

        // off-grid widths fall back to the widest footprint
        self.selected_width = max;
    }

    pub fn adjust_length_by(&mut self, delta: i32) {
        self.set_selected_length(self.selected_length.saturating_add(delta));
    }

    pub fn adjust_width_by(&mut self, delta: i32) {
        self.set_selected_width(self.selected_width.saturating_add(delta));
    }

    /// Set length and width together (square and round tops). Both axes
    /// always end up equal: the size is clamped into the range the two
    /// axes share, kept on a shared bound, else snapped to the 50mm grid.
    ///
    /// When the ranges don't overlap, length is resolved on its own and
    /// width takes the nearest value it allows.
    pub fn set_selected_size(&mut self, size: i32) {
        let lo = self.min_length.max(self.min_width);
        let hi = self.max_length.min(self.max_width);
        if lo > hi {
            self.set_selected_length(size);
            self.selected_width = self.selected_length.clamp(self.min_width, self.max_width);
            return;
        }

        let clamped = size.clamp(lo, hi);
        let resolved = if clamped == lo || clamped == hi {
            clamped
        } else {
            let coarse = snap(clamped, WIDTH_GRID);
            if (lo..=hi).contains(&coarse) {
                coarse
            } else {
                clamped
            }
        };
        self.selected_length = resolved;
        self.selected_width = resolved;
    }

    /// Adjust length and width together (square and round tops).
    pub fn adjust_size_by(&mut self, delta: i32) {
        self.set_selected_size(self.selected_length.saturating_add(delta));
    }

    /// Average of length and width, shown by the combined size slider.
    pub fn combined_size(&self) -> i32 {
        round_half_up((self.selected_length as f64 + self.selected_width as f64) / 2.0)
    }

    /// Slider granularity: the configured step when it tiles the range, else 1.
    pub fn length_slider_step(&self) -> i32 {
        slider_step(self.min_length, self.max_length, self.length_step)
    }

    pub fn width_slider_step(&self) -> i32 {
        slider_step(self.min_width, self.max_width, self.width_step)
    }

    /// Selected / maximum length, or 1.0 when the maximum is not positive.
    pub fn length_ratio(&self) -> f32 {
        ratio(self.selected_length, self.max_length)
    }

    /// Selected / maximum width, or 1.0 when the maximum is not positive.
    pub fn width_ratio(&self) -> f32 {
        ratio(self.selected_width, self.max_width)
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Round half toward positive infinity, matching slider rounding.
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn snap(value: i32, grid: i32) -> i32 {
    let grid = grid.max(1);
    round_half_up(value as f64 / grid as f64).saturating_mul(grid)
}

fn slider_step(min: i32, max: i32, step: i32) -> i32 {
    if step > 0 && (max as i64 - min as i64) % step as i64 == 0 {
        step
    } else {
        1
    }
}

fn ratio(selected: i32, max: i32) -> f32 {
    if max > 0 {
        selected as f32 / max as f32
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_invariants(dims: &DimensionState) {
        assert!(dims.min_length() <= dims.max_length(), "{dims:?}");
        assert!(dims.min_width() <= dims.max_width(), "{dims:?}");
        assert!(
            (dims.min_length()..=dims.max_length()).contains(&dims.selected_length()),
            "{dims:?}"
        );
        assert!(
            (dims.min_width()..=dims.max_width()).contains(&dims.selected_width()),
            "{dims:?}"
        );
    }

    #[test]
    fn default_selects_largest_footprint() {
        let dims = DimensionState::default();
        assert_eq!(dims.selected_length(), 3180);
        assert_eq!(dims.selected_width(), 1300);
        assert_eq!(dims.length_step(), 80);
        assert_eq!(dims.width_step(), 30);
    }

    #[test]
    fn exact_bounds_are_kept_off_grid() {
        let mut dims = DimensionState::new(1200, 3180, 800, 1300);
        dims.set_selected_length(2000);
        dims.set_selected_length(3180);
        assert_eq!(dims.selected_length(), 3180);
        dims.set_selected_length(1200);
        assert_eq!(dims.selected_length(), 1200);

        let mut odd = DimensionState::new(1250, 1580, 800, 1300);
        odd.set_selected_length(1250);
        assert_eq!(odd.selected_length(), 1250);
    }

    #[test]
    fn length_snaps_to_hundreds() {
        let mut dims = DimensionState::default();
        dims.set_selected_length(2345);
        assert_eq!(dims.selected_length(), 2300);
        dims.set_selected_length(2350);
        assert_eq!(dims.selected_length(), 2400);
    }

    #[test]
    fn length_falls_back_to_step_near_odd_bound() {
        // 3150 rounds to 3200, which is above the bound; step snap gives 3120.
        let mut dims = DimensionState::new(1200, 3180, 800, 1300);
        dims.set_selected_length(3150);
        assert_eq!(dims.selected_length(), 3120);
    }

    #[test]
    fn length_step_fallback_is_clamped() {
        // 1230 rounds to 1200, below min 1210; step snap (80) also gives 1200 → clamped.
        let mut dims = DimensionState::new(1210, 1500, 800, 1300);
        dims.set_selected_length(1230);
        assert_eq!(dims.selected_length(), 1210);
    }

    #[test]
    fn out_of_range_length_clamps() {
        let mut dims = DimensionState::default();
        dims.set_selected_length(-50);
        assert_eq!(dims.selected_length(), 1200);
        dims.set_selected_length(i32::MAX);
        assert_eq!(dims.selected_length(), 3180);
    }

    #[test]
    fn width_snaps_to_fifties() {
        let mut dims = DimensionState::default();
        dims.set_selected_width(1020);
        assert_eq!(dims.selected_width(), 1000);
        dims.set_selected_width(1030);
        assert_eq!(dims.selected_width(), 1050);
    }

    #[test]
    fn width_falls_back_to_maximum() {
        // 1290 rounds to 1300, above max 1295 → falls back to the max.
        let mut dims = DimensionState::new(1200, 3180, 800, 1295);
        dims.set_selected_width(1000);
        dims.set_selected_width(1290);
        assert_eq!(dims.selected_width(), 1295);

        // Same fallback near the minimum.
        let mut low = DimensionState::new(1200, 3180, 810, 1300);
        low.set_selected_width(820);
        assert_eq!(low.selected_width(), 1300);
    }

    #[test]
    fn bound_setters_clamp_selection() {
        let mut dims = DimensionState::default();
        dims.set_max_length(2000);
        assert_eq!(dims.selected_length(), 2000);
        dims.set_min_length(2500);
        assert_eq!(dims.min_length(), 2500);
        assert_eq!(dims.max_length(), 2500);
        assert_eq!(dims.selected_length(), 2500);
        assert_invariants(&dims);
    }

    #[test]
    fn replace_bounds_reclamps() {
        let mut dims = DimensionState::default();
        dims.replace_length_bounds(1600, 1400);
        assert_eq!(dims.min_length(), 1400);
        assert_eq!(dims.max_length(), 1600);
        assert_eq!(dims.selected_length(), 1600);
        dims.replace_width_bounds(900, 1000);
        assert_eq!(dims.selected_width(), 1000);
    }

    #[test]
    fn adjust_runs_through_setters() {
        let mut dims = DimensionState::default();
        dims.adjust_length_by(-LENGTH_BUTTON_DELTA);
        // 3080 snaps to 3100
        assert_eq!(dims.selected_length(), 3100);
        dims.adjust_length_by(-LENGTH_BUTTON_DELTA);
        assert_eq!(dims.selected_length(), 3000);
        dims.adjust_width_by(-WIDTH_BUTTON_DELTA);
        assert_eq!(dims.selected_width(), 1250);
        dims.adjust_width_by(10_000);
        assert_eq!(dims.selected_width(), 1300);
    }

    #[test]
    fn coupled_size_keeps_axes_equal() {
        let mut dims = DimensionState::new(1200, 1600, 1200, 1600);
        dims.set_selected_size(1450);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1450, 1450));
        dims.adjust_size_by(WIDTH_BUTTON_DELTA);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1500, 1500));
        dims.adjust_size_by(-WIDTH_BUTTON_DELTA);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1450, 1450));
        assert_eq!(dims.combined_size(), 1450);
        assert_eq!(dims.length_ratio(), dims.width_ratio());
    }

    #[test]
    fn coupled_size_snaps_and_clamps() {
        let mut dims = DimensionState::new(1200, 1600, 1200, 1600);
        dims.set_selected_size(1437);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1450, 1450));
        dims.adjust_size_by(10_000);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1600, 1600));
        dims.set_selected_size(0);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1200, 1200));
    }

    #[test]
    fn coupled_size_uses_shared_range() {
        // length 1200..=3180, width 800..=1300 share 1200..=1300
        let mut dims = DimensionState::default();
        dims.set_selected_size(2000);
        assert_eq!((dims.selected_length(), dims.selected_width()), (1300, 1300));
    }

    #[test]
    fn coupled_size_without_overlap() {
        let mut dims = DimensionState::new(2000, 3000, 800, 1300);
        dims.set_selected_size(2450);
        assert_eq!(dims.selected_length(), 2500);
        assert_eq!(dims.selected_width(), 1300);
    }

    #[test]
    fn custom_steps_drive_fallback_snap() {
        // the 100mm grid leaves 1230..=1270, so the configured step decides
        let mut dims = DimensionState::new(1230, 1270, 800, 1300);
        dims.set_selected_length(1245);
        assert_eq!(dims.selected_length(), 1270);

        let mut dims = DimensionState::new(1230, 1270, 800, 1300).with_steps(20, 25);
        dims.set_selected_length(1245);
        assert_eq!(dims.selected_length(), 1240);
        assert_eq!(dims.length_step(), 20);
        assert_eq!(dims.width_step(), 25);
    }

    #[test]
    fn custom_steps_drive_slider_steps() {
        let dims = DimensionState::new(1200, 3180, 800, 1300).with_steps(90, 50);
        // 1980 = 22 * 90, 500 = 10 * 50
        assert_eq!(dims.length_slider_step(), 90);
        assert_eq!(dims.width_slider_step(), 50);

        let dims = DimensionState::new(1200, 3180, 800, 1300).with_steps(0, -5);
        assert_eq!((dims.length_step(), dims.width_step()), (1, 1));
        assert_eq!(dims.length_slider_step(), 1);
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let dims = DimensionState::new(i32::MIN, i32::MAX, 0, 10);
        assert_eq!(dims.length_slider_step(), 1);
        let dims = DimensionState::new(i32::MIN, i32::MAX, 0, 10).with_steps(1, 1);
        assert_eq!(dims.length_slider_step(), 1);
    }

    #[test]
    fn slider_steps() {
        let dims = DimensionState::new(1200, 3180, 800, 1300);
        // 1980 is not a multiple of 80
        assert_eq!(dims.length_slider_step(), 1);
        // 500 is not a multiple of 30
        assert_eq!(dims.width_slider_step(), 1);
        let aligned = DimensionState::new(1200, 2800, 800, 1100);
        assert_eq!(aligned.length_slider_step(), 80);
        assert_eq!(aligned.width_slider_step(), 30);
    }

    #[test]
    fn ratios() {
        let mut dims = DimensionState::default();
        assert_eq!(dims.length_ratio(), 1.0);
        dims.set_max_length(2000);
        dims.set_selected_length(1200);
        assert!((dims.length_ratio() - 0.6).abs() < 1e-6);
        let zero = DimensionState::new(0, 0, 0, 0);
        assert_eq!(zero.width_ratio(), 1.0);
    }

    #[test]
    fn random_sequences_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let mut dims = DimensionState::default();
            for _ in 0..50 {
                let v = rng.gen_range(-500..5000);
                match rng.gen_range(0..10) {
                    0 => dims.set_max_length(v),
                    1 => dims.set_min_length(v),
                    2 => dims.set_selected_length(v),
                    3 => dims.adjust_length_by(v - 2500),
                    4 => dims.set_max_width(v),
                    5 => dims.set_min_width(v),
                    6 => dims.set_selected_width(v),
                    7 => dims.set_selected_size(v),
                    8 => dims.adjust_size_by(v - 2500),
                    _ => dims.replace_length_bounds(v, rng.gen_range(-500..5000)),
                }
                assert_invariants(&dims);
            }
        }
    }
}
