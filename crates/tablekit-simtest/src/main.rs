//! TableKit Headless Harness
//!
//! Validates the bundled catalog tables and sweeps the configurator logic.
//! Runs entirely in-process: no viewer, no network, no rendering.
//!
//! Usage:
//!   cargo run -p tablekit-simtest
//!   cargo run -p tablekit-simtest -- --verbose
//!   cargo run -p tablekit-simtest -- --json
//!
//! Set `RUST_LOG=debug` to see the cascade as it runs.

use serde::Serialize;
use tablekit_logic::catalog::{Catalog, CatalogSources};
use tablekit_logic::constants::top_shapes;
use tablekit_logic::design::{
    apply_change, chair_layout_request, initial_state, summarize, DesignChange, DesignState,
    DesignSummary,
};
use tablekit_logic::dimensions::LENGTH_BUTTON_DELTA;
use tablekit_logic::placement::{
    place_chairs, BoundingBox, ChairLayoutRequest, ChairPlacement, LayoutMode, ScaleRatio,
};
use tablekit_logic::shape::{classify, is_oval, ShapeCategory};
use tablekit_logic::validation::{validate_catalog, Severity};
use tracing_subscriber::EnvFilter;

// ── Bundled tables (same JSON the storefront serves) ────────────────────
const BASE_SHAPES_JSON: &str = include_str!("../../../data/baseShape.json");
const TOP_SHAPES_JSON: &str = include_str!("../../../data/topShape.json");
const BASE_COLORS_JSON: &str = include_str!("../../../data/baseColors.json");
const TOP_COLORS_JSON: &str = include_str!("../../../data/topColor.json");
const CHAIRS_JSON: &str = include_str!("../../../data/chairs.json");
const SEATING_JSON: &str = include_str!("../../../data/numberChairs.json");
const PRICES_JSON: &str = include_str!("../../../data/price.json");

const MAX_SWEEP_CHAIRS: u32 = 12;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct DesignDump {
    summary: DesignSummary,
    placements: Vec<ChairPlacement>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");

    let catalog = match load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("catalog failed to load: {e}");
            std::process::exit(1);
        }
    };

    if json {
        dump_default_design(&catalog);
        return;
    }

    println!("=== TableKit Configurator Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog contents
    results.extend(validate_catalog_contents(&catalog, verbose));

    // 2. Data-authoring checks
    results.extend(validate_catalog_issues(&catalog, verbose));

    // 3. Seating and price coverage over every reachable size
    results.extend(validate_size_coverage(&catalog, verbose));

    // 4. Placement sweep
    results.extend(validate_placement(verbose));

    // 5. Design cascade
    results.extend(validate_design_cascade(&catalog, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_catalog() -> Result<Catalog, tablekit_logic::catalog::CatalogError> {
    Catalog::from_sources(&CatalogSources {
        base_shapes: Some(BASE_SHAPES_JSON),
        top_shapes: Some(TOP_SHAPES_JSON),
        base_colors: Some(BASE_COLORS_JSON),
        top_colors: Some(TOP_COLORS_JSON),
        chairs: Some(CHAIRS_JSON),
        seating: Some(SEATING_JSON),
        prices: Some(PRICES_JSON),
    })
}

/// Table model bounds at full size, in metres, as the viewer would report.
fn full_size_box(state: &DesignState) -> BoundingBox {
    let dims = state.dimensions();
    BoundingBox::centered(
        dims.max_length() as f32 / 1000.0,
        0.75,
        dims.max_width() as f32 / 1000.0,
    )
}

fn dump_default_design(catalog: &Catalog) {
    let state = initial_state(catalog);
    let table = full_size_box(&state);
    let dump = DesignDump {
        summary: summarize(&state, catalog),
        placements: place_chairs(&chair_layout_request(
            &state,
            LayoutMode::Table,
            Some(table),
        )),
    };
    match serde_json::to_string_pretty(&dump) {
        Ok(s) => println!("{s}"),
        Err(e) => {
            eprintln!("failed to serialize design: {e}");
            std::process::exit(1);
        }
    }
}

// ── 1. Catalog Contents ─────────────────────────────────────────────────

fn validate_catalog_contents(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "catalog_base_shapes".into(),
        passed: !catalog.base_shapes().is_empty(),
        detail: format!("{} base shapes loaded", catalog.base_shapes().len()),
    });

    let missing_tops: Vec<_> = top_shapes::ALL
        .iter()
        .filter(|name| catalog.top_shape(name).is_none())
        .collect();
    results.push(TestResult {
        name: "catalog_known_tops_present".into(),
        passed: missing_tops.is_empty(),
        detail: if missing_tops.is_empty() {
            format!("all {} known top shapes present", top_shapes::ALL.len())
        } else {
            format!("missing tops: {:?}", missing_tops)
        },
    });

    let colorless: Vec<_> = catalog
        .chairs()
        .iter()
        .filter(|c| c.colors.is_empty())
        .map(|c| c.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_chairs_have_colors".into(),
        passed: !catalog.chairs().is_empty() && colorless.is_empty(),
        detail: if colorless.is_empty() {
            format!("{} chair models, all with colors", catalog.chairs().len())
        } else {
            format!("chairs without colors: {:?}", colorless)
        },
    });

    let empty_groups = catalog
        .base_colors()
        .iter()
        .filter(|g| g.colors.is_empty())
        .count()
        + catalog
            .top_colors()
            .iter()
            .filter(|g| g.colors.is_empty())
            .count();
    results.push(TestResult {
        name: "catalog_color_groups_filled".into(),
        passed: empty_groups == 0,
        detail: format!(
            "{} base color groups, {} top color groups, {} empty",
            catalog.base_colors().len(),
            catalog.top_colors().len(),
            empty_groups
        ),
    });

    results.push(TestResult {
        name: "catalog_rule_tables_loaded".into(),
        passed: catalog.seating_table().is_some() && catalog.price_table().is_some(),
        detail: "seating and price tables loaded".into(),
    });

    if verbose {
        for base in catalog.base_shapes() {
            println!(
                "  {} {}..={}mm tops={:?}",
                base.name, base.min_length, base.max_length, base.available_top_shapes
            );
        }
    }

    results
}

// ── 2. Catalog Issues ───────────────────────────────────────────────────

fn validate_catalog_issues(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog Validation ---");
    let issues = validate_catalog(catalog);
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    if verbose {
        for issue in &issues {
            println!("  [{:?}] {}: {}", issue.severity, issue.category, issue.message);
        }
    }

    vec![
        TestResult {
            name: "validation_no_errors".into(),
            passed: errors == 0,
            detail: format!("{} errors", errors),
        },
        TestResult {
            name: "validation_no_warnings".into(),
            passed: warnings == 0,
            detail: format!("{} warnings", warnings),
        },
    ]
}

// ── 3. Size Coverage ────────────────────────────────────────────────────

/// Walk every (base, top) pair from its largest footprint down to its
/// smallest with the minus button, checking seating and price each step.
fn validate_size_coverage(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Size Coverage ---");
    let mut results = Vec::new();
    let mut steps = 0;
    let mut unseated = Vec::new();
    let mut unpriced = Vec::new();

    for base in catalog.base_shapes() {
        for top in &base.available_top_shapes {
            let mut state = initial_state(catalog);
            apply_change(&mut state, catalog, DesignChange::BaseShape(base.name.clone()));
            apply_change(&mut state, catalog, DesignChange::TopShape(top.clone()));
            let coupled = state.category().is_some_and(|c| c.couples_axes());

            loop {
                steps += 1;
                let summary = summarize(&state, catalog);
                let label = format!("{}/{}@{}", base.name, top, summary.length);
                if state.seating().maximum_number_of_chairs() == 0 {
                    unseated.push(label.clone());
                }
                if summary.price.is_none() {
                    unpriced.push(label);
                }

                let before = state.dimensions().selected_length();
                let change = if coupled {
                    DesignChange::AdjustSize(-LENGTH_BUTTON_DELTA)
                } else {
                    DesignChange::AdjustLength(-LENGTH_BUTTON_DELTA)
                };
                apply_change(&mut state, catalog, change);
                if state.dimensions().selected_length() == before {
                    break;
                }
            }
        }
    }

    if verbose {
        println!("  {} sizes visited", steps);
    }

    results.push(TestResult {
        name: "coverage_every_size_seats".into(),
        passed: unseated.is_empty(),
        detail: if unseated.is_empty() {
            format!("{} sizes all seat at least one chair", steps)
        } else {
            format!("no seating for {:?}", unseated)
        },
    });
    results.push(TestResult {
        name: "coverage_every_size_priced".into(),
        passed: unpriced.is_empty(),
        detail: if unpriced.is_empty() {
            format!("{} sizes all priced", steps)
        } else {
            format!("no price for {:?}", unpriced)
        },
    });

    results
}

// ── 4. Placement ────────────────────────────────────────────────────────

fn sweep_box(category: ShapeCategory) -> BoundingBox {
    if category.couples_axes() {
        BoundingBox::centered(1.4, 0.75, 1.4)
    } else {
        BoundingBox::centered(2.4, 0.75, 1.1)
    }
}

/// A chair is clear of the top when it sits outside its footprint: the box
/// for straight-edged tops, the inscribed ellipse for round and oval ones.
fn clear_of_top(shape: &str, p: &ChairPlacement, table: &BoundingBox) -> bool {
    let half = table.half_extents();
    let d = p.position - table.center();
    match classify(Some(shape)) {
        Some(ShapeCategory::Round) => ellipse_outside(d.x, d.z, half.x, half.z),
        _ if is_oval(Some(shape)) => ellipse_outside(d.x, d.z, half.x, half.z),
        _ => d.x.abs() > half.x || d.z.abs() > half.z,
    }
}

fn ellipse_outside(x: f32, z: f32, rx: f32, rz: f32) -> bool {
    (x / rx).powi(2) + (z / rz).powi(2) > 1.0
}

fn validate_placement(verbose: bool) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();
    let shapes = [
        top_shapes::RECTANGLE,
        top_shapes::CAPSULE,
        top_shapes::OVAL,
        top_shapes::ROUND,
        top_shapes::SQUARE,
    ];

    for shape in shapes {
        let Some(category) = classify(Some(shape)) else {
            results.push(TestResult {
                name: format!("placement_{}_classifies", shape),
                passed: false,
                detail: "shape did not classify".into(),
            });
            continue;
        };
        let table = sweep_box(category);
        let mut wrong_counts = Vec::new();
        let mut inside = 0;
        let mut non_finite = 0;
        let mut unstable = 0;

        for n in 0..=MAX_SWEEP_CHAIRS {
            let request =
                ChairLayoutRequest::table(Some(shape), n, Some(table), ScaleRatio::default());
            let chairs = place_chairs(&request);
            if chairs.len() != n as usize {
                wrong_counts.push((n, chairs.len()));
            }
            inside += chairs.iter().filter(|c| !clear_of_top(shape, c, &table)).count();
            non_finite += chairs
                .iter()
                .filter(|c| !c.position.is_finite() || !c.rotation_y.is_finite())
                .count();
            if place_chairs(&request) != chairs {
                unstable += 1;
            }
        }

        if verbose {
            println!("  {} ({}): swept 0..={} chairs", shape, category, MAX_SWEEP_CHAIRS);
        }

        results.push(TestResult {
            name: format!("placement_{}_counts", shape),
            passed: wrong_counts.is_empty(),
            detail: if wrong_counts.is_empty() {
                format!("every n in 0..={} places n chairs", MAX_SWEEP_CHAIRS)
            } else {
                format!("(requested, placed) mismatches: {:?}", wrong_counts)
            },
        });
        results.push(TestResult {
            name: format!("placement_{}_clear_of_top", shape),
            passed: inside == 0 && non_finite == 0,
            detail: format!("{} chairs inside the top, {} non-finite", inside, non_finite),
        });
        results.push(TestResult {
            name: format!("placement_{}_idempotent", shape),
            passed: unstable == 0,
            detail: format!("{} layouts changed on recompute", unstable),
        });
    }

    // Showcase ignores table and count
    let showcase_ok = (1..=MAX_SWEEP_CHAIRS).all(|n| {
        let chairs = place_chairs(&ChairLayoutRequest::showcase(n));
        chairs.len() == 2 && chairs[0].position.x == -chairs[1].position.x
    });
    results.push(TestResult {
        name: "placement_showcase_pair".into(),
        passed: showcase_ok && place_chairs(&ChairLayoutRequest::showcase(0)).is_empty(),
        detail: "two mirrored chairs for any n > 0".into(),
    });

    // Nothing without a table box or a known shape
    let no_box = place_chairs(&ChairLayoutRequest::table(
        Some(top_shapes::ROUND),
        6,
        None,
        ScaleRatio::default(),
    ));
    let unknown = place_chairs(&ChairLayoutRequest::table(
        Some("hexagon"),
        6,
        Some(sweep_box(ShapeCategory::Round)),
        ScaleRatio::default(),
    ));
    results.push(TestResult {
        name: "placement_empty_when_unresolved".into(),
        passed: no_box.is_empty() && unknown.is_empty(),
        detail: format!("no box: {}, unknown shape: {}", no_box.len(), unknown.len()),
    });

    // Scaling preserves edge assignment
    let table = sweep_box(ShapeCategory::Rectangular);
    let full = place_chairs(&ChairLayoutRequest::table(
        Some(top_shapes::RECTANGLE),
        8,
        Some(table),
        ScaleRatio::default(),
    ));
    let scaled = place_chairs(&ChairLayoutRequest::table(
        Some(top_shapes::RECTANGLE),
        8,
        Some(table),
        ScaleRatio::new(0.5, 1.0),
    ));
    let scale_ok = full.len() == scaled.len()
        && full.iter().zip(&scaled).all(|(a, b)| {
            (a.position.x * 0.5 - b.position.x).abs() < 1e-5
                && a.position.z == b.position.z
                && a.rotation_y == b.rotation_y
        });
    results.push(TestResult {
        name: "placement_scaling".into(),
        passed: scale_ok,
        detail: "half-length layout scales x only, rotations unchanged".into(),
    });

    results
}

// ── 5. Design Cascade ───────────────────────────────────────────────────

fn validate_design_cascade(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Design Cascade ---");
    let mut results = Vec::new();

    let state = initial_state(catalog);
    let summary = summarize(&state, catalog);
    if verbose {
        println!(
            "  default: {:?}/{:?} {}x{}mm, up to {} chairs, price {:?}",
            summary.base_shape,
            summary.top_shape,
            summary.length,
            summary.width,
            state.seating().maximum_number_of_chairs(),
            summary.price
        );
    }
    let dims = state.dimensions();
    results.push(TestResult {
        name: "design_defaults_to_largest".into(),
        passed: dims.selected_length() == dims.max_length()
            && dims.selected_width() == dims.max_width(),
        detail: format!("{}x{}mm", dims.selected_length(), dims.selected_width()),
    });

    // Every base change lands on an offered top with bounds from the base
    let mut mismatched = Vec::new();
    for base in catalog.base_shapes() {
        let mut s = initial_state(catalog);
        apply_change(&mut s, catalog, DesignChange::BaseShape(base.name.clone()));
        let top_ok = s.top_shape().is_some_and(|t| base.offers_top(t));
        let d = s.dimensions();
        let bounds_ok = d.min_length() == base.min_length
            && d.max_length() == base.max_length
            && d.selected_length() == base.max_length;
        if !top_ok || !bounds_ok {
            mismatched.push(base.name.clone());
        }
    }
    results.push(TestResult {
        name: "design_base_change_cascade".into(),
        passed: mismatched.is_empty(),
        detail: if mismatched.is_empty() {
            "every base selects an offered top and its own bounds".into()
        } else {
            format!("bad cascade for {:?}", mismatched)
        },
    });

    // Chair count never exceeds the ceiling, whatever the order of actions
    let mut s = initial_state(catalog);
    apply_change(&mut s, catalog, DesignChange::ChairCount(99));
    let capped_high = s.seating().number_of_chairs() == s.seating().maximum_number_of_chairs();
    apply_change(&mut s, catalog, DesignChange::Length(0));
    let capped_after_shrink =
        s.seating().number_of_chairs() <= s.seating().maximum_number_of_chairs();
    results.push(TestResult {
        name: "design_chair_ceiling".into(),
        passed: capped_high && capped_after_shrink,
        detail: format!(
            "{} chairs at {}mm, ceiling {}",
            s.seating().number_of_chairs(),
            s.dimensions().selected_length(),
            s.seating().maximum_number_of_chairs()
        ),
    });

    // Plus/minus buttons only ever produce even counts
    let mut s = initial_state(catalog);
    let mut odd = 0;
    for delta in [2, 2, 2, -2, 2, 2, 2, 2, 2, -2, -2] {
        apply_change(&mut s, catalog, DesignChange::AdjustChairs(delta));
        if s.seating().number_of_chairs() % 2 != 0 {
            odd += 1;
        }
    }
    results.push(TestResult {
        name: "design_chair_pairs".into(),
        passed: odd == 0,
        detail: format!("ended at {} chairs, {} odd counts", s.seating().number_of_chairs(), odd),
    });

    // Placement follows the design
    let mut s = initial_state(catalog);
    apply_change(&mut s, catalog, DesignChange::ChairCount(6));
    let table = full_size_box(&s);
    let placed = place_chairs(&chair_layout_request(&s, LayoutMode::Table, Some(table)));
    let showcase = place_chairs(&chair_layout_request(&s, LayoutMode::TwoChair, Some(table)));
    results.push(TestResult {
        name: "design_drives_placement".into(),
        passed: placed.len() == s.seating().number_of_chairs() as usize && showcase.len() == 2,
        detail: format!("{} table chairs, {} showcase chairs", placed.len(), showcase.len()),
    });

    results
}
