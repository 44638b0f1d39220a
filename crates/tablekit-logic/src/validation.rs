//! Data-authoring checks over a loaded catalog.
//!
//! Pure functions that return issues instead of failing. A missing seating
//! rule or price for a size the UI can reach shows up here rather than as
//! a silent zero-chair table.

use crate::catalog::Catalog;
use crate::shape::classify;

/// A catalog validation issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Run every check.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    issues.extend(check_base_shape_ranges(catalog));
    issues.extend(check_offered_tops_exist(catalog));
    issues.extend(check_rule_ranges(catalog));
    issues.extend(check_reachable_sizes_covered(catalog));
    issues
}

/// Every base shape has `min_length <= max_length`.
pub fn check_base_shape_ranges(catalog: &Catalog) -> Vec<CatalogIssue> {
    catalog
        .base_shapes()
        .iter()
        .filter(|b| b.min_length > b.max_length)
        .map(|b| CatalogIssue {
            category: "base_shape",
            severity: Severity::Error,
            message: format!(
                "Base '{}' has min length {} above max length {}",
                b.name, b.min_length, b.max_length
            ),
        })
        .collect()
}

/// Every top a base offers exists in the top-shape table and classifies.
pub fn check_offered_tops_exist(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    for base in catalog.base_shapes() {
        if base.available_top_shapes.is_empty() {
            issues.push(CatalogIssue {
                category: "base_shape",
                severity: Severity::Error,
                message: format!("Base '{}' offers no top shapes", base.name),
            });
        }
        for top in &base.available_top_shapes {
            if catalog.top_shape(top).is_none() {
                issues.push(CatalogIssue {
                    category: "top_shape",
                    severity: Severity::Error,
                    message: format!("Base '{}' offers unknown top '{}'", base.name, top),
                });
            }
            if classify(Some(top)).is_none() {
                issues.push(CatalogIssue {
                    category: "top_shape",
                    severity: Severity::Warning,
                    message: format!(
                        "Top '{}' (base '{}') has no seating category; no chairs will be placed",
                        top, base.name
                    ),
                });
            }
        }
    }
    issues
}

/// Rectangular seating and price ranges are not inverted.
pub fn check_rule_ranges(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    if let Some(seating) = catalog.seating_table() {
        for r in seating.rectangular.iter().filter(|r| r.min > r.max) {
            issues.push(CatalogIssue {
                category: "seating",
                severity: Severity::Error,
                message: format!("Seating range {}..={} is inverted", r.min, r.max),
            });
        }
    }
    if let Some(prices) = catalog.price_table() {
        for r in prices.rectangular.iter().filter(|r| r.min > r.max) {
            issues.push(CatalogIssue {
                category: "price",
                severity: Severity::Error,
                message: format!("Price range {}..={} is inverted", r.min, r.max),
            });
        }
    }
    issues
}

/// The default footprint of every (base, top) pair resolves to a seating
/// rule and a price.
pub fn check_reachable_sizes_covered(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    for base in catalog.base_shapes() {
        let length = base.max_length;
        for top in &base.available_top_shapes {
            let Some(category) = classify(Some(top)) else {
                continue; // reported by check_offered_tops_exist
            };
            if let Some(seating) = catalog.seating_table() {
                if seating.lookup(category, length).is_none() {
                    issues.push(CatalogIssue {
                        category: "seating",
                        severity: Severity::Warning,
                        message: format!(
                            "No {category} seating rule for '{}'/'{}' at {length}mm",
                            base.name, top
                        ),
                    });
                }
            }
            if let Some(prices) = catalog.price_table() {
                if prices.lookup(category, length).is_none() {
                    issues.push(CatalogIssue {
                        category: "price",
                        severity: Severity::Warning,
                        message: format!(
                            "No {category} price for '{}'/'{}' at {length}mm",
                            base.name, top
                        ),
                    });
                }
            }
        }
    }
    issues
}
