//! Pure configurator logic for TableKit.
//!
//! This crate contains everything about a made-to-order dining table that
//! is independent of rendering, page flow, or checkout. Functions take
//! plain data and return results, so the whole configuration pipeline is
//! unit-testable and can sit behind any UI or 3D viewer.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | External tables (shapes, colors, chairs, seating, prices), one-shot loading |
//! | [`constants`] | Shape names that carry behavior |
//! | [`design`] | Design state, ordered change cascade, summary |
//! | [`dimensions`] | Length/width bounds, clamping, grid snapping |
//! | [`placement`] | Chair positions and yaw around tables of any category |
//! | [`pricing`] | Price lookup by category and primary dimension |
//! | [`seating`] | Tight/comfort chair capacity and chair-count clamping |
//! | [`shape`] | Top-shape name → structural category |
//! | [`validation`] | Data-authoring checks over a loaded catalog |

pub mod catalog;
pub mod constants;
pub mod design;
pub mod dimensions;
pub mod placement;
pub mod pricing;
pub mod seating;
pub mod shape;
pub mod validation;
