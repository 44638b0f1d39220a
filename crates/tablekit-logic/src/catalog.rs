//! External catalog tables.
//!
//! The configurator is driven by seven tables delivered as JSON: base
//! shapes, top shapes, base colors, top colors, chairs, seating capacity
//! and prices. Each table loads once; a second load of a filled slot is a
//! no-op. Lookups against a table that hasn't loaded behave as if no rule
//! matched.
//!
//! ```
//! use tablekit_logic::catalog::Catalog;
//!
//! let mut catalog = Catalog::default();
//! catalog
//!     .load_base_shapes(r#"[{"name": "linea", "available_topShape": ["rectangle"],
//!                            "maxLength": 3180, "minLength": 1200}]"#)
//!     .unwrap();
//! assert_eq!(catalog.base_shape("linea").unwrap().max_length, 3180);
//! assert!(catalog.seating_table().is_none());
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PriceTable;
use crate::seating::SeatingTable;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} table has no records")]
    Empty(&'static str),
}

/// A table base model and the tops and length range it supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseShapeInfo {
    pub name: String,
    #[serde(rename = "previewUrl", default)]
    pub preview_url: Option<String>,
    #[serde(rename = "modelUrl", default)]
    pub model_url: Option<String>,
    #[serde(rename = "available_topShape", default)]
    pub available_top_shapes: Vec<String>,
    #[serde(rename = "maxLength")]
    pub max_length: i32,
    #[serde(rename = "minLength")]
    pub min_length: i32,
}

impl BaseShapeInfo {
    pub fn offers_top(&self, top_shape: &str) -> bool {
        self.available_top_shapes.iter().any(|t| t == top_shape)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopShapeInfo {
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(rename = "modelMDFUrl", default)]
    pub model_mdf_url: Option<String>,
}

/// One selectable finish. Texture maps beyond the base color are the
/// viewer's business and are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub color_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseColorInfo {
    pub name: String,
    #[serde(default)]
    pub colors: Vec<Swatch>,
}

/// A material family for table tops (e.g. ceramic, wood).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopColorInfo {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub colors: Vec<Swatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChairInfo {
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub colors: Vec<Swatch>,
}

/// Raw JSON for every table, as fetched by the host application.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogSources<'a> {
    pub base_shapes: Option<&'a str>,
    pub top_shapes: Option<&'a str>,
    pub base_colors: Option<&'a str>,
    pub top_colors: Option<&'a str>,
    pub chairs: Option<&'a str>,
    pub seating: Option<&'a str>,
    pub prices: Option<&'a str>,
}

/// Loaded tables. Every slot starts empty.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    base_shapes: Option<Vec<BaseShapeInfo>>,
    top_shapes: Option<Vec<TopShapeInfo>>,
    base_colors: Option<Vec<BaseColorInfo>>,
    top_colors: Option<Vec<TopColorInfo>>,
    chairs: Option<Vec<ChairInfo>>,
    seating: Option<SeatingTable>,
    prices: Option<PriceTable>,
}

impl Catalog {
    /// Load every table present in `sources`.
    pub fn from_sources(sources: &CatalogSources) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        if let Some(json) = sources.base_shapes {
            catalog.load_base_shapes(json)?;
        }
        if let Some(json) = sources.top_shapes {
            catalog.load_top_shapes(json)?;
        }
        if let Some(json) = sources.base_colors {
            catalog.load_base_colors(json)?;
        }
        if let Some(json) = sources.top_colors {
            catalog.load_top_colors(json)?;
        }
        if let Some(json) = sources.chairs {
            catalog.load_chairs(json)?;
        }
        if let Some(json) = sources.seating {
            catalog.load_seating(json)?;
        }
        if let Some(json) = sources.prices {
            catalog.load_prices(json)?;
        }
        Ok(catalog)
    }

    // ── Loading ─────────────────────────────────────────────────────────

    pub fn load_base_shapes(&mut self, json: &str) -> Result<(), CatalogError> {
        load_records(&mut self.base_shapes, json, "base shape")
    }

    pub fn load_top_shapes(&mut self, json: &str) -> Result<(), CatalogError> {
        load_records(&mut self.top_shapes, json, "top shape")
    }

    pub fn load_base_colors(&mut self, json: &str) -> Result<(), CatalogError> {
        load_once(&mut self.base_colors, json, "base color")
    }

    pub fn load_top_colors(&mut self, json: &str) -> Result<(), CatalogError> {
        load_once(&mut self.top_colors, json, "top color")
    }

    pub fn load_chairs(&mut self, json: &str) -> Result<(), CatalogError> {
        load_records(&mut self.chairs, json, "chair")
    }

    pub fn load_seating(&mut self, json: &str) -> Result<(), CatalogError> {
        load_once(&mut self.seating, json, "seating")
    }

    pub fn load_prices(&mut self, json: &str) -> Result<(), CatalogError> {
        load_once(&mut self.prices, json, "price")
    }

    /// Install already-parsed tables, replacing whatever was loaded.
    pub fn set_base_shapes(&mut self, shapes: Vec<BaseShapeInfo>) {
        self.base_shapes = Some(shapes);
    }

    pub fn set_top_shapes(&mut self, shapes: Vec<TopShapeInfo>) {
        self.top_shapes = Some(shapes);
    }

    pub fn set_base_colors(&mut self, colors: Vec<BaseColorInfo>) {
        self.base_colors = Some(colors);
    }

    pub fn set_top_colors(&mut self, colors: Vec<TopColorInfo>) {
        self.top_colors = Some(colors);
    }

    pub fn set_chairs(&mut self, chairs: Vec<ChairInfo>) {
        self.chairs = Some(chairs);
    }

    pub fn set_seating(&mut self, seating: SeatingTable) {
        self.seating = Some(seating);
    }

    pub fn set_prices(&mut self, prices: PriceTable) {
        self.prices = Some(prices);
    }

    // ── Access ──────────────────────────────────────────────────────────

    pub fn base_shapes(&self) -> &[BaseShapeInfo] {
        self.base_shapes.as_deref().unwrap_or_default()
    }

    pub fn top_shapes(&self) -> &[TopShapeInfo] {
        self.top_shapes.as_deref().unwrap_or_default()
    }

    pub fn base_colors(&self) -> &[BaseColorInfo] {
        self.base_colors.as_deref().unwrap_or_default()
    }

    pub fn top_colors(&self) -> &[TopColorInfo] {
        self.top_colors.as_deref().unwrap_or_default()
    }

    pub fn chairs(&self) -> &[ChairInfo] {
        self.chairs.as_deref().unwrap_or_default()
    }

    pub fn seating_table(&self) -> Option<&SeatingTable> {
        self.seating.as_ref()
    }

    pub fn price_table(&self) -> Option<&PriceTable> {
        self.prices.as_ref()
    }

    pub fn base_shape(&self, name: &str) -> Option<&BaseShapeInfo> {
        self.base_shapes().iter().find(|s| s.name == name)
    }

    pub fn top_shape(&self, name: &str) -> Option<&TopShapeInfo> {
        self.top_shapes().iter().find(|s| s.name == name)
    }

    pub fn chair(&self, name: &str) -> Option<&ChairInfo> {
        self.chairs().iter().find(|c| c.name == name)
    }

    /// First top shape in the top-shape table that `base` offers.
    pub fn default_top_for(&self, base: &BaseShapeInfo) -> Option<&TopShapeInfo> {
        self.top_shapes().iter().find(|t| base.offers_top(&t.name))
    }
}

fn load_once<T: DeserializeOwned>(
    slot: &mut Option<T>,
    json: &str,
    table: &'static str,
) -> Result<(), CatalogError> {
    if slot.is_some() {
        log::debug!("{table} table already loaded");
        return Ok(());
    }
    *slot = Some(serde_json::from_str(json)?);
    log::info!("Loaded {table} table");
    Ok(())
}

/// Like [`load_once`], but the table must hold at least one record.
fn load_records<T: DeserializeOwned>(
    slot: &mut Option<Vec<T>>,
    json: &str,
    table: &'static str,
) -> Result<(), CatalogError> {
    if slot.is_some() {
        log::debug!("{table} table already loaded");
        return Ok(());
    }
    let records: Vec<T> = serde_json::from_str(json)?;
    if records.is_empty() {
        return Err(CatalogError::Empty(table));
    }
    log::info!("Loaded {} {table} records", records.len());
    *slot = Some(records);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASES: &str = r#"[
        {"name": "linea", "previewUrl": "a.png", "modelUrl": "a.glb",
         "available_topShape": ["rectangle", "oval"], "maxLength": 3180, "minLength": 1200},
        {"name": "linea-dome", "available_topShape": ["round", "square"],
         "maxLength": 1600, "minLength": 1200}
    ]"#;

    const TOPS: &str = r#"[
        {"name": "round", "previewUrl": "r.png", "modelUrl": "r.glb", "modelMDFUrl": "r-mdf.glb"},
        {"name": "oval"},
        {"name": "rectangle"},
        {"name": "square"}
    ]"#;

    #[test]
    fn parses_external_field_names() {
        let mut catalog = Catalog::default();
        catalog.load_base_shapes(BASES).unwrap();
        catalog.load_top_shapes(TOPS).unwrap();
        let base = catalog.base_shape("linea").unwrap();
        assert_eq!(base.min_length, 1200);
        assert!(base.offers_top("oval"));
        assert!(!base.offers_top("round"));
        assert_eq!(
            catalog.top_shape("round").unwrap().model_mdf_url.as_deref(),
            Some("r-mdf.glb")
        );
    }

    #[test]
    fn second_load_is_a_no_op() {
        let mut catalog = Catalog::default();
        catalog.load_base_shapes(BASES).unwrap();
        catalog
            .load_base_shapes(r#"[{"name": "other", "maxLength": 1, "minLength": 1}]"#)
            .unwrap();
        assert_eq!(catalog.base_shapes().len(), 2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut catalog = Catalog::default();
        let err = catalog.load_prices("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
        assert!(catalog.price_table().is_none());
    }

    #[test]
    fn empty_record_tables_are_rejected() {
        let mut catalog = Catalog::default();
        let err = catalog.load_chairs("[]").unwrap_err();
        assert!(matches!(err, CatalogError::Empty("chair")));
        assert_eq!(err.to_string(), "chair table has no records");
        assert!(catalog.chairs().is_empty());
    }

    #[test]
    fn unloaded_tables_read_as_empty() {
        let catalog = Catalog::default();
        assert!(catalog.base_shapes().is_empty());
        assert!(catalog.seating_table().is_none());
        assert!(catalog.base_shape("linea").is_none());
    }

    #[test]
    fn default_top_follows_top_table_order() {
        let mut catalog = Catalog::default();
        catalog.load_base_shapes(BASES).unwrap();
        catalog.load_top_shapes(TOPS).unwrap();
        let base = catalog.base_shape("linea").unwrap().clone();
        // "oval" comes before "rectangle" in the top-shape table
        assert_eq!(catalog.default_top_for(&base).unwrap().name, "oval");
    }

    fn swatch(name: &str) -> Swatch {
        Swatch {
            name: name.into(),
            description: None,
            preview_url: None,
            color_url: None,
        }
    }

    #[test]
    fn installers_replace_loaded_tables() {
        let mut catalog = Catalog::default();
        catalog.load_base_shapes(BASES).unwrap();
        catalog.set_base_shapes(vec![BaseShapeInfo {
            name: "arco".into(),
            preview_url: None,
            model_url: None,
            available_top_shapes: vec!["capsule".into()],
            max_length: 2800,
            min_length: 1600,
        }]);
        assert_eq!(catalog.base_shapes().len(), 1);
        assert!(catalog.base_shape("linea").is_none());

        catalog.set_top_shapes(vec![TopShapeInfo {
            name: "capsule".into(),
            preview_url: None,
            model_url: None,
            model_mdf_url: None,
        }]);
        let arco = catalog.base_shape("arco").unwrap().clone();
        assert_eq!(catalog.default_top_for(&arco).unwrap().name, "capsule");

        catalog.set_base_colors(vec![BaseColorInfo {
            name: "metal".into(),
            colors: vec![swatch("black")],
        }]);
        catalog.set_top_colors(vec![TopColorInfo {
            kind: "wood".into(),
            colors: vec![swatch("walnut"), swatch("oak")],
        }]);
        catalog.set_chairs(vec![ChairInfo {
            name: "loop".into(),
            preview_url: None,
            model_url: None,
            colors: vec![swatch("sand")],
        }]);
        assert_eq!(catalog.base_colors()[0].colors[0].name, "black");
        assert_eq!(catalog.top_colors()[0].colors.len(), 2);
        assert_eq!(catalog.chair("loop").unwrap().colors[0].name, "sand");
    }

    #[test]
    fn installed_rule_tables_answer_lookups() {
        use crate::shape::ShapeCategory;

        let mut catalog = Catalog::default();
        let seating = r#"{"round": [{"diameter": 1400, "tightFit": 6, "comfortFit": 4}]}"#;
        catalog.set_seating(serde_json::from_str(seating).unwrap());
        catalog.set_prices(PriceTable::default());
        let fit = catalog
            .seating_table()
            .unwrap()
            .lookup(ShapeCategory::Round, 1400)
            .unwrap();
        assert_eq!(fit.ceiling(), 6);
        // an installed empty table is loaded, it just has no rows
        assert_eq!(
            catalog.price_table().unwrap().lookup(ShapeCategory::Round, 1400),
            None
        );
        // loads after an install are no-ops
        catalog.load_prices(r#"{"round": [{"size": 1400, "price": 1500}]}"#).unwrap();
        assert_eq!(
            catalog.price_table().unwrap().lookup(ShapeCategory::Round, 1400),
            None
        );
    }

    #[test]
    fn colors_and_chairs() {
        let sources = CatalogSources {
            top_colors: Some(
                r#"[{"type": "ceramic", "colors": [{"name": "calacatta", "description": "white"}]}]"#,
            ),
            chairs: Some(r#"[{"name": "arc", "colors": [{"name": "oak"}, {"name": "ash"}]}]"#),
            ..Default::default()
        };
        let catalog = Catalog::from_sources(&sources).unwrap();
        assert_eq!(catalog.top_colors()[0].kind, "ceramic");
        assert_eq!(catalog.chair("arc").unwrap().colors.len(), 2);
        assert!(catalog.base_colors().is_empty());
    }
}
