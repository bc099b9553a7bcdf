//! A map backend that renders styled fields to a GeoJSON document.
//!
//! The output is what a web map needs to draw the fields without further
//! processing: each feature carries its Leaflet path options under
//! `properties.style`, the collection carries the fitted viewport as its
//! `bbox`, and the basemap tile template travels as a foreign member.

use anyhow::{Context, Result};
use field_common::BoundingBox;
use field_geojson::{FieldCollection, FieldFeature};
use serde_json::{json, Value};
use std::path::Path;
use symbology::PathStyle;
use tracing::{debug, info};

use crate::composition::{MapCapability, StyleTarget};

/// Handle to a layer registered on a [`GeoJsonMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderHandle(usize);

/// Visual state of one rendered feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureLayer {
    pub style: Option<PathStyle>,
}

impl StyleTarget for FeatureLayer {
    fn set_style(&mut self, style: PathStyle) {
        self.style = Some(style);
    }
}

/// A registered collection and the layer state of each feature.
#[derive(Debug, Clone)]
pub struct LayerGroup {
    pub features: Vec<(FieldFeature, FeatureLayer)>,
}

impl LayerGroup {
    fn bounds(&self) -> Option<BoundingBox> {
        self.features
            .iter()
            .filter_map(|(feature, _)| feature.bounds())
            .reduce(|acc, b| acc.union(&b))
    }
}

/// GeoJSON-producing map.
#[derive(Debug, Clone)]
pub struct GeoJsonMap {
    tile_template: String,
    groups: Vec<LayerGroup>,
    viewport: Option<BoundingBox>,
}

impl GeoJsonMap {
    pub fn new(tile_template: impl Into<String>) -> Self {
        Self {
            tile_template: tile_template.into(),
            groups: Vec::new(),
            viewport: None,
        }
    }

    pub fn viewport(&self) -> Option<BoundingBox> {
        self.viewport
    }

    pub fn group(&self, handle: RenderHandle) -> Option<&LayerGroup> {
        self.groups.get(handle.0)
    }

    /// Render every registered layer as one FeatureCollection.
    pub fn to_geojson(&self) -> Result<Value> {
        let mut features = Vec::new();
        for group in &self.groups {
            for (feature, layer) in &group.features {
                let mut value = serde_json::to_value(feature).context("Failed to serialize field")?;
                if let (Some(style), Some(props)) = (&layer.style, value.get_mut("properties")) {
                    if let Some(props) = props.as_object_mut() {
                        props.insert("style".to_string(), serde_json::to_value(style)?);
                    }
                }
                features.push(value);
            }
        }

        let mut collection = json!({
            "type": "FeatureCollection",
            "basemap": { "type": "xyz", "url": self.tile_template },
            "features": features,
        });
        if let Some(bbox) = self.viewport {
            collection["bbox"] = json!(bbox.to_geojson());
        }
        Ok(collection)
    }

    /// Write the rendered document to a file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let document = self.to_geojson()?;
        let body = serde_json::to_string_pretty(&document)?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote styled fields");
        Ok(())
    }
}

impl MapCapability for GeoJsonMap {
    type Handle = RenderHandle;
    type Layer = FeatureLayer;

    fn register_feature_styler<F>(&mut self, collection: FieldCollection, mut styler: F) -> RenderHandle
    where
        F: FnMut(&FieldFeature, &mut FeatureLayer),
    {
        let features = collection
            .features
            .into_iter()
            .map(|feature| {
                let mut layer = FeatureLayer::default();
                styler(&feature, &mut layer);
                (feature, layer)
            })
            .collect();

        self.groups.push(LayerGroup { features });
        RenderHandle(self.groups.len() - 1)
    }

    fn fit_viewport_to_bounds(&mut self, handle: RenderHandle) {
        match self.group(handle).and_then(LayerGroup::bounds) {
            Some(bounds) => {
                debug!(?bounds, "Fitting viewport");
                self.viewport = Some(bounds);
            }
            None => debug!(handle = handle.0, "Layer has no extent; viewport unchanged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::render;
    use crate::config::ErrorPolicy;
    use field_common::SymbologyError;
    use field_geojson::{adapt, parse_export, DateSelector, NdviObservation};
    use symbology::ColorTable;
    use test_utils::{assert_approx_eq, forest_entries, SAMPLE_EXPORT};

    fn sample() -> FieldCollection {
        adapt(parse_export(SAMPLE_EXPORT).unwrap()).unwrap()
    }

    fn forest() -> ColorTable {
        ColorTable::new(forest_entries()).unwrap()
    }

    #[test]
    fn test_render_styles_every_field() {
        let mut map = GeoJsonMap::new("tiles/{z}/{x}/{y}.png");
        let table = forest();

        let report = render(&mut map, sample(), DateSelector::new(2), &table, ErrorPolicy::Skip).unwrap();
        assert_eq!(report.styled, 2);
        assert!(report.skipped.is_empty());

        let group = map.group(RenderHandle(0)).unwrap();
        let style = group.features[0].1.style.as_ref().unwrap();
        // f1 at date 2 is 0.75 -> index 191
        assert_eq!(style.fill_color, "rgb(34,139,34)");
        assert_eq!(style.color, "rgb(84,189,84)");
    }

    #[test]
    fn test_render_fits_viewport() {
        let mut map = GeoJsonMap::new("tiles");
        render(&mut map, sample(), DateSelector::new(0), &forest(), ErrorPolicy::Skip).unwrap();

        let viewport = map.viewport().unwrap();
        assert_approx_eq!(viewport.min_x, -93.62, 1e-9);
        assert_approx_eq!(viewport.max_y, 41.61, 1e-9);
    }

    #[test]
    fn test_skip_policy_leaves_bad_field_unstyled() {
        let mut collection = sample();
        collection.features[0].properties.ndvi_values[1].value = Some(1.4);

        let mut map = GeoJsonMap::new("tiles");
        let report = render(&mut map, collection, DateSelector::new(1), &forest(), ErrorPolicy::Skip).unwrap();

        assert_eq!(report.styled, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "f1");
        assert_eq!(report.skipped[0].1, SymbologyError::OutOfRangeInput { value: 1.4 });

        let group = map.group(RenderHandle(0)).unwrap();
        assert!(group.features[0].1.style.is_none());
        assert!(group.features[1].1.style.is_some());
    }

    #[test]
    fn test_missing_value_only_affects_its_field() {
        let mut collection = sample();
        collection.features[1].properties.ndvi_values[2] = NdviObservation::missing();

        let mut map = GeoJsonMap::new("tiles");
        let report = render(&mut map, collection, DateSelector::new(2), &forest(), ErrorPolicy::Skip).unwrap();

        assert_eq!(report.styled, 1);
        assert_eq!(
            report.skipped[0].1,
            SymbologyError::MissingValue {
                id: "f2".into(),
                index: 2
            }
        );
        let group = map.group(RenderHandle(0)).unwrap();
        assert!(group.features[0].1.style.is_some());
        assert!(group.features[1].1.style.is_none());
    }

    #[test]
    fn test_abort_policy_fails_pass() {
        let mut map = GeoJsonMap::new("tiles");
        let err = render(&mut map, sample(), DateSelector::new(27), &forest(), ErrorPolicy::Abort).unwrap_err();

        assert_eq!(
            err,
            SymbologyError::DateIndexOutOfRange {
                id: "f1".into(),
                index: 27,
                len: 4
            }
        );
        assert!(map.viewport().is_none());
    }

    #[test]
    fn test_to_geojson_document() {
        let mut map = GeoJsonMap::new("https://tiles/{z}/{x}/{y}.png?access_token=pk");
        render(&mut map, sample(), DateSelector::new(0), &forest(), ErrorPolicy::Skip).unwrap();

        let doc = map.to_geojson().unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
        assert_eq!(doc["basemap"]["url"], "https://tiles/{z}/{x}/{y}.png?access_token=pk");
        assert_eq!(doc["bbox"].as_array().unwrap().len(), 4);

        let first = &doc["features"][0];
        assert_eq!(first["properties"]["id"], "f1");
        assert_eq!(first["properties"]["crop"], "corn");
        assert_eq!(first["properties"]["style"]["fillColor"], "rgb(0,0,0)");
        assert_eq!(first["properties"]["style"]["color"], "rgb(50,50,50)");
        assert_eq!(first["properties"]["style"]["weight"], 2);
        assert_eq!(first["properties"]["style"]["fillOpacity"], 0.8);
    }

    #[test]
    fn test_empty_collection_keeps_viewport_unset() {
        let mut map = GeoJsonMap::new("tiles");
        let report = render(
            &mut map,
            FieldCollection::new(),
            DateSelector::new(0),
            &forest(),
            ErrorPolicy::Abort,
        )
        .unwrap();

        assert_eq!(report.styled, 0);
        assert!(map.viewport().is_none());
        assert!(map.to_geojson().unwrap().get("bbox").is_none());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fields.geojson");

        let mut map = GeoJsonMap::new("tiles");
        render(&mut map, sample(), DateSelector::new(3), &forest(), ErrorPolicy::Skip).unwrap();
        map.write_to(&path).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["features"].as_array().unwrap().len(), 2);
        // f1 at date 3 is 1.0 -> index 255, gray 255 with saturated outline
        assert_eq!(written["features"][0]["properties"]["style"]["fillColor"], "rgb(255,255,255)");
        assert_eq!(written["features"][0]["properties"]["style"]["color"], "rgb(255,255,255)");
    }
}
