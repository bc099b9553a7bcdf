//! GeoJSON field features carrying NDVI time series.
//!
//! NDVI exports arrive as a `results` array of `{ id, value }` records where
//! `value` is a GeoJSON Feature. This crate turns those records into a
//! self-describing FeatureCollection and picks the observation that drives
//! symbology for a render pass.
//!
//! # Example
//!
//! ```rust
//! use field_geojson::{adapt, parse_export, DateSelector};
//!
//! let json = r#"{"results": [{"id": "f1", "value": {
//!     "type": "Feature",
//!     "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
//!     "properties": {"ndvi_values": [{"date": "2017-06-02", "value": 0.75}]}
//! }}]}"#;
//!
//! let collection = adapt(parse_export(json).unwrap()).unwrap();
//! let value = DateSelector::new(0).select(&collection.features[0]).unwrap();
//! assert_eq!(value, 0.75);
//! ```

pub mod adapter;
pub mod feature;
pub mod selector;

pub use adapter::{adapt, parse_export, FieldRecord, NdviExport};
pub use feature::{FieldCollection, FieldFeature, FieldGeometry, FieldProperties, NdviObservation};
pub use selector::DateSelector;

