//! GeoJSON types for field polygons and their NDVI series.

use field_common::BoundingBox;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// A GeoJSON FeatureCollection of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features, in input order.
    pub features: Vec<FieldFeature>,
}

impl FieldCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Add multiple features to the collection.
    pub fn with_features(mut self, features: Vec<FieldFeature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Union of every feature's bounds, or `None` for an empty collection.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.features
            .iter()
            .filter_map(FieldFeature::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

impl Default for FieldCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single field: polygon geometry plus NDVI properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,

    /// Optional top-level feature identifier, kept as supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The field boundary.
    #[serde(default)]
    pub geometry: FieldGeometry,

    /// Properties containing the NDVI series and any other attributes.
    /// A `null` member reads as empty properties.
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: FieldProperties,

    /// Foreign members of the feature object.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl FieldFeature {
    /// Create a new feature with a polygon geometry.
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            type_: feature_type(),
            id: None,
            geometry: FieldGeometry::polygon(rings),
            properties: FieldProperties::default(),
            extra: Map::new(),
        }
    }

    /// Set the NDVI series.
    pub fn with_ndvi_values(mut self, values: Vec<NdviObservation>) -> Self {
        self.properties.ndvi_values = values;
        self
    }

    /// Set the property identifier.
    pub fn with_property_id(mut self, id: impl Into<String>) -> Self {
        self.properties.id = Some(id.into());
        self
    }

    /// Identifier used in logs and errors: `properties.id`, else the
    /// top-level id, else an empty string.
    pub fn label(&self) -> String {
        match (&self.properties.id, &self.id) {
            (Some(id), _) => id.clone(),
            (None, Some(Value::String(s))) => s.clone(),
            (None, Some(other)) => other.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.geometry.bounds()
    }
}

/// Field boundary geometry, kept exactly as supplied.
///
/// The adapter never rewrites geometry, so the GeoJSON object is carried
/// whole: 3-D positions, `bbox` and any foreign members survive a round trip.
/// Bounds are read from the first two ordinates of every position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FieldGeometry(Value);

impl FieldGeometry {
    /// A polygon from rings of [longitude, latitude] pairs; the first ring
    /// is the exterior, the rest are holes.
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self(json!({ "type": "Polygon", "coordinates": rings }))
    }

    /// Several disjoint polygons belonging to one field.
    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> Self {
        Self(json!({ "type": "MultiPolygon", "coordinates": polygons }))
    }

    /// GeoJSON geometry type, e.g. `"Polygon"`. `None` for a null geometry.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type")?.as_str()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Every position of the geometry as [x, y]; extra ordinates are ignored.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        let mut positions = Vec::new();
        collect_positions(&self.0, &mut positions);
        positions
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.positions())
    }
}

impl From<Value> for FieldGeometry {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn collect_positions(geometry: &Value, out: &mut Vec<[f64; 2]>) {
    if let Some(coordinates) = geometry.get("coordinates") {
        collect_coordinates(coordinates, out);
    }
    if let Some(Value::Array(members)) = geometry.get("geometries") {
        for member in members {
            collect_positions(member, out);
        }
    }
}

fn collect_coordinates(value: &Value, out: &mut Vec<[f64; 2]>) {
    let Value::Array(items) = value else {
        return;
    };
    let x = items.first().and_then(Value::as_f64);
    let y = items.get(1).and_then(Value::as_f64);
    match (x, y) {
        (Some(x), Some(y)) => out.push([x, y]),
        _ => {
            for item in items {
                collect_coordinates(item, out);
            }
        }
    }
}

/// Properties of a field feature.
///
/// `id` and `ndvi_values` are typed; every other key is carried through
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FieldProperties {
    /// Record identifier copied in by the adapter. Any id already in the
    /// payload is read as text, since the adapter replaces it.
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    /// NDVI observations, one per date; position is the date index.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ndvi_values: Vec<NdviObservation>,

    /// Remaining properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single NDVI observation for one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NdviObservation {
    /// Acquisition date, `YYYY-MM-DD` (or an RFC 3339 timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// NDVI value; expected in [0, 1]. Null, missing or non-numeric values
    /// read as `None` and fail only when that observation is selected.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NdviObservation {
    pub fn new(value: f64) -> Self {
        Self {
            date: None,
            value: Some(value),
            extra: Map::new(),
        }
    }

    /// An observation with no usable value.
    pub fn missing() -> Self {
        Self {
            date: None,
            value: None,
            extra: Map::new(),
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}
