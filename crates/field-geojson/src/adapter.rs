//! Reshape NDVI export records into a self-describing FeatureCollection.

use field_common::{SymbologyError, SymbologyResult};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::feature::{FieldCollection, FieldFeature};

/// The NDVI export document: `{ "results": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdviExport {
    pub results: Vec<FieldRecord>,
}

/// One export record wrapping a field feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldRecord {
    /// Record identifier; numeric ids are accepted and kept as text.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// The embedded feature payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldFeature>,
}

impl FieldRecord {
    pub fn new(id: impl Into<String>, value: FieldFeature) -> Self {
        Self {
            id: id.into(),
            value: Some(value),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}

/// Parse an export document into its records.
pub fn parse_export(json: &str) -> SymbologyResult<Vec<FieldRecord>> {
    let export: NdviExport = serde_json::from_str(json)?;
    Ok(export.results)
}

/// Copy each record's id into its feature's `properties.id` and collect the
/// features in input order.
///
/// The output has exactly one feature per record; nothing is filtered or
/// deduplicated. Fails on the first record without a payload.
pub fn adapt(records: Vec<FieldRecord>) -> SymbologyResult<FieldCollection> {
    let count = records.len();

    let features = records
        .into_iter()
        .map(|record| -> SymbologyResult<FieldFeature> {
            let FieldRecord { id, value } = record;
            let mut feature = value.ok_or_else(|| SymbologyError::MissingPayload { id: id.clone() })?;
            feature.properties.id = Some(id);
            Ok(feature)
        })
        .collect::<SymbologyResult<Vec<_>>>()?;

    debug!(features = count, "Adapted export records");

    Ok(FieldCollection::new().with_features(features))
}
