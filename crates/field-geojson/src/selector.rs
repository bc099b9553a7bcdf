//! Selection of the observation that drives a render pass.

use chrono::NaiveDate;
use field_common::{SymbologyError, SymbologyResult};
use serde::{Deserialize, Serialize};

use crate::feature::{FieldCollection, FieldFeature, NdviObservation};

/// Picks entry `date_index` of every field's NDVI series.
///
/// Series are indexed consistently across a collection, so one index names
/// the same calendar date for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelector {
    pub date_index: usize,
}

impl DateSelector {
    pub fn new(date_index: usize) -> Self {
        Self { date_index }
    }

    /// Build a selector for the observation dated `date`.
    ///
    /// The first feature's series is the reference; its dates are matched on
    /// the leading `YYYY-MM-DD` so RFC 3339 timestamps also work.
    pub fn for_date(collection: &FieldCollection, date: NaiveDate) -> SymbologyResult<Self> {
        let reference = collection
            .features
            .first()
            .ok_or_else(|| SymbologyError::DateNotFound(date.to_string()))?;

        reference
            .properties
            .ndvi_values
            .iter()
            .position(|obs| observation_date(obs) == Some(date))
            .map(Self::new)
            .ok_or_else(|| SymbologyError::DateNotFound(date.to_string()))
    }

    /// The selected observation of a feature.
    pub fn observation<'a>(&self, feature: &'a FieldFeature) -> SymbologyResult<&'a NdviObservation> {
        let series = &feature.properties.ndvi_values;
        series
            .get(self.date_index)
            .ok_or_else(|| SymbologyError::DateIndexOutOfRange {
                id: feature.label(),
                index: self.date_index,
                len: series.len(),
            })
    }

    /// The selected NDVI value of a feature.
    pub fn select(&self, feature: &FieldFeature) -> SymbologyResult<f64> {
        self.observation(feature)?
            .value
            .ok_or_else(|| SymbologyError::MissingValue {
                id: feature.label(),
                index: self.date_index,
            })
    }

    /// Check the index against every feature, returning the first failure.
    pub fn validate(&self, collection: &FieldCollection) -> SymbologyResult<()> {
        collection
            .features
            .iter()
            .try_for_each(|feature| self.observation(feature).map(|_| ()))
    }

    /// Date label of the selected observation in the first feature, if any.
    pub fn date_label<'a>(&self, collection: &'a FieldCollection) -> Option<&'a str> {
        collection
            .features
            .first()?
            .properties
            .ndvi_values
            .get(self.date_index)?
            .date
            .as_deref()
    }
}

impl Default for DateSelector {
    fn default() -> Self {
        Self::new(0)
    }
}

fn observation_date(obs: &NdviObservation) -> Option<NaiveDate> {
    let date = obs.date.as_deref()?;
    NaiveDate::parse_from_str(date.get(..10)?, "%Y-%m-%d").ok()
}
