//! NDVI value to fill/outline color resolution.

use field_common::{Rgb, SymbologyError, SymbologyResult};
use serde::{Deserialize, Serialize};

use crate::color_table::{ColorTable, TABLE_SIZE};

/// Amount added to each fill channel to derive the outline color.
pub const OUTLINE_BOOST: u8 = 50;

/// Fill and outline colors for one rendered feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbology {
    pub fill: Rgb,
    pub outline: Rgb,
}

impl Symbology {
    /// Symbology for a fill color, with the outline brightened for contrast.
    pub fn from_fill(fill: Rgb) -> Self {
        Self {
            fill,
            outline: fill.brighten(OUTLINE_BOOST),
        }
    }
}

/// Discretize an NDVI value into a table index: `floor(value * 255)`.
///
/// Values must be finite and within [0, 1]; anything else is rejected rather
/// than clamped. The computed index is still clamped to the table bounds.
pub fn table_index(value: f64) -> SymbologyResult<u8> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(SymbologyError::OutOfRangeInput { value });
    }

    let max_index = (TABLE_SIZE - 1) as f64;
    Ok((value * max_index).floor().clamp(0.0, max_index) as u8)
}

/// Resolve the symbology for an NDVI value against a color table.
pub fn resolve(value: f64, table: &ColorTable) -> SymbologyResult<Symbology> {
    let index = table_index(value)?;
    Ok(Symbology::from_fill(table.get(index)))
}
