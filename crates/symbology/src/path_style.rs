//! Leaflet path options for a styled field polygon.

use serde::{Deserialize, Serialize};

use crate::resolver::Symbology;

/// Outline stroke width in pixels.
pub const DEFAULT_WEIGHT: u32 = 2;

/// Outline stroke opacity.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Polygon fill opacity; slightly translucent so the basemap shows through.
pub const DEFAULT_FILL_OPACITY: f64 = 0.8;

/// Path options as consumed by Leaflet's `layer.setStyle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// Outline color, `rgb(r,g,b)`
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub fill_opacity: f64,
    /// Fill color, `rgb(r,g,b)`
    pub fill_color: String,
}

impl From<&Symbology> for PathStyle {
    fn from(symbology: &Symbology) -> Self {
        Self {
            color: symbology.outline.to_css(),
            weight: DEFAULT_WEIGHT,
            opacity: DEFAULT_OPACITY,
            fill_opacity: DEFAULT_FILL_OPACITY,
            fill_color: symbology.fill.to_css(),
        }
    }
}

impl From<Symbology> for PathStyle {
    fn from(symbology: Symbology) -> Self {
        PathStyle::from(&symbology)
    }
}
