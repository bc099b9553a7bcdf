//! Symbology for NDVI field polygons.
//!
//! Maps a per-field NDVI value in [0, 1] onto a fixed 256-entry color table:
//! - `color_table`: loading and building the lookup table
//! - `resolver`: value -> fill/outline color pair
//! - `path_style`: Leaflet-compatible path options for a resolved symbology

pub mod color_table;
pub mod path_style;
pub mod resolver;

pub use color_table::{ColorTable, GradientStop, TABLE_SIZE};
pub use path_style::PathStyle;
pub use resolver::{resolve, table_index, Symbology, OUTLINE_BOOST};
