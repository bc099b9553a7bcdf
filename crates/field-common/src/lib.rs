//! Common types and utilities shared across the NDVI field-map workspace.

pub mod bbox;
pub mod color;
pub mod error;

pub use bbox::BoundingBox;
pub use color::Rgb;
pub use error::{SymbologyError, SymbologyResult};
