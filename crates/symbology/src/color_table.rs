//! The 256-entry NDVI color lookup table.
//!
//! Tables are loaded once at startup from a JSON asset and then shared by
//! reference. Two document shapes are accepted:
//!
//! ```json
//! [[165, 0, 38], "#A50127", {"r": 166, "g": 2, "b": 38}, ...]
//! ```
//!
//! or an object keyed by table index (`{"0": [165, 0, 38], "1": ...}`), which
//! is how some NDVI legend exports are written. Either way there must be
//! exactly 256 entries.

use field_common::{Rgb, SymbologyError, SymbologyResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Number of entries in every color table.
pub const TABLE_SIZE: usize = 256;

/// An immutable 256-entry RGB lookup table indexed 0..=255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    // Invariant: len == TABLE_SIZE
    entries: Vec<Rgb>,
}

/// Color entry as it appears in a table asset.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TableEntry {
    /// RGB array: [r, g, b]
    Array(Vec<i64>),

    /// Hex string: "#RRGGBB"
    Hex(String),

    /// Explicit channels
    Channels { r: i64, g: i64, b: i64 },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableDocument {
    List(Vec<TableEntry>),
    Keyed(BTreeMap<String, TableEntry>),
}

impl TableEntry {
    fn to_rgb(&self, index: usize) -> SymbologyResult<Rgb> {
        let channel = |v: i64| -> SymbologyResult<u8> {
            u8::try_from(v).map_err(|_| SymbologyError::InvalidTableEntry {
                index,
                message: format!("channel value {} outside 0-255", v),
            })
        };

        match self {
            TableEntry::Array(arr) => {
                if arr.len() != 3 {
                    return Err(SymbologyError::InvalidTableEntry {
                        index,
                        message: format!("expected 3 channels, found {}", arr.len()),
                    });
                }
                Ok(Rgb::new(channel(arr[0])?, channel(arr[1])?, channel(arr[2])?))
            }
            TableEntry::Hex(s) => Rgb::from_hex(s).ok_or_else(|| SymbologyError::InvalidTableEntry {
                index,
                message: format!("invalid hex color '{}'", s),
            }),
            TableEntry::Channels { r, g, b } => {
                Ok(Rgb::new(channel(*r)?, channel(*g)?, channel(*b)?))
            }
        }
    }
}

impl ColorTable {
    /// Build a table from exactly 256 colors.
    pub fn new(entries: Vec<Rgb>) -> SymbologyResult<Self> {
        if entries.len() != TABLE_SIZE {
            return Err(SymbologyError::MalformedTable {
                entries: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    /// Parse a table asset from a JSON string.
    pub fn from_json(json: &str) -> SymbologyResult<Self> {
        let document: TableDocument = serde_json::from_str(json)?;

        let entries = match document {
            TableDocument::List(list) => list
                .iter()
                .enumerate()
                .map(|(i, entry)| entry.to_rgb(i))
                .collect::<SymbologyResult<Vec<_>>>()?,
            TableDocument::Keyed(map) => {
                let mut slots: Vec<Option<Rgb>> = vec![None; TABLE_SIZE];
                for (key, entry) in &map {
                    let index: usize = key.trim().parse().map_err(|_| {
                        SymbologyError::Parse(format!("color table key '{}' is not an index", key))
                    })?;
                    let slot = slots.get_mut(index).ok_or_else(|| {
                        SymbologyError::InvalidTableEntry {
                            index,
                            message: format!("key '{}' is outside 0-255", key),
                        }
                    })?;
                    if slot.is_some() {
                        return Err(SymbologyError::InvalidTableEntry {
                            index,
                            message: format!("key '{}' repeats an earlier index", key),
                        });
                    }
                    *slot = Some(entry.to_rgb(index)?);
                }
                let present = slots.iter().filter(|s| s.is_some()).count();
                if present != TABLE_SIZE {
                    return Err(SymbologyError::MalformedTable { entries: present });
                }
                slots.into_iter().flatten().collect()
            }
        };

        Self::new(entries)
    }

    /// Load a table asset from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> SymbologyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;
        debug!(path = %path.display(), "Loaded color table");
        Ok(table)
    }

    /// Build a table by interpolating linearly between gradient stops on [0, 1].
    ///
    /// Entry `i` takes the color at value `i / 255`; values outside the stop
    /// range take the nearest end stop.
    pub fn from_stops(stops: &[GradientStop]) -> SymbologyResult<Self> {
        if stops.len() < 2 {
            return Err(SymbologyError::Parse(
                "gradient must have at least 2 color stops".to_string(),
            ));
        }
        if stops.windows(2).any(|w| w[1].value <= w[0].value) {
            return Err(SymbologyError::Parse(
                "color stops must be in ascending value order".to_string(),
            ));
        }

        let entries = (0..TABLE_SIZE)
            .map(|i| interpolate(stops, i as f64 / (TABLE_SIZE - 1) as f64))
            .collect();

        Self::new(entries)
    }

    /// Red-yellow-green vegetation ramp used when no table asset is configured.
    pub fn ndvi_default() -> SymbologyResult<Self> {
        Self::from_stops(&[
            GradientStop::new(0.0, Rgb::new(165, 0, 38)),
            GradientStop::new(0.2, Rgb::new(244, 109, 67)),
            GradientStop::new(0.4, Rgb::new(254, 224, 139)),
            GradientStop::new(0.6, Rgb::new(217, 239, 139)),
            GradientStop::new(0.8, Rgb::new(102, 189, 99)),
            GradientStop::new(1.0, Rgb::new(0, 104, 55)),
        ])
    }

    /// Color at a table index. Every `u8` is a valid index.
    pub fn get(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.entries.iter()
    }
}

/// A color stop for building a table from a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// NDVI value at this stop
    pub value: f64,

    /// The color at this stop
    pub color: Rgb,
}

impl GradientStop {
    pub fn new(value: f64, color: Rgb) -> Self {
        Self { value, color }
    }
}

fn interpolate(stops: &[GradientStop], value: f64) -> Rgb {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rgb::BLACK,
    };

    if value <= first.value {
        return first.color;
    }
    if value >= last.value {
        return last.color;
    }

    // Find bracketing stops
    for pair in stops.windows(2) {
        let (low, high) = (&pair[0], &pair[1]);
        if value <= high.value {
            let t = (value - low.value) / (high.value - low.value);
            return low.color.lerp(&high.color, t);
        }
    }

    last.color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grayscale_json() -> String {
        let entries: Vec<[u8; 3]> = (0..=255u8).map(|i| [i, i, i]).collect();
        serde_json::to_string(&entries).unwrap()
    }

    #[test]
    fn test_from_json_arrays() {
        let table = ColorTable::from_json(&grayscale_json()).unwrap();
        assert_eq!(table.len(), TABLE_SIZE);
        assert_eq!(table.get(0), Rgb::new(0, 0, 0));
        assert_eq!(table.get(128), Rgb::new(128, 128, 128));
        assert_eq!(table.get(255), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = ColorTable::new(vec![Rgb::BLACK; 255]).unwrap_err();
        assert_eq!(err, SymbologyError::MalformedTable { entries: 255 });
    }

    #[test]
    fn test_channel_out_of_range() {
        let mut entries: Vec<Vec<i64>> = (0..256).map(|_| vec![0, 0, 0]).collect();
        entries[10] = vec![0, 300, 0];
        let json = serde_json::to_string(&entries).unwrap();
        let err = ColorTable::from_json(&json).unwrap_err();
        assert!(matches!(err, SymbologyError::InvalidTableEntry { index: 10, .. }));
    }

    #[test]
    fn test_interpolate_clamps_outside_stops() {
        let stops = [
            GradientStop::new(0.2, Rgb::new(10, 10, 10)),
            GradientStop::new(0.8, Rgb::new(90, 90, 90)),
        ];
        assert_eq!(interpolate(&stops, 0.0), Rgb::new(10, 10, 10));
        assert_eq!(interpolate(&stops, 1.0), Rgb::new(90, 90, 90));
        assert_eq!(interpolate(&stops, 0.5), Rgb::new(50, 50, 50));
    }

    #[test]
    fn test_ndvi_default_endpoints() {
        let table = ColorTable::ndvi_default().unwrap();
        assert_eq!(table.len(), TABLE_SIZE);
        assert_eq!(table.get(0), Rgb::new(165, 0, 38));
        assert_eq!(table.get(255), Rgb::new(0, 104, 55));
    }
}
