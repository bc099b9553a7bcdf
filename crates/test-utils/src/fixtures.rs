//! Common test fixtures for field symbology tests.

use field_common::Rgb;

/// Forest green, the color the forest fixture stores at index 191.
pub const FOREST_GREEN: Rgb = Rgb::new(34, 139, 34);

/// Grayscale table: entry `i` is `(i, i, i)`.
pub fn grayscale_entries() -> Vec<Rgb> {
    (0..=255u8).map(|i| Rgb::new(i, i, i)).collect()
}

/// Grayscale table with forest green at index 191 and black at index 0.
pub fn forest_entries() -> Vec<Rgb> {
    let mut entries = grayscale_entries();
    entries[191] = FOREST_GREEN;
    entries
}

/// Color entries with every channel near saturation, for outline clamping.
pub fn bright_entries() -> Vec<Rgb> {
    (0..=255u8)
        .map(|i| Rgb::new(255 - (i % 10), 230, 205 + (i % 51)))
        .collect()
}

/// Serialize entries as a JSON array of `[r, g, b]` triples.
pub fn table_json(entries: &[Rgb]) -> String {
    let arrays: Vec<[u8; 3]> = entries.iter().map(|c| c.to_array()).collect();
    serde_json::to_string(&arrays).expect("serialize table")
}

/// Dates shared by every field in the sample export.
pub const SAMPLE_DATES: [&str; 4] = ["2017-05-01", "2017-05-17", "2017-06-02", "2017-06-18"];

/// A small NDVI export in the `{ "results": [{ "id", "value" }] }` shape.
///
/// Field `f1` is a polygon, field `f2` a multipolygon; both carry four dated
/// observations and an extra `crop` property.
pub const SAMPLE_EXPORT: &str = r#"{
    "results": [
        {
            "id": "f1",
            "value": {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [-93.62, 41.58], [-93.60, 41.58], [-93.60, 41.59],
                        [-93.62, 41.59], [-93.62, 41.58]
                    ]]
                },
                "properties": {
                    "crop": "corn",
                    "ndvi_values": [
                        {"date": "2017-05-01", "value": 0.0},
                        {"date": "2017-05-17", "value": 0.25},
                        {"date": "2017-06-02", "value": 0.75},
                        {"date": "2017-06-18", "value": 1.0}
                    ]
                }
            }
        },
        {
            "id": "f2",
            "value": {
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-93.58, 41.57], [-93.57, 41.57], [-93.57, 41.58], [-93.58, 41.57]]],
                        [[[-93.55, 41.60], [-93.54, 41.60], [-93.54, 41.61], [-93.55, 41.60]]]
                    ]
                },
                "properties": {
                    "crop": "soy",
                    "ndvi_values": [
                        {"date": "2017-05-01", "value": 0.1},
                        {"date": "2017-05-17", "value": 0.2},
                        {"date": "2017-06-02", "value": 0.5},
                        {"date": "2017-06-18", "value": 0.9}
                    ]
                }
            }
        }
    ]
}"#;

/// An export whose second record is missing its `value` payload.
pub const EXPORT_MISSING_PAYLOAD: &str = r#"{
    "results": [
        {
            "id": "ok",
            "value": {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
                "properties": {"ndvi_values": [{"value": 0.4}]}
            }
        },
        {"id": "broken"}
    ]
}"#;
