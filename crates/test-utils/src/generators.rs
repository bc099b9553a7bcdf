//! Synthetic NDVI export generators.
//!
//! Produces deterministic exports of arbitrary size for benchmarks and
//! property-style tests without shipping large data files.

use serde_json::{json, Value};

/// Deterministic NDVI value for a field/date pair, always within [0, 1].
pub fn synthetic_ndvi(field: usize, date: usize) -> f64 {
    // Seasonal green-up curve offset per field
    let phase = (field % 7) as f64 * 0.3;
    let t = date as f64 / 6.0 + phase;
    (0.5 + 0.45 * t.sin()).clamp(0.0, 1.0)
}

/// Generate a square field polygon ring with its south-west corner at (lon, lat).
pub fn square_ring(lon: f64, lat: f64, size: f64) -> Vec<[f64; 2]> {
    vec![
        [lon, lat],
        [lon + size, lat],
        [lon + size, lat + size],
        [lon, lat + size],
        [lon, lat],
    ]
}

/// Generate an export document with `fields` records of `dates` observations each.
///
/// Fields are laid out on a grid of 0.01 degree squares starting at (-94, 41).
pub fn generate_export(fields: usize, dates: usize) -> Value {
    let results: Vec<Value> = (0..fields)
        .map(|f| {
            let lon = -94.0 + (f % 50) as f64 * 0.01;
            let lat = 41.0 + (f / 50) as f64 * 0.01;
            let series: Vec<Value> = (0..dates)
                .map(|d| json!({ "date": format!("2017-{:02}-01", 1 + d % 12), "value": synthetic_ndvi(f, d) }))
                .collect();
            json!({
                "id": format!("field-{}", f),
                "value": {
                    "type": "Feature",
                    "geometry": { "type": "Polygon", "coordinates": [square_ring(lon, lat, 0.008)] },
                    "properties": { "ndvi_values": series }
                }
            })
        })
        .collect();

    json!({ "results": results })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ndvi_in_range() {
        for f in 0..20 {
            for d in 0..40 {
                let v = synthetic_ndvi(f, d);
                assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
            }
        }
    }

    #[test]
    fn test_generate_export_shape() {
        let export = generate_export(3, 5);
        let results = export["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2]["id"], "field-2");
        assert_eq!(
            results[0]["value"]["properties"]["ndvi_values"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_square_ring_is_closed() {
        let ring = square_ring(1.0, 2.0, 0.5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }
}
