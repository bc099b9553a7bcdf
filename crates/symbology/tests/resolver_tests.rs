//! Tests for NDVI symbology resolution.
//!
//! Covers table lookup, outline brightening, and out-of-range handling.

use field_common::{Rgb, SymbologyError};
use symbology::{resolve, table_index, ColorTable, PathStyle, Symbology};
use test_utils::{bright_entries, forest_entries, grayscale_entries, FOREST_GREEN};

fn forest_table() -> ColorTable {
    ColorTable::new(forest_entries()).unwrap()
}

// ============================================================================
// Lookup tests
// ============================================================================

#[test]
fn test_fill_matches_floor_index_across_range() {
    let table = ColorTable::new(grayscale_entries()).unwrap();

    for step in 0..=1000 {
        let value = step as f64 / 1000.0;
        let expected = table.get((value * 255.0).floor() as u8);
        let symbology = resolve(value, &table).unwrap();
        assert_eq!(symbology.fill, expected, "value {}", value);
    }
}

#[test]
fn test_endpoints_hit_first_and_last_entries() {
    let table = ColorTable::new(grayscale_entries()).unwrap();
    assert_eq!(resolve(0.0, &table).unwrap().fill, table.get(0));
    assert_eq!(resolve(1.0, &table).unwrap().fill, table.get(255));
}

#[test]
fn test_three_quarters_resolves_forest_green() {
    // 0.75 * 255 = 191.25 -> index 191
    let symbology = resolve(0.75, &forest_table()).unwrap();
    assert_eq!(symbology.fill, FOREST_GREEN);
    assert_eq!(symbology.outline, Rgb::new(84, 189, 84));
}

#[test]
fn test_zero_resolves_black_with_gray_outline() {
    let symbology = resolve(0.0, &forest_table()).unwrap();
    assert_eq!(symbology.fill, Rgb::new(0, 0, 0));
    assert_eq!(symbology.outline, Rgb::new(50, 50, 50));
}

#[test]
fn test_just_below_boundary_stays_on_lower_entry() {
    let table = ColorTable::new(grayscale_entries()).unwrap();
    // 190.9 / 255 scales back to just under 191
    assert_eq!(resolve(190.9 / 255.0, &table).unwrap().fill, Rgb::new(190, 190, 190));
}

// ============================================================================
// Outline tests
// ============================================================================

#[test]
fn test_outline_is_saturating_boost_per_channel() {
    let table = ColorTable::new(bright_entries()).unwrap();

    for step in 0..=255 {
        let value = step as f64 / 255.0;
        let Symbology { fill, outline } = resolve(value, &table).unwrap();
        assert_eq!(outline.r as u16, (fill.r as u16 + 50).min(255));
        assert_eq!(outline.g as u16, (fill.g as u16 + 50).min(255));
        assert_eq!(outline.b as u16, (fill.b as u16 + 50).min(255));
    }
}

#[test]
fn test_outline_channels_independent() {
    let mut entries = grayscale_entries();
    entries[0] = Rgb::new(250, 100, 0);
    let table = ColorTable::new(entries).unwrap();

    let symbology = resolve(0.0, &table).unwrap();
    assert_eq!(symbology.outline, Rgb::new(255, 150, 50));
}

// ============================================================================
// Determinism tests
// ============================================================================

#[test]
fn test_resolve_is_idempotent() {
    let table = forest_table();
    for value in [0.0, 0.1, 0.33, 0.75, 0.999, 1.0] {
        assert_eq!(resolve(value, &table).unwrap(), resolve(value, &table).unwrap());
    }
}

#[test]
fn test_failure_does_not_affect_later_calls() {
    let table = forest_table();
    assert!(resolve(2.0, &table).is_err());
    assert_eq!(resolve(0.75, &table).unwrap().fill, FOREST_GREEN);
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn test_out_of_range_values_fail() {
    let table = forest_table();

    let err = resolve(1.01, &table).unwrap_err();
    assert_eq!(err, SymbologyError::OutOfRangeInput { value: 1.01 });

    assert!(matches!(
        resolve(-0.5, &table),
        Err(SymbologyError::OutOfRangeInput { .. })
    ));
}

#[test]
fn test_non_finite_values_fail() {
    let table = forest_table();
    assert!(matches!(
        resolve(f64::NAN, &table),
        Err(SymbologyError::OutOfRangeInput { .. })
    ));
    assert!(matches!(
        table_index(f64::INFINITY),
        Err(SymbologyError::OutOfRangeInput { .. })
    ));
}

#[test]
fn test_malformed_table_cannot_be_built() {
    let mut entries = grayscale_entries();
    entries.pop();
    assert_eq!(
        ColorTable::new(entries).unwrap_err(),
        SymbologyError::MalformedTable { entries: 255 }
    );
}

// ============================================================================
// Path style tests
// ============================================================================

#[test]
fn test_resolved_path_style() {
    let style = PathStyle::from(resolve(0.75, &forest_table()).unwrap());
    assert_eq!(style.fill_color, "rgb(34,139,34)");
    assert_eq!(style.color, "rgb(84,189,84)");
    assert_eq!(style.weight, 2);
}
