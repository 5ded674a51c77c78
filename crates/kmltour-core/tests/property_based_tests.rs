//! Property-based tests for kmltour-core
//!
//! Uses proptest to check the range helpers, identifier allocation and
//! render determinism over generated inputs.

use kmltour_core::{
    band, circ_bounds, lat_check, long_check, next_id, Document, LookAt, Placemark, Point,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Range helpers
// ============================================================================

#[test]
fn proptest_lat_check_in_range() {
    proptest!(|(l in -100_000.0f64..100_000.0)| {
        let wrapped = lat_check(l);
        prop_assert!((-90.0..=90.0).contains(&wrapped), "{} -> {}", l, wrapped);
    });
}

#[test]
fn proptest_long_check_in_range() {
    proptest!(|(l in -100_000.0f64..100_000.0)| {
        let wrapped = long_check(l);
        prop_assert!((-180.0..=180.0).contains(&wrapped), "{} -> {}", l, wrapped);
    });
}

#[test]
fn proptest_in_range_values_unchanged() {
    proptest!(|(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0)| {
        prop_assert_eq!(lat_check(lat), lat);
        prop_assert_eq!(long_check(lon), lon);
    });
}

#[test]
fn proptest_circ_bounds_keeps_position_modulo_width() {
    proptest!(|(v in -10_000.0f64..10_000.0)| {
        let wrapped = circ_bounds(v, 180.0, -180.0);
        let turns = (v - wrapped) / 360.0;
        prop_assert!((turns - turns.round()).abs() < 1e-6, "{} -> {}", v, wrapped);
    });
}

#[test]
fn proptest_band_is_symmetric() {
    proptest!(|(l in 0.0f64..10_000.0, p in 0.0f64..100.0)| {
        let [low, high] = band(l, p);
        prop_assert!(low <= l && l <= high);
        prop_assert!(((l - low) - (high - l)).abs() < 1e-6);
    });
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn proptest_ids_unique() {
    proptest!(|(kinds in prop::collection::vec("[A-Za-z]{1,8}", 1..50))| {
        let mut seen = HashSet::new();
        for kind in &kinds {
            prop_assert!(seen.insert(next_id(kind)));
        }
    });
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn proptest_render_repeatable() {
    proptest!(|(
        points in prop::collection::vec((-180.0f64..180.0, -90.0f64..90.0, 0.0f64..5000.0), 0..10),
        duration in 0.0f64..30.0,
    )| {
        let mut doc = Document::new(Some("generated".to_string()));
        for (lon, lat, alt) in &points {
            doc.add(Placemark::new(None, Some(Point::new(*lon, *lat, *alt).into())));
            doc.fly_to(LookAt::new(Point::new(*lon, *lat, *alt)), duration);
        }
        let first = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
        let second = doc.to_kml_document().unwrap().to_string_pretty().unwrap();
        prop_assert_eq!(first, second);
    });
}
