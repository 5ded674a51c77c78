//! Tours assembled from telemetry and rendered through kmltour-core

use kmltour_core::{AbstractView, Document, FlyToMode, Point, TourPrimitive};
use kmltour_telemetry::{flight_path, orbit, FlightPathOptions, OrbitOptions, Position};

fn dateline_track() -> Vec<Position> {
    vec![
        Position::new(178.0, -17.0, 3000.0),
        Position::new(179.5, -17.2, 3100.0),
        Position::new(-179.5, -17.4, 3150.0),
        Position::new(-178.0, -17.5, 3150.0),
    ]
}

// ============================================================================
// Flight paths
// ============================================================================

#[test]
fn test_flight_path_across_antimeridian() {
    let steps = flight_path(&dateline_track(), &FlightPathOptions::default());
    assert_eq!(steps.len(), 2);

    // Second window [179.5, -179.5, -178] is shifted to [179.5, 180.5, 182]
    match &steps[1].view {
        Some(AbstractView::Camera(camera)) => {
            let heading = camera.view.heading.unwrap();
            assert!(heading > 90.0 && heading < 180.0, "heading {heading}");
            assert_eq!(camera.view.point.coordinate().longitude, 180.5);
        }
        other => panic!("expected a Camera, got {other:?}"),
    }
}

#[test]
fn test_flight_path_renders_into_tour() {
    let mut doc = Document::new(Some("flight".to_string()));
    for step in flight_path(&dateline_track(), &FlightPathOptions::default()) {
        doc.push_to_tour(step);
    }

    let kml = doc.to_kml_document().unwrap();
    let playlist = kml
        .document()
        .unwrap()
        .child("gx:Tour")
        .unwrap()
        .child("gx:Playlist")
        .unwrap();
    let flights: Vec<_> = playlist.elements().filter(|e| e.name == "gx:FlyTo").collect();
    assert_eq!(flights.len(), 2);
    for fly in flights {
        let camera = fly.child("Camera").unwrap();
        assert!(camera.child("roll").is_some());
        assert_eq!(camera.child_text("altitudeMode").as_deref(), Some("absolute"));
        assert_eq!(fly.comments().count(), 1);
    }
}

#[test]
fn test_exaggerate_scales_roll() {
    let turn = [
        Position::new(0.0, 0.0, 100.0),
        Position::new(0.0, 1.0, 100.0),
        Position::new(1.0, 1.0, 100.0),
    ];
    let roll_of = |exaggerate: f64| {
        let options = FlightPathOptions {
            exaggerate,
            ..FlightPathOptions::default()
        };
        match &flight_path(&turn, &options)[0].view {
            Some(AbstractView::Camera(camera)) => camera.roll.unwrap(),
            other => panic!("expected a Camera, got {other:?}"),
        }
    };
    assert!((roll_of(1.0) + 90.0).abs() < 1e-9);
    assert!((roll_of(3.0) + 270.0).abs() < 1e-9);
}

// ============================================================================
// Orbits
// ============================================================================

#[test]
fn test_orbit_appended_after_flight() {
    let mut doc = Document::default();
    for step in flight_path(&dateline_track(), &FlightPathOptions::default()) {
        doc.push_to_tour(step);
    }
    let orbit_steps = orbit(
        &Point::new(-178.0, -17.5, 0.0),
        &OrbitOptions {
            range: 2500.0,
            tilt: 60.0,
            ..OrbitOptions::default()
        },
    );
    let orbit_len = orbit_steps.len();
    for step in orbit_steps {
        doc.push_to_tour(step);
    }

    let playlist = doc.tours()[0].playlist();
    // Wait(0) seed, two flight steps, then the orbit
    assert_eq!(playlist.len(), 1 + 2 + orbit_len);
    assert!(matches!(playlist[0], TourPrimitive::Wait(_)));
    assert_eq!(doc.tours()[0].last_view().and_then(AbstractView::range), Some(2500.0));
    for primitive in &playlist[3..] {
        match primitive {
            TourPrimitive::FlyTo(fly) => assert_eq!(fly.mode, Some(FlyToMode::Smooth)),
            other => panic!("expected a FlyTo, got {other:?}"),
        }
    }
}

#[test]
fn test_options_from_json() {
    let options: OrbitOptions = serde_json::from_str(r#"{"range": 800, "end_heading": 180}"#).unwrap();
    assert_eq!(options.range, 800.0);
    assert_eq!(options.end_heading, 180.0);
    assert_eq!(options.duration, 2.0);

    let options: FlightPathOptions = serde_json::from_str(r#"{"pause": 0.5}"#).unwrap();
    assert_eq!(options.pause, 0.5);
    assert_eq!(options.exaggerate, 1.0);
}
