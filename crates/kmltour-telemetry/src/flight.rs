//! Camera orientation derived from consecutive position samples
//!
//! Every function works on a window of three samples `[p0, p1, p2]`: the
//! camera sits at `p1`, looks toward `p2`, and banks according to the turn
//! from `p0 → p1` into `p1 → p2`.

use kmltour_core::{AltitudeMode, Camera, FlyTo, FlyToMode, Point};
use serde::{Deserialize, Serialize};

/// Longitude or latitude span above which a window is treated as wrapping
const WRAP_SPAN: f64 = 200.0;

/// One telemetry sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Longitude (degrees)
    pub longitude: f64,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Altitude (meters)
    pub altitude: f64,
}

impl Position {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
        }
    }
}

impl From<[f64; 3]> for Position {
    fn from([longitude, latitude, altitude]: [f64; 3]) -> Self {
        Self::new(longitude, latitude, altitude)
    }
}

/// Settings for [`flight_path`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPathOptions {
    /// Duration of every FlyTo, in seconds
    pub pause: f64,
    /// Multiplier applied to derived tilt and roll
    pub exaggerate: f64,
}

impl Default for FlightPathOptions {
    fn default() -> Self {
        Self {
            pause: 1.0,
            exaggerate: 1.0,
        }
    }
}

fn shift_negatives(values: &mut [f64; 3]) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() > WRAP_SPAN {
        for v in values.iter_mut().filter(|v| **v < 0.0) {
            *v += 360.0;
        }
    }
}

/// Undo antimeridian (and pole) wraparound inside one window
///
/// When the longitudes span more than 200 degrees, 360 is added to every
/// negative longitude; latitudes get the same treatment independently.
/// Altitudes are untouched.
#[must_use]
pub fn normalize(window: [Position; 3]) -> [Position; 3] {
    let mut lons = window.map(|p| p.longitude);
    let mut lats = window.map(|p| p.latitude);
    shift_negatives(&mut lons);
    shift_negatives(&mut lats);
    [0, 1, 2].map(|i| Position::new(lons[i], lats[i], window[i].altitude))
}

/// Heading from `p1` to `p2`, in degrees
///
/// Uses `atan(dx / dy)` with 180 added when `p2` lies south of `p1`, so the
/// result ranges over `(-90, 270)` rather than a full compass bearing.
/// Coincident points give 0.
#[must_use]
pub fn heading(p1: &Position, p2: &Position) -> f64 {
    let dx = p2.longitude - p1.longitude;
    let dy = p2.latitude - p1.latitude;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let h = (dx / dy).atan().to_degrees();
    if p2.latitude < p1.latitude {
        h + 180.0
    } else {
        h
    }
}

fn dist2(x: f64, y: f64) -> f64 {
    x.hypot(y)
}

fn dist3(p1: &Position, p2: &Position) -> f64 {
    let dx = p2.longitude - p1.longitude;
    let dy = p2.latitude - p1.latitude;
    let dz = p2.altitude - p1.altitude;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Camera tilt for the step from `p1` to `p2`, in degrees
///
/// Level flight gives 90; climbing and descending lean away from it.
#[must_use]
pub fn tilt(p1: &Position, p2: &Position, exaggerate: f64) -> f64 {
    let dz = p2.altitude - p1.altitude;
    let lean = (dz / (dist3(p1, p2) + 1.0)).atan().to_degrees() / exaggerate;
    90.0 - lean
}

/// Camera roll for the turn at `p1`, in degrees
///
/// Measures the horizontal angle between `p1 → p0` and `p1 → p2`, subtracts
/// 180 and scales by `exaggerate`. Straight flight gives 0, as does a window
/// whose first two samples are missing or coincident.
#[must_use]
pub fn roll(p0: Option<&Position>, p1: Option<&Position>, p2: &Position, exaggerate: f64) -> f64 {
    let (Some(p0), Some(p1)) = (p0, p1) else {
        return 0.0;
    };
    let (xn1, yn1) = (p0.longitude - p1.longitude, p0.latitude - p1.latitude);
    let (xn3, yn3) = (p2.longitude - p1.longitude, p2.latitude - p1.latitude);
    let norm = dist2(xn1, yn1) * dist2(xn3, yn3);
    if norm == 0.0 {
        return 0.0;
    }
    let cos = ((xn1 * xn3 + yn1 * yn3) / norm).clamp(-1.0, 1.0);
    exaggerate * (cos.acos().to_degrees() - 180.0)
}

/// FlyTo to `p1` for one normalized window
fn window_fly_to(window: [Position; 3], options: &FlightPathOptions) -> FlyTo {
    let [p0, p1, p2] = normalize(window);

    let mut camera = Camera::new(Point::with_mode(
        p1.longitude,
        p1.latitude,
        p1.altitude,
        AltitudeMode::Absolute,
    ));
    camera.view.heading = Some(heading(&p1, &p2));
    camera.view.tilt = Some(tilt(&p1, &p2, options.exaggerate));
    camera.roll = Some(roll(Some(&p0), Some(&p1), &p2, options.exaggerate));

    let mut fly = FlyTo::new(camera)
        .with_duration(options.pause)
        .with_mode(FlyToMode::Smooth);
    fly.object.comment = Some(format!(
        "{} {} {} to {} {} {}",
        p1.longitude, p1.latitude, p1.altitude, p2.longitude, p2.latitude, p2.altitude
    ));
    fly
}

/// One smooth FlyTo per overlapping three-sample window
///
/// Returns `samples.len() - 2` steps, or none for fewer than three samples.
#[must_use]
pub fn flight_path(samples: &[Position], options: &FlightPathOptions) -> Vec<FlyTo> {
    if samples.len() < 3 {
        log::debug!("flight path needs three samples, got {}", samples.len());
        return Vec::new();
    }
    samples
        .windows(3)
        .map(|w| window_fly_to([w[0], w[1], w[2]], options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmltour_core::AbstractView;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_due_north_level() {
        let p1 = Position::new(0.0, 0.0, 0.0);
        let p2 = Position::new(0.0, 1.0, 0.0);
        assert!(heading(&p1, &p2).abs() < EPS);
        assert!((tilt(&p1, &p2, 1.0) - 90.0).abs() < EPS);
    }

    #[test]
    fn test_heading_south_correction() {
        let p1 = Position::new(0.0, 0.0, 0.0);
        let south = Position::new(0.0, -1.0, 0.0);
        assert!((heading(&p1, &south) - 180.0).abs() < EPS);
        let north_east = Position::new(1.0, 1.0, 0.0);
        assert!((heading(&p1, &north_east) - 45.0).abs() < EPS);
        // South-west lands above 180 rather than wrapping to a negative bearing
        let south_west = Position::new(-1.0, -1.0, 0.0);
        assert!((heading(&p1, &south_west) - 225.0).abs() < EPS);
        assert_eq!(heading(&p1, &p1), 0.0);
    }

    #[test]
    fn test_tilt_leans_with_climb() {
        let p1 = Position::new(0.0, 0.0, 0.0);
        let climb = Position::new(0.0, 1.0, 100.0);
        let descend = Position::new(0.0, 1.0, -100.0);
        assert!(tilt(&p1, &climb, 1.0) < 90.0);
        assert!(tilt(&p1, &descend, 1.0) > 90.0);
        let mild = tilt(&p1, &climb, 2.0);
        assert!(mild > tilt(&p1, &climb, 1.0) && mild < 90.0);
    }

    #[test]
    fn test_roll() {
        let p0 = Position::new(0.0, -1.0, 0.0);
        let p1 = Position::new(0.0, 0.0, 0.0);
        let straight = Position::new(0.0, 1.0, 0.0);
        assert!(roll(Some(&p0), Some(&p1), &straight, 1.0).abs() < EPS);

        let right_angle = Position::new(1.0, 0.0, 0.0);
        assert!((roll(Some(&p0), Some(&p1), &right_angle, 1.0) + 90.0).abs() < EPS);
        assert!((roll(Some(&p0), Some(&p1), &right_angle, 2.0) + 180.0).abs() < EPS);

        assert_eq!(roll(None, Some(&p1), &straight, 1.0), 0.0);
        assert_eq!(roll(Some(&p0), None, &straight, 1.0), 0.0);
        assert_eq!(roll(Some(&p1), Some(&p1), &straight, 1.0), 0.0);
    }

    #[test]
    fn test_normalize_antimeridian() {
        let window = [
            Position::new(179.0, 10.0, 1.0),
            Position::new(-179.0, 10.0, 2.0),
            Position::new(-178.0, 10.0, 3.0),
        ];
        let [a, b, c] = normalize(window);
        assert_eq!(a.longitude, 179.0);
        assert_eq!(b.longitude, 181.0);
        assert_eq!(c.longitude, 182.0);
        assert_eq!(b.latitude, 10.0);
        assert_eq!(c.altitude, 3.0);
    }

    #[test]
    fn test_normalize_leaves_small_spans() {
        let window = [
            Position::new(-10.0, -5.0, 0.0),
            Position::new(0.0, 0.0, 0.0),
            Position::new(10.0, 5.0, 0.0),
        ];
        assert_eq!(normalize(window), window);
    }

    #[test]
    fn test_flight_path() {
        let samples: Vec<Position> = (0..6)
            .map(|i| Position::new(f64::from(i) * 0.01, f64::from(i) * 0.01, 1000.0))
            .collect();
        let options = FlightPathOptions {
            pause: 3.0,
            ..FlightPathOptions::default()
        };
        let steps = flight_path(&samples, &options);
        assert_eq!(steps.len(), 4);
        for step in &steps {
            assert_eq!(step.duration, Some(3.0));
            assert_eq!(step.mode, Some(FlyToMode::Smooth));
            assert!(step.object.comment.as_deref().is_some_and(|c| c.contains(" to ")));
            match &step.view {
                Some(AbstractView::Camera(camera)) => {
                    assert_eq!(camera.view.altitude_mode, AltitudeMode::Absolute);
                    assert!(camera.roll.is_some());
                }
                other => panic!("expected a Camera, got {other:?}"),
            }
        }
        assert!(flight_path(&samples[..2], &options).is_empty());
    }
}
