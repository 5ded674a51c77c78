//! # kmltour-telemetry
//!
//! Camera paths for kmltour, synthesized from raw position data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kmltour_core::{Document, Point};
//! use kmltour_telemetry::{flight_path, orbit, FlightPathOptions, OrbitOptions, Position};
//!
//! let samples: Vec<Position> = vec![
//!     [-122.40, 37.70, 1500.0].into(),
//!     [-122.41, 37.72, 1550.0].into(),
//!     [-122.43, 37.73, 1600.0].into(),
//!     [-122.46, 37.73, 1600.0].into(),
//! ];
//!
//! let mut doc = Document::default();
//! for step in flight_path(&samples, &FlightPathOptions::default()) {
//!     doc.tour_mut().push(step);
//! }
//! for step in orbit(&Point::new(-122.46, 37.73, 0.0), &OrbitOptions::default()) {
//!     doc.tour_mut().push(step);
//! }
//! ```
//!
//! ## Conventions
//!
//! | Quantity | Formula |
//! |----------|---------|
//! | heading | `atan(dx / dy)`, plus 180 when heading south |
//! | tilt | `90 - atan(dz / (dist + 1)) / exaggerate` |
//! | roll | `exaggerate * (turn angle - 180)` |
//!
//! Angles are in degrees. Every sample window is normalized for antimeridian
//! crossings first (see [`normalize`]).

pub mod flight;
pub mod orbit;

pub use flight::{flight_path, heading, normalize, roll, tilt, FlightPathOptions, Position};
pub use orbit::{orbit, orbit_headings, OrbitOptions};
