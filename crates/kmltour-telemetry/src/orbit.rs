//! Orbiting a fixed point with a sequence of LookAts

use kmltour_core::{FlyTo, FlyToMode, LookAt, Point};
use serde::{Deserialize, Serialize};

/// Settings for [`orbit`]
///
/// Headings are in degrees where 0 (and 360, -360, ...) is north. An end
/// heading above the start orbits clockwise; below it, counter-clockwise.
/// Add or subtract multiples of 360 to orbit more than once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitOptions {
    /// LookAt range, in meters
    pub range: f64,
    pub tilt: f64,
    pub start_heading: f64,
    pub end_heading: f64,
    /// Duration of each FlyTo, in seconds
    pub duration: f64,
    /// Mode of the first FlyTo, typically the document's default; the rest
    /// are always smooth. `None` makes the first one smooth as well.
    pub first_mode: Option<FlyToMode>,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            range: 100.0,
            tilt: 0.0,
            start_heading: 0.0,
            end_heading: 360.0,
            duration: 2.0,
            first_mode: None,
        }
    }
}

/// Headings visited by an orbit from `start` to `end`
///
/// The step is the arc divided into five samples plus five per full
/// revolution, never smaller than one degree. The first heading is `start`
/// and the last is exactly `end`. Non-finite headings yield no samples.
#[must_use]
pub fn orbit_headings(start: f64, end: f64) -> Vec<f64> {
    if !start.is_finite() || !end.is_finite() {
        log::warn!("cannot orbit from {start} to {end}; headings must be finite");
        return Vec::new();
    }
    let arc = (end - start).abs();
    let samples = ((end - start) / 360.0).trunc().abs() * 5.0 + 5.0;
    let mut step = (arc / samples).max(1.0);
    if start > end {
        step = -step;
    }

    let mut headings = vec![start];
    let mut k = 1.0;
    loop {
        let theta = start + k * step;
        let reached = if step > 0.0 { theta >= end } else { theta <= end };
        if reached {
            break;
        }
        headings.push(theta);
        k += 1.0;
    }
    if headings.last() != Some(&end) {
        headings.push(end);
    }
    headings
}

fn look_at(center: &Point, heading: f64, options: &OrbitOptions) -> LookAt {
    let mut look_at = LookAt::new(center.clone());
    look_at.view.heading = Some(heading);
    look_at.view.tilt = Some(options.tilt);
    look_at.range = Some(options.range);
    look_at
}

/// Smooth FlyTos circling `center`, one per heading of [`orbit_headings`]
#[must_use]
pub fn orbit(center: &Point, options: &OrbitOptions) -> Vec<FlyTo> {
    let headings = orbit_headings(options.start_heading, options.end_heading);
    log::debug!(
        "orbiting {} from {} to {} in {} step(s)",
        center.coordinate(),
        options.start_heading,
        options.end_heading,
        headings.len()
    );
    headings
        .into_iter()
        .enumerate()
        .map(|(i, heading)| {
            let mode = match options.first_mode {
                Some(mode) if i == 0 => mode,
                _ => FlyToMode::Smooth,
            };
            FlyTo::new(look_at(center, heading, options))
                .with_duration(options.duration)
                .with_mode(mode)
        })
        .collect()
}
