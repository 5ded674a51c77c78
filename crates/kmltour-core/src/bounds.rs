//! Numeric range helpers for latitude/longitude and relay constraints

/// `[l - l·p/100, l + l·p/100]`: a band of `p` percent around `l`
#[inline]
#[must_use]
pub fn band(l: f64, p: f64) -> [f64; 2] {
    let f = l * p / 100.0;
    [l - f, l + f]
}

/// Wrap `v` into `[min, max]`, treating the number line as circular
///
/// Values already in range are returned unchanged. Non-finite values are
/// returned as is.
#[must_use]
pub fn circ_bounds(v: f64, max: f64, min: f64) -> f64 {
    let w = max - min;
    if !v.is_finite() || w <= 0.0 {
        return v;
    }
    let wrapped = if v > max {
        v - ((v - max) / w).ceil() * w
    } else if v < min {
        v + ((min - v) / w).ceil() * w
    } else {
        return v;
    };
    // The quotient can round onto a whole number of turns
    if wrapped > max {
        wrapped - w
    } else if wrapped < min {
        wrapped + w
    } else {
        wrapped
    }
}

/// Wrap a latitude into `[-90, 90]`
#[inline]
#[must_use]
pub fn lat_check(l: f64) -> f64 {
    circ_bounds(l, 90.0, -90.0)
}

/// Wrap a longitude into `[-180, 180]`
#[inline]
#[must_use]
pub fn long_check(l: f64) -> f64 {
    circ_bounds(l, 180.0, -180.0)
}
