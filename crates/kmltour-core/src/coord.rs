//! Parsing of textual coordinates

use crate::error::{KmlError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static COORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?P<deg>[-+]?\d+(?:\.\d+)?)\s*(?:[dD°]\s*(?:(?P<min>\d+(?:\.\d+)?)\s*(?:[mM'′])\s*(?:(?P<sec>\d+(?:\.\d+)?)\s*(?:[sS"″]|'')?\s*)?)?)?(?P<hem>[NnSsEeWw])?\s*$"#,
    )
    .expect("Invalid coordinate regex")
});

/// Parse a decimal or degrees/minutes/seconds coordinate
///
/// Accepts `-145.3487`, `10d10m10.1s N`, `32d10'23.10" S`, and
/// `123D30m12.2s W`. Southern and western hemispheres are negative.
///
/// # Errors
///
/// Returns [`KmlError::InvalidValue`] if the text matches neither form.
pub fn convert_coord(text: &str) -> Result<f64> {
    let caps = COORD_RE
        .captures(text)
        .ok_or_else(|| KmlError::InvalidValue(format!("unrecognized coordinate {text:?}")))?;

    let number = |name: &str| -> Result<f64> {
        caps.name(name).map_or(Ok(0.0), |m| {
            m.as_str()
                .parse::<f64>()
                .map_err(|e| KmlError::InvalidValue(format!("{text:?}: {e}")))
        })
    };

    let degrees = number("deg")?;
    let magnitude = degrees.abs() + number("min")? / 60.0 + number("sec")? / 3600.0;
    let southern_or_western = caps
        .name("hem")
        .is_some_and(|h| matches!(h.as_str(), "S" | "s" | "W" | "w"));

    if degrees.is_sign_negative() || southern_or_western {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_decimal() {
        assert!(close(convert_coord("123.5985745").unwrap(), 123.5985745));
        assert!(close(convert_coord("-45.32487").unwrap(), -45.32487));
        assert!(close(convert_coord(" 12 ").unwrap(), 12.0));
    }

    #[test]
    fn test_dms_forms() {
        let expected = 10.0 + 10.0 / 60.0 + 10.1 / 3600.0;
        assert!(close(convert_coord("10d10m10.1s N").unwrap(), expected));
        assert!(close(convert_coord("10d10m10.1s S").unwrap(), -expected));

        let expected = 32.0 + 10.0 / 60.0 + 23.1 / 3600.0;
        assert!(close(convert_coord(r#"32d10'23.10" N"#).unwrap(), expected));

        let expected = 123.0 + 30.0 / 60.0 + 12.2 / 3600.0;
        assert!(close(convert_coord("123D30m12.2s W").unwrap(), -expected));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            convert_coord("north-ish"),
            Err(KmlError::InvalidValue(_))
        ));
        assert!(convert_coord("").is_err());
    }
}
