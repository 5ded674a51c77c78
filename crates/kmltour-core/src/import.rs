//! Placemark extraction from existing KML
//!
//! Only the view-related fields and a few descriptive fields of each
//! `Placemark` are read; this is not a general KML parser.

use crate::error::Result;
use crate::render::AltitudeMode;
use crate::view::{AbstractView, ViewParams};
use std::collections::BTreeMap;

const KML_NS: &str = "http://www.opengis.net/kml/2.2";
const GX_NS: &str = "http://www.google.com/kml/ext/2.2";

/// Fields that feed the view of an imported placemark
const VIEW_FIELDS: &[&str] = &[
    "latitude",
    "longitude",
    "heading",
    "range",
    "tilt",
    "roll",
    "altitude",
    "altitudeMode",
];

/// Descriptive fields copied as text
const OTHER_FIELDS: &[&str] = &["description", "name"];

/// View parameters and raw field text read from one placemark
#[derive(Debug, Clone, PartialEq)]
pub struct PlacemarkRecord {
    pub view: ViewParams,
    /// Every field found, keyed by its unprefixed element name
    pub fields: BTreeMap<String, String>,
}

impl PlacemarkRecord {
    /// Build the view described by this placemark
    #[must_use]
    pub fn view(&self) -> AbstractView {
        self.view.build()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").map(String::as_str)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.fields.get("description").map(String::as_str)
    }
}

fn is_kml(node: &roxmltree::Node<'_, '_>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && matches!(node.tag_name().namespace(), None | Some(KML_NS))
}

/// Text of the first descendant element matching `pred`
fn first_text(
    placemark: roxmltree::Node<'_, '_>,
    pred: impl Fn(&roxmltree::Node<'_, '_>) -> bool,
) -> Option<String> {
    placemark
        .descendants()
        .skip(1)
        .find(|n| pred(n))
        .map(|n| n.text().unwrap_or_default().trim().to_string())
}

/// Numeric view field; unparseable text is skipped with a warning
fn number(fields: &BTreeMap<String, String>, key: &str) -> Option<f64> {
    let text = fields.get(key)?;
    match text.parse::<f64>() {
        Ok(n) => Some(n),
        Err(_) => {
            log::warn!("ignoring placemark {key}: not a number: {text:?}");
            None
        }
    }
}

fn altitude_mode(fields: &BTreeMap<String, String>) -> Option<AltitudeMode> {
    let text = fields.get("altitudeMode")?;
    match text.parse::<AltitudeMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            log::warn!("ignoring placemark altitudeMode: {e}");
            None
        }
    }
}

fn read_placemark(placemark: roxmltree::Node<'_, '_>) -> PlacemarkRecord {
    let mut fields = BTreeMap::new();
    for name in VIEW_FIELDS.iter().chain(OTHER_FIELDS) {
        if let Some(text) = first_text(placemark, |n| is_kml(n, name)) {
            fields.insert((*name).to_string(), text);
        }
    }
    if !fields.contains_key("altitudeMode") {
        let gx_mode = first_text(placemark, |n| {
            n.is_element()
                && n.tag_name().name() == "altitudeMode"
                && n.tag_name().namespace() == Some(GX_NS)
        });
        if let Some(mode) = gx_mode {
            fields.insert("altitudeMode".to_string(), mode);
        }
    }

    let defaults = ViewParams::default();
    let view = ViewParams {
        longitude: number(&fields, "longitude").unwrap_or(defaults.longitude),
        latitude: number(&fields, "latitude").unwrap_or(defaults.latitude),
        altitude: number(&fields, "altitude").unwrap_or(defaults.altitude),
        heading: number(&fields, "heading").unwrap_or(defaults.heading),
        tilt: number(&fields, "tilt").unwrap_or(defaults.tilt),
        roll: number(&fields, "roll"),
        range: number(&fields, "range"),
        altitude_mode: altitude_mode(&fields).unwrap_or(defaults.altitude_mode),
        extrude: defaults.extrude,
    };
    PlacemarkRecord { view, fields }
}

/// Read every `Placemark` in a KML document, in document order
///
/// # Errors
///
/// Returns [`KmlError::Parse`](crate::KmlError::Parse) if `xml` is not well
/// formed. View fields that do not parse are left at their defaults.
pub fn each_placemark(xml: &str) -> Result<Vec<PlacemarkRecord>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)?;
    let records = doc
        .descendants()
        .filter(|n| is_kml(n, "Placemark"))
        .map(read_placemark)
        .collect::<Vec<_>>();
    log::debug!("imported {} placemark(s)", records.len());
    Ok(records)
}
