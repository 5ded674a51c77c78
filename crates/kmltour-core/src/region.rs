//! Bounding boxes, level of detail, and regions

use crate::error::Result;
use crate::object::{impl_has_object, KmlObject};
use crate::render::{
    emit_fields, fmt_num, open_element, AltitudeMode, Field, Ns, Render, RenderContext, Value,
};
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// A geographic bounding box
///
/// Rendered as `LatLonBox` for ground overlays and as `LatLonAltBox` inside a
/// [`Region`], where the altitude fields apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub rotation: Option<f64>,
    pub min_altitude: Option<f64>,
    pub max_altitude: Option<f64>,
    pub altitude_mode: Option<AltitudeMode>,
}

impl LatLonBox {
    #[must_use]
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
            ..Self::default()
        }
    }

    /// Element form; `with_altitude` selects `LatLonAltBox`
    #[must_use]
    pub fn to_element(&self, with_altitude: bool) -> Element {
        let name = if with_altitude { "LatLonAltBox" } else { "LatLonBox" };
        let mut element = Element::new(name);
        element.push(Element::with_text("north", fmt_num(self.north)));
        element.push(Element::with_text("south", fmt_num(self.south)));
        element.push(Element::with_text("east", fmt_num(self.east)));
        element.push(Element::with_text("west", fmt_num(self.west)));
        if with_altitude {
            if let Some(min) = self.min_altitude {
                element.push(Element::with_text("minAltitude", fmt_num(min)));
            }
            if let Some(max) = self.max_altitude {
                element.push(Element::with_text("maxAltitude", fmt_num(max)));
            }
            if let Some(mode) = self.altitude_mode {
                element.push(Element::with_text(mode.element_name(), mode.as_str()));
            }
        } else if let Some(rotation) = self.rotation {
            element.push(Element::with_text("rotation", fmt_num(rotation)));
        }
        element
    }
}

/// Level-of-detail limits, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lod {
    pub min_lod_pixels: f64,
    pub max_lod_pixels: f64,
    pub min_fade_extent: f64,
    pub max_fade_extent: f64,
}

impl Default for Lod {
    fn default() -> Self {
        Self {
            min_lod_pixels: 128.0,
            max_lod_pixels: -1.0,
            min_fade_extent: 0.0,
            max_fade_extent: 0.0,
        }
    }
}

impl Lod {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Lod");
        element.push(Element::with_text("minLodPixels", fmt_num(self.min_lod_pixels)));
        element.push(Element::with_text("maxLodPixels", fmt_num(self.max_lod_pixels)));
        element.push(Element::with_text("minFadeExtent", fmt_num(self.min_fade_extent)));
        element.push(Element::with_text("maxFadeExtent", fmt_num(self.max_fade_extent)));
        element
    }
}

/// Area of interest that gates a feature's visibility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub object: KmlObject,
    pub lat_lon_alt_box: Option<LatLonBox>,
    pub lod: Option<Lod>,
}

impl_has_object!(Region);

impl Region {
    #[must_use]
    pub fn new(lat_lon_alt_box: Option<LatLonBox>, lod: Option<Lod>) -> Self {
        Self {
            object: KmlObject::new("Region"),
            lat_lon_alt_box,
            lod,
        }
    }
}

const REGION_FIELDS: &[Field<Region>] = &[
    Field::new("lat_lon_alt_box", "LatLonAltBox", Ns::Kml, |r| {
        r.lat_lon_alt_box.map(|b| Value::Element(b.to_element(true)))
    }),
    Field::new("lod", "Lod", Ns::Kml, |r| r.lod.map(|l| Value::Element(l.to_element()))),
];

impl Render for Region {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Region", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, REGION_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lon_box_forms() {
        let mut b = LatLonBox::new(130.2, 130.2, 130.2, 130.2);
        b.rotation = Some(130.2);
        b.min_altitude = Some(130.2);
        b.max_altitude = Some(130.2);
        b.altitude_mode = Some(AltitudeMode::RelativeToGround);

        let alt = b.to_element(true);
        assert_eq!(alt.name, "LatLonAltBox");
        assert_eq!(alt.child_text("minAltitude").as_deref(), Some("130.2"));
        assert_eq!(alt.child_text("maxAltitude").as_deref(), Some("130.2"));
        assert!(alt.child("rotation").is_none());

        let flat = b.to_element(false);
        assert_eq!(flat.name, "LatLonBox");
        for f in ["north", "south", "east", "west"] {
            assert_eq!(flat.child_text(f).as_deref(), Some("130.2"));
        }
        assert!(flat.child("minAltitude").is_none());
    }

    #[test]
    fn test_region() {
        let lod = Lod {
            min_lod_pixels: 128.0,
            max_lod_pixels: 1024.0,
            min_fade_extent: 128.0,
            max_fade_extent: 128.0,
        };
        let region = Region::new(Some(LatLonBox::new(1.0, -1.0, 1.0, -1.0)), Some(lod));
        let k = region.render(&RenderContext::new()).unwrap().unwrap();
        assert!(k.get_attr("id").unwrap().contains("Region_"));
        let l = k.child("Lod").unwrap();
        assert_eq!(l.child_text("maxLodPixels").as_deref(), Some("1024"));
        assert_eq!(
            k.child("LatLonAltBox").unwrap().child_text("south").as_deref(),
            Some("-1")
        );
    }
}
