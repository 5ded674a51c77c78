//! Image overlays: screen, ground, and photo

use crate::enums::{Shape, Units};
use crate::error::{KmlError, Result};
use crate::feature::{impl_has_feature, FeatureData};
use crate::geometry::{Coordinate, Icon, Point};
use crate::region::LatLonBox;
use crate::render::{
    emit_fields, fmt_num, open_element, AltitudeMode, Field, Ns, Render, RenderContext, Value,
};
use crate::style::Color;
use crate::xml::Element;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A position or size given as an x/y pair with units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XY {
    pub x: f64,
    pub y: f64,
    pub xunits: Units,
    pub yunits: Units,
}

impl Default for XY {
    fn default() -> Self {
        Self::new(0.5, 0.5, Units::Fraction, Units::Fraction)
    }
}

impl XY {
    #[must_use]
    pub const fn new(x: f64, y: f64, xunits: Units, yunits: Units) -> Self {
        Self {
            x,
            y,
            xunits,
            yunits,
        }
    }

    /// Attribute-only element under the given name (`hotSpot`, `overlayXY`, ...)
    #[must_use]
    pub fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .attr("x", fmt_num(self.x))
            .attr("y", fmt_num(self.y))
            .attr("xunits", self.xunits.as_str())
            .attr("yunits", self.yunits.as_str())
    }
}

/// Fields shared by every overlay kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayData {
    pub color: Option<Color>,
    pub draw_order: Option<i64>,
    pub icon: Option<Icon>,
}

impl OverlayData {
    #[must_use]
    pub fn new(href: Option<String>) -> Self {
        Self {
            color: None,
            draw_order: None,
            icon: href.map(Icon::new),
        }
    }

    /// Image reference, if any
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.icon.as_ref().and_then(|icon| icon.link.href.as_deref())
    }
}

const OVERLAY_FIELDS: &[Field<OverlayData>] = &[
    Field::new("color", "color", Ns::Kml, |o| {
        o.color.map(|c| Value::Text(Cow::Owned(c.to_string())))
    }),
    Field::new("draw_order", "drawOrder", Ns::Kml, |o| o.draw_order.map(Value::Int)),
    Field::new("icon", "Icon", Ns::Kml, |o| o.icon.as_ref().map(|i| Value::Nested(i))),
];

/// An image fixed to the screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenOverlay {
    pub feature: FeatureData,
    pub overlay: OverlayData,
    pub overlay_xy: Option<XY>,
    pub screen_xy: Option<XY>,
    pub rotation_xy: Option<XY>,
    pub size: Option<XY>,
    pub rotation: Option<f64>,
}

impl ScreenOverlay {
    #[must_use]
    pub fn new(href: Option<String>) -> Self {
        Self {
            feature: FeatureData::new("ScreenOverlay"),
            overlay: OverlayData::new(href),
            overlay_xy: None,
            screen_xy: None,
            rotation_xy: None,
            size: None,
            rotation: None,
        }
    }
}

const SCREEN_OVERLAY_FIELDS: &[Field<ScreenOverlay>] = &[
    Field::new("overlay_xy", "overlayXY", Ns::Kml, |o| {
        o.overlay_xy.map(|xy| Value::Element(xy.to_element("overlayXY")))
    }),
    Field::new("screen_xy", "screenXY", Ns::Kml, |o| {
        o.screen_xy.map(|xy| Value::Element(xy.to_element("screenXY")))
    }),
    Field::new("rotation_xy", "rotationXY", Ns::Kml, |o| {
        o.rotation_xy.map(|xy| Value::Element(xy.to_element("rotationXY")))
    }),
    Field::new("size", "size", Ns::Kml, |o| {
        o.size.map(|xy| Value::Element(xy.to_element("size")))
    }),
    Field::new("rotation", "rotation", Ns::Kml, |o| o.rotation.map(Value::Number)),
];

impl Render for ScreenOverlay {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.feature.object, "ScreenOverlay", ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, ctx)?;
        emit_fields(&mut element, &self.overlay, OVERLAY_FIELDS, ctx)?;
        emit_fields(&mut element, self, SCREEN_OVERLAY_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Four corners of a non-rectangular ground overlay, counter-clockwise from
/// the lower left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonQuad {
    pub lower_left: Coordinate,
    pub lower_right: Coordinate,
    pub upper_right: Coordinate,
    pub upper_left: Coordinate,
}

impl LatLonQuad {
    #[must_use]
    pub fn new(
        lower_left: impl Into<Coordinate>,
        lower_right: impl Into<Coordinate>,
        upper_right: impl Into<Coordinate>,
        upper_left: impl Into<Coordinate>,
    ) -> Self {
        Self {
            lower_left: lower_left.into(),
            lower_right: lower_right.into(),
            upper_right: upper_right.into(),
            upper_left: upper_left.into(),
        }
    }

    /// `gx:LatLonQuad` element; corners are written as `lon,lat`
    #[must_use]
    pub fn to_element(&self) -> Element {
        let coords = [
            self.lower_left,
            self.lower_right,
            self.upper_right,
            self.upper_left,
        ]
        .iter()
        .map(|c| format!("{},{}", c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .join(" ");
        let mut element = Element::new("gx:LatLonQuad");
        element.push(Element::with_text("coordinates", coords));
        element
    }
}

/// An image draped over the terrain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundOverlay {
    pub feature: FeatureData,
    pub overlay: OverlayData,
    pub altitude: Option<f64>,
    pub altitude_mode: Option<AltitudeMode>,
    pub lat_lon_box: Option<LatLonBox>,
    pub lat_lon_quad: Option<LatLonQuad>,
}

impl GroundOverlay {
    #[must_use]
    pub fn new(href: Option<String>) -> Self {
        Self {
            feature: FeatureData::new("GroundOverlay"),
            overlay: OverlayData::new(href),
            altitude: None,
            altitude_mode: None,
            lat_lon_box: None,
            lat_lon_quad: None,
        }
    }
}

const GROUND_OVERLAY_FIELDS: &[Field<GroundOverlay>] = &[
    Field::new("altitude", "altitude", Ns::Kml, |o| o.altitude.map(Value::Number)),
    Field::new("altitude_mode", "altitudeMode", Ns::SeaFloor, |o| {
        o.altitude_mode.map(Value::Mode)
    }),
    Field::new("lat_lon_box", "LatLonBox", Ns::Kml, |o| {
        o.lat_lon_box.map(|b| Value::Element(b.to_element(false)))
    }),
    Field::new("lat_lon_quad", "LatLonQuad", Ns::Gx, |o| {
        o.lat_lon_quad.map(|q| Value::Element(q.to_element()))
    }),
];

impl Render for GroundOverlay {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        if self.lat_lon_box.is_none() && self.lat_lon_quad.is_none() {
            return Err(KmlError::MissingState(format!(
                "ground overlay {} needs a LatLonBox or a LatLonQuad",
                self.feature.id()
            )));
        }
        let Some(mut element) = open_element(&self.feature.object, "GroundOverlay", ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, ctx)?;
        emit_fields(&mut element, &self.overlay, OVERLAY_FIELDS, ctx)?;
        emit_fields(&mut element, self, GROUND_OVERLAY_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Camera field of view of a photo overlay, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewVolume {
    pub left_fov: f64,
    pub right_fov: f64,
    pub bottom_fov: f64,
    pub top_fov: f64,
    pub near: f64,
}

impl ViewVolume {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("ViewVolume");
        element.push(Element::with_text("leftFov", fmt_num(self.left_fov)));
        element.push(Element::with_text("rightFov", fmt_num(self.right_fov)));
        element.push(Element::with_text("bottomFov", fmt_num(self.bottom_fov)));
        element.push(Element::with_text("topFov", fmt_num(self.top_fov)));
        element.push(Element::with_text("near", fmt_num(self.near)));
        element
    }
}

/// Tiling of a very large photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePyramid {
    pub tile_size: i64,
    pub max_width: i64,
    pub max_height: i64,
    /// `lowerLeft` or `upperLeft`
    pub grid_origin: String,
}

impl Default for ImagePyramid {
    fn default() -> Self {
        Self {
            tile_size: 256,
            max_width: 0,
            max_height: 0,
            grid_origin: "lowerLeft".to_string(),
        }
    }
}

impl ImagePyramid {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("ImagePyramid");
        element.push(Element::with_text("tileSize", self.tile_size.to_string()));
        element.push(Element::with_text("maxWidth", self.max_width.to_string()));
        element.push(Element::with_text("maxHeight", self.max_height.to_string()));
        element.push(Element::with_text("gridOrigin", self.grid_origin.as_str()));
        element
    }
}

/// A photo placed in the scene at the camera position it was taken from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoOverlay {
    pub feature: FeatureData,
    pub overlay: OverlayData,
    pub rotation: Option<f64>,
    pub view_volume: Option<ViewVolume>,
    pub image_pyramid: Option<ImagePyramid>,
    pub point: Option<Point>,
    pub shape: Option<Shape>,
}

impl PhotoOverlay {
    #[must_use]
    pub fn new(href: Option<String>) -> Self {
        Self {
            feature: FeatureData::new("PhotoOverlay"),
            overlay: OverlayData::new(href),
            rotation: None,
            view_volume: None,
            image_pyramid: None,
            point: None,
            shape: None,
        }
    }
}

const PHOTO_OVERLAY_FIELDS: &[Field<PhotoOverlay>] = &[
    Field::new("rotation", "rotation", Ns::Kml, |o| o.rotation.map(Value::Number)),
    Field::new("view_volume", "ViewVolume", Ns::Kml, |o| {
        o.view_volume.map(|v| Value::Element(v.to_element()))
    }),
    Field::new("image_pyramid", "ImagePyramid", Ns::Kml, |o| {
        o.image_pyramid.as_ref().map(|p| Value::Element(p.to_element()))
    }),
    Field::new("point", "Point", Ns::Kml, |o| o.point.as_ref().map(|p| Value::Nested(p))),
    Field::new("shape", "shape", Ns::Kml, |o| o.shape.map(|s| Value::text(s.as_str()))),
];

impl Render for PhotoOverlay {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.feature.object, "PhotoOverlay", ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, ctx)?;
        emit_fields(&mut element, &self.overlay, OVERLAY_FIELDS, ctx)?;
        emit_fields(&mut element, self, PHOTO_OVERLAY_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

impl_has_feature!(ScreenOverlay, GroundOverlay, PhotoOverlay);

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new()
    }

    #[test]
    fn test_overlay_common_fields() {
        let mut o = ScreenOverlay::new(Some("look for this href".to_string()));
        o.overlay.draw_order = Some(10);
        o.overlay.color = Some(Color::WHITE);
        let k = o.render(&ctx()).unwrap().unwrap();
        assert_eq!(
            k.child("Icon").unwrap().child_text("href").as_deref(),
            Some("look for this href")
        );
        assert_eq!(k.child_text("drawOrder").as_deref(), Some("10"));
        assert_eq!(k.child_text("color").as_deref(), Some("ffffffff"));
    }

    #[test]
    fn test_screen_overlay_xy_fields() {
        let xy = XY::new(10.0, 10.0, Units::Pixels, Units::Pixels);
        let mut o = ScreenOverlay::new(Some("test".to_string()));
        o.feature.name = Some("some name".to_string());
        o.overlay_xy = Some(xy);
        o.screen_xy = Some(xy);
        o.rotation_xy = Some(xy);
        o.size = Some(xy);
        o.rotation = Some(10.0);
        let k = o.render(&ctx()).unwrap().unwrap();
        assert_eq!(k.child_text("name").as_deref(), Some("some name"));
        assert_eq!(k.child_text("rotation").as_deref(), Some("10"));
        for name in ["overlayXY", "screenXY", "rotationXY", "size"] {
            let node = k.child(name).unwrap();
            assert_eq!(node.get_attr("x"), Some("10"));
            assert_eq!(node.get_attr("yunits"), Some("pixels"));
        }
    }

    #[test]
    fn test_ground_overlay_requires_bounds() {
        let mut o = GroundOverlay::new(Some("some href".to_string()));
        o.altitude = Some(123.2);
        o.altitude_mode = Some(AltitudeMode::RelativeToSeaFloor);
        assert!(matches!(o.render(&ctx()), Err(KmlError::MissingState(_))));

        let p = Point::new(123.2, 123.2, 0.0);
        o.lat_lon_quad = Some(LatLonQuad::new(&p, &p, &p, &p));
        let k = o.render(&ctx()).unwrap().unwrap();
        assert_eq!(k.child_text("altitude").as_deref(), Some("123.2"));
        assert_eq!(
            k.child_text("gx:altitudeMode").as_deref(),
            Some("relativeToSeaFloor")
        );
        assert_eq!(
            k.child("gx:LatLonQuad").unwrap().child_text("coordinates").as_deref(),
            Some("123.2,123.2 123.2,123.2 123.2,123.2 123.2,123.2")
        );

        o.lat_lon_box = Some(LatLonBox::new(1.0, 2.0, 3.0, 4.0));
        let k = o.render(&ctx()).unwrap().unwrap();
        assert_eq!(
            k.child("LatLonBox").unwrap().child_text("west").as_deref(),
            Some("4")
        );
    }

    #[test]
    fn test_photo_overlay() {
        let n = 34.0;
        let mut o = PhotoOverlay::new(Some("test".to_string()));
        o.rotation = Some(10.0);
        o.point = Some(Point::new(n, n, 0.0));
        o.shape = Some(Shape::Cylinder);
        o.view_volume = Some(ViewVolume {
            left_fov: -n,
            right_fov: n,
            bottom_fov: -n,
            top_fov: n,
            near: n,
        });
        o.image_pyramid = Some(ImagePyramid {
            tile_size: 34,
            max_width: 34,
            max_height: 34,
            grid_origin: "upperLeft".to_string(),
        });
        let k = o.render(&ctx()).unwrap().unwrap();
        assert_eq!(k.child_text("shape").as_deref(), Some("cylinder"));
        assert_eq!(k.child_text("rotation").as_deref(), Some("10"));
        let volume = k.child("ViewVolume").unwrap();
        assert_eq!(volume.child_text("leftFov").as_deref(), Some("-34"));
        assert_eq!(volume.child_text("near").as_deref(), Some("34"));
        let pyramid = k.child("ImagePyramid").unwrap();
        assert_eq!(pyramid.child_text("maxHeight").as_deref(), Some("34"));
        assert!(k.child("Point").is_some());
    }
}
