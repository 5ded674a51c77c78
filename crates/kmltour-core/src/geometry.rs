//! Geometry entities: points, paths, and 3D models

use crate::coord::convert_coord;
use crate::enums::{RefreshMode, ViewRefreshMode};
use crate::error::Result;
use crate::object::{impl_has_object, KmlObject};
use crate::render::{
    emit_fields, fmt_num, open_element, AltitudeMode, Field, Ns, Render, RenderContext, Value,
};
use crate::xml::Element;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single coordinate (lon, lat, alt)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude (degrees)
    pub longitude: f64,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Altitude (meters, optional)
    pub altitude: Option<f64>,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.altitude {
            Some(alt) => write!(f, "{},{},{alt}", self.longitude, self.latitude),
            None => write!(f, "{},{}", self.longitude, self.latitude),
        }
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([longitude, latitude, altitude]: [f64; 3]) -> Self {
        Self {
            longitude,
            latitude,
            altitude: Some(altitude),
        }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
            altitude: None,
        }
    }
}

impl From<&Point> for Coordinate {
    fn from(p: &Point) -> Self {
        Self {
            longitude: p.longitude,
            latitude: p.latitude,
            altitude: Some(p.altitude),
        }
    }
}

/// Space-separated `lon,lat[,alt]` tuples
#[must_use]
pub fn format_coordinates(coords: &[Coordinate]) -> String {
    coords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A geographic point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// Object identity
    pub object: KmlObject,
    /// Longitude (degrees)
    pub longitude: f64,
    /// Latitude (degrees)
    pub latitude: f64,
    /// Altitude (meters)
    pub altitude: f64,
    /// How `altitude` is interpreted
    pub altitude_mode: AltitudeMode,
    /// Connect the point to the ground with a line
    pub extrude: bool,
}

impl_has_object!(Point);

impl Point {
    /// Point clamped to the ground
    #[must_use]
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            object: KmlObject::new("Point"),
            longitude,
            latitude,
            altitude,
            altitude_mode: AltitudeMode::ClampToGround,
            extrude: false,
        }
    }

    /// Point with an explicit altitude mode
    #[must_use]
    pub fn with_mode(longitude: f64, latitude: f64, altitude: f64, mode: AltitudeMode) -> Self {
        Self {
            altitude_mode: mode,
            ..Self::new(longitude, latitude, altitude)
        }
    }

    /// Point from textual coordinates, decimal or degrees/minutes/seconds
    ///
    /// # Errors
    ///
    /// Returns [`crate::KmlError::InvalidValue`] if either coordinate cannot
    /// be parsed.
    pub fn parse(longitude: &str, latitude: &str, altitude: f64) -> Result<Self> {
        Ok(Self::new(
            convert_coord(longitude)?,
            convert_coord(latitude)?,
            altitude,
        ))
    }

    /// The point as a bare coordinate
    #[inline]
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::from(self)
    }

    /// `<Location>`-style element with separate longitude/latitude/altitude
    #[must_use]
    pub fn to_location(&self, name: &str) -> Element {
        let mut element = Element::new(name);
        element.push(Element::with_text("longitude", fmt_num(self.longitude)));
        element.push(Element::with_text("latitude", fmt_num(self.latitude)));
        element.push(Element::with_text("altitude", fmt_num(self.altitude)));
        element
    }
}

const POINT_FIELDS: &[Field<Point>] = &[
    Field::full_only("extrude", "extrude", Ns::Kml, |p| Some(Value::Bool(p.extrude))),
    Field::full_only("altitude_mode", "altitudeMode", Ns::SeaFloor, |p| {
        Some(Value::Mode(p.altitude_mode))
    }),
    Field::new("coordinates", "coordinates", Ns::Kml, |p| {
        Some(Value::Text(Cow::Owned(p.coordinate().to_string())))
    }),
];

impl Render for Point {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Point", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, POINT_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Attributes shared by line strings and linear rings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    /// Ordered vertices
    pub coordinates: Vec<Coordinate>,
    /// Vertical offset applied to every vertex (`gx:altitudeOffset`)
    pub altitude_offset: Option<f64>,
    /// Connect the path to the ground
    pub extrude: Option<bool>,
    /// Follow the terrain
    pub tessellate: Option<bool>,
    /// How altitudes are interpreted
    pub altitude_mode: Option<AltitudeMode>,
}

impl PathData {
    fn from_coords<C: Into<Coordinate>>(coords: impl IntoIterator<Item = C>) -> Self {
        Self {
            coordinates: coords.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

const PATH_FIELDS: &[Field<PathData>] = &[
    Field::new("altitude_offset", "altitudeOffset", Ns::Gx, |p| {
        p.altitude_offset.map(Value::Number)
    }),
    Field::new("extrude", "extrude", Ns::Kml, |p| p.extrude.map(Value::Bool)),
    Field::new("tessellate", "tessellate", Ns::Kml, |p| p.tessellate.map(Value::Bool)),
    Field::new("altitude_mode", "altitudeMode", Ns::SeaFloor, |p| {
        p.altitude_mode.map(Value::Mode)
    }),
];

fn emit_coordinates(element: &mut Element, coords: &[Coordinate]) {
    if !coords.is_empty() {
        element.push(Element::with_text("coordinates", format_coordinates(coords)));
    }
}

/// A connected set of line segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineString {
    /// Object identity
    pub object: KmlObject,
    /// Vertices and shared path attributes
    pub path: PathData,
    /// Drawing order among overlapping paths (`gx:drawOrder`)
    pub draw_order: Option<i64>,
}

impl_has_object!(LineString);

impl LineString {
    /// Line through the given vertices
    #[must_use]
    pub fn new<C: Into<Coordinate>>(coords: impl IntoIterator<Item = C>) -> Self {
        Self {
            object: KmlObject::new("LineString"),
            path: PathData::from_coords(coords),
            draw_order: None,
        }
    }

    /// Append vertices
    pub fn extend<C: Into<Coordinate>>(&mut self, coords: impl IntoIterator<Item = C>) {
        self.path
            .coordinates
            .extend(coords.into_iter().map(Into::into));
    }
}

impl Render for LineString {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "LineString", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, &self.path, PATH_FIELDS, ctx)?;
        if let Some(order) = self.draw_order {
            element.push(Element::with_text("gx:drawOrder", order.to_string()));
        }
        emit_coordinates(&mut element, &self.path.coordinates);
        Ok(Some(element))
    }
}

/// A closed line string, used for polygon boundaries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearRing {
    /// Object identity
    pub object: KmlObject,
    /// Vertices and shared path attributes
    pub path: PathData,
}

impl_has_object!(LinearRing);

impl LinearRing {
    /// Ring through the given vertices
    #[must_use]
    pub fn new<C: Into<Coordinate>>(coords: impl IntoIterator<Item = C>) -> Self {
        Self {
            object: KmlObject::new("LinearRing"),
            path: PathData::from_coords(coords),
        }
    }

    /// Append vertices
    pub fn extend<C: Into<Coordinate>>(&mut self, coords: impl IntoIterator<Item = C>) {
        self.path
            .coordinates
            .extend(coords.into_iter().map(Into::into));
    }
}

impl Render for LinearRing {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "LinearRing", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, &self.path, PATH_FIELDS, ctx)?;
        emit_coordinates(&mut element, &self.path.coordinates);
        Ok(Some(element))
    }
}

/// A network or local resource reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    /// Object identity
    pub object: KmlObject,
    pub href: Option<String>,
    pub refresh_mode: Option<RefreshMode>,
    pub refresh_interval: Option<f64>,
    pub view_refresh_mode: Option<ViewRefreshMode>,
    pub view_refresh_time: Option<f64>,
    pub view_bound_scale: Option<f64>,
    pub view_format: Option<String>,
    pub http_query: Option<String>,
}

impl_has_object!(Link);

impl Link {
    /// Link to `href` with every refresh option unset
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::empty("Link")
        }
    }

    fn empty(kind: &str) -> Self {
        Self {
            object: KmlObject::new(kind),
            href: None,
            refresh_mode: None,
            refresh_interval: None,
            view_refresh_mode: None,
            view_refresh_time: None,
            view_bound_scale: None,
            view_format: None,
            http_query: None,
        }
    }
}

const LINK_FIELDS: &[Field<Link>] = &[
    Field::new("href", "href", Ns::Kml, |l| l.href.as_deref().map(Value::text)),
    Field::new("refresh_mode", "refreshMode", Ns::Kml, |l| {
        l.refresh_mode.map(|m| Value::text(m.as_str()))
    }),
    Field::new("refresh_interval", "refreshInterval", Ns::Kml, |l| {
        l.refresh_interval.map(Value::Number)
    }),
    Field::new("view_refresh_mode", "viewRefreshMode", Ns::Kml, |l| {
        l.view_refresh_mode.map(|m| Value::text(m.as_str()))
    }),
    Field::new("view_refresh_time", "viewRefreshTime", Ns::Kml, |l| {
        l.view_refresh_time.map(Value::Number)
    }),
    Field::new("view_bound_scale", "viewBoundScale", Ns::Kml, |l| {
        l.view_bound_scale.map(Value::Number)
    }),
    Field::new("view_format", "viewFormat", Ns::Kml, |l| {
        l.view_format.as_deref().map(Value::text)
    }),
    Field::new("http_query", "httpQuery", Ns::Kml, |l| {
        l.http_query.as_deref().map(Value::text)
    }),
];

impl Render for Link {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Link", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, LINK_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// An image link, optionally cropped with `gx:x`/`gx:y`/`gx:w`/`gx:h`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Icon {
    /// Link data; rendered under the `Icon` element name
    pub link: Link,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
}

impl Icon {
    /// Icon pointing at `href`
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            link: Link {
                href: Some(href.into()),
                ..Link::empty("Icon")
            },
            x: None,
            y: None,
            w: None,
            h: None,
        }
    }
}

const ICON_FIELDS: &[Field<Icon>] = &[
    Field::new("x", "x", Ns::Gx, |i| i.x.map(Value::Number)),
    Field::new("y", "y", Ns::Gx, |i| i.y.map(Value::Number)),
    Field::new("w", "w", Ns::Gx, |i| i.w.map(Value::Number)),
    Field::new("h", "h", Ns::Gx, |i| i.h.map(Value::Number)),
];

impl Render for Icon {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.link.object, "Icon", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, &self.link, LINK_FIELDS, ctx)?;
        emit_fields(&mut element, self, ICON_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Model rotation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub heading: f64,
    pub tilt: f64,
    pub roll: f64,
}

impl Orientation {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Orientation");
        element.push(Element::with_text("heading", fmt_num(self.heading)));
        element.push(Element::with_text("tilt", fmt_num(self.tilt)));
        element.push(Element::with_text("roll", fmt_num(self.roll)));
        element
    }
}

/// Model scale along each axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

impl Scale {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Scale");
        element.push(Element::with_text("x", fmt_num(self.x)));
        element.push(Element::with_text("y", fmt_num(self.y)));
        element.push(Element::with_text("z", fmt_num(self.z)));
        element
    }
}

/// Maps a texture path inside a model file to a path in the archive
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alias {
    pub target_href: String,
    pub source_href: String,
}

impl Alias {
    #[must_use]
    pub fn new(target_href: impl Into<String>, source_href: impl Into<String>) -> Self {
        Self {
            target_href: target_href.into(),
            source_href: source_href.into(),
        }
    }

    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Alias");
        element.push(Element::with_text("targetHref", self.target_href.as_str()));
        element.push(Element::with_text("sourceHref", self.source_href.as_str()));
        element
    }
}

/// Texture aliases of a model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMap {
    pub aliases: Vec<Alias>,
}

impl ResourceMap {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("ResourceMap");
        for alias in &self.aliases {
            element.push(alias.to_element());
        }
        element
    }
}

impl From<Vec<Alias>> for ResourceMap {
    fn from(aliases: Vec<Alias>) -> Self {
        Self { aliases }
    }
}

impl From<Alias> for ResourceMap {
    fn from(alias: Alias) -> Self {
        Self {
            aliases: vec![alias],
        }
    }
}

/// A textured 3D model placed on the globe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    /// Object identity
    pub object: KmlObject,
    pub altitude_mode: Option<AltitudeMode>,
    /// Model origin; rendered as `<Location>`
    pub location: Option<Point>,
    pub orientation: Option<Orientation>,
    pub scale: Option<Scale>,
    /// Model file
    pub link: Option<Link>,
    pub resource_map: Option<ResourceMap>,
}

impl_has_object!(Model);

impl Model {
    /// Empty model; set fields directly
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("Model"),
            altitude_mode: None,
            location: None,
            orientation: None,
            scale: None,
            link: None,
            resource_map: None,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

const MODEL_FIELDS: &[Field<Model>] = &[
    Field::new("altitude_mode", "altitudeMode", Ns::SeaFloor, |m| {
        m.altitude_mode.map(Value::Mode)
    }),
    Field::new("location", "Location", Ns::Kml, |m| {
        m.location.as_ref().map(|p| Value::Element(p.to_location("Location")))
    }),
    Field::new("orientation", "Orientation", Ns::Kml, |m| {
        m.orientation.map(|o| Value::Element(o.to_element()))
    }),
    Field::new("scale", "Scale", Ns::Kml, |m| {
        m.scale.map(|s| Value::Element(s.to_element()))
    }),
    Field::new("link", "Link", Ns::Kml, |m| {
        m.link.as_ref().map(|l| Value::Nested(l))
    }),
    Field::new("resource_map", "ResourceMap", Ns::Kml, |m| {
        m.resource_map.as_ref().map(|r| Value::Element(r.to_element()))
    }),
];

impl Render for Model {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Model", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, MODEL_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Any geometry a placemark can wrap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Model(Model),
}

impl Geometry {
    /// Object data of the wrapped geometry
    #[must_use]
    pub fn object(&self) -> &KmlObject {
        match self {
            Self::Point(g) => &g.object,
            Self::LineString(g) => &g.object,
            Self::LinearRing(g) => &g.object,
            Self::Model(g) => &g.object,
        }
    }

    /// Kind name, as emitted
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::LinearRing(_) => "LinearRing",
            Self::Model(_) => "Model",
        }
    }
}

impl Render for Geometry {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        match self {
            Self::Point(g) => g.render(ctx),
            Self::LineString(g) => g.render(ctx),
            Self::LinearRing(g) => g.render(ctx),
            Self::Model(g) => g.render(ctx),
        }
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(l: LineString) -> Self {
        Self::LineString(l)
    }
}

impl From<LinearRing> for Geometry {
    fn from(l: LinearRing) -> Self {
        Self::LinearRing(l)
    }
}

impl From<Model> for Geometry {
    fn from(m: Model) -> Self {
        Self::Model(m)
    }
}
