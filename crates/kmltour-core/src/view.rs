//! Abstract views: cameras and look-ats
//!
//! A view's position is a [`Point`], emitted as separate `longitude`,
//! `latitude`, and `altitude` elements. [`ViewParams`] builds either kind
//! from plain numbers: supplying `roll` always yields a [`Camera`] (any
//! `range` is then discarded), otherwise a [`LookAt`] results.

use crate::error::{KmlError, Result};
use crate::geometry::Point;
use crate::object::{impl_has_object, KmlObject};
use crate::render::{
    emit_fields, fmt_bool, fmt_num, open_element, AltitudeMode, Field, Ns, Render, RenderContext, Value,
};
use crate::time::TimePrimitive;
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// Viewer feature toggles attached to a view (`gx:ViewerOptions`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerOptions {
    pub streetview: Option<bool>,
    pub sunlight: Option<bool>,
    pub historical_imagery: Option<bool>,
}

impl ViewerOptions {
    /// Names accepted by [`ViewerOptions::set_option`]
    pub const NAMES: [&'static str; 3] = ["streetview", "sunlight", "historicalimagery"];

    /// Set an option by its KML name
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::InvalidValue`] for any name outside
    /// [`ViewerOptions::NAMES`].
    pub fn set_option(&mut self, name: &str, enabled: bool) -> Result<()> {
        let slot = match name {
            "streetview" => &mut self.streetview,
            "sunlight" => &mut self.sunlight,
            "historicalimagery" => &mut self.historical_imagery,
            other => {
                return Err(KmlError::InvalidValue(format!(
                    "unknown viewer option {other:?}"
                )))
            }
        };
        *slot = Some(enabled);
        Ok(())
    }

    /// Current value of an option, `None` when unset or unknown
    #[must_use]
    pub fn get_option(&self, name: &str) -> Option<bool> {
        match name {
            "streetview" => self.streetview,
            "sunlight" => self.sunlight,
            "historicalimagery" => self.historical_imagery,
            _ => None,
        }
    }

    /// Whether any option has been set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streetview.is_none() && self.sunlight.is_none() && self.historical_imagery.is_none()
    }

    /// `gx:ViewerOptions` element, or `None` when nothing is set
    #[must_use]
    pub fn to_element(&self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        let mut element = Element::new("gx:ViewerOptions");
        for name in Self::NAMES {
            if let Some(enabled) = self.get_option(name) {
                element.push(
                    Element::new("gx:option")
                        .attr("name", name)
                        .attr("enabled", fmt_bool(enabled)),
                );
            }
        }
        Some(element)
    }
}

/// State shared by cameras and look-ats
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewData {
    /// Viewed (LookAt) or viewing (Camera) position
    pub point: Point,
    pub heading: Option<f64>,
    pub tilt: Option<f64>,
    pub altitude_mode: AltitudeMode,
    pub time_primitive: Option<TimePrimitive>,
    pub viewer_options: ViewerOptions,
}

impl ViewData {
    fn new(point: Point) -> Self {
        Self {
            altitude_mode: point.altitude_mode,
            point,
            heading: None,
            tilt: None,
            time_primitive: None,
            viewer_options: ViewerOptions::default(),
        }
    }
}

fn emit_view_head(element: &mut Element, view: &ViewData, ctx: &RenderContext) -> Result<()> {
    if let Some(time) = &view.time_primitive {
        if let Some(rendered) = time.render_in_view(ctx)? {
            element.push(rendered);
        }
    }
    if let Some(options) = view.viewer_options.to_element() {
        element.push(options);
    }
    emit_fields(element, view, VIEW_POSITION_FIELDS, ctx)
}

const VIEW_POSITION_FIELDS: &[Field<ViewData>] = &[
    Field::new("longitude", "longitude", Ns::Kml, |v| Some(Value::Number(v.point.longitude))),
    Field::new("latitude", "latitude", Ns::Kml, |v| Some(Value::Number(v.point.latitude))),
    Field::new("altitude", "altitude", Ns::Kml, |v| Some(Value::Number(v.point.altitude))),
    Field::new("heading", "heading", Ns::Kml, |v| v.heading.map(Value::Number)),
    Field::new("tilt", "tilt", Ns::Kml, |v| v.tilt.map(Value::Number)),
];

fn emit_altitude_mode(element: &mut Element, view: &ViewData, ctx: &RenderContext) -> Result<()> {
    emit_fields(element, view, VIEW_MODE_FIELD, ctx)
}

const VIEW_MODE_FIELD: &[Field<ViewData>] = &[Field::new(
    "altitude_mode",
    "altitudeMode",
    Ns::SeaFloor,
    |v| Some(Value::Mode(v.altitude_mode)),
)];

/// A viewpoint positioned in space, optionally rolled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub object: KmlObject,
    pub view: ViewData,
    pub roll: Option<f64>,
}

/// A viewpoint aimed at a point from a given range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookAt {
    pub object: KmlObject,
    pub view: ViewData,
    pub range: Option<f64>,
}

impl_has_object!(Camera, LookAt);

impl Camera {
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self {
            object: KmlObject::new("Camera"),
            view: ViewData::new(point),
            roll: None,
        }
    }
}

impl LookAt {
    #[must_use]
    pub fn new(point: Point) -> Self {
        Self {
            object: KmlObject::new("LookAt"),
            view: ViewData::new(point),
            range: None,
        }
    }
}

impl Render for Camera {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Camera", ctx) else {
            return Ok(None);
        };
        emit_view_head(&mut element, &self.view, ctx)?;
        if let Some(roll) = self.roll {
            element.push(Element::with_text("roll", fmt_num(roll)));
        }
        emit_altitude_mode(&mut element, &self.view, ctx)?;
        Ok(Some(element))
    }
}

impl Render for LookAt {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "LookAt", ctx) else {
            return Ok(None);
        };
        emit_view_head(&mut element, &self.view, ctx)?;
        if let Some(range) = self.range {
            element.push(Element::with_text("range", fmt_num(range)));
        }
        emit_altitude_mode(&mut element, &self.view, ctx)?;
        Ok(Some(element))
    }
}

/// Either kind of view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AbstractView {
    Camera(Camera),
    LookAt(LookAt),
}

impl AbstractView {
    #[must_use]
    pub fn object(&self) -> &KmlObject {
        match self {
            Self::Camera(v) => &v.object,
            Self::LookAt(v) => &v.object,
        }
    }

    #[must_use]
    pub fn view(&self) -> &ViewData {
        match self {
            Self::Camera(v) => &v.view,
            Self::LookAt(v) => &v.view,
        }
    }

    pub fn view_mut(&mut self) -> &mut ViewData {
        match self {
            Self::Camera(v) => &mut v.view,
            Self::LookAt(v) => &mut v.view,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(self, Self::Camera(_))
    }

    /// The look-at range, `None` for cameras
    #[must_use]
    pub fn range(&self) -> Option<f64> {
        match self {
            Self::Camera(_) => None,
            Self::LookAt(v) => v.range,
        }
    }

    /// Kind name, as emitted
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Camera(_) => "Camera",
            Self::LookAt(_) => "LookAt",
        }
    }
}

impl Render for AbstractView {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        match self {
            Self::Camera(v) => v.render(ctx),
            Self::LookAt(v) => v.render(ctx),
        }
    }
}

impl From<Camera> for AbstractView {
    fn from(v: Camera) -> Self {
        Self::Camera(v)
    }
}

impl From<LookAt> for AbstractView {
    fn from(v: LookAt) -> Self {
        Self::LookAt(v)
    }
}

impl From<Point> for AbstractView {
    fn from(p: Point) -> Self {
        Self::LookAt(LookAt::new(p))
    }
}

/// Plain-number description of a view
///
/// Defaults are zero for every position and angle, `relativeToGround` for
/// the altitude mode, and unset for `roll` and `range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub heading: f64,
    pub tilt: f64,
    pub roll: Option<f64>,
    pub range: Option<f64>,
    pub altitude_mode: AltitudeMode,
    pub extrude: bool,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            longitude: 0.0,
            latitude: 0.0,
            altitude: 0.0,
            heading: 0.0,
            tilt: 0.0,
            roll: None,
            range: None,
            altitude_mode: AltitudeMode::RelativeToGround,
            extrude: false,
        }
    }
}

impl ViewParams {
    /// Build the view: a [`Camera`] when `roll` is set, a [`LookAt`] otherwise
    #[must_use]
    pub fn build(&self) -> AbstractView {
        let mut point =
            Point::with_mode(self.longitude, self.latitude, self.altitude, self.altitude_mode);
        point.extrude = self.extrude;

        let mut view = if let Some(roll) = self.roll {
            if self.range.is_some() {
                log::debug!("both roll and range given; building a Camera and dropping range");
            }
            let mut camera = Camera::new(point);
            camera.roll = Some(roll);
            AbstractView::Camera(camera)
        } else {
            let mut look_at = LookAt::new(point);
            look_at.range = self.range;
            AbstractView::LookAt(look_at)
        };

        let data = view.view_mut();
        data.heading = Some(self.heading);
        data.tilt = Some(self.tilt);
        view
    }
}

/// Shorthand for [`ViewParams::build`]
#[must_use]
pub fn make_view_from(params: &ViewParams) -> AbstractView {
    params.build()
}
