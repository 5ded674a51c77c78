//! Features: the named, stylable entities placed in the scene tree
//!
//! Every feature kind embeds a [`FeatureData`] holding the fields KML defines
//! on `AbstractFeatureGroup`. Fields are emitted in schema order; owned style
//! selectors must be attached to the feature rendering them.

use crate::error::{KmlError, Result};
use crate::geometry::{Geometry, Point};
use crate::object::{HasObject, KmlObject};
use crate::overlay::{GroundOverlay, PhotoOverlay, ScreenOverlay};
use crate::region::Region;
use crate::render::{emit_fields, open_element, Field, Ns, Render, RenderContext, Value};
use crate::style::StyleSelector;
use crate::time::TimePrimitive;
use crate::view::AbstractView;
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// Short description shown in list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub max_lines: Option<u32>,
}

impl Snippet {
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::with_text("Snippet", self.text.as_str());
        if let Some(max) = self.max_lines {
            element.set_attr("maxLines", max.to_string());
        }
        element
    }
}

/// One untyped `ExtendedData` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    pub name: String,
    pub value: String,
    pub display_name: Option<String>,
}

impl Data {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("Data").attr("name", self.name.as_str());
        if let Some(display) = &self.display_name {
            element.push(Element::with_text("displayName", display.as_str()));
        }
        element.push(Element::with_text("value", self.value.as_str()));
        element
    }
}

/// Fields shared by every feature kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureData {
    pub object: KmlObject,
    pub name: Option<String>,
    pub visibility: Option<bool>,
    pub open: Option<bool>,
    pub atom_author: Option<String>,
    pub atom_link: Option<String>,
    pub address: Option<String>,
    pub address_details: Option<String>,
    pub phone_number: Option<String>,
    pub snippet: Option<Snippet>,
    pub description: Option<String>,
    pub abstract_view: Option<AbstractView>,
    pub time_primitive: Option<TimePrimitive>,
    pub style_url: Option<String>,
    style_selector: Option<StyleSelector>,
    styles: Vec<StyleSelector>,
    pub region: Option<Region>,
    pub metadata: Option<String>,
    pub extended_data: Vec<Data>,
}

impl FeatureData {
    /// Empty feature data for an entity of the given kind
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            object: KmlObject::new(kind),
            name: None,
            visibility: None,
            open: None,
            atom_author: None,
            atom_link: None,
            address: None,
            address_details: None,
            phone_number: None,
            snippet: None,
            description: None,
            abstract_view: None,
            time_primitive: None,
            style_url: None,
            style_selector: None,
            styles: Vec::new(),
            region: None,
            metadata: None,
            extended_data: Vec::new(),
        }
    }

    /// The feature's identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        self.object.id()
    }

    /// Make the feature visible
    pub fn show(&mut self) {
        self.visibility = Some(true);
    }

    /// Make the feature invisible
    pub fn hide(&mut self) {
        self.visibility = Some(false);
    }

    /// Set the snippet text and line limit
    pub fn set_snippet(&mut self, text: impl Into<String>, max_lines: Option<u32>) {
        self.snippet = Some(Snippet {
            text: text.into(),
            max_lines,
        });
    }

    /// Point `styleUrl` at an object in the same document (`#id`)
    pub fn set_style_url_to(&mut self, target: &impl HasObject) {
        self.style_url = Some(format!("#{}", target.kml_id()));
    }

    /// Attach and own a style selector
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::StyleAttachment`] if the selector already belongs
    /// to a feature.
    pub fn add_style(&mut self, style: impl Into<StyleSelector>) -> Result<()> {
        let mut style = style.into();
        style.attach(self.object.id())?;
        self.styles.push(style);
        Ok(())
    }

    /// Attach and set the inline style selector
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::StyleAttachment`] if the selector already belongs
    /// to a feature.
    pub fn set_style_selector(&mut self, style: impl Into<StyleSelector>) -> Result<()> {
        let mut style = style.into();
        style.attach(self.object.id())?;
        self.style_selector = Some(style);
        Ok(())
    }

    #[must_use]
    pub fn style_selector(&self) -> Option<&StyleSelector> {
        self.style_selector.as_ref()
    }

    /// Owned style selectors, in insertion order
    #[must_use]
    pub fn styles(&self) -> &[StyleSelector] {
        &self.styles
    }

    /// Mutable access to owned styles; newly pushed selectors must already
    /// be attached to this feature or rendering fails
    pub fn styles_mut(&mut self) -> &mut Vec<StyleSelector> {
        &mut self.styles
    }

    /// Emit every set feature field into `element`
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::StyleAttachment`] if an owned selector is attached
    /// to another feature, and propagates nested render errors.
    pub fn emit(&self, element: &mut Element, ctx: &RenderContext) -> Result<()> {
        emit_fields(element, self, FEATURE_HEAD_FIELDS, ctx)?;
        let owner = self.object.id();
        for style in self.style_selector.iter().chain(&self.styles) {
            if let Some(rendered) = style.render_for(owner, ctx)? {
                element.push(rendered);
            }
        }
        emit_fields(element, self, FEATURE_TAIL_FIELDS, ctx)
    }
}

impl HasObject for FeatureData {
    fn object(&self) -> &KmlObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut KmlObject {
        &mut self.object
    }
}

const FEATURE_HEAD_FIELDS: &[Field<FeatureData>] = &[
    Field::new("name", "name", Ns::Kml, |f| f.name.as_deref().map(Value::text)),
    Field::new("visibility", "visibility", Ns::Kml, |f| f.visibility.map(Value::Bool)),
    Field::new("open", "open", Ns::Kml, |f| f.open.map(Value::Bool)),
    Field::new("atom_author", "author", Ns::Atom, |f| {
        f.atom_author.as_deref().map(|name| {
            let mut author = Element::new("atom:author");
            author.push(Element::with_text("atom:name", name));
            Value::Element(author)
        })
    }),
    Field::new("atom_link", "link", Ns::Atom, |f| {
        f.atom_link
            .as_deref()
            .map(|href| Value::Element(Element::new("atom:link").attr("href", href)))
    }),
    Field::new("address", "address", Ns::Kml, |f| f.address.as_deref().map(Value::text)),
    Field::new("address_details", "AddressDetails", Ns::Xal, |f| {
        f.address_details.as_deref().map(Value::text)
    }),
    Field::new("phone_number", "phoneNumber", Ns::Kml, |f| {
        f.phone_number.as_deref().map(Value::text)
    }),
    Field::new("snippet", "Snippet", Ns::Kml, |f| {
        f.snippet.as_ref().map(|s| Value::Element(s.to_element()))
    }),
    Field::new("description", "description", Ns::Kml, |f| {
        f.description.as_deref().map(Value::text)
    }),
    Field::new("abstract_view", "AbstractView", Ns::Kml, |f| {
        f.abstract_view.as_ref().map(|v| Value::Nested(v))
    }),
    Field::new("time_primitive", "TimePrimitive", Ns::Kml, |f| {
        f.time_primitive.as_ref().map(|t| Value::Nested(t))
    }),
    Field::new("style_url", "styleUrl", Ns::Kml, |f| f.style_url.as_deref().map(Value::text)),
];

const FEATURE_TAIL_FIELDS: &[Field<FeatureData>] = &[
    Field::new("region", "Region", Ns::Kml, |f| f.region.as_ref().map(|r| Value::Nested(r))),
    Field::new("metadata", "Metadata", Ns::Kml, |f| f.metadata.as_deref().map(Value::text)),
    Field::new("extended_data", "ExtendedData", Ns::Kml, |f| {
        if f.extended_data.is_empty() {
            return None;
        }
        let mut element = Element::new("ExtendedData");
        for data in &f.extended_data {
            element.push(data.to_element());
        }
        Some(Value::Element(element))
    }),
];

/// Access to the [`FeatureData`] embedded in a feature kind
pub trait HasFeature {
    fn feature(&self) -> &FeatureData;
    fn feature_mut(&mut self) -> &mut FeatureData;
}

/// Implement [`HasObject`] and [`HasFeature`] for structs with a
/// `feature: FeatureData` field
macro_rules! impl_has_feature {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::feature::HasFeature for $ty {
                #[inline]
                fn feature(&self) -> &$crate::feature::FeatureData {
                    &self.feature
                }

                #[inline]
                fn feature_mut(&mut self) -> &mut $crate::feature::FeatureData {
                    &mut self.feature
                }
            }

            impl $crate::object::HasObject for $ty {
                #[inline]
                fn object(&self) -> &$crate::object::KmlObject {
                    &self.feature.object
                }

                #[inline]
                fn object_mut(&mut self) -> &mut $crate::object::KmlObject {
                    &mut self.feature.object
                }
            }
        )+
    };
}

pub(crate) use impl_has_feature;

/// Common placemark settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacemarkOptions {
    pub name: Option<String>,
    pub description: Option<String>,
    pub style_url: Option<String>,
    pub visibility: Option<bool>,
    pub snippet: Option<String>,
}

/// A feature wrapping one geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placemark {
    pub feature: FeatureData,
    pub geometry: Option<Geometry>,
}

impl_has_feature!(Placemark);

impl Placemark {
    #[must_use]
    pub fn new(name: Option<String>, geometry: Option<Geometry>) -> Self {
        let mut feature = FeatureData::new("Placemark");
        feature.name = name;
        Self { feature, geometry }
    }

    /// Placemark built from a geometry and option struct
    #[must_use]
    pub fn with_options(geometry: impl Into<Geometry>, options: PlacemarkOptions) -> Self {
        let mut placemark = Self::new(options.name, Some(geometry.into()));
        let feature = &mut placemark.feature;
        feature.description = options.description;
        feature.style_url = options.style_url;
        feature.visibility = options.visibility;
        if let Some(text) = options.snippet {
            feature.set_snippet(text, None);
        }
        placemark
    }

    /// The placemark's geometry as a point
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::InvalidCapability`] if the geometry is missing or
    /// is not a point.
    pub fn point(&self) -> Result<&Point> {
        match &self.geometry {
            Some(Geometry::Point(p)) => Ok(p),
            Some(other) => Err(KmlError::InvalidCapability(format!(
                "placemark {} wraps a {}, not a Point",
                self.feature.id(),
                other.kind()
            ))),
            None => Err(KmlError::InvalidCapability(format!(
                "placemark {} has no geometry",
                self.feature.id()
            ))),
        }
    }
}

impl Render for Placemark {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.feature.object, "Placemark", ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, ctx)?;
        if let Some(geometry) = &self.geometry {
            geometry.render_into(&mut element, ctx)?;
        }
        Ok(Some(element))
    }
}

/// A container of child features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub feature: FeatureData,
    /// Children in insertion order
    pub children: Vec<Feature>,
}

impl_has_feature!(Folder);

impl Folder {
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        let mut feature = FeatureData::new("Folder");
        feature.name = name;
        Self {
            feature,
            children: Vec::new(),
        }
    }

    /// Append a child feature, returning its index
    pub fn push(&mut self, child: impl Into<Feature>) -> usize {
        self.children.push(child.into());
        self.children.len() - 1
    }
}

/// Render `children` in order into `element`
pub(crate) fn render_children(
    element: &mut Element,
    children: &[Feature],
    ctx: &RenderContext,
) -> Result<()> {
    for child in children {
        child.render_into(element, ctx)?;
    }
    Ok(())
}

impl Render for Folder {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.feature.object, "Folder", ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, ctx)?;
        render_children(&mut element, &self.children, ctx)?;
        Ok(Some(element))
    }
}

/// Any feature that can live in a container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Feature {
    Placemark(Placemark),
    Folder(Folder),
    ScreenOverlay(ScreenOverlay),
    GroundOverlay(GroundOverlay),
    PhotoOverlay(PhotoOverlay),
}

impl Feature {
    #[must_use]
    pub fn data(&self) -> &FeatureData {
        match self {
            Self::Placemark(f) => &f.feature,
            Self::Folder(f) => &f.feature,
            Self::ScreenOverlay(f) => &f.feature,
            Self::GroundOverlay(f) => &f.feature,
            Self::PhotoOverlay(f) => &f.feature,
        }
    }

    pub fn data_mut(&mut self) -> &mut FeatureData {
        match self {
            Self::Placemark(f) => &mut f.feature,
            Self::Folder(f) => &mut f.feature,
            Self::ScreenOverlay(f) => &mut f.feature,
            Self::GroundOverlay(f) => &mut f.feature,
            Self::PhotoOverlay(f) => &mut f.feature,
        }
    }

    /// Kind name, as emitted
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Placemark(_) => "Placemark",
            Self::Folder(_) => "Folder",
            Self::ScreenOverlay(_) => "ScreenOverlay",
            Self::GroundOverlay(_) => "GroundOverlay",
            Self::PhotoOverlay(_) => "PhotoOverlay",
        }
    }

    #[must_use]
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(f) => Some(f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_placemark(&self) -> Option<&Placemark> {
        match self {
            Self::Placemark(p) => Some(p),
            _ => None,
        }
    }
}

impl HasObject for Feature {
    fn object(&self) -> &KmlObject {
        &self.data().object
    }

    fn object_mut(&mut self) -> &mut KmlObject {
        &mut self.data_mut().object
    }
}

impl Render for Feature {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        match self {
            Self::Placemark(f) => f.render(ctx),
            Self::Folder(f) => f.render(ctx),
            Self::ScreenOverlay(f) => f.render(ctx),
            Self::GroundOverlay(f) => f.render(ctx),
            Self::PhotoOverlay(f) => f.render(ctx),
        }
    }
}

impl From<Placemark> for Feature {
    fn from(f: Placemark) -> Self {
        Self::Placemark(f)
    }
}

impl From<Folder> for Feature {
    fn from(f: Folder) -> Self {
        Self::Folder(f)
    }
}

impl From<ScreenOverlay> for Feature {
    fn from(f: ScreenOverlay) -> Self {
        Self::ScreenOverlay(f)
    }
}

impl From<GroundOverlay> for Feature {
    fn from(f: GroundOverlay) -> Self {
        Self::GroundOverlay(f)
    }
}

impl From<PhotoOverlay> for Feature {
    fn from(f: PhotoOverlay) -> Self {
        Self::PhotoOverlay(f)
    }
}
