//! Style family: color styles, `Style` bundles, and `StyleMap`s
//!
//! A style selector is attached to exactly one feature. Features attach the
//! selectors they own and refuse to render any selector attached elsewhere.

use crate::enums::{ColorMode, DisplayMode, ItemIconState, ListItemType};
use crate::error::{KmlError, Result};
use crate::object::{impl_has_object, KmlObject};
use crate::overlay::XY;
use crate::render::{emit_fields, open_element, Field, Ns, Render, RenderContext, Value};
use crate::xml::Element;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An RGBA color
///
/// Emitted and parsed in the `aabbggrr` hex order KML uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub alpha: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff, 0xff);
    /// Fully transparent white
    pub const TRANSPARENT: Self = Self::new(0x00, 0xff, 0xff, 0xff);

    #[must_use]
    pub const fn new(alpha: u8, blue: u8, green: u8, red: u8) -> Self {
        Self {
            alpha,
            blue,
            green,
            red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}",
            self.alpha, self.blue, self.green, self.red
        )
    }
}

impl FromStr for Color {
    type Err = KmlError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 8 || !s.is_ascii() {
            return Err(KmlError::InvalidValue(format!(
                "color must be eight hex digits (aabbggrr), got {s:?}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| KmlError::InvalidValue(format!("invalid hex in color {s:?}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?))
    }
}

/// Color and color mode shared by every color style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorData {
    pub color: Option<Color>,
    pub color_mode: Option<ColorMode>,
}

const COLOR_FIELDS: &[Field<ColorData>] = &[
    Field::new("color", "color", Ns::Kml, |c| {
        c.color.map(|c| Value::Text(Cow::Owned(c.to_string())))
    }),
    Field::new("color_mode", "colorMode", Ns::Kml, |c| {
        c.color_mode.map(|m| Value::text(m.as_str()))
    }),
];

fn color_text(color: Option<Color>) -> Option<Value<'static>> {
    color.map(|c| Value::Text(Cow::Owned(c.to_string())))
}

/// Icon appearance for point placemarks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconStyle {
    pub object: KmlObject,
    pub colors: ColorData,
    pub scale: Option<f64>,
    pub heading: Option<f64>,
    /// Icon image; rendered as `<Icon><href>…</href></Icon>`
    pub href: Option<String>,
    pub hot_spot: Option<XY>,
}

impl IconStyle {
    #[must_use]
    pub fn new(href: Option<String>) -> Self {
        Self {
            object: KmlObject::new("IconStyle"),
            colors: ColorData::default(),
            scale: None,
            heading: None,
            href,
            hot_spot: None,
        }
    }
}

const ICON_STYLE_FIELDS: &[Field<IconStyle>] = &[
    Field::new("scale", "scale", Ns::Kml, |s| s.scale.map(Value::Number)),
    Field::new("heading", "heading", Ns::Kml, |s| s.heading.map(Value::Number)),
    Field::new("href", "Icon", Ns::Kml, |s| {
        s.href.as_deref().map(|href| {
            let mut icon = Element::new("Icon");
            icon.push(Element::with_text("href", href));
            Value::Element(icon)
        })
    }),
    Field::new("hot_spot", "hotSpot", Ns::Kml, |s| {
        s.hot_spot.map(|xy| Value::Element(xy.to_element("hotSpot")))
    }),
];

/// Label appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStyle {
    pub object: KmlObject,
    pub colors: ColorData,
    pub scale: Option<f64>,
}

impl LabelStyle {
    #[must_use]
    pub fn new(scale: Option<f64>) -> Self {
        Self {
            object: KmlObject::new("LabelStyle"),
            colors: ColorData::default(),
            scale,
        }
    }
}

const LABEL_STYLE_FIELDS: &[Field<LabelStyle>] =
    &[Field::new("scale", "scale", Ns::Kml, |s| s.scale.map(Value::Number))];

/// Line appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub object: KmlObject,
    pub colors: ColorData,
    pub width: Option<f64>,
    pub outer_color: Option<Color>,
    pub outer_width: Option<f64>,
    pub physical_width: Option<f64>,
    pub label_visibility: Option<bool>,
}

impl LineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("LineStyle"),
            colors: ColorData::default(),
            width: None,
            outer_color: None,
            outer_width: None,
            physical_width: None,
            label_visibility: None,
        }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::new()
    }
}

const LINE_STYLE_FIELDS: &[Field<LineStyle>] = &[
    Field::new("width", "width", Ns::Kml, |s| s.width.map(Value::Number)),
    Field::new("outer_color", "outerColor", Ns::Gx, |s| color_text(s.outer_color)),
    Field::new("outer_width", "outerWidth", Ns::Gx, |s| s.outer_width.map(Value::Number)),
    Field::new("physical_width", "physicalWidth", Ns::Gx, |s| {
        s.physical_width.map(Value::Number)
    }),
    Field::new("label_visibility", "labelVisibility", Ns::Gx, |s| {
        s.label_visibility.map(Value::Bool)
    }),
];

/// Polygon appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolyStyle {
    pub object: KmlObject,
    pub colors: ColorData,
    pub fill: Option<bool>,
    pub outline: Option<bool>,
}

impl PolyStyle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("PolyStyle"),
            colors: ColorData::default(),
            fill: None,
            outline: None,
        }
    }
}

impl Default for PolyStyle {
    fn default() -> Self {
        Self::new()
    }
}

const POLY_STYLE_FIELDS: &[Field<PolyStyle>] = &[
    Field::new("fill", "fill", Ns::Kml, |s| s.fill.map(Value::Bool)),
    Field::new("outline", "outline", Ns::Kml, |s| s.outline.map(Value::Bool)),
];

/// Balloon appearance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalloonStyle {
    pub object: KmlObject,
    pub bg_color: Option<Color>,
    pub text_color: Option<Color>,
    pub text: Option<String>,
    pub display_mode: Option<DisplayMode>,
}

impl BalloonStyle {
    #[must_use]
    pub fn new(text: Option<String>) -> Self {
        Self {
            object: KmlObject::new("BalloonStyle"),
            bg_color: None,
            text_color: None,
            text,
            display_mode: None,
        }
    }
}

const BALLOON_STYLE_FIELDS: &[Field<BalloonStyle>] = &[
    Field::new("bg_color", "bgColor", Ns::Kml, |s| color_text(s.bg_color)),
    Field::new("text_color", "textColor", Ns::Kml, |s| color_text(s.text_color)),
    Field::new("text", "text", Ns::Kml, |s| s.text.as_deref().map(Value::text)),
    Field::new("display_mode", "displayMode", Ns::Kml, |s| {
        s.display_mode.map(|m| Value::text(m.as_str()))
    }),
];

/// List-view appearance of a feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStyle {
    pub object: KmlObject,
    pub list_item_type: Option<ListItemType>,
    pub bg_color: Option<Color>,
    /// `ItemIcon` state
    pub state: Option<ItemIconState>,
    /// `ItemIcon` image
    pub href: Option<String>,
}

impl ListStyle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("ListStyle"),
            list_item_type: None,
            bg_color: None,
            state: None,
            href: None,
        }
    }

    fn item_icon(&self) -> Option<Element> {
        if self.state.is_none() && self.href.is_none() {
            return None;
        }
        let mut icon = Element::new("ItemIcon");
        if let Some(state) = self.state {
            icon.push(Element::with_text("state", state.as_str()));
        }
        if let Some(href) = &self.href {
            icon.push(Element::with_text("href", href.as_str()));
        }
        Some(icon)
    }
}

impl Default for ListStyle {
    fn default() -> Self {
        Self::new()
    }
}

const LIST_STYLE_FIELDS: &[Field<ListStyle>] = &[
    Field::new("list_item_type", "listItemType", Ns::Kml, |s| {
        s.list_item_type.map(|t| Value::text(t.as_str()))
    }),
    Field::new("bg_color", "bgColor", Ns::Kml, |s| color_text(s.bg_color)),
    Field::new("item_icon", "ItemIcon", Ns::Kml, |s| s.item_icon().map(Value::Element)),
];

impl_has_object!(IconStyle, LabelStyle, LineStyle, PolyStyle, BalloonStyle, ListStyle);

macro_rules! impl_color_style_render {
    ($($ty:ident => $table:ident),+ $(,)?) => {
        $(
            impl Render for $ty {
                fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
                    let Some(mut element) = open_element(&self.object, stringify!($ty), ctx) else {
                        return Ok(None);
                    };
                    emit_fields(&mut element, &self.colors, COLOR_FIELDS, ctx)?;
                    emit_fields(&mut element, self, $table, ctx)?;
                    Ok(Some(element))
                }
            }
        )+
    };
}

impl_color_style_render!(
    IconStyle => ICON_STYLE_FIELDS,
    LabelStyle => LABEL_STYLE_FIELDS,
    LineStyle => LINE_STYLE_FIELDS,
    PolyStyle => POLY_STYLE_FIELDS,
);

impl Render for BalloonStyle {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "BalloonStyle", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, BALLOON_STYLE_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

impl Render for ListStyle {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "ListStyle", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, LIST_STYLE_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// A bundle of up to six sub-styles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub object: KmlObject,
    pub icon: Option<IconStyle>,
    pub label: Option<LabelStyle>,
    pub line: Option<LineStyle>,
    pub poly: Option<PolyStyle>,
    pub balloon: Option<BalloonStyle>,
    pub list: Option<ListStyle>,
    attached_to: Option<String>,
}

impl_has_object!(Style);

impl Style {
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("Style"),
            icon: None,
            label: None,
            line: None,
            poly: None,
            balloon: None,
            list: None,
            attached_to: None,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new()
    }
}

const STYLE_FIELDS: &[Field<Style>] = &[
    Field::new("icon", "IconStyle", Ns::Kml, |s| s.icon.as_ref().map(|x| Value::Nested(x))),
    Field::new("label", "LabelStyle", Ns::Kml, |s| s.label.as_ref().map(|x| Value::Nested(x))),
    Field::new("line", "LineStyle", Ns::Kml, |s| s.line.as_ref().map(|x| Value::Nested(x))),
    Field::new("poly", "PolyStyle", Ns::Kml, |s| s.poly.as_ref().map(|x| Value::Nested(x))),
    Field::new("balloon", "BalloonStyle", Ns::Kml, |s| {
        s.balloon.as_ref().map(|x| Value::Nested(x))
    }),
    Field::new("list", "ListStyle", Ns::Kml, |s| s.list.as_ref().map(|x| Value::Nested(x))),
];

impl Render for Style {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "Style", ctx) else {
            return Ok(None);
        };
        emit_fields(&mut element, self, STYLE_FIELDS, ctx)?;
        Ok(Some(element))
    }
}

/// Target of one `StyleMap` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StyleRef {
    /// Inline style
    Style(Style),
    /// Reference rendered as `styleUrl`
    Url(String),
}

impl From<Style> for StyleRef {
    fn from(s: Style) -> Self {
        Self::Style(s)
    }
}

impl From<&str> for StyleRef {
    fn from(s: &str) -> Self {
        Self::Url(s.to_string())
    }
}

impl From<String> for StyleRef {
    fn from(s: String) -> Self {
        Self::Url(s)
    }
}

/// Maps feature states (`normal`, `highlight`) to styles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleMap {
    pub object: KmlObject,
    /// Pairs in insertion order
    pub pairs: Vec<(String, StyleRef)>,
    attached_to: Option<String>,
}

impl_has_object!(StyleMap);

impl StyleMap {
    #[must_use]
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<StyleRef>,
    {
        let mut map = Self {
            object: KmlObject::new("StyleMap"),
            pairs: Vec::new(),
            attached_to: None,
        };
        map.merge(pairs);
        map
    }

    /// Add pairs, replacing the target of keys already present
    pub fn merge<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<StyleRef>,
    {
        for (key, target) in pairs {
            let key = key.into();
            let target = target.into();
            match self.pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = target,
                None => self.pairs.push((key, target)),
            }
        }
    }

    /// Target for a state key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleRef> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl Render for StyleMap {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "StyleMap", ctx) else {
            return Ok(None);
        };
        for (key, target) in &self.pairs {
            let mut pair = Element::new("Pair");
            pair.push(Element::with_text("key", key.as_str()));
            match target {
                StyleRef::Style(style) => style.render_into(&mut pair, ctx)?,
                StyleRef::Url(url) => pair.push(Element::with_text("styleUrl", url.as_str())),
            }
            element.push(pair);
        }
        Ok(Some(element))
    }
}

/// A style or style map owned by a feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StyleSelector {
    Style(Style),
    StyleMap(StyleMap),
}

impl StyleSelector {
    #[must_use]
    pub fn object(&self) -> &KmlObject {
        match self {
            Self::Style(s) => &s.object,
            Self::StyleMap(s) => &s.object,
        }
    }

    fn attachment(&mut self) -> &mut Option<String> {
        match self {
            Self::Style(s) => &mut s.attached_to,
            Self::StyleMap(s) => &mut s.attached_to,
        }
    }

    /// Identifier of the owning feature, if attached
    #[must_use]
    pub fn attached_to(&self) -> Option<&str> {
        match self {
            Self::Style(s) => s.attached_to.as_deref(),
            Self::StyleMap(s) => s.attached_to.as_deref(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached_to().is_some()
    }

    /// Record `owner` as the feature this selector belongs to
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::StyleAttachment`] if the selector is already
    /// attached to a feature.
    pub fn attach(&mut self, owner: &str) -> Result<()> {
        let id = self.object().id().to_string();
        let slot = self.attachment();
        if let Some(existing) = slot.as_deref() {
            return Err(KmlError::StyleAttachment(format!(
                "{id} is already attached to {existing}"
            )));
        }
        log::debug!("attaching {id} to {owner}");
        *slot = Some(owner.to_string());
        Ok(())
    }

    /// Render as part of `owner`'s styles
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::StyleAttachment`] unless the selector is attached
    /// to `owner`.
    pub fn render_for(&self, owner: &str, ctx: &RenderContext) -> Result<Option<Element>> {
        match self.attached_to() {
            Some(attached) if attached == owner => self.render(ctx),
            Some(other) => Err(KmlError::StyleAttachment(format!(
                "{} belongs to {other}, not {owner}",
                self.object().id()
            ))),
            None => Err(KmlError::StyleAttachment(format!(
                "{} is rendered by {owner} without being attached",
                self.object().id()
            ))),
        }
    }
}

impl Render for StyleSelector {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        match self {
            Self::Style(s) => s.render(ctx),
            Self::StyleMap(s) => s.render(ctx),
        }
    }
}

impl From<Style> for StyleSelector {
    fn from(s: Style) -> Self {
        Self::Style(s)
    }
}

impl From<StyleMap> for StyleSelector {
    fn from(s: StyleMap) -> Self {
        Self::StyleMap(s)
    }
}
