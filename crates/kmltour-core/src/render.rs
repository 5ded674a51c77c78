//! The render engine shared by every KML entity
//!
//! Each entity kind describes its optional fields with a static table of
//! [`Field`] descriptors. [`emit_fields`] walks a table, skipping fields that
//! were never set, and emits either a text element or the recursive render of
//! a nested entity. [`open_element`] applies the rules common to every
//! object: master-only suppression, the `id` attribute, and the comment.

use crate::error::Result;
use crate::object::KmlObject;
use crate::xml::{Element, Node};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Per-render settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderContext {
    /// Compact form: omit identifiers and fields flagged as non-compact
    pub compact: bool,
    /// Master mode of the owning document; gates `master_only` objects
    pub master_mode: bool,
}

impl RenderContext {
    /// Full-form rendering outside master mode
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            compact: false,
            master_mode: false,
        }
    }

    /// Same context with compact form switched on or off
    #[inline]
    #[must_use]
    pub const fn with_compact(self, compact: bool) -> Self {
        Self { compact, ..self }
    }

    /// Same context with master mode switched on or off
    #[inline]
    #[must_use]
    pub const fn with_master_mode(self, master_mode: bool) -> Self {
        Self {
            master_mode,
            ..self
        }
    }
}

/// Something that renders itself as a KML element
pub trait Render {
    /// Render this entity as a standalone element
    ///
    /// Returns `Ok(None)` when the entity is suppressed, e.g. a master-only
    /// object rendered outside master mode.
    ///
    /// # Errors
    ///
    /// Returns an error when required composite state is missing or styles
    /// are not attached to their owning feature.
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>>;

    /// Render this entity and append it to `parent`
    ///
    /// Suppressed entities leave `parent` untouched.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Render::render`].
    fn render_into(&self, parent: &mut Element, ctx: &RenderContext) -> Result<()> {
        if let Some(element) = self.render(ctx)? {
            parent.push(element);
        }
        Ok(())
    }
}

/// Namespace rule for an emitted element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ns {
    /// Default KML namespace (unprefixed)
    Kml,
    /// Google extension namespace (`gx:`)
    Gx,
    /// Atom namespace (`atom:`)
    Atom,
    /// xAL address namespace (`xal:`)
    Xal,
    /// `gx:` when the value is a sea-floor altitude mode, unprefixed otherwise
    SeaFloor,
}

/// Altitude modes understood by the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AltitudeMode {
    /// Altitude relative to sea level
    Absolute,
    /// Altitude ignored, feature drawn on the terrain
    #[default]
    ClampToGround,
    /// Altitude relative to the terrain surface
    RelativeToGround,
    /// Altitude ignored, feature drawn on the sea floor
    ClampToSeaFloor,
    /// Altitude relative to the sea floor
    RelativeToSeaFloor,
}

impl AltitudeMode {
    /// KML spelling of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::ClampToGround => "clampToGround",
            Self::RelativeToGround => "relativeToGround",
            Self::ClampToSeaFloor => "clampToSeaFloor",
            Self::RelativeToSeaFloor => "relativeToSeaFloor",
        }
    }

    /// Whether the mode belongs to the `gx:` sea-floor family
    #[inline]
    #[must_use]
    pub const fn is_sea_floor(self) -> bool {
        matches!(self, Self::ClampToSeaFloor | Self::RelativeToSeaFloor)
    }

    /// Qualified element name for an `altitudeMode` field carrying this mode
    #[inline]
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        if self.is_sea_floor() {
            "gx:altitudeMode"
        } else {
            "altitudeMode"
        }
    }
}

impl fmt::Display for AltitudeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AltitudeMode {
    type Err = crate::error::KmlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "absolute" => Ok(Self::Absolute),
            "clampToGround" => Ok(Self::ClampToGround),
            "relativeToGround" => Ok(Self::RelativeToGround),
            "clampToSeaFloor" => Ok(Self::ClampToSeaFloor),
            "relativeToSeaFloor" => Ok(Self::RelativeToSeaFloor),
            other => Err(crate::error::KmlError::InvalidValue(format!(
                "unknown altitude mode {other:?}"
            ))),
        }
    }
}

/// The value of one field for one render
pub enum Value<'a> {
    /// Plain text
    Text(Cow<'a, str>),
    /// Floating-point number
    Number(f64),
    /// Integer
    Int(i64),
    /// Boolean, emitted as `0`/`1`
    Bool(bool),
    /// Altitude mode; selects the namespace under [`Ns::SeaFloor`]
    Mode(AltitudeMode),
    /// Nested entity rendered recursively into the current element
    Nested(&'a dyn Render),
    /// Pre-built element appended as is
    Element(Element),
}

impl<'a> Value<'a> {
    /// Borrowed text value
    #[inline]
    #[must_use]
    pub fn text(s: &'a str) -> Self {
        Self::Text(Cow::Borrowed(s))
    }
}

/// Declarative descriptor of one optional field
pub struct Field<T: ?Sized> {
    /// Field name, used for tracing
    pub name: &'static str,
    /// Unqualified element name
    pub element: &'static str,
    /// Namespace rule
    pub ns: Ns,
    /// Whether the field is kept in compact form
    pub compact: bool,
    /// Extracts the value; `None` means the field was never set
    pub value: fn(&T) -> Option<Value<'_>>,
}

impl<T: ?Sized> Field<T> {
    /// Descriptor for a field kept in both full and compact form
    #[must_use]
    pub const fn new(
        name: &'static str,
        element: &'static str,
        ns: Ns,
        value: fn(&T) -> Option<Value<'_>>,
    ) -> Self {
        Self {
            name,
            element,
            ns,
            compact: true,
            value,
        }
    }

    /// Descriptor for a field dropped in compact form
    #[must_use]
    pub const fn full_only(
        name: &'static str,
        element: &'static str,
        ns: Ns,
        value: fn(&T) -> Option<Value<'_>>,
    ) -> Self {
        Self {
            name,
            element,
            ns,
            compact: false,
            value,
        }
    }
}

/// Format a number the way KML consumers expect (`500`, `12.4`)
#[inline]
#[must_use]
pub fn fmt_num(n: f64) -> String {
    format!("{n}")
}

/// Format a boolean as `0`/`1`
#[inline]
#[must_use]
pub const fn fmt_bool(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// Qualified element name under a namespace rule
#[must_use]
pub fn qualify(element: &str, ns: Ns, mode: Option<AltitudeMode>) -> String {
    let prefix = match ns {
        Ns::Kml => "",
        Ns::Gx => "gx:",
        Ns::Atom => "atom:",
        Ns::Xal => "xal:",
        Ns::SeaFloor => {
            if mode.is_some_and(AltitudeMode::is_sea_floor) {
                "gx:"
            } else {
                ""
            }
        }
    };
    format!("{prefix}{element}")
}

/// Start the element for an object, or `None` when it is suppressed
///
/// Applies master-only suppression, the `id` attribute (omitted in compact
/// form), and the HTML-escaped comment.
#[must_use]
pub fn open_element(object: &KmlObject, name: &str, ctx: &RenderContext) -> Option<Element> {
    if object.master_only && !ctx.master_mode {
        log::trace!("suppressing master-only {}", object.id());
        return None;
    }
    let mut element = Element::new(name);
    if !ctx.compact {
        element.set_attr("id", object.id());
    }
    if let Some(comment) = &object.comment {
        element.push_node(Node::Comment(
            quick_xml::escape::escape(comment.as_str()).into_owned(),
        ));
    }
    Some(element)
}

/// Emit every set field of `table` into `element`
///
/// # Errors
///
/// Propagates render errors from nested entities.
pub fn emit_fields<T: ?Sized>(
    element: &mut Element,
    item: &T,
    table: &[Field<T>],
    ctx: &RenderContext,
) -> Result<()> {
    for field in table {
        if ctx.compact && !field.compact {
            continue;
        }
        let Some(value) = (field.value)(item) else {
            continue;
        };
        log::trace!("emitting field {}", field.name);
        let text = match value {
            Value::Nested(nested) => {
                nested.render_into(element, ctx)?;
                continue;
            }
            Value::Element(prebuilt) => {
                element.push(prebuilt);
                continue;
            }
            Value::Mode(mode) => {
                element.push(Element::with_text(
                    qualify(field.element, field.ns, Some(mode)),
                    mode.as_str(),
                ));
                continue;
            }
            Value::Text(t) => t.into_owned(),
            Value::Number(n) => fmt_num(n),
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => fmt_bool(b).to_string(),
        };
        element.push(Element::with_text(qualify(field.element, field.ns, None), text));
    }
    Ok(())
}
