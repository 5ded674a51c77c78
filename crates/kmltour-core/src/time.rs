//! Time primitives

use crate::error::Result;
use crate::object::{impl_has_object, KmlObject};
use crate::render::{emit_fields, open_element, Field, Ns, Render, RenderContext, Value};
use crate::xml::Element;
use serde::Serialize;

/// A single moment in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStamp {
    pub object: KmlObject,
    /// `dateTime` value, passed through verbatim
    pub when: Option<String>,
}

/// An interval between two moments; either end may be open
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub object: KmlObject,
    pub begin: Option<String>,
    pub end: Option<String>,
}

impl_has_object!(TimeStamp, TimeSpan);

impl TimeStamp {
    #[must_use]
    pub fn new(when: impl Into<String>) -> Self {
        Self {
            object: KmlObject::new("TimeStamp"),
            when: Some(when.into()),
        }
    }
}

impl TimeSpan {
    #[must_use]
    pub fn new(begin: Option<String>, end: Option<String>) -> Self {
        Self {
            object: KmlObject::new("TimeSpan"),
            begin,
            end,
        }
    }
}

const TIME_STAMP_FIELDS: &[Field<TimeStamp>] = &[Field::new("when", "when", Ns::Kml, |t| {
    t.when.as_deref().map(Value::text)
})];

const TIME_SPAN_FIELDS: &[Field<TimeSpan>] = &[
    Field::new("begin", "begin", Ns::Kml, |t| t.begin.as_deref().map(Value::text)),
    Field::new("end", "end", Ns::Kml, |t| t.end.as_deref().map(Value::text)),
];

/// Either kind of time primitive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TimePrimitive {
    Stamp(TimeStamp),
    Span(TimeSpan),
}

impl TimePrimitive {
    /// Render under the `gx:` prefix, as required inside an abstract view
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible to match [`Render::render`].
    pub fn render_in_view(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        self.render_named(true, ctx)
    }

    fn render_named(&self, in_view: bool, ctx: &RenderContext) -> Result<Option<Element>> {
        let prefix = if in_view { "gx:" } else { "" };
        match self {
            Self::Stamp(t) => {
                let Some(mut element) = open_element(&t.object, &format!("{prefix}TimeStamp"), ctx)
                else {
                    return Ok(None);
                };
                emit_fields(&mut element, t, TIME_STAMP_FIELDS, ctx)?;
                Ok(Some(element))
            }
            Self::Span(t) => {
                let Some(mut element) = open_element(&t.object, &format!("{prefix}TimeSpan"), ctx)
                else {
                    return Ok(None);
                };
                emit_fields(&mut element, t, TIME_SPAN_FIELDS, ctx)?;
                Ok(Some(element))
            }
        }
    }
}

impl Render for TimePrimitive {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        self.render_named(false, ctx)
    }
}

impl From<TimeStamp> for TimePrimitive {
    fn from(t: TimeStamp) -> Self {
        Self::Stamp(t)
    }
}

impl From<TimeSpan> for TimePrimitive {
    fn from(t: TimeSpan) -> Self {
        Self::Span(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_stamp() {
        let t = TimePrimitive::from(TimeStamp::new("2011-01-01T00:00:00Z"));
        let k = t.render(&RenderContext::new()).unwrap().unwrap();
        assert_eq!(k.name, "TimeStamp");
        assert_eq!(k.child_text("when").as_deref(), Some("2011-01-01T00:00:00Z"));
    }

    #[test]
    fn test_time_span_open_end() {
        let t = TimePrimitive::from(TimeSpan::new(Some("2011".to_string()), None));
        let k = t.render_in_view(&RenderContext::new()).unwrap().unwrap();
        assert_eq!(k.name, "gx:TimeSpan");
        assert_eq!(k.child_text("begin").as_deref(), Some("2011"));
        assert!(k.child("end").is_none());
    }
}
