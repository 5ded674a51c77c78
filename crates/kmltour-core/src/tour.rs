//! Tours and the timed primitives that make up a playlist

use crate::enums::FlyToMode;
use crate::error::Result;
use crate::object::{impl_has_object, KmlObject};
use crate::render::{
    emit_fields, fmt_num, open_element, Field, Ns, Render, RenderContext, Value,
};
use crate::view::AbstractView;
use crate::xml::{parse_fragment, Element, Node};
use serde::{Deserialize, Serialize};

/// Fly the camera to a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlyTo {
    pub object: KmlObject,
    pub view: Option<AbstractView>,
    pub duration: Option<f64>,
    pub mode: Option<FlyToMode>,
}

impl FlyTo {
    #[must_use]
    pub fn new(view: impl Into<AbstractView>) -> Self {
        Self {
            object: KmlObject::new("FlyTo"),
            view: Some(view.into()),
            duration: None,
            mode: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: FlyToMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

const FLY_TO_FIELDS: &[Field<FlyTo>] = &[
    Field::new("duration", "duration", Ns::Gx, |f| f.duration.map(Value::Number)),
    Field::new("mode", "flyToMode", Ns::Gx, |f| f.mode.map(|m| Value::text(m.as_str()))),
    Field::new("view", "AbstractView", Ns::Kml, |f| f.view.as_ref().map(|v| Value::Nested(v))),
];

/// Pause the tour for a number of seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wait {
    pub object: KmlObject,
    pub duration: f64,
}

impl Wait {
    #[must_use]
    pub fn new(duration: f64) -> Self {
        Self {
            object: KmlObject::new("Wait"),
            duration,
        }
    }
}

/// Pause playback until the user resumes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourControl {
    pub object: KmlObject,
}

impl TourControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            object: KmlObject::new("TourControl"),
        }
    }
}

impl Default for TourControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Play a sound file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundCue {
    pub object: KmlObject,
    pub href: String,
    pub delayed_start: Option<f64>,
}

impl SoundCue {
    #[must_use]
    pub fn new(href: impl Into<String>, delayed_start: Option<f64>) -> Self {
        Self {
            object: KmlObject::new("SoundCue"),
            href: href.into(),
            delayed_start,
        }
    }
}

/// Settings for an [`AnimatedUpdate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatedUpdateOptions {
    /// Seconds over which the change is animated
    pub duration: f64,
    /// `targetHref` of the update; empty targets the current document
    pub target: Option<String>,
    pub delayed_start: Option<f64>,
}

/// Apply `Change`/`Create`/`Delete` fragments during a tour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimatedUpdate {
    pub object: KmlObject,
    pub duration: f64,
    pub target: Option<String>,
    pub delayed_start: Option<f64>,
    #[serde(skip)]
    updates: Vec<Node>,
}

impl AnimatedUpdate {
    /// Update with no fragments yet
    #[must_use]
    pub fn new(options: AnimatedUpdateOptions) -> Self {
        Self {
            object: KmlObject::new("AnimatedUpdate"),
            duration: options.duration,
            target: options.target,
            delayed_start: options.delayed_start,
            updates: Vec::new(),
        }
    }

    /// Update built from raw fragments
    ///
    /// # Errors
    ///
    /// Returns [`crate::KmlError::Xml`] if any fragment is not well formed.
    pub fn from_fragments<S: AsRef<str>>(
        fragments: impl IntoIterator<Item = S>,
        options: AnimatedUpdateOptions,
    ) -> Result<Self> {
        let mut update = Self::new(options);
        for fragment in fragments {
            update.push(fragment.as_ref())?;
        }
        Ok(update)
    }

    /// Parse and append a raw change fragment
    ///
    /// # Errors
    ///
    /// Returns [`crate::KmlError::Xml`] if the fragment is not well formed.
    pub fn push(&mut self, fragment: &str) -> Result<()> {
        let nodes = parse_fragment(fragment)?;
        log::trace!("animated update {} gained {} node(s)", self.object.id(), nodes.len());
        self.updates.extend(nodes);
        Ok(())
    }

    /// Append an already-built change element
    pub fn push_element(&mut self, change: Element) {
        self.updates.push(Node::Element(change));
    }

    /// Parsed update nodes, in insertion order
    #[must_use]
    pub fn updates(&self) -> &[Node] {
        &self.updates
    }
}

impl_has_object!(FlyTo, Wait, TourControl, SoundCue, AnimatedUpdate);

/// One step of a tour playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TourPrimitive {
    FlyTo(FlyTo),
    Wait(Wait),
    TourControl(TourControl),
    SoundCue(SoundCue),
    AnimatedUpdate(AnimatedUpdate),
}

impl TourPrimitive {
    #[must_use]
    pub fn object(&self) -> &KmlObject {
        match self {
            Self::FlyTo(p) => &p.object,
            Self::Wait(p) => &p.object,
            Self::TourControl(p) => &p.object,
            Self::SoundCue(p) => &p.object,
            Self::AnimatedUpdate(p) => &p.object,
        }
    }
}

impl Render for TourPrimitive {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        match self {
            Self::FlyTo(p) => {
                let Some(mut element) = open_element(&p.object, "gx:FlyTo", ctx) else {
                    return Ok(None);
                };
                emit_fields(&mut element, p, FLY_TO_FIELDS, ctx)?;
                Ok(Some(element))
            }
            Self::Wait(p) => {
                let Some(mut element) = open_element(&p.object, "gx:Wait", ctx) else {
                    return Ok(None);
                };
                element.push(Element::with_text("gx:duration", fmt_num(p.duration)));
                Ok(Some(element))
            }
            Self::TourControl(p) => {
                let Some(mut element) = open_element(&p.object, "gx:TourControl", ctx) else {
                    return Ok(None);
                };
                element.push(Element::with_text("gx:playMode", "pause"));
                Ok(Some(element))
            }
            Self::SoundCue(p) => {
                let Some(mut element) = open_element(&p.object, "gx:SoundCue", ctx) else {
                    return Ok(None);
                };
                element.push(Element::with_text("href", p.href.as_str()));
                if let Some(delay) = p.delayed_start {
                    element.push(Element::with_text(
                        "gx:delayedStart",
                        fmt_num(delay),
                    ));
                }
                Ok(Some(element))
            }
            Self::AnimatedUpdate(p) => {
                let Some(mut element) = open_element(&p.object, "gx:AnimatedUpdate", ctx) else {
                    return Ok(None);
                };
                element.push(Element::with_text("gx:duration", fmt_num(p.duration)));
                let mut update = Element::new("Update");
                update.push(Element::with_text(
                    "targetHref",
                    p.target.as_deref().unwrap_or_default(),
                ));
                for node in &p.updates {
                    update.push_node(node.clone());
                }
                element.push(update);
                if let Some(delay) = p.delayed_start {
                    element.push(Element::with_text(
                        "gx:delayedStart",
                        fmt_num(delay),
                    ));
                }
                Ok(Some(element))
            }
        }
    }
}

impl From<FlyTo> for TourPrimitive {
    fn from(p: FlyTo) -> Self {
        Self::FlyTo(p)
    }
}

impl From<Wait> for TourPrimitive {
    fn from(p: Wait) -> Self {
        Self::Wait(p)
    }
}

impl From<TourControl> for TourPrimitive {
    fn from(p: TourControl) -> Self {
        Self::TourControl(p)
    }
}

impl From<SoundCue> for TourPrimitive {
    fn from(p: SoundCue) -> Self {
        Self::SoundCue(p)
    }
}

impl From<AnimatedUpdate> for TourPrimitive {
    fn from(p: AnimatedUpdate) -> Self {
        Self::AnimatedUpdate(p)
    }
}

/// A named, ordered playlist of tour primitives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    pub object: KmlObject,
    pub name: Option<String>,
    pub description: Option<String>,
    playlist: Vec<TourPrimitive>,
}

impl_has_object!(Tour);

impl Tour {
    /// New tour, seeded with a zero-length wait
    #[must_use]
    pub fn new(name: Option<String>, description: Option<String>) -> Self {
        Self {
            object: KmlObject::new("Tour"),
            name,
            description,
            playlist: vec![TourPrimitive::Wait(Wait::new(0.0))],
        }
    }

    /// Append a primitive to the playlist
    pub fn push(&mut self, primitive: impl Into<TourPrimitive>) {
        self.playlist.push(primitive.into());
    }

    /// Playlist in playback order
    #[must_use]
    pub fn playlist(&self) -> &[TourPrimitive] {
        &self.playlist
    }

    /// View of the most recent `FlyTo` in the playlist
    #[must_use]
    pub fn last_view(&self) -> Option<&AbstractView> {
        self.playlist.iter().rev().find_map(|p| match p {
            TourPrimitive::FlyTo(f) => f.view.as_ref(),
            _ => None,
        })
    }
}

impl Render for Tour {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let Some(mut element) = open_element(&self.object, "gx:Tour", ctx) else {
            return Ok(None);
        };
        if let Some(name) = &self.name {
            element.push(Element::with_text("name", name.as_str()));
        }
        if let Some(description) = &self.description {
            element.push(Element::with_text("description", description.as_str()));
        }
        let mut playlist = Element::new("gx:Playlist");
        for primitive in &self.playlist {
            primitive.render_into(&mut playlist, ctx)?;
        }
        element.push(playlist);
        Ok(Some(element))
    }
}
