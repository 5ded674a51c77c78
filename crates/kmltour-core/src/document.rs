//! The document: root container, folder stack, tours, and relay actions
//!
//! A [`Document`] is the explicit context new features are attached to.
//! [`Document::add`] places a feature in the folder on top of the folder
//! stack (or the document itself when the stack is empty) and returns a
//! [`FeatureHandle`] that addresses it afterwards. Features are never
//! re-parented once added.

use crate::action::{Action, ActionList};
use crate::enums::FlyToMode;
use crate::error::{KmlError, Result};
use crate::feature::{impl_has_feature, render_children, Feature, FeatureData, Folder};
use crate::object::KmlObject;
use crate::render::{open_element, Render, RenderContext};
use crate::tour::{FlyTo, Tour, TourPrimitive, Wait};
use crate::view::{AbstractView, LookAt};
use crate::xml::{write_element, Element};
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;

/// Namespace declarations on the `<kml>` root
pub const KML_NAMESPACES: &[(&str, &str)] = &[
    ("xmlns", "http://www.opengis.net/kml/2.2"),
    ("xmlns:gx", "http://www.google.com/kml/ext/2.2"),
    ("xmlns:kml", "http://www.opengis.net/kml/2.2"),
    ("xmlns:atom", "http://www.w3.org/2005/Atom"),
    ("xmlns:xal", "urn:oasis:names:tc:ciq:xsdschema:xAL:2.0"),
];

/// Path of child indices from the document root to a feature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureHandle(Vec<usize>);

impl FeatureHandle {
    /// Child indices, outermost first
    #[must_use]
    pub fn path(&self) -> &[usize] {
        &self.0
    }

    fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }
}

fn resolve<'a>(children: &'a [Feature], path: &[usize]) -> Option<&'a Feature> {
    let (first, rest) = path.split_first()?;
    let feature = children.get(*first)?;
    if rest.is_empty() {
        return Some(feature);
    }
    resolve(&feature.as_folder()?.children, rest)
}

fn resolve_mut<'a>(children: &'a mut [Feature], path: &[usize]) -> Option<&'a mut Feature> {
    let (first, rest) = path.split_first()?;
    let feature = children.get_mut(*first)?;
    if rest.is_empty() {
        return Some(feature);
    }
    resolve_mut(&mut feature.as_folder_mut()?.children, rest)
}

/// Root container of a scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub feature: FeatureData,
    /// Gate for `master_only` objects when this document renders
    pub master_mode: bool,
    /// Mode given to FlyTos created through [`Document::fly_to`]
    pub flyto_mode: Option<FlyToMode>,
    children: Vec<Feature>,
    folder_stack: Vec<FeatureHandle>,
    tours: Vec<Tour>,
    active_tour: Option<usize>,
    actions: Vec<Action>,
}

impl_has_feature!(Document);

impl Default for Document {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Document {
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        let mut feature = FeatureData::new("Document");
        feature.name = name;
        Self {
            feature,
            master_mode: false,
            flyto_mode: None,
            children: Vec::new(),
            folder_stack: Vec::new(),
            tours: Vec::new(),
            active_tour: None,
            actions: Vec::new(),
        }
    }

    /// Top-level features in insertion order
    #[must_use]
    pub fn children(&self) -> &[Feature] {
        &self.children
    }

    /// Attach a feature to the current folder, or to the document when no
    /// folder is active
    pub fn add(&mut self, feature: impl Into<Feature>) -> FeatureHandle {
        let feature = feature.into();
        if let Some(top) = self.folder_stack.last().cloned() {
            if let Some(folder) = resolve_mut(&mut self.children, top.path()).and_then(Feature::as_folder_mut) {
                let index = folder.push(feature);
                return top.child(index);
            }
            log::warn!("folder stack entry {:?} no longer resolves; attaching to the document", top.path());
        }
        self.children.push(feature);
        FeatureHandle(vec![self.children.len() - 1])
    }

    /// Attach a new folder and make it the current folder
    pub fn new_folder(&mut self, name: Option<String>) -> FeatureHandle {
        let handle = self.add(Folder::new(name));
        self.folder_stack.push(handle.clone());
        handle
    }

    /// Make an existing folder the current folder
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::InvalidCapability`] if `handle` does not address
    /// a folder.
    pub fn enter_folder(&mut self, handle: &FeatureHandle) -> Result<()> {
        match self.feature(handle) {
            Some(Feature::Folder(_)) => {
                self.folder_stack.push(handle.clone());
                Ok(())
            }
            Some(other) => Err(KmlError::InvalidCapability(format!(
                "cannot enter a {} as a folder",
                other.kind()
            ))),
            None => Err(KmlError::InvalidCapability(format!(
                "no feature at {:?}",
                handle.path()
            ))),
        }
    }

    /// Leave the current folder, returning its handle
    pub fn leave_folder(&mut self) -> Option<FeatureHandle> {
        self.folder_stack.pop()
    }

    /// The current folder, created (and entered) when none is active
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::MissingState`] if the folder stack no longer
    /// resolves to a folder.
    pub fn current_folder_mut(&mut self) -> Result<&mut Folder> {
        let top = match self.folder_stack.last() {
            Some(top) => top.clone(),
            None => self.new_folder(None),
        };
        resolve_mut(&mut self.children, top.path())
            .and_then(Feature::as_folder_mut)
            .ok_or_else(|| KmlError::MissingState(format!("no folder at {:?}", top.path())))
    }

    #[must_use]
    pub fn feature(&self, handle: &FeatureHandle) -> Option<&Feature> {
        resolve(&self.children, handle.path())
    }

    pub fn feature_mut(&mut self, handle: &FeatureHandle) -> Option<&mut Feature> {
        resolve_mut(&mut self.children, handle.path())
    }

    /// The active tour, created when the document has none
    pub fn tour_mut(&mut self) -> &mut Tour {
        let index = match self.active_tour {
            Some(index) => index,
            None => {
                self.tours.push(Tour::new(None, None));
                let index = self.tours.len() - 1;
                self.active_tour = Some(index);
                index
            }
        };
        &mut self.tours[index]
    }

    /// Start a new tour and make it active
    pub fn new_tour(&mut self, name: Option<String>) -> &mut Tour {
        self.tours.push(Tour::new(name, None));
        let index = self.tours.len() - 1;
        self.active_tour = Some(index);
        &mut self.tours[index]
    }

    #[must_use]
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// Append any primitive to the active tour
    pub fn push_to_tour(&mut self, primitive: impl Into<TourPrimitive>) {
        self.tour_mut().push(primitive);
    }

    /// Append a FlyTo using the document's default FlyTo mode
    pub fn fly_to(&mut self, view: impl Into<AbstractView>, duration: f64) {
        let mut fly = FlyTo::new(view).with_duration(duration);
        fly.mode = self.flyto_mode;
        self.push_to_tour(fly);
    }

    /// Append a pause to the active tour
    pub fn pause(&mut self, seconds: f64) {
        self.push_to_tour(Wait::new(seconds));
    }

    /// Fly back out from the active tour's most recent view
    ///
    /// The new view copies the last LookAt with its range widened by
    /// `distance`.
    ///
    /// # Errors
    ///
    /// Returns [`KmlError::MissingState`] when the active tour has no view
    /// to zoom out from, and [`KmlError::InvalidCapability`] when that view
    /// is a Camera.
    pub fn zoom_out(&mut self, distance: f64, duration: f64) -> Result<()> {
        let last_view = self
            .active_tour
            .and_then(|index| self.tours.get(index))
            .and_then(Tour::last_view);
        let look_at = match last_view {
            Some(AbstractView::LookAt(last)) => LookAt {
                object: KmlObject::new("LookAt"),
                view: last.view.clone(),
                range: Some(last.range.unwrap_or_default() + distance),
            },
            Some(AbstractView::Camera(_)) => {
                return Err(KmlError::InvalidCapability(
                    "cannot zoom out from a Camera; it has no range".to_string(),
                ))
            }
            None => {
                return Err(KmlError::MissingState(
                    "no current position to zoom out from".to_string(),
                ))
            }
        };
        self.fly_to(look_at, duration);
        Ok(())
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Relay actions in insertion order
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Actions wrapped for serialization as `{ actions: [...] }`
    #[must_use]
    pub fn action_list(&self) -> ActionList<'_> {
        ActionList {
            actions: &self.actions,
        }
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Render context for this document in full form
    #[must_use]
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new().with_master_mode(self.master_mode)
    }

    /// Full-form KML document
    ///
    /// # Errors
    ///
    /// Propagates render errors from the tree.
    pub fn to_kml_document(&self) -> Result<KmlDocument> {
        self.to_kml_document_with(self.render_context())
    }

    /// KML document rendered with an explicit context
    ///
    /// The context's master mode is replaced by the document's own flag.
    ///
    /// # Errors
    ///
    /// Propagates render errors from the tree.
    pub fn to_kml_document_with(&self, ctx: RenderContext) -> Result<KmlDocument> {
        let mut root = Element::new("kml");
        for (key, value) in KML_NAMESPACES {
            root.set_attr(*key, *value);
        }
        self.render_into(&mut root, &ctx)?;
        Ok(KmlDocument { root })
    }
}

impl Render for Document {
    fn render(&self, ctx: &RenderContext) -> Result<Option<Element>> {
        let ctx = ctx.with_master_mode(self.master_mode);
        let Some(mut element) = open_element(&self.feature.object, "Document", &ctx) else {
            return Ok(None);
        };
        self.feature.emit(&mut element, &ctx)?;
        for tour in &self.tours {
            tour.render_into(&mut element, &ctx)?;
        }
        render_children(&mut element, &self.children, &ctx)?;
        log::debug!(
            "rendered document {} with {} tour(s) and {} top-level feature(s)",
            self.feature.id(),
            self.tours.len(),
            self.children.len()
        );
        Ok(Some(element))
    }
}

/// A rendered `<kml>` tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmlDocument {
    root: Element,
}

impl KmlDocument {
    /// The `<kml>` element
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The rendered `<Document>`, if it was not suppressed
    #[must_use]
    pub fn document(&self) -> Option<&Element> {
        self.root.child("Document")
    }

    /// Indented UTF-8 text with an XML declaration
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails or produces invalid UTF-8.
    pub fn to_string_pretty(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, &self.root)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Placemark;
    use crate::geometry::Point;

    fn placemark(name: &str) -> Placemark {
        Placemark::new(Some(name.to_string()), Some(Point::new(0.0, 0.0, 0.0).into()))
    }

    #[test]
    fn test_add_attaches_to_current_folder() {
        let mut doc = Document::new(Some("doc".to_string()));
        let top = doc.add(placemark("top"));
        assert_eq!(top.path(), &[0]);

        let folder = doc.new_folder(Some("f".to_string()));
        let inner = doc.add(placemark("inner"));
        assert_eq!(inner.path(), &[1, 0]);
        assert_eq!(
            doc.feature(&inner).and_then(|f| f.data().name.as_deref()),
            Some("inner")
        );

        assert_eq!(doc.leave_folder(), Some(folder));
        let after = doc.add(placemark("after"));
        assert_eq!(after.path(), &[2]);
    }

    #[test]
    fn test_nested_folders() {
        let mut doc = Document::default();
        doc.new_folder(None);
        doc.new_folder(None);
        let deep = doc.add(placemark("deep"));
        assert_eq!(deep.path(), &[0, 0, 0]);
    }

    #[test]
    fn test_enter_folder_rejects_non_folder() {
        let mut doc = Document::default();
        let p = doc.add(placemark("p"));
        assert!(matches!(doc.enter_folder(&p), Err(KmlError::InvalidCapability(_))));

        let folder = doc.add(Folder::new(None));
        doc.enter_folder(&folder).unwrap();
        let inner = doc.add(placemark("q"));
        assert_eq!(inner.path(), &[1, 0]);
    }

    #[test]
    fn test_current_folder_is_created_on_demand() {
        let mut doc = Document::default();
        doc.current_folder_mut().unwrap().feature.name = Some("auto".to_string());
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.children()[0].data().name.as_deref(), Some("auto"));
        doc.current_folder_mut().unwrap();
        assert_eq!(doc.children().len(), 1);
    }

    #[test]
    fn test_tours() {
        let mut doc = Document::default();
        assert!(doc.tours().is_empty());
        doc.tour_mut().name = Some("first".to_string());
        doc.new_tour(Some("second".to_string()));
        doc.pause(3.0);
        assert_eq!(doc.tours().len(), 2);
        assert_eq!(doc.tours()[0].playlist().len(), 1);
        assert_eq!(doc.tours()[1].playlist().len(), 2);
    }

    #[test]
    fn test_fly_to_uses_document_mode() {
        let mut doc = Document::default();
        doc.flyto_mode = Some(FlyToMode::Smooth);
        doc.fly_to(Point::new(1.0, 1.0, 0.0), 4.0);
        match doc.tour_mut().playlist().last() {
            Some(TourPrimitive::FlyTo(f)) => {
                assert_eq!(f.mode, Some(FlyToMode::Smooth));
                assert_eq!(f.duration, Some(4.0));
            }
            other => panic!("expected a FlyTo, got {other:?}"),
        }
    }

    #[test]
    fn test_zoom_out() {
        let mut doc = Document::default();
        assert!(matches!(doc.zoom_out(1000.0, 0.0), Err(KmlError::MissingState(_))));

        let mut look_at = LookAt::new(Point::new(1.0, 2.0, 0.0));
        look_at.range = Some(500.0);
        doc.fly_to(look_at, 1.0);
        doc.zoom_out(1000.0, 2.0).unwrap();
        let tour = doc.tour_mut();
        assert_eq!(tour.last_view().and_then(AbstractView::range), Some(1500.0));
        assert_eq!(tour.playlist().len(), 3);
    }

    #[test]
    fn test_actions() {
        let mut doc = Document::default();
        for name in ["a", "b", "c"] {
            doc.add_action(Action::new(name, "true"));
        }
        let names: Vec<&str> = doc.actions().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(doc.action_list().actions.len(), 3);
        doc.clear_actions();
        assert!(doc.actions().is_empty());
    }

    #[test]
    fn test_kml_root() {
        let mut doc = Document::new(Some("root".to_string()));
        doc.add(placemark("p"));
        let kml = doc.to_kml_document().unwrap();
        assert_eq!(kml.root().name, "kml");
        assert_eq!(kml.root().get_attr("xmlns"), Some("http://www.opengis.net/kml/2.2"));
        assert_eq!(kml.root().get_attr("xmlns:gx"), Some("http://www.google.com/kml/ext/2.2"));
        let document = kml.document().unwrap();
        assert_eq!(document.child_text("name").as_deref(), Some("root"));
        assert!(document.child("Placemark").is_some());

        let text = kml.to_string_pretty().unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<Document"));
    }

    #[test]
    fn test_master_mode_follows_document() {
        let mut doc = Document::default();
        let mut hidden = placemark("hidden");
        hidden.feature.object.master_only = true;
        doc.add(hidden);

        let kml = doc.to_kml_document().unwrap();
        assert!(kml.document().unwrap().child("Placemark").is_none());

        doc.master_mode = true;
        let kml = doc.to_kml_document().unwrap();
        assert!(kml.document().unwrap().child("Placemark").is_some());
    }
}
