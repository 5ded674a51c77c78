//! # kmltour-core
//!
//! Scene-graph authoring and KML rendering for Google Earth tours.
//!
//! This crate builds an in-memory graph of placemarks, overlays, styles,
//! views and timed tour steps, then renders it once into a KML document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kmltour_core::{Document, FlyTo, Placemark, Point};
//!
//! let mut doc = Document::new(Some("Landmarks".to_string()));
//! doc.new_folder(Some("Bridges".to_string()));
//! doc.add(Placemark::new(
//!     Some("Golden Gate".to_string()),
//!     Some(Point::new(-122.4783, 37.8199, 0.0).into()),
//! ));
//! doc.tour_mut().push(FlyTo::new(Point::new(-122.4783, 37.8199, 0.0)).with_duration(5.0));
//!
//! let kml = doc.to_kml_document()?;
//! println!("{}", kml.to_string_pretty()?);
//! # Ok::<(), kmltour_core::KmlError>(())
//! ```
//!
//! ## Entity Families
//!
//! | Family | Types | Notes |
//! |--------|-------|-------|
//! | Object | [`KmlObject`] | id, comment, master-only flag |
//! | Geometry | [`Point`], [`LineString`], [`LinearRing`], [`Model`] | |
//! | Feature | [`Placemark`], [`Folder`], [`ScreenOverlay`], [`GroundOverlay`], [`PhotoOverlay`], [`Document`] | |
//! | View | [`Camera`], [`LookAt`] | built from [`ViewParams`] |
//! | Style | [`Style`], [`StyleMap`] and the six sub-styles | attached to one feature |
//! | Tour | [`FlyTo`], [`Wait`], [`TourControl`], [`SoundCue`], [`AnimatedUpdate`] | inside a [`Tour`] |
//!
//! ## Rendering Rules
//!
//! - Only fields that were set are emitted.
//! - Master-only objects render only when the owning document is in master
//!   mode.
//! - Compact form ([`RenderContext::with_compact`]) omits ids and fields
//!   flagged full-only.
//! - Sea-floor altitude modes switch `altitudeMode` to `gx:altitudeMode`.
//! - Booleans render as `0`/`1`.
//!
//! ## Error Handling
//!
//! ```no_run
//! use kmltour_core::{Feature, Folder, KmlError, updates::show_balloon_for, AnimatedUpdateOptions};
//!
//! let folder: Feature = Folder::new(None).into();
//! match show_balloon_for(&folder, AnimatedUpdateOptions::default()) {
//!     Ok(update) => println!("{} change(s)", update.updates().len()),
//!     Err(KmlError::InvalidCapability(e)) => println!("Not supported: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

pub mod action;
pub mod bounds;
pub mod coord;
pub mod document;
pub mod enums;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod id;
pub mod import;
pub mod object;
pub mod overlay;
pub mod region;
pub mod registry;
pub mod render;
pub mod style;
pub mod time;
pub mod tour;
pub mod updates;
pub mod view;
pub mod xml;

pub use action::{Action, ActionList, Constraint};
pub use bounds::{band, circ_bounds, lat_check, long_check};
pub use coord::convert_coord;
pub use document::{Document, FeatureHandle, KmlDocument};
pub use enums::{
    ColorMode, DisplayMode, FlyToMode, ItemIconState, ListItemType, RefreshMode, Shape, Units,
    ViewRefreshMode,
};
pub use error::{KmlError, Result};
pub use feature::{
    Data, Feature, FeatureData, Folder, HasFeature, Placemark, PlacemarkOptions, Snippet,
};
pub use geometry::{
    Alias, Coordinate, Geometry, Icon, LineString, LinearRing, Link, Model, Orientation, PathData,
    Point, ResourceMap, Scale,
};
pub use id::{next_id, prefix, set_prefix};
pub use import::{each_placemark, PlacemarkRecord};
pub use object::{HasObject, KmlObject};
pub use overlay::{
    GroundOverlay, ImagePyramid, LatLonQuad, OverlayData, PhotoOverlay, ScreenOverlay, ViewVolume,
    XY,
};
pub use region::{LatLonBox, Lod, Region};
pub use registry::DocumentRegistry;
pub use render::{AltitudeMode, Render, RenderContext};
pub use style::{
    BalloonStyle, Color, ColorData, IconStyle, LabelStyle, LineStyle, ListStyle,
    PolyStyle, Style, StyleMap, StyleRef, StyleSelector,
};
pub use time::{TimePrimitive, TimeSpan, TimeStamp};
pub use tour::{
    AnimatedUpdate, AnimatedUpdateOptions, FlyTo, SoundCue, Tour, TourControl, TourPrimitive, Wait,
};
pub use view::{make_view_from, AbstractView, Camera, LookAt, ViewData, ViewParams, ViewerOptions};
pub use xml::{Element, Node};
