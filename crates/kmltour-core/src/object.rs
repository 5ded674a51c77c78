//! The base capability shared by every KML object

use crate::id::next_id;
use serde::Serialize;

/// Identity and annotations common to every KML object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KmlObject {
    id: String,
    /// Free-text comment, emitted HTML-escaped as an XML comment
    pub comment: Option<String>,
    /// Only rendered when the owning document is in master mode
    pub master_only: bool,
}

impl KmlObject {
    /// Allocate a fresh identity for an object of the given kind
    #[must_use]
    pub fn new(kind: &str) -> Self {
        Self {
            id: next_id(kind),
            comment: None,
            master_only: false,
        }
    }

    /// The identifier assigned at construction
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Builder form for setting the comment
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Access to the [`KmlObject`] embedded in an entity
pub trait HasObject {
    /// Shared object data
    fn object(&self) -> &KmlObject;

    /// Mutable object data
    fn object_mut(&mut self) -> &mut KmlObject;

    /// The entity's identifier
    #[inline]
    fn kml_id(&self) -> &str {
        self.object().id()
    }
}

/// Implement [`HasObject`] for structs with an `object: KmlObject` field
macro_rules! impl_has_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::object::HasObject for $ty {
                #[inline]
                fn object(&self) -> &$crate::object::KmlObject {
                    &self.object
                }

                #[inline]
                fn object_mut(&mut self) -> &mut $crate::object::KmlObject {
                    &mut self.object
                }
            }
        )+
    };
}

pub(crate) use impl_has_object;
