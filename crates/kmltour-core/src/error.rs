//! Error types for scene-graph construction and KML rendering

use thiserror::Error;

/// Errors that can occur while building or rendering a KML scene graph
#[derive(Debug, Error)]
pub enum KmlError {
    /// An operation was applied to an entity lacking the required capability,
    /// e.g. toggling a balloon on a Folder or reading the point of a
    /// Placemark whose geometry is a `LineString`
    #[error("Invalid capability: {0}")]
    InvalidCapability(String),

    /// A restricted field was given a value outside its fixed set
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Composite state required at render time is missing
    #[error("Missing required state: {0}")]
    MissingState(String),

    /// Style selectors attached twice or rendered outside their owning feature
    #[error("Style attachment error: {0}")]
    StyleAttachment(String),

    /// XML writing or fragment parsing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// KML import parsing error
    #[error("KML parsing error: {0}")]
    Parse(#[from] roxmltree::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for KML operations
pub type Result<T> = std::result::Result<T, KmlError>;
