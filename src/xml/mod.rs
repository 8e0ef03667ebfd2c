//! Generic XML document model for round-trip support
//!
//! Parts classified as XML are held as [`XmlDocument`] trees. Parsing and
//! serialization take an explicit [`XmlOptions`] value; there is no shared
//! parser configuration.

mod document;
mod namespace;
mod node;

pub use document::{XmlDeclaration, XmlDocument};
pub use namespace::*;
pub use node::{XmlElement, XmlNode, MAX_DEPTH};

/// Options controlling XML parsing and serialization
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlOptions {
    /// Keep text nodes that contain only whitespace. By default they are
    /// dropped, except inside an `xml:space="preserve"` scope.
    pub keep_whitespace_text: bool,
    /// Indent serialized output by this many spaces per level (compact if `None`)
    pub indent: Option<usize>,
}
