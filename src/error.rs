//! Error types for linch-opc

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("XML syntax error: {0}")]
    XmlSyntax(String),

    #[error("Missing content types manifest: [Content_Types].xml")]
    MissingContentTypes,

    #[error("Invalid entry '{entry}': {source}")]
    Entry {
        entry: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Malformed XML part '{uri}': {source}")]
    MalformedPart {
        uri: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Part already exists: {0}")]
    DuplicatePart(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),
}

impl Error {
    /// Whether this error (or the error it wraps) came from malformed XML text
    pub fn is_xml_syntax(&self) -> bool {
        match self {
            Error::Xml(_) | Error::XmlAttr(_) | Error::Utf8(_) | Error::XmlSyntax(_) => true,
            Error::Entry { source, .. } | Error::MalformedPart { source, .. } => {
                source.is_xml_syntax()
            }
            _ => false,
        }
    }

    pub(crate) fn in_entry(self, entry: &str) -> Self {
        Error::Entry {
            entry: entry.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
