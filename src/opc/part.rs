//! Part representation for OPC packages

use crate::error::{Error, Result};
use crate::opc::part_uri;
use crate::xml::{XmlDocument, XmlOptions};

/// How a part's content is held
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Parsed into a generic XML tree
    GenericXml,
    /// Raw bytes, passed through unchanged
    Opaque,
}

impl PartKind {
    /// Classify a resolved media type.
    ///
    /// Anything ending in `xml` (ignoring case), such as `application/xml`
    /// or `...document.main+xml`, is XML. Unresolved types are opaque.
    pub fn from_media_type(media_type: Option<&str>) -> Self {
        let suffix = media_type.and_then(|mt| mt.get(mt.len().checked_sub(3)?..));
        match suffix {
            Some(s) if s.eq_ignore_ascii_case("xml") => PartKind::GenericXml,
            _ => PartKind::Opaque,
        }
    }
}

/// Part data, tagged by kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartContent {
    Xml(XmlDocument),
    Opaque(Vec<u8>),
}

impl PartContent {
    pub fn kind(&self) -> PartKind {
        match self {
            PartContent::Xml(_) => PartKind::GenericXml,
            PartContent::Opaque(_) => PartKind::Opaque,
        }
    }
}

/// A part within an OPC package
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Part {
    /// Archive entry name
    uri: String,
    /// Part data
    content: PartContent,
}

impl Part {
    /// Create a new part
    pub fn new(uri: impl Into<String>, content: PartContent) -> Self {
        Self {
            uri: uri.into(),
            content,
        }
    }

    /// Create an XML part
    pub fn new_xml(uri: impl Into<String>, doc: XmlDocument) -> Self {
        Self::new(uri, PartContent::Xml(doc))
    }

    /// Create an opaque part
    pub fn new_opaque(uri: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(uri, PartContent::Opaque(data))
    }

    /// Build a part from raw entry bytes.
    ///
    /// XML parts that fail to parse give [`Error::MalformedPart`]; they are
    /// never downgraded to opaque.
    pub fn parse(
        uri: impl Into<String>,
        data: Vec<u8>,
        kind: PartKind,
        options: &XmlOptions,
    ) -> Result<Self> {
        let uri = uri.into();
        let content = match kind {
            PartKind::GenericXml => match XmlDocument::parse_bytes(&data, options) {
                Ok(doc) => PartContent::Xml(doc),
                Err(e) => {
                    return Err(Error::MalformedPart {
                        uri,
                        source: Box::new(e),
                    })
                }
            },
            PartKind::Opaque => PartContent::Opaque(data),
        };

        Ok(Self { uri, content })
    }

    /// Serialize the content back to entry bytes
    pub fn to_bytes(&self, options: &XmlOptions) -> Result<Vec<u8>> {
        match &self.content {
            PartContent::Xml(doc) => doc.to_bytes(options).map_err(|e| e.in_entry(&self.uri)),
            PartContent::Opaque(data) => Ok(data.clone()),
        }
    }

    /// Get the part URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the part kind
    pub fn kind(&self) -> PartKind {
        self.content.kind()
    }

    /// Get the content
    pub fn content(&self) -> &PartContent {
        &self.content
    }

    /// Replace the content (the kind follows the new content)
    pub fn set_content(&mut self, content: PartContent) {
        self.content = content;
    }

    /// Get the XML tree, if this is an XML part
    pub fn xml(&self) -> Option<&XmlDocument> {
        match &self.content {
            PartContent::Xml(doc) => Some(doc),
            PartContent::Opaque(_) => None,
        }
    }

    /// Get the XML tree mutably, if this is an XML part
    pub fn xml_mut(&mut self) -> Option<&mut XmlDocument> {
        match &mut self.content {
            PartContent::Xml(doc) => Some(doc),
            PartContent::Opaque(_) => None,
        }
    }

    /// Get the raw data, if this is an opaque part
    pub fn data(&self) -> Option<&[u8]> {
        match &self.content {
            PartContent::Opaque(data) => Some(data),
            PartContent::Xml(_) => None,
        }
    }

    /// Get the relationships file name for this part
    pub fn relationships_uri(&self) -> String {
        part_uri::relationships_uri(&self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            PartKind::from_media_type(Some("application/xml")),
            PartKind::GenericXml
        );
        assert_eq!(
            PartKind::from_media_type(Some(
                "application/vnd.openxmlformats-package.relationships+xml"
            )),
            PartKind::GenericXml
        );
        assert_eq!(PartKind::from_media_type(Some("TEXT/XML")), PartKind::GenericXml);

        assert_eq!(PartKind::from_media_type(Some("image/png")), PartKind::Opaque);
        assert_eq!(PartKind::from_media_type(Some("ml")), PartKind::Opaque);
        assert_eq!(PartKind::from_media_type(Some("")), PartKind::Opaque);
        assert_eq!(PartKind::from_media_type(None), PartKind::Opaque);
    }

    #[test]
    fn test_parse_xml_part() {
        let part = Part::parse(
            "word/document.xml",
            b"<root><child/></root>".to_vec(),
            PartKind::GenericXml,
            &XmlOptions::default(),
        )
        .unwrap();

        assert_eq!(part.uri(), "word/document.xml");
        assert_eq!(part.kind(), PartKind::GenericXml);
        assert_eq!(part.xml().unwrap().root.name, "root");
        assert!(part.data().is_none());
    }

    #[test]
    fn test_parse_opaque_part() {
        let bytes = vec![0x89, b'P', b'N', b'G', 0, 1, 2];
        let part = Part::parse(
            "word/media/image1.png",
            bytes.clone(),
            PartKind::Opaque,
            &XmlOptions::default(),
        )
        .unwrap();

        assert_eq!(part.kind(), PartKind::Opaque);
        assert_eq!(part.data(), Some(bytes.as_slice()));
        assert_eq!(part.to_bytes(&XmlOptions::default()).unwrap(), bytes);
    }

    #[test]
    fn test_malformed_xml_part() {
        let err = Part::parse(
            "word/document.xml",
            b"<root>".to_vec(),
            PartKind::GenericXml,
            &XmlOptions::default(),
        )
        .unwrap_err();

        match err {
            Error::MalformedPart { ref uri, .. } => assert_eq!(uri, "word/document.xml"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.is_xml_syntax());
    }

    #[test]
    fn test_set_content_changes_kind() {
        let mut part = Part::new_opaque("custom/item1.xml", b"<a/>".to_vec());
        assert_eq!(part.kind(), PartKind::Opaque);

        let doc = XmlDocument::parse("<a/>", &XmlOptions::default()).unwrap();
        part.set_content(PartContent::Xml(doc));
        assert_eq!(part.kind(), PartKind::GenericXml);
        assert_eq!(part.relationships_uri(), "custom/_rels/item1.xml.rels");
    }
}
