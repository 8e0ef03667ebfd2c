//! OPC Package implementation
//!
//! Holds the parts, content types and relationships of one container.

use crate::error::{Error, Result};
use crate::opc::reader::{PackageReader, ReadOptions};
use crate::opc::relationships::rel_types;
use crate::opc::writer::{PackageWriter, WriteOptions};
use crate::opc::{part_uri, ContentTypeResolver, Part, PartContent, Relationship, RelationshipSet};
use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};

/// An OPC package (ZIP-based container for DOCX, XLSX, PPTX, etc.)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Package {
    /// Content types ([Content_Types].xml)
    content_types: ContentTypeResolver,
    /// All parts in the package, keyed by entry name
    parts: BTreeMap<String, Part>,
    /// Relationships from every relationships file
    relationships: RelationshipSet,
}

impl Package {
    /// Create a new empty package
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn assemble(
        content_types: ContentTypeResolver,
        parts: BTreeMap<String, Part>,
        relationships: RelationshipSet,
    ) -> Self {
        Self {
            content_types,
            parts,
            relationships,
        }
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        PackageReader::read_bytes(bytes, &ReadOptions::default())
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        PackageReader::read_from(reader, &ReadOptions::default())
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self, &WriteOptions::default())
    }

    /// Write the package to a writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        PackageWriter::write_to(self, writer, &WriteOptions::default())
    }

    /// Check if a part exists
    pub fn contains_part(&self, uri: &str) -> bool {
        self.parts.contains_key(uri)
    }

    /// Get a part by URI
    pub fn part(&self, uri: &str) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Get a mutable part by URI
    pub fn part_mut(&mut self, uri: &str) -> Option<&mut Part> {
        self.parts.get_mut(uri)
    }

    /// Get a part by URI, failing if it does not exist
    pub fn get_part(&self, uri: &str) -> Result<&Part> {
        self.parts
            .get(uri)
            .ok_or_else(|| Error::PartNotFound(uri.to_string()))
    }

    /// Add a part to the package
    ///
    /// Fails if a part with the same URI exists; the existing part is kept.
    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if self.parts.contains_key(part.uri()) {
            return Err(Error::DuplicatePart(part.uri().to_string()));
        }
        log::debug!("adding part {}", part.uri());
        self.parts.insert(part.uri().to_string(), part);
        Ok(())
    }

    /// Remove a part from the package
    pub fn remove_part(&mut self, uri: &str) -> Result<Part> {
        let part = self
            .parts
            .remove(uri)
            .ok_or_else(|| Error::PartNotFound(uri.to_string()))?;
        log::debug!("removed part {}", uri);
        Ok(part)
    }

    /// Get all part URIs, in order
    pub fn part_uris(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(|k| k.as_str())
    }

    /// Get all parts, in URI order
    pub fn parts(&self) -> impl Iterator<Item = (&str, &Part)> {
        self.parts.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parts
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Resolve the media type of a part URI
    pub fn content_type(&self, uri: &str) -> Option<&str> {
        self.content_types.resolve(uri)
    }

    /// Get content types
    pub fn content_types(&self) -> &ContentTypeResolver {
        &self.content_types
    }

    /// Get mutable content types
    pub fn content_types_mut(&mut self) -> &mut ContentTypeResolver {
        &mut self.content_types
    }

    /// Write the current content types into the `[Content_Types].xml` part,
    /// creating it if needed
    pub fn sync_content_types(&mut self) {
        let content = PartContent::Xml(self.content_types.to_manifest());
        match self.parts.get_mut(part_uri::CONTENT_TYPES) {
            Some(part) => part.set_content(content),
            None => {
                let part = Part::new(part_uri::CONTENT_TYPES, content);
                self.parts.insert(part_uri::CONTENT_TYPES.to_string(), part);
            }
        }
    }

    /// Get all relationships
    pub fn relationships(&self) -> &RelationshipSet {
        &self.relationships
    }

    /// Get mutable relationships
    pub fn relationships_mut(&mut self) -> &mut RelationshipSet {
        &mut self.relationships
    }

    /// Relationships declared by a part's relationships file
    pub fn part_relationships<'a>(
        &'a self,
        uri: &str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        let source = part_uri::relationships_uri(uri);
        self.relationships.iter().filter(move |r| r.source == source)
    }

    /// Get the part a relationship points to
    ///
    /// Parts are matched by entry name with or without the leading '/'.
    pub fn part_for_relationship(&self, rel: &Relationship) -> Option<&Part> {
        let name = rel.target_part_name()?;
        self.parts
            .get(&name)
            .or_else(|| self.parts.get(name.trim_start_matches('/')))
    }

    /// Get a part by relationship type from package relationships
    pub fn part_by_rel_type(&self, rel_type: &str) -> Option<&Part> {
        let rel = self
            .relationships
            .package_level()
            .find(|r| r.rel_type == rel_type)?;
        self.part_for_relationship(rel)
    }

    /// Get the main document part (document.xml, workbook.xml, presentation.xml)
    pub fn main_part(&self) -> Option<&Part> {
        self.part_by_rel_type(rel_types::OFFICE_DOCUMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::relationships::TargetMode;
    use crate::opc::PartKind;
    use crate::xml::{XmlDocument, XmlOptions};

    fn xml_part(uri: &str, xml: &str) -> Part {
        Part::new_xml(uri, XmlDocument::parse(xml, &XmlOptions::default()).unwrap())
    }

    #[test]
    fn test_new_package() {
        let pkg = Package::new();
        assert_eq!(pkg.part_count(), 0);
        assert!(pkg.relationships().is_empty());
        assert!(pkg.content_types().is_empty());
    }

    #[test]
    fn test_add_part() {
        let mut pkg = Package::new();
        pkg.add_part(xml_part("word/document.xml", "<doc/>")).unwrap();

        assert!(pkg.contains_part("word/document.xml"));
        let part = pkg.get_part("word/document.xml").unwrap();
        assert_eq!(part.kind(), PartKind::GenericXml);
    }

    #[test]
    fn test_add_duplicate_keeps_existing() {
        let mut pkg = Package::new();
        pkg.add_part(Part::new_opaque("a.bin", vec![1])).unwrap();

        let err = pkg.add_part(Part::new_opaque("a.bin", vec![2])).unwrap_err();
        assert!(matches!(err, Error::DuplicatePart(ref uri) if uri == "a.bin"));
        assert_eq!(pkg.part("a.bin").unwrap().data(), Some(&[1u8][..]));
    }

    #[test]
    fn test_remove_part() {
        let mut pkg = Package::new();
        pkg.add_part(Part::new_opaque("a.bin", vec![1])).unwrap();

        let removed = pkg.remove_part("a.bin").unwrap();
        assert_eq!(removed.uri(), "a.bin");
        assert!(!pkg.contains_part("a.bin"));
    }

    #[test]
    fn test_remove_missing_part() {
        let mut pkg = Package::new();
        pkg.add_part(Part::new_opaque("a.bin", vec![1])).unwrap();

        let err = pkg.remove_part("b.bin").unwrap_err();
        assert!(matches!(err, Error::PartNotFound(ref uri) if uri == "b.bin"));
        assert_eq!(pkg.part_count(), 1);

        assert!(matches!(pkg.get_part("b.bin"), Err(Error::PartNotFound(_))));
    }

    #[test]
    fn test_content_type_lookup() {
        let mut pkg = Package::new();
        pkg.content_types_mut().add_default("xml", "application/xml");
        assert_eq!(pkg.content_type("word/styles.xml"), Some("application/xml"));
        assert_eq!(pkg.content_type("word/media/a.emf"), None);
    }

    #[test]
    fn test_sync_content_types() {
        let mut pkg = Package::new();
        pkg.content_types_mut().add_default("xml", "application/xml");
        pkg.sync_content_types();

        let manifest = pkg.get_part("[Content_Types].xml").unwrap();
        let doc = manifest.xml().unwrap();
        assert_eq!(doc.root.elements_named("Default").count(), 1);

        pkg.content_types_mut().add_default("png", "image/png");
        pkg.sync_content_types();
        let doc = pkg.part("[Content_Types].xml").unwrap().xml().unwrap();
        assert_eq!(doc.root.elements_named("Default").count(), 2);
        assert_eq!(pkg.part_count(), 1);
    }

    #[test]
    fn test_relationship_navigation() {
        let mut pkg = Package::new();
        pkg.add_part(xml_part("word/document.xml", "<w:document/>"))
            .unwrap();
        pkg.add_part(xml_part("word/styles.xml", "<w:styles/>")).unwrap();

        pkg.relationships_mut().push(Relationship {
            id: "rId1".into(),
            rel_type: rel_types::OFFICE_DOCUMENT.into(),
            target: "word/document.xml".into(),
            target_mode: TargetMode::Internal,
            context: None,
            source: "_rels/.rels".into(),
        });
        pkg.relationships_mut().push(Relationship {
            id: "rId1".into(),
            rel_type: rel_types::STYLES.into(),
            target: "styles.xml".into(),
            target_mode: TargetMode::Internal,
            context: Some("word".into()),
            source: "word/_rels/document.xml.rels".into(),
        });

        assert_eq!(pkg.main_part().unwrap().uri(), "word/document.xml");

        let rels: Vec<_> = pkg.part_relationships("word/document.xml").collect();
        assert_eq!(rels.len(), 1);
        assert_eq!(
            pkg.part_for_relationship(rels[0]).unwrap().uri(),
            "word/styles.xml"
        );
    }
}
