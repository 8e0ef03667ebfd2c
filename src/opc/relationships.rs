//! Relationships handling for OPC packages
//!
//! Collects the declarations of every `.rels` file in a package into one
//! ordered set.

use crate::opc::part_uri;
use crate::xml::{self, XmlDocument, XmlElement};

/// Ordered collection of relationships from all relationship files
///
/// Order follows archive entry order, then declaration order within each
/// file. Nothing is deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationshipSet {
    items: Vec<Relationship>,
}

/// A single relationship
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1"), unique within its file only
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to `context`) or external URI
    pub target: String,
    /// Target mode
    pub target_mode: TargetMode,
    /// Directory the relationships file describes (`None` for the package root)
    pub context: Option<String>,
    /// Entry name of the relationships file that declared this relationship
    pub source: String,
}

/// Target mode for relationships
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// Internal target (part within the package)
    #[default]
    Internal,
    /// External target (hyperlink, etc.)
    External,
}

impl Relationship {
    /// Check if the target lives outside the package
    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }

    /// Absolute part name of an internal target
    pub fn target_part_name(&self) -> Option<String> {
        if self.is_external() {
            return None;
        }
        Some(part_uri::resolve(self.context.as_deref(), &self.target))
    }

    /// Render as a `Relationship` element
    pub fn to_element(&self) -> XmlElement {
        let elem = XmlElement::new("Relationship")
            .with_attr("Id", self.id.as_str())
            .with_attr("Type", self.rel_type.as_str())
            .with_attr("Target", self.target.as_str());

        if self.is_external() {
            elem.with_attr("TargetMode", "External")
        } else {
            elem
        }
    }
}

impl RelationshipSet {
    /// Create empty relationships
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the relationships declared in one relationships file.
    ///
    /// `source` is the file's entry name; the context is inferred from it.
    /// Elements lacking `Id`, `Type` or `Target` are skipped with a warning.
    /// Returns the number of relationships added.
    pub fn read_file(&mut self, source: &str, doc: &XmlDocument) -> usize {
        let context = part_uri::relationships_context(source);
        let before = self.items.len();

        for element in doc.root.elements_named("Relationship") {
            let Some(mut rel) = parse_relationship(element) else {
                log::warn!("{}: skipping Relationship without Id, Type or Target", source);
                continue;
            };
            rel.context = context.clone();
            rel.source = source.to_string();
            self.items.push(rel);
        }

        self.items.len() - before
    }

    /// Render the relationships declared by one file as a `.rels` document
    pub fn to_document(&self, source: &str) -> XmlDocument {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", xml::PR);
        for rel in self.from_source(source) {
            root.push_child(rel.to_element());
        }
        XmlDocument::new(root)
    }

    /// Get a relationship by the file that declared it and its ID
    pub fn get(&self, source: &str, id: &str) -> Option<&Relationship> {
        self.items
            .iter()
            .find(|r| r.source == source && r.id == id)
    }

    /// Get a relationship by type (returns first match)
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Get all relationships of a given type
    pub fn all_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.items
            .iter()
            .filter(|r| r.rel_type == rel_type)
            .collect()
    }

    /// Relationships whose context is the given directory (`None` = package root)
    pub fn for_context<'a>(
        &'a self,
        context: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Relationship> {
        self.items
            .iter()
            .filter(move |r| r.context.as_deref() == context)
    }

    /// Package-level relationships
    pub fn package_level(&self) -> impl Iterator<Item = &Relationship> {
        self.for_context(None)
    }

    /// Relationships declared by the given relationships file
    pub fn from_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.source == source)
    }

    /// Append a relationship
    pub fn push(&mut self, rel: Relationship) {
        self.items.push(rel);
    }

    /// Remove a relationship by the file that declared it and its ID
    pub fn remove(&mut self, source: &str, id: &str) -> Option<Relationship> {
        let pos = self
            .items
            .iter()
            .position(|r| r.source == source && r.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Iterate over all relationships
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a RelationshipSet {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Parse a single Relationship element, `None` if a required attribute is absent
fn parse_relationship(element: &XmlElement) -> Option<Relationship> {
    let target_mode = match element.attr("TargetMode") {
        Some("External") => TargetMode::External,
        _ => TargetMode::Internal,
    };

    Some(Relationship {
        id: element.attr("Id")?.to_string(),
        rel_type: element.attr("Type")?.to_string(),
        target: element.attr("Target")?.to_string(),
        target_mode,
        context: None,
        source: String::new(),
    })
}

// Well-known relationship types
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
}
