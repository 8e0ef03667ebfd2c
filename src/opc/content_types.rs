//! Content type resolution for OPC packages
//!
//! Holds the `Default` and `Override` rules of `[Content_Types].xml`.

use crate::opc::part_uri;
use crate::xml::{self, XmlDocument, XmlElement};
use std::collections::BTreeMap;

/// Content type rules for an OPC package
///
/// Editing the resolver changes how media types are looked up for the rest
/// of the package's lifetime. It is not written back on its own: call
/// [`Package::sync_content_types`](crate::opc::Package::sync_content_types)
/// to refresh the manifest part.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentTypeResolver {
    /// Default extension mappings (extension as declared -> content type)
    defaults: BTreeMap<String, String>,
    /// Override mappings (part name -> content type)
    overrides: BTreeMap<String, String>,
}

impl ContentTypeResolver {
    /// Create a resolver with no rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default extension mapping, returning the one it replaced
    pub fn add_default(
        &mut self,
        extension: &str,
        content_type: impl Into<String>,
    ) -> Option<String> {
        self.defaults.insert(extension.to_string(), content_type.into())
    }

    /// Add an override for a specific part, returning the one it replaced
    pub fn add_override(&mut self, uri: &str, content_type: impl Into<String>) -> Option<String> {
        self.overrides.insert(uri.to_string(), content_type.into())
    }

    /// Remove a default extension mapping
    pub fn remove_default(&mut self, extension: &str) -> Option<String> {
        self.defaults.remove(extension)
    }

    /// Remove an override
    pub fn remove_override(&mut self, uri: &str) -> Option<String> {
        self.overrides.remove(uri)
    }

    /// Get the content type for a part
    ///
    /// Overrides win over extension defaults. `None` means no rule applies,
    /// which callers treat as opaque data.
    pub fn resolve(&self, uri: &str) -> Option<&str> {
        // Check overrides first; entry names lack the leading '/' PartName carries
        if let Some(ct) = self.overrides.get(uri) {
            return Some(ct);
        }
        if !uri.starts_with('/') {
            if let Some(ct) = self.overrides.get(&*part_uri::part_name(uri)) {
                return Some(ct);
            }
        }

        // Fall back to extension default, matched exactly as declared
        part_uri::extension(uri)
            .and_then(|ext| self.defaults.get(ext))
            .map(|s| s.as_str())
    }

    /// Iterate over default mappings in extension order
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over override mappings in part name order
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if there are no rules at all
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.overrides.is_empty()
    }

    /// Render the rules as a `[Content_Types].xml` document
    pub fn to_manifest(&self) -> XmlDocument {
        let mut types = XmlElement::new("Types").with_attr("xmlns", xml::CT);

        for (ext, content_type) in &self.defaults {
            types.push_child(
                XmlElement::new("Default")
                    .with_attr("Extension", ext.as_str())
                    .with_attr("ContentType", content_type.as_str()),
            );
        }

        for (uri, content_type) in &self.overrides {
            types.push_child(
                XmlElement::new("Override")
                    .with_attr("PartName", uri.as_str())
                    .with_attr("ContentType", content_type.as_str()),
            );
        }

        XmlDocument::new(types)
    }
}

// Well-known content types
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
pub const XML: &str = "application/xml";
pub const MAIN_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_default() {
        let mut ct = ContentTypeResolver::new();
        ct.add_default("xml", XML);
        ct.add_override("/word/document.xml", MAIN_DOCUMENT);

        assert_eq!(ct.resolve("/word/document.xml"), Some(MAIN_DOCUMENT));
        assert_eq!(ct.resolve("/word/styles.xml"), Some(XML));
    }

    #[test]
    fn test_override_matches_entry_name_without_slash() {
        let mut ct = ContentTypeResolver::new();
        ct.add_override("/word/document.xml", MAIN_DOCUMENT);

        assert_eq!(ct.resolve("word/document.xml"), Some(MAIN_DOCUMENT));
    }

    #[test]
    fn test_override_is_case_sensitive() {
        let mut ct = ContentTypeResolver::new();
        ct.add_override("/word/document.xml", MAIN_DOCUMENT);

        assert_eq!(ct.resolve("/Word/Document.xml"), None);
    }

    fn common_defaults() -> ContentTypeResolver {
        let mut ct = ContentTypeResolver::new();
        ct.add_default("rels", RELATIONSHIPS);
        ct.add_default("xml", XML);
        ct.add_default("png", "image/png");
        ct
    }

    #[test]
    fn test_get_by_extension() {
        let ct = common_defaults();
        assert_eq!(ct.resolve("/word/media/image1.png"), Some("image/png"));
        assert_eq!(ct.resolve("_rels/.rels"), Some(RELATIONSHIPS));
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let mut ct = common_defaults();
        assert_eq!(ct.resolve("word/media/image1.PNG"), None);
        assert_eq!(ct.resolve("notes.XML"), None);

        ct.add_default("PNG", "image/png");
        assert_eq!(ct.resolve("word/media/image1.PNG"), Some("image/png"));
    }

    #[test]
    fn test_unresolved() {
        let ct = common_defaults();
        assert_eq!(ct.resolve("/word/vbaProject.bin"), None);
        assert_eq!(ct.resolve("/mimetype"), None);
    }

    #[test]
    fn test_empty_content_type_is_not_absence() {
        let mut ct = ContentTypeResolver::new();
        ct.add_default("dat", "");
        assert_eq!(ct.resolve("a.dat"), Some(""));
    }

    #[test]
    fn test_last_write_wins() {
        let mut ct = ContentTypeResolver::new();
        assert_eq!(ct.add_default("xml", "text/xml"), None);
        assert_eq!(ct.add_default("xml", XML), Some("text/xml".to_string()));
        assert_eq!(ct.add_default("XML", "text/xml"), None);
        assert_eq!(
            ct.defaults().collect::<Vec<_>>(),
            vec![("XML", "text/xml"), ("xml", XML)]
        );

        assert_eq!(ct.remove_default("Xml"), None);
        assert_eq!(ct.remove_default("xml"), Some(XML.to_string()));
        assert_eq!(ct.remove_default("XML"), Some("text/xml".to_string()));
        assert!(ct.is_empty());
    }

    #[test]
    fn test_to_manifest() {
        let mut ct = ContentTypeResolver::new();
        ct.add_default("xml", XML);
        ct.add_override("/word/document.xml", MAIN_DOCUMENT);

        let doc = ct.to_manifest();
        assert_eq!(doc.root.name, "Types");
        assert_eq!(doc.root.attr("xmlns"), Some(xml::CT));

        let defaults: Vec<_> = doc.root.elements_named("Default").collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].attr("Extension"), Some("xml"));

        let overrides: Vec<_> = doc.root.elements_named("Override").collect();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].attr("PartName"), Some("/word/document.xml"));
        assert_eq!(overrides[0].attr("ContentType"), Some(MAIN_DOCUMENT));
    }
}
