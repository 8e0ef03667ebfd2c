//! Archive -> Package
//!
//! Reads the content types manifest and every relationships file, then
//! classifies and parses each archive entry into a [`Part`].

use crate::error::{Error, Result};
use crate::opc::archive::{self, ArchiveEntry};
use crate::opc::{part_uri, ContentTypeResolver, Package, Part, PartKind, RelationshipSet};
use crate::xml::{XmlDocument, XmlOptions};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};

/// Options for reading a package
#[derive(Clone, Debug, Default)]
pub struct ReadOptions {
    /// Options for every XML parse done while reading
    pub xml: XmlOptions,
}

/// Builds [`Package`] instances from archive data
pub struct PackageReader;

impl PackageReader {
    /// Read a package from ZIP bytes
    pub fn read_bytes(bytes: &[u8], options: &ReadOptions) -> Result<Package> {
        Self::read_from(Cursor::new(bytes), options)
    }

    /// Read a package from a seekable reader
    pub fn read_from<R: Read + Seek>(reader: R, options: &ReadOptions) -> Result<Package> {
        let entries = archive::read_entries(reader)?;
        Self::read_entries(entries, options)
    }

    /// Build a package from already-extracted archive entries.
    ///
    /// Every entry becomes exactly one part, the manifest and relationships
    /// files included. Any failure aborts the whole read.
    pub fn read_entries(entries: Vec<ArchiveEntry>, options: &ReadOptions) -> Result<Package> {
        log::debug!("reading package with {} entries", entries.len());

        // Step 1: [Content_Types].xml
        let manifest = entries
            .iter()
            .find(|e| e.name == part_uri::CONTENT_TYPES)
            .ok_or(Error::MissingContentTypes)?;
        let content_types = read_content_types(&manifest.data, &options.xml)
            .map_err(|e| e.in_entry(&manifest.name))?;

        // Step 2: relationships, in entry order
        let relationships = read_relationships(&entries, &options.xml)?;

        // Step 3: every entry becomes a part
        let mut parts = BTreeMap::new();
        for entry in entries {
            let media_type = content_types.resolve(&entry.name);
            let kind = PartKind::from_media_type(media_type);
            log::trace!("{} -> {:?} ({:?})", entry.name, media_type, kind);

            if parts.contains_key(&entry.name) {
                return Err(Error::DuplicatePart(entry.name));
            }
            let part = Part::parse(entry.name, entry.data, kind, &options.xml)?;
            parts.insert(part.uri().to_string(), part);
        }

        log::debug!(
            "read {} parts and {} relationships",
            parts.len(),
            relationships.len()
        );

        Ok(Package::assemble(content_types, parts, relationships))
    }
}

/// Build the resolver from `[Content_Types].xml` content
fn read_content_types(data: &[u8], options: &XmlOptions) -> Result<ContentTypeResolver> {
    let doc = XmlDocument::parse_bytes(data, options)?;
    let mut ct = ContentTypeResolver::new();

    for element in doc.root.elements() {
        let key = match element.local_name() {
            "Default" => "Extension",
            "Override" => "PartName",
            _ => continue,
        };
        let (Some(name), Some(content_type)) = (element.attr(key), element.attr("ContentType"))
        else {
            log::warn!("skipping <{}> without {} or ContentType", element.name, key);
            continue;
        };

        if key == "Extension" {
            ct.add_default(name, content_type);
        } else {
            ct.add_override(name, content_type);
        }
    }

    Ok(ct)
}

/// Collect relationships from every relationships entry
fn read_relationships(entries: &[ArchiveEntry], options: &XmlOptions) -> Result<RelationshipSet> {
    let mut rels = RelationshipSet::new();

    for entry in entries.iter().filter(|e| part_uri::is_relationships(&e.name)) {
        let doc = XmlDocument::parse_bytes(&entry.data, options)
            .map_err(|e| e.in_entry(&entry.name))?;
        rels.read_file(&entry.name, &doc);
    }

    Ok(rels)
}
