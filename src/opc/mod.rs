//! Open Packaging Convention (OPC) implementation
//!
//! This module handles the ZIP-based package format used by DOCX, XLSX and
//! PPTX files.

pub mod archive;
mod content_types;
mod package;
mod part;
pub mod part_uri;
mod reader;
mod relationships;
mod writer;

pub use archive::{ArchiveBuilder, ArchiveEntry};
pub use content_types::{ContentTypeResolver, MAIN_DOCUMENT, RELATIONSHIPS, XML};
pub use package::Package;
pub use part::{Part, PartContent, PartKind};
pub use reader::{PackageReader, ReadOptions};
pub use relationships::{rel_types, Relationship, RelationshipSet, TargetMode};
pub use writer::{PackageWriter, WriteOptions};
pub use zip::CompressionMethod;
