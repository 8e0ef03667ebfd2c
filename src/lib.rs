//! # linch-opc
//!
//! Reading and writing Open Packaging Convention (OPC) containers, the ZIP
//! envelope behind DOCX, XLSX and PPTX files.
//!
//! ## Features
//!
//! - Content types resolved from `[Content_Types].xml` defaults and overrides
//! - Relationships from every `.rels` file, with their context directory
//! - XML parts held as generic element trees, everything else as raw bytes
//! - Round-trip: every archive entry is kept as a part and written back
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use linch_opc::Package;
//!
//! let bytes = std::fs::read("example.docx")?;
//! let mut pkg = Package::from_bytes(&bytes)?;
//!
//! for (uri, part) in pkg.parts() {
//!     println!("{} {:?} {:?}", uri, part.kind(), pkg.content_type(uri));
//! }
//!
//! pkg.remove_part("docProps/thumbnail.jpeg")?;
//! std::fs::write("output.docx", pkg.to_bytes()?)?;
//! ```

pub mod error;
pub mod opc;
pub mod xml;

pub use error::{Error, Result};
pub use opc::{
    ContentTypeResolver, Package, PackageReader, PackageWriter, Part, PartContent, PartKind,
    ReadOptions, Relationship, RelationshipSet, WriteOptions,
};
pub use xml::{XmlDocument, XmlElement, XmlOptions};
