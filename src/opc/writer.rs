//! Package -> Archive
//!
//! Parts are the only source of truth: content types and relationships are
//! written exactly as their own parts hold them, never regenerated here.

use crate::error::Result;
use crate::opc::archive::{ArchiveBuilder, ArchiveEntry};
use crate::opc::Package;
use crate::xml::XmlOptions;
use std::io::{Seek, Write};
use zip::CompressionMethod;

/// Options for writing a package
#[derive(Clone, Debug)]
pub struct WriteOptions {
    /// Options for XML serialization of every XML part
    pub xml: XmlOptions,
    /// Compression method for every entry
    pub compression: CompressionMethod,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            xml: XmlOptions::default(),
            compression: CompressionMethod::Deflated,
        }
    }
}

/// Serializes [`Package`] instances to archive data
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize every part to an archive entry, in part name order
    pub fn to_entries(package: &Package, options: &WriteOptions) -> Result<Vec<ArchiveEntry>> {
        log::debug!("writing {} parts", package.part_count());

        package
            .parts()
            .map(|(uri, part)| -> Result<ArchiveEntry> {
                log::trace!("{} ({:?})", uri, part.kind());
                Ok(ArchiveEntry::new(uri, part.to_bytes(&options.xml)?))
            })
            .collect()
    }

    /// Serialize the package to ZIP bytes
    pub fn to_bytes(package: &Package, options: &WriteOptions) -> Result<Vec<u8>> {
        let mut builder = ArchiveBuilder::in_memory(options.compression);
        Self::add_parts(&mut builder, package, options)?;
        builder.finish_to_bytes()
    }

    /// Write the package as a ZIP archive to a seekable writer
    pub fn write_to<W: Write + Seek>(
        package: &Package,
        writer: W,
        options: &WriteOptions,
    ) -> Result<W> {
        let mut builder = ArchiveBuilder::new(writer, options.compression);
        Self::add_parts(&mut builder, package, options)?;
        builder.finish()
    }

    fn add_parts<W: Write + Seek>(
        builder: &mut ArchiveBuilder<W>,
        package: &Package,
        options: &WriteOptions,
    ) -> Result<()> {
        for entry in Self::to_entries(package, options)? {
            builder.add(&entry.name, &entry.data)?;
        }
        Ok(())
    }
}
