//! Physical ZIP container access
//!
//! Turns archive bytes into named entries and back. Nothing here knows about
//! content types or relationships.

use crate::error::Result;
use std::io::{Cursor, Read, Seek, Write};
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// A named file inside the archive with its uncompressed content
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Read every entry of a ZIP archive, in central directory order.
///
/// Directory entries are kept, named with their trailing `/` and empty data.
pub fn read_entries<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;

        entries.push(ArchiveEntry { name, data });
    }

    Ok(entries)
}

/// Read every file entry of an in-memory ZIP archive
pub fn read_entries_from_bytes(bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    read_entries(Cursor::new(bytes))
}

/// Incrementally writes entries into a ZIP archive
pub struct ArchiveBuilder<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl ArchiveBuilder<Cursor<Vec<u8>>> {
    /// Start an archive in memory
    pub fn in_memory(compression: CompressionMethod) -> Self {
        Self::new(Cursor::new(Vec::new()), compression)
    }

    /// Finish and return the archive bytes
    pub fn finish_to_bytes(self) -> Result<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> ArchiveBuilder<W> {
    /// Start an archive on the given writer
    pub fn new(writer: W, compression: CompressionMethod) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: SimpleFileOptions::default().compression_method(compression),
        }
    }

    /// Add one entry; a name ending in `/` with no data becomes a directory
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if name.ends_with('/') && data.is_empty() {
            self.zip.add_directory(name, self.options)?;
            return Ok(());
        }
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Write the central directory and return the underlying writer
    pub fn finish(self) -> Result<W> {
        Ok(self.zip.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roundtrip_entries() {
        let mut builder = ArchiveBuilder::in_memory(CompressionMethod::Deflated);
        builder.add("[Content_Types].xml", b"<Types/>").unwrap();
        builder.add("word/media/image1.png", &[0x89, 0x50, 0x4e, 0x47]).unwrap();
        let bytes = builder.finish_to_bytes().unwrap();

        let entries = read_entries_from_bytes(&bytes).unwrap();
        assert_eq!(
            entries,
            vec![
                ArchiveEntry::new("[Content_Types].xml", b"<Types/>".to_vec()),
                ArchiveEntry::new("word/media/image1.png", vec![0x89, 0x50, 0x4e, 0x47]),
            ]
        );
    }

    #[test]
    fn test_directory_entries_kept() {
        let mut builder = ArchiveBuilder::in_memory(CompressionMethod::Deflated);
        builder.add("[Content_Types].xml", b"<Types/>").unwrap();
        builder.add("word/", b"").unwrap();
        let bytes = builder.finish_to_bytes().unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        assert!(archive.by_name("word/").unwrap().is_dir());

        let entries = read_entries_from_bytes(&bytes).unwrap();
        assert_eq!(
            entries,
            vec![
                ArchiveEntry::new("[Content_Types].xml", b"<Types/>".to_vec()),
                ArchiveEntry::new("word/", Vec::new()),
            ]
        );
    }

    #[test]
    fn test_stored_compression() {
        let mut builder = ArchiveBuilder::in_memory(CompressionMethod::Stored);
        builder.add("a.txt", b"plain").unwrap();
        let bytes = builder.finish_to_bytes().unwrap();

        let entries = read_entries_from_bytes(&bytes).unwrap();
        assert_eq!(entries[0].data, b"plain".to_vec());
    }

    #[test]
    fn test_not_a_zip() {
        assert!(read_entries_from_bytes(b"definitely not a zip").is_err());
    }
}
