//! Part name helpers for OPC packages
//!
//! Parts are keyed by their archive entry name exactly as stored
//! (`word/document.xml`, or `/word/document.xml` if the archive was written
//! that way). These helpers work on either form without normalizing it.

use std::borrow::Cow;

/// Archive entry name of the content types manifest
pub const CONTENT_TYPES: &str = "[Content_Types].xml";

/// Directory holding relationship files
pub const RELS_DIR: &str = "_rels";

/// Get the file name portion (everything after the last '/')
pub fn file_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Get the file extension (without the dot) of the file name
pub fn extension(uri: &str) -> Option<&str> {
    file_name(uri)
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Get the parent directory (everything before the last '/')
///
/// `word/document.xml` gives `word`, `/doc.xml` gives the empty root,
/// `doc.xml` has no parent.
pub fn parent(uri: &str) -> Option<&str> {
    uri.rfind('/').map(|pos| &uri[..pos])
}

/// Check if this entry is a relationships file
///
/// Matches a file named `.rels` or any file with a `.rels` extension,
/// ignoring case.
pub fn is_relationships(uri: &str) -> bool {
    file_name(uri).to_ascii_lowercase().ends_with(".rels")
}

/// Infer the logical directory a relationships file describes.
///
/// For `/word/_rels/document.xml.rels`, returns `/word`. Files in the
/// package-root `_rels` directory return `None`.
pub fn relationships_context(rels_uri: &str) -> Option<String> {
    let rels_dir = parent(rels_uri)?;
    let context = parent(rels_dir)?;
    if context.is_empty() || context == "/" {
        None
    } else {
        Some(context.to_string())
    }
}

/// Get the relationships file name for a part.
///
/// For `/word/document.xml`, returns `/word/_rels/document.xml.rels`
pub fn relationships_uri(uri: &str) -> String {
    match parent(uri) {
        Some(dir) => format!("{}/{}/{}.rels", dir, RELS_DIR, file_name(uri)),
        None => format!("{}/{}.rels", RELS_DIR, file_name(uri)),
    }
}

/// Get the OPC part name form (leading '/') of an entry name
pub fn part_name(uri: &str) -> Cow<'_, str> {
    if uri.starts_with('/') {
        Cow::Borrowed(uri)
    } else {
        Cow::Owned(format!("/{}", uri))
    }
}

/// Resolve a relationship target against its context directory.
///
/// Returns an absolute part name. For context `/word` and
/// `../media/image1.png`, returns `/media/image1.png`.
pub fn resolve(context: Option<&str>, target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    if !target.starts_with('/') {
        if let Some(base) = context {
            segments.extend(base.split('/').filter(|s| !s.is_empty()));
        }
    }

    for segment in target.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    format!("/{}", segments.join("/"))
}
