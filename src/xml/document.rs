//! Whole-document parsing and serialization

use quick_xml::events::{BytesDecl, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::xml::{XmlElement, XmlNode, XmlOptions};

/// The `<?xml ...?>` declaration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    /// `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>`, as Office writes it
    fn default() -> Self {
        Self {
            version: "1.0".into(),
            encoding: Some("UTF-8".into()),
            standalone: Some("yes".into()),
        }
    }
}

/// A parsed XML document: declaration, root element and the nodes around it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDocument {
    pub declaration: Option<XmlDeclaration>,
    /// Comments, processing instructions and doctype before the root
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
    /// Comments and processing instructions after the root
    pub epilog: Vec<XmlNode>,
}

impl XmlDocument {
    /// Create a document with the standard declaration
    pub fn new(root: XmlElement) -> Self {
        Self {
            declaration: Some(XmlDeclaration::default()),
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse UTF-8 bytes (a leading BOM is skipped)
    pub fn parse_bytes(bytes: &[u8], options: &XmlOptions) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Self::parse(text, options)
    }

    /// Parse from XML string
    pub fn parse(xml: &str, options: &XmlOptions) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut epilog = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf)?;

            let element = match event {
                Event::Decl(d) => {
                    let version = String::from_utf8_lossy(&d.version()?).into_owned();
                    let encoding = d
                        .encoding()
                        .transpose()?
                        .map(|v| String::from_utf8_lossy(&v).into_owned());
                    let standalone = d
                        .standalone()
                        .transpose()?
                        .map(|v| String::from_utf8_lossy(&v).into_owned());
                    declaration = Some(XmlDeclaration {
                        version,
                        encoding,
                        standalone,
                    });
                    None
                }
                Event::Start(e) => Some(XmlElement::from_reader(&mut reader, &e, options)?),
                Event::Empty(e) => Some(XmlElement::from_empty(&e)?),
                Event::Text(t) => {
                    if !t.unescape()?.trim().is_empty() {
                        return Err(Error::XmlSyntax("text outside the root element".into()));
                    }
                    None
                }
                Event::Comment(c) => {
                    let node = XmlNode::Comment(String::from_utf8_lossy(&c).into_owned());
                    push_outside(&root, &mut prolog, &mut epilog, node);
                    None
                }
                Event::PI(p) => {
                    let node =
                        XmlNode::ProcessingInstruction(String::from_utf8_lossy(&p).into_owned());
                    push_outside(&root, &mut prolog, &mut epilog, node);
                    None
                }
                Event::DocType(d) => {
                    prolog.push(XmlNode::DocType(String::from_utf8_lossy(&d).into_owned()));
                    None
                }
                Event::Eof => break,
                _ => {
                    return Err(Error::XmlSyntax(
                        "unexpected markup outside the root element".into(),
                    ))
                }
            };

            if let Some(element) = element {
                if root.is_some() {
                    return Err(Error::XmlSyntax("more than one root element".into()));
                }
                root = Some(element);
            }
            buf.clear();
        }

        let root = root.ok_or_else(|| Error::XmlSyntax("no root element".into()))?;

        Ok(Self {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize to XML string
    pub fn to_xml(&self, options: &XmlOptions) -> Result<String> {
        let bytes = self.to_bytes(options)?;
        Ok(String::from_utf8(bytes).map_err(|e| e.utf8_error())?)
    }

    /// Serialize to UTF-8 bytes
    pub fn to_bytes(&self, options: &XmlOptions) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, options)?;
        Ok(buf)
    }

    /// Write to a writer
    pub fn write_to<W: std::io::Write>(&self, writer: W, options: &XmlOptions) -> Result<()> {
        let mut xml = match options.indent {
            Some(size) => Writer::new_with_indent(writer, b' ', size),
            None => Writer::new(writer),
        };

        if let Some(decl) = &self.declaration {
            xml.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }

        for node in &self.prolog {
            node.write_to(&mut xml)?;
        }
        self.root.write_to(&mut xml)?;
        for node in &self.epilog {
            node.write_to(&mut xml)?;
        }

        Ok(())
    }
}

fn push_outside(
    root: &Option<XmlElement>,
    prolog: &mut Vec<XmlNode>,
    epilog: &mut Vec<XmlNode>,
    node: XmlNode,
) {
    if root.is_some() {
        epilog.push(node);
    } else {
        prolog.push(node);
    }
}
