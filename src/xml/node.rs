//! Generic XML element tree used for round-trip preservation

use quick_xml::events::{BytesCData, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use crate::error::{Error, Result};
use crate::xml::XmlOptions;

/// Deepest element nesting accepted when parsing
pub const MAX_DEPTH: usize = 256;

/// A node inside an element (or before/after the root element)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    /// Element node
    Element(XmlElement),
    /// Text node (unescaped)
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment node (raw)
    Comment(String),
    /// Processing instruction (raw, including target)
    ProcessingInstruction(String),
    /// Document type declaration (raw)
    DocType(String),
}

/// XML element with attributes and ordered children
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    /// Full element name (with prefix, e.g., "w:document")
    pub name: String,
    /// Attributes as (name, value) pairs in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<XmlNode>,
    /// Whether this was a self-closing element
    pub self_closing: bool,
}

impl XmlElement {
    /// Create a new empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Read a complete element from XML reader (starting after the start tag was read)
    ///
    /// Open ancestors are kept on an explicit stack, so input depth never
    /// grows the call stack. Nesting beyond [`MAX_DEPTH`] is an error.
    pub fn from_reader<R: BufRead>(
        reader: &mut Reader<R>,
        start: &BytesStart,
        options: &XmlOptions,
    ) -> Result<Self> {
        let mut current = Self::open(start)?;
        let mut preserve = current.preserves_space(false);
        let mut ancestors: Vec<(XmlElement, bool)> = Vec::new();

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if ancestors.len() + 1 >= MAX_DEPTH {
                        return Err(Error::XmlSyntax(format!(
                            "elements nested deeper than {} levels",
                            MAX_DEPTH
                        )));
                    }
                    let child = Self::open(&e)?;
                    let child_preserve = child.preserves_space(preserve);
                    ancestors.push((std::mem::replace(&mut current, child), preserve));
                    preserve = child_preserve;
                }
                Event::Empty(e) => {
                    current.children.push(XmlNode::Element(Self::from_empty(&e)?));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.into_owned();
                    if options.keep_whitespace_text || preserve || !text.trim().is_empty() {
                        current.push_text(text);
                    }
                }
                Event::CData(c) => {
                    current
                        .children
                        .push(XmlNode::CData(String::from_utf8_lossy(&c).into_owned()));
                }
                Event::Comment(c) => {
                    current
                        .children
                        .push(XmlNode::Comment(String::from_utf8_lossy(&c).into_owned()));
                }
                Event::PI(p) => {
                    current.children.push(XmlNode::ProcessingInstruction(
                        String::from_utf8_lossy(&p).into_owned(),
                    ));
                }
                Event::End(e) => {
                    let end_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if end_name != current.name {
                        return Err(Error::XmlSyntax(format!(
                            "expected </{}>, found </{}>",
                            current.name, end_name
                        )));
                    }
                    match ancestors.pop() {
                        Some((parent, parent_preserve)) => {
                            let child = std::mem::replace(&mut current, parent);
                            current.children.push(XmlNode::Element(child));
                            preserve = parent_preserve;
                        }
                        None => return Ok(current),
                    }
                }
                Event::Eof => {
                    return Err(Error::XmlSyntax(format!(
                        "unexpected end of input inside <{}>",
                        current.name
                    )))
                }
                _ => {
                    return Err(Error::XmlSyntax(format!(
                        "declaration not allowed inside <{}>",
                        current.name
                    )))
                }
            }
            buf.clear();
        }
    }

    /// Element for a start tag whose children are still to come
    fn open(e: &BytesStart) -> Result<Self> {
        let mut element = Self::from_empty(e)?;
        element.self_closing = false;
        Ok(element)
    }

    /// `xml:space` scope of this element given its parent's
    fn preserves_space(&self, inherited: bool) -> bool {
        match self.attr("xml:space") {
            Some("preserve") => true,
            Some("default") => false,
            _ => inherited,
        }
    }

    /// Create from a start or empty element tag (no children)
    pub fn from_empty(e: &BytesStart) -> Result<Self> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                attr.unescape_value()?.into_owned(),
            ));
        }

        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            self_closing: true,
        })
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Get an attribute value by full name, falling back to local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(key, _)| !key.starts_with("xmlns") && local_part(key) == name)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same name
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Iterate over child elements
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements with the given local name
    pub fn elements_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.local_name() == local)
    }

    /// Concatenated text of this element and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
                _ => {}
            }
        }
    }

    /// Append a child element
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
        self.self_closing = false;
    }

    /// Append a text node
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
        self.self_closing = false;
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push_child(child);
        self
    }

    /// Add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }
}

impl XmlNode {
    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            XmlNode::Element(e) => return e.write_to(writer),
            XmlNode::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            XmlNode::CData(c) => writer.write_event(Event::CData(BytesCData::new(c.as_str())))?,
            XmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
            }
            XmlNode::ProcessingInstruction(p) => {
                writer.write_event(Event::PI(BytesPI::new(p.as_str())))?
            }
            XmlNode::DocType(d) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(d.as_str())))?
            }
        }
        Ok(())
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}
