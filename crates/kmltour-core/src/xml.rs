//! Transient XML element tree produced by the render engine
//!
//! Rendering builds an [`Element`] tree that callers can inspect directly or
//! serialize with [`Element::to_xml_string`]. Raw change fragments for
//! animated updates are parsed into the same tree with [`parse_fragment`].

use crate::error::Result;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node inside an [`Element`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Text content (escaped on write)
    Text(String),
    /// CDATA section
    CData(String),
    /// XML comment, stored already escaped
    Comment(String),
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name, e.g. `gx:FlyTo`
    pub name: String,
    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,
    /// Child nodes in insertion order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element holding a single text node
    #[must_use]
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    /// Set (or replace) an attribute
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attributes.push((key, value));
        }
    }

    /// Builder form of [`Element::set_attr`]
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Look up an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append a child element
    #[inline]
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append any node
    #[inline]
    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Iterate over child elements only
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given qualified name
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// Text of the first child element with the given name
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// First descendant (depth-first, document order) with the given name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        for child in self.elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text and CDATA content of this element's direct children
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Comments attached directly to this element
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|n| match n {
            Node::Comment(c) => Some(c.as_str()),
            _ => None,
        })
    }

    /// Serialize the element (and its subtree)
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails or produces invalid UTF-8.
    pub fn to_xml_string(&self, indent: bool) -> Result<String> {
        let mut writer = if indent {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };
        write_element(&mut writer, self)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

pub(crate) fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
            Node::CData(t) => writer.write_event(Event::CData(BytesCData::new(t.as_str())))?,
            Node::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Parse a raw markup fragment (one or more sibling elements) into nodes
///
/// Whitespace-only text between elements is dropped.
///
/// # Errors
///
/// Returns [`crate::KmlError::Xml`] if the fragment is not well formed.
pub fn parse_fragment(fragment: &str) -> Result<Vec<Node>> {
    let mut reader = Reader::from_str(fragment);
    reader.trim_text(true);

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_to_element(&e)?),
            Event::Empty(e) => {
                let element = start_to_element(&e)?;
                attach(&mut stack, &mut roots, Node::Element(element));
            }
            Event::End(_) => {
                if let Some(done) = stack.pop() {
                    attach(&mut stack, &mut roots, Node::Element(done));
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?.into_owned();
                attach(&mut stack, &mut roots, Node::Text(text));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                attach(&mut stack, &mut roots, Node::CData(text));
            }
            Event::Comment(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                attach(&mut stack, &mut roots, Node::Comment(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Unclosed elements are kept rather than silently dropped
    while let Some(open) = stack.pop() {
        attach(&mut stack, &mut roots, Node::Element(open));
    }

    Ok(roots)
}

fn start_to_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.push_node(node),
        None => roots.push(node),
    }
}
