//! A small owned XML element tree.
//!
//! Slide content is kept as structured nodes rather than pre-rendered strings
//! so that later passes can reach into an already inserted shape (fill alpha,
//! attribute injection, paint-order moves) and so that the timing tree can be
//! navigated and extended after it is first created. Escaping happens once, in
//! [`XmlNode::write_to`], through quick-xml.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// An element with ordered attributes, element children and optional text.
///
/// Mixed content is not modelled: an element carries either text or children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: Option<String>,
}

impl XmlNode {
    /// Create an empty element with a qualified name such as `p:cTn`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    /// Builder form of [`XmlNode::set_attr`].
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder form for integer attributes.
    pub fn with_num_attr<N: itoa::Integer>(mut self, key: &str, value: N) -> Self {
        let mut buf = itoa::Buffer::new();
        self.set_attr(key, buf.format(value));
        self
    }

    /// Set an attribute, replacing an existing value and keeping its position.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((key.to_string(), value)),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    // ---------------------------------------------------------------------
    // Children
    // ---------------------------------------------------------------------

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Insert a child at `index`, clamped to the current length.
    pub fn insert(&mut self, index: usize, child: XmlNode) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`.
    pub fn remove(&mut self, index: usize) -> Option<XmlNode> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// First child with the given name, appended empty if missing.
    pub fn child_or_insert(&mut self, name: &str) -> &mut XmlNode {
        let index = match self.children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.children.push(XmlNode::new(name));
                self.children.len() - 1
            },
        };
        &mut self.children[index]
    }

    /// Follow a fixed chain of first-match child names.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    pub fn find_path_mut(&mut self, path: &[&str]) -> Option<&mut XmlNode> {
        let mut node = self;
        for name in path {
            node = node.child_mut(name)?;
        }
        Some(node)
    }

    /// Every descendant (depth-first, pre-order) with the given name.
    pub fn descendants<'a>(&'a self, name: &'a str) -> Vec<&'a XmlNode> {
        let mut out = Vec::new();
        self.collect_descendants(name, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_descendants(name, out);
        }
    }

    // ---------------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------------

    /// Write this element and its subtree as events.
    pub fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> std::io::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            return writer.write_event(Event::Empty(start)).map_err(io_error);
        }

        writer.write_event(Event::Start(start)).map_err(io_error)?;
        if let Some(ref text) = self.text {
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(io_error)?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(io_error)
    }

    /// Append the serialized subtree to a string buffer.
    pub fn write_into(&self, buf: &mut String) -> std::io::Result<()> {
        let mut writer = Writer::new(Vec::with_capacity(256));
        self.write_to(&mut writer)?;
        let bytes = writer.into_inner();
        let text = String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        buf.push_str(&text);
        Ok(())
    }

    /// Serialize the subtree to a standalone string.
    pub fn to_xml_string(&self) -> std::io::Result<String> {
        let mut buf = String::with_capacity(256);
        self.write_into(&mut buf)?;
        Ok(buf)
    }
}

fn io_error<E>(err: E) -> std::io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    std::io::Error::other(err)
}
