//! A minimal element tree over quick-xml.
//!
//! The wire formats only use elements, attributes and text, so that is all
//! this keeps. Whitespace-only text between child elements is dropped; leaf
//! text is kept exactly.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{CodecError, CodecResult};

/// One XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// `name` may carry a namespace prefix, e.g. `me:data`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A leaf element holding `text`.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Name as written, including any prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Own text followed by the text of every descendant, in document order.
    pub fn inner_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child with this local name.
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    /// Attribute by local name.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| local(name) == local_name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> CodecResult<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(open(&start)?),
                Event::Empty(start) => {
                    let element = open(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| CodecError::Xml("unbalanced end tag".into()))?;
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => return Err(CodecError::Xml("text outside the root element".into())),
                    }
                }
                Event::CData(data) => {
                    let data = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|e| CodecError::Xml(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&data);
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(CodecError::Xml("unexpected end of document".into()));
        }
        root.ok_or_else(|| CodecError::Xml("document has no root element".into()))
    }

    /// Compact serialization without an XML declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape(value.as_str()));
        }
        if self.children.is_empty() && self.text.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&escape(self.text.as_str()));
        for child in &self.children {
            child.write_to(out);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn open(start: &BytesStart<'_>) -> CodecResult<Element> {
    let name = String::from_utf8(start.name().as_ref().to_vec())
        .map_err(|e| CodecError::Xml(e.to_string()))?;
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8(attribute.key.as_ref().to_vec())
            .map_err(|e| CodecError::Xml(e.to_string()))?;
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> CodecResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(CodecError::Xml("more than one root element".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefixed_names_and_attributes() {
        let root = Element::parse(
            r#"<?xml version="1.0"?><me:env xmlns:me="urn:x"><me:sig key_id="a2V5">c2ln</me:sig></me:env>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "me:env");
        assert_eq!(root.local_name(), "env");
        let sig = root.child("sig").unwrap();
        assert_eq!(sig.attribute("key_id"), Some("a2V5"));
        assert_eq!(sig.text(), "c2ln");
    }

    #[test]
    fn keeps_leaf_whitespace_and_unescapes() {
        let root = Element::parse("<a>\n  <b>  x &amp; y </b>\n  <c/>\n</a>").unwrap();
        assert_eq!(root.text(), "");
        assert_eq!(root.child("b").unwrap().text(), "  x & y ");
        assert_eq!(root.child("c").unwrap().text(), "");
    }

    #[test]
    fn writes_escaped_compact_xml() {
        let element = Element::new("post")
            .with_child(Element::leaf("text", "<b>bold</b> & more"))
            .with_child(Element::new("empty"));
        assert_eq!(
            element.to_xml(),
            "<post><text>&lt;b&gt;bold&lt;/b&gt; &amp; more</text><empty/></post>"
        );
        assert_eq!(Element::parse(&element.to_xml()).unwrap(), element);
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(Element::parse("<a><b></a>").is_err());
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a/><b/>").is_err());
    }
}
