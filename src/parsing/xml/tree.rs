//! A small namespace-resolved element tree built on quick-xml's `NsReader`.
//!
//! FMI responses are a few hundred kilobytes at most, so the whole document is
//! materialized and queried by [`ExpandedName`], which keeps queries independent of
//! the prefixes a particular response chose.

use crate::parsing::error::ParseError;
use crate::parsing::xml::namespaces::ExpandedName;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub namespace: Option<String>,
    pub local: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub namespace: Option<String>,
    pub local: String,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn is(&self, name: &ExpandedName) -> bool {
        self.local == name.local && self.namespace == name.namespace
    }

    /// Character content directly inside this element, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn attribute(&self, name: &ExpandedName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.local == name.local && a.namespace == name.namespace)
            .map(|a| a.value.as_str())
    }

    /// All descendants (not `self`) with the given name, depth-first in document order.
    pub fn descendants<'a>(&'a self, name: &ExpandedName) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &ExpandedName, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.is(name) {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// First descendant with the given name.
    pub fn find(&self, name: &ExpandedName) -> Option<&Element> {
        self.children
            .iter()
            .find_map(|child| if child.is(name) { Some(child) } else { child.find(name) })
    }
}

fn namespace_of(result: ResolveResult) -> Option<String> {
    match result {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        _ => None,
    }
}

fn element_from<R>(reader: &NsReader<R>, start: &BytesStart) -> Result<Element, ParseError> {
    let (namespace, local) = reader.resolve_element(start.name());
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let (attr_namespace, attr_local) = reader.resolve_attribute(attr.key);
        attributes.push(XmlAttribute {
            namespace: namespace_of(attr_namespace),
            local: String::from_utf8_lossy(attr_local.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(Element {
        namespace: namespace_of(namespace),
        local: String::from_utf8_lossy(local.as_ref()).into_owned(),
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// A parsed XML document. An empty payload gives a document without a root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    root: Option<Element>,
}

impl XmlDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut reader = NsReader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => stack.push(element_from(&reader, &start)?),
                Event::Empty(start) => {
                    let element = element_from(&reader, &start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        // Unclosed elements at end of input
        while let Some(element) = stack.pop() {
            attach(&mut stack, &mut root, element);
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Descendants of the root with the given name (`.//name` from the root).
    pub fn descendants(&self, name: &ExpandedName) -> Vec<&Element> {
        self.root
            .as_ref()
            .map(|root| root.descendants(name))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::xml::namespaces::NamespaceMap;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<a:root xmlns:a="urn:a" xmlns:b="urn:b" xmlns:xlink="http://www.w3.org/1999/xlink">
  <b:item xlink:href="http://x/y/first">one &amp; two</b:item>
  <a:group>
    <b:item><![CDATA[three]]></b:item>
    <b:item/>
  </a:group>
</a:root>"#;

    fn names() -> NamespaceMap {
        NamespaceMap::default().with("a", "urn:a").with("b", "urn:b")
    }

    #[test]
    fn test_descendants_in_document_order() -> Result<(), ParseError> {
        let doc = XmlDocument::parse(DOC.as_bytes())?;
        let item = names().expand("b:item")?;
        let items = doc.descendants(&item);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text(), "one & two");
        assert_eq!(items[1].text(), "three");
        assert_eq!(items[2].text(), "");
        Ok(())
    }

    #[test]
    fn test_prefix_independent_matching() -> Result<(), ParseError> {
        let doc = XmlDocument::parse(br#"<x:root xmlns:x="urn:b"><x:item/></x:root>"#)?;
        let item = names().expand("b:item")?;
        assert_eq!(doc.descendants(&item).len(), 1);
        Ok(())
    }

    #[test]
    fn test_namespaced_attribute() -> Result<(), ParseError> {
        let doc = XmlDocument::parse(DOC.as_bytes())?;
        let map = names();
        let first = doc.descendants(&map.expand("b:item")?)[0];
        assert_eq!(
            first.attribute(&map.expand("xlink:href")?),
            Some("http://x/y/first")
        );
        assert_eq!(first.attribute(&map.expand("href")?), None);
        Ok(())
    }

    #[test]
    fn test_find_first_descendant() -> Result<(), ParseError> {
        let doc = XmlDocument::parse(DOC.as_bytes())?;
        let map = names();
        let group = doc.descendants(&map.expand("a:group")?)[0];
        let item = group.find(&map.expand("b:item")?).expect("item in group");
        assert_eq!(item.text(), "three");
        Ok(())
    }

    #[test]
    fn test_empty_input_has_no_root() -> Result<(), ParseError> {
        let doc = XmlDocument::parse(b"")?;
        assert!(doc.root().is_none());
        assert!(doc.descendants(&names().expand("b:item")?).is_empty());
        Ok(())
    }
}
