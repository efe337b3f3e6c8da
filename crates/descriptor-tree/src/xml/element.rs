//! Owned XML element model.
//!
//! Parsing runs quick-xml's event reader without trimming, so leaf text is
//! kept byte for byte. Text that sits between child elements is dropped
//! when the element is closed: an element holds either text or children.

use quick_xml::escape::{escape, resolve_xml_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::error::{DescriptorError, Result};
use crate::node::MAX_DEPTH;

/// One XML element with its attributes, text content and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

fn xml_error(e: impl std::fmt::Display) -> DescriptorError {
    DescriptorError::Xml(e.to_string())
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing one of the same name.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Parses a document with exactly one root element. Elements nested
    /// deeper than [`MAX_DEPTH`] below the root are rejected.
    pub fn parse(input: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(e) => {
                    if root.is_some() {
                        return Err(xml_error("more than one root element"));
                    }
                    check_depth(&stack)?;
                    stack.push(start_element(&e)?);
                }
                Event::Empty(e) => {
                    if root.is_some() {
                        return Err(xml_error("more than one root element"));
                    }
                    check_depth(&stack)?;
                    let element = start_element(&e)?;
                    close(element, &mut stack, &mut root);
                }
                Event::End(_) => match stack.pop() {
                    Some(element) => close(element, &mut stack, &mut root),
                    None => return Err(xml_error("unexpected closing tag")),
                },
                Event::Text(e) => {
                    let text = e.decode().map_err(xml_error)?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(e) => {
                    let text = std::str::from_utf8(e.as_ref()).map_err(xml_error)?;
                    push_text(&mut stack, text)?;
                }
                Event::GeneralRef(e) => {
                    let raw = e.decode().map_err(xml_error)?;
                    let resolved = resolve_entity(&raw)?;
                    push_text(&mut stack, &resolved)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(xml_error(format!("unclosed element <{}>", open.tag)));
        }
        let root = root.ok_or_else(|| xml_error("no root element"))?;
        trace!(tag = %root.tag, children = root.children.len(), "parsed XML document");
        Ok(root)
    }

    /// Compact serialization without an XML declaration.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, None, 0);
        out
    }

    /// Serialization with each child element on its own line, indented by
    /// two spaces per level. Leaf text is written inline and stays intact.
    pub fn to_xml_string_pretty(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, Some("  "), 0);
        out
    }

    fn write(&self, out: &mut String, indent: Option<&str>, depth: usize) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() && self.text.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        if self.children.is_empty() {
            out.push_str(&escape(self.text.as_str()));
        } else {
            for child in &self.children {
                if let Some(unit) = indent {
                    out.push('\n');
                    out.push_str(&unit.repeat(depth + 1));
                }
                child.write(out, indent, depth + 1);
            }
            if let Some(unit) = indent {
                out.push('\n');
                out.push_str(&unit.repeat(depth));
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement> {
    let tag = std::str::from_utf8(e.name().as_ref())
        .map_err(xml_error)?
        .to_string();
    let mut element = XmlElement::new(tag);
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(xml_error)?
            .to_string();
        let value = attr.unescape_value().map_err(xml_error)?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn check_depth(stack: &[XmlElement]) -> Result<()> {
    if stack.len() > MAX_DEPTH {
        return Err(xml_error(format!("nesting deeper than {MAX_DEPTH} levels")));
    }
    Ok(())
}

fn close(mut element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    if !element.children.is_empty() {
        element.text.clear();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(xml_error("text outside of the root element")),
    }
}

/// Resolves a predefined entity or a character reference.
fn resolve_entity(raw: &str) -> Result<String> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.to_string());
    }
    let code = match raw.strip_prefix('#') {
        Some(rest) => match rest.strip_prefix('x').or_else(|| rest.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => rest.parse::<u32>().ok(),
        },
        None => return Err(xml_error(format!("unknown entity &{raw};"))),
    };
    code.and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| xml_error(format!("invalid character reference &{raw};")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let root = XmlElement::parse(
            r#"<?xml version="1.0"?>
<root type="object">
  <name data-type="string">widget</name>
  <tags type="array" count="1"><i>blue</i></tags>
</root>"#,
        )
        .unwrap();
        assert_eq!(root.tag, "root");
        assert_eq!(root.attribute("type"), Some("object"));
        assert_eq!(root.text, "");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "widget");
        assert_eq!(root.children[1].children[0].tag, "i");
    }

    #[test]
    fn leaf_text_is_not_trimmed() {
        let root = XmlElement::parse("<a>  padded </a>").unwrap();
        assert_eq!(root.text, "  padded ");
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let root = XmlElement::parse("<a>x &amp; y &#65;&#x42;<![CDATA[<z>]]></a>").unwrap();
        assert_eq!(root.text, "x & y AB<z>");
    }

    #[test]
    fn writer_escapes_and_round_trips() {
        let mut root = XmlElement::new("root");
        root.set_attribute("note", "a \"quoted\" <value>");
        let mut child = XmlElement::new("c");
        child.text = "1 < 2 & 3".to_string();
        root.children.push(child);
        root.children.push(XmlElement::new("empty"));

        let text = root.to_xml_string();
        assert_eq!(XmlElement::parse(&text).unwrap(), root);
        assert_eq!(XmlElement::parse(&root.to_xml_string_pretty()).unwrap(), root);
    }

    #[test]
    fn pretty_output_indents_children() {
        let mut root = XmlElement::new("r");
        let mut a = XmlElement::new("a");
        a.text = "1".to_string();
        root.children.push(a);
        assert_eq!(root.to_xml_string_pretty(), "<r>\n  <a>1</a>\n</r>");
    }

    #[test]
    fn set_attribute_replaces() {
        let mut e = XmlElement::new("x");
        e.set_attribute("type", "array");
        e.set_attribute("type", "object");
        assert_eq!(e.attributes.len(), 1);
        assert_eq!(e.attribute("type"), Some("object"));
    }

    fn nested(levels: usize) -> String {
        format!("{}1{}", "<a>".repeat(levels), "</a>".repeat(levels))
    }

    #[test]
    fn nesting_is_limited() {
        let root = XmlElement::parse(&nested(MAX_DEPTH + 1)).unwrap();
        assert_eq!(root.children.len(), 1);
        for levels in [MAX_DEPTH + 2, 200_000] {
            assert!(matches!(
                XmlElement::parse(&nested(levels)),
                Err(DescriptorError::Xml(_))
            ));
        }
        let empty_leaf = format!(
            "{}<b/>{}",
            "<a>".repeat(MAX_DEPTH + 1),
            "</a>".repeat(MAX_DEPTH + 1)
        );
        assert!(XmlElement::parse(&empty_leaf).is_err());
    }

    #[test]
    fn malformed_documents_are_rejected() {
        for input in ["", "<a>", "<a></b>", "<a/><b/>", "text", "<a>&bogus;</a>"] {
            assert!(
                matches!(XmlElement::parse(input), Err(DescriptorError::Xml(_))),
                "{input:?}"
            );
        }
    }
}
