//! XML bridge.
//!
//! Export annotates every element so a document can be read back without
//! guessing: containers and `Null` carry `type`, arrays also carry `count`,
//! and values carry `data-type`. Array elements are written under a
//! synthetic item tag since they have no name of their own.
//!
//! ```
//! use descriptor_tree::Descriptor;
//!
//! let doc = Descriptor::new();
//! doc.add("n").set_int(7);
//! assert_eq!(
//!     doc.to_xml_string(),
//!     r#"<root type="object"><n data-type="int">7</n></root>"#
//! );
//! ```

mod element;

pub use element::XmlElement;

use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::node::{ObjectType, ValueType};

const TYPE_ATTR: &str = "type";
const VALUE_TYPE_ATTR: &str = "data-type";
const COUNT_ATTR: &str = "count";

/// Element names used on export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Tag of the document element.
    pub root_tag: String,
    /// Tag of array elements and of anonymous object members.
    pub item_tag: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            root_tag: "root".to_string(),
            item_tag: "i".to_string(),
        }
    }
}

impl Descriptor {
    /// Creates a new tree from an element.
    pub fn from_xml(element: &XmlElement) -> Descriptor {
        let descriptor = Descriptor::new();
        descriptor.import_xml(element);
        descriptor
    }

    /// Parses XML text into a new tree.
    pub fn from_xml_str(text: &str) -> Result<Descriptor> {
        Ok(Descriptor::from_xml(&XmlElement::parse(text)?))
    }

    /// Replaces this node's content with `element`'s. The element's own tag
    /// is ignored; the node keeps its name.
    ///
    /// An element with child elements becomes an array when it says
    /// `type="array"` and an object otherwise. A leaf becomes an empty
    /// object, array or `Null` when its `type` says so, a value of the
    /// given `data-type`, a value inferred from non-empty text, or `Null`.
    pub fn import_xml(&self, element: &XmlElement) {
        self.clear();
        let object_type = element
            .attribute(TYPE_ATTR)
            .and_then(ObjectType::from_name);

        if !element.children.is_empty() {
            if object_type == Some(ObjectType::Array) {
                self.set_type(ObjectType::Array);
                for child in &element.children {
                    self.add("").import_xml(child);
                }
            } else {
                self.set_type(ObjectType::Object);
                for child in &element.children {
                    self.add(&child.tag).import_xml(child);
                }
            }
            return;
        }

        if let Some(t @ (ObjectType::Object | ObjectType::Array | ObjectType::Null)) = object_type {
            self.set_type(t);
            return;
        }
        match element
            .attribute(VALUE_TYPE_ATTR)
            .and_then(ValueType::from_name)
        {
            Some(value_type) => {
                self.set_text(&element.text, value_type);
            }
            None if !element.text.is_empty() => {
                self.set_from_str(&element.text);
            }
            None => {}
        }
    }

    /// Exports with the default element names.
    pub fn to_xml(&self) -> XmlElement {
        self.to_xml_with(&XmlOptions::default())
    }

    pub fn to_xml_with(&self, options: &XmlOptions) -> XmlElement {
        self.element(&options.root_tag, options)
    }

    fn element(&self, tag: &str, options: &XmlOptions) -> XmlElement {
        let mut element = XmlElement::new(tag);
        let object_type = self.object_type();
        match object_type {
            ObjectType::Value => {
                element.set_attribute(VALUE_TYPE_ATTR, self.value_type().name());
                element.text = self.value_text().unwrap_or_default();
            }
            ObjectType::Null => element.set_attribute(TYPE_ATTR, object_type.name()),
            ObjectType::Array => {
                element.set_attribute(TYPE_ATTR, object_type.name());
                let members = self.members();
                element.set_attribute(COUNT_ATTR, members.len().to_string());
                element.children = members
                    .iter()
                    .map(|member| member.element(&options.item_tag, options))
                    .collect();
            }
            ObjectType::Object => {
                element.set_attribute(TYPE_ATTR, object_type.name());
                element.children = self
                    .members()
                    .iter()
                    .map(|member| {
                        let name = member.name();
                        let tag = if name.is_empty() {
                            &options.item_tag
                        } else {
                            &name
                        };
                        member.element(tag, options)
                    })
                    .collect();
            }
        }
        element
    }

    pub fn to_xml_string(&self) -> String {
        self.to_xml().to_xml_string()
    }

    pub fn to_xml_string_pretty(&self) -> String {
        self.to_xml().to_xml_string_pretty()
    }
}
