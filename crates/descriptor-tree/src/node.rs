//! Per-node payload stored in the arena.

use std::fmt;

use crate::arena::NodeId;

/// Deepest nesting accepted from binary or XML input. The root sits at
/// depth 0.
pub const MAX_DEPTH: usize = 512;

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectType {
    Null = 0,
    Object = 1,
    Array = 2,
    Value = 3,
}

impl ObjectType {
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Null,
        ObjectType::Object,
        ObjectType::Array,
        ObjectType::Value,
    ];

    /// Lowercase name used by the XML `type` attribute.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Null => "null",
            ObjectType::Object => "object",
            ObjectType::Array => "array",
            ObjectType::Value => "value",
        }
    }

    /// Case-insensitive inverse of [`ObjectType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar sub-kind of a `Value` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    None = 0,
    String = 1,
    Bool = 2,
    Int = 3,
    Float = 4,
}

impl ValueType {
    pub const ALL: [ValueType; 5] = [
        ValueType::None,
        ValueType::String,
        ValueType::Bool,
        ValueType::Int,
        ValueType::Float,
    ];

    /// Lowercase name used by the XML `data-type` attribute.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape and content of a node.
///
/// A `Value` with [`ValueType::None`] is the state of a freshly constructed
/// descriptor: it has not been written yet and is promoted to a container by
/// the first `add`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    Null,
    Object(Vec<NodeId>),
    Array(Vec<NodeId>),
    Value { text: String, value_type: ValueType },
}

impl NodeKind {
    /// Empty node of the given type.
    pub(crate) fn empty(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::Null => NodeKind::Null,
            ObjectType::Object => NodeKind::Object(Vec::new()),
            ObjectType::Array => NodeKind::Array(Vec::new()),
            ObjectType::Value => NodeKind::Value {
                text: String::new(),
                value_type: ValueType::None,
            },
        }
    }

    pub(crate) fn object_type(&self) -> ObjectType {
        match self {
            NodeKind::Null => ObjectType::Null,
            NodeKind::Object(_) => ObjectType::Object,
            NodeKind::Array(_) => ObjectType::Array,
            NodeKind::Value { .. } => ObjectType::Value,
        }
    }

    pub(crate) fn value_type(&self) -> ValueType {
        match self {
            NodeKind::Value { value_type, .. } => *value_type,
            _ => ValueType::None,
        }
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Object(children) | NodeKind::Array(children) => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Object(children) | NodeKind::Array(children) => Some(children),
            _ => None,
        }
    }

    pub(crate) fn text(&self) -> Option<&str> {
        match self {
            NodeKind::Value { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One arena slot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeData {
    /// Key under the parent object; empty for array elements and roots.
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
}

impl NodeData {
    pub(crate) fn new(name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::empty(object_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_case_insensitively() {
        for t in ObjectType::ALL {
            assert_eq!(ObjectType::from_name(t.name()), Some(t));
            assert_eq!(ObjectType::from_name(&t.name().to_uppercase()), Some(t));
        }
        for t in ValueType::ALL {
            assert_eq!(ValueType::from_name(t.name()), Some(t));
        }
        assert_eq!(ObjectType::from_name("list"), None);
        assert_eq!(ValueType::from_name(""), None);
    }

    #[test]
    fn tags_match_declaration_order() {
        assert_eq!(ObjectType::Array.tag(), 2);
        assert_eq!(ObjectType::from_tag(3), Some(ObjectType::Value));
        assert_eq!(ObjectType::from_tag(4), None);
        assert_eq!(ValueType::Float.tag(), 4);
        assert_eq!(ValueType::from_tag(5), None);
    }

    #[test]
    fn empty_kinds() {
        assert_eq!(NodeKind::empty(ObjectType::Value).value_type(), ValueType::None);
        assert!(NodeKind::empty(ObjectType::Array).children().is_empty());
        assert!(NodeKind::empty(ObjectType::Null).children_mut().is_none());
        assert_eq!(NodeKind::empty(ObjectType::Object).text(), None);
    }
}
