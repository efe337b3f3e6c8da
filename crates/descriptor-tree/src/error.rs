//! Error type for descriptor-tree operations.

use descriptor_buffers::BufferError;
use thiserror::Error;

use crate::arena::NodeId;
use crate::node::ObjectType;

/// Error type for descriptor-tree operations.
///
/// Absence (a missing member or element) is never an error: lookups return a
/// `Null` descriptor or `None` instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DescriptorError {
    /// The id does not denote an occupied arena slot.
    #[error("invalid node id {0:?}")]
    InvalidId(NodeId),
    /// A container accessor was called on a node of another shape.
    #[error("expected {expected} node, found {found}")]
    Shape {
        expected: ObjectType,
        found: ObjectType,
    },
    /// A float value cannot be written as a JSON number.
    #[error("cannot encode non-finite float {0:?} as JSON")]
    NonFiniteFloat(String),
    #[error("invalid object type tag: {0}")]
    InvalidObjectType(u8),
    #[error("invalid value type tag: {0}")]
    InvalidValueType(u8),
    /// Decoded data violates the tree shape (e.g. children under a value).
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("{0} trailing bytes after document")]
    TrailingBytes(usize),
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<serde_json::Error> for DescriptorError {
    fn from(e: serde_json::Error) -> Self {
        DescriptorError::Json(e.to_string())
    }
}

/// Result type alias for descriptor-tree operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;
