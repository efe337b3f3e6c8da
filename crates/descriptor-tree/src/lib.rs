//! descriptor-tree — a dynamically typed document tree shared through
//! cheap handles.
//!
//! A [`Descriptor`] addresses one node of a tree whose nodes live in a
//! generational, slot-recycling [`Arena`]. Handles are reference counted:
//! cloning one, or navigating to a child, yields another view of the same
//! tree, and the tree is freed with its last handle.
//!
//! Trees convert to and from JSON (`serde_json::Value`), XML
//! ([`XmlElement`]) and a compact binary encoding, and typed Rust values
//! convert through [`ToDescriptor`] / [`FromDescriptor`].
//!
//! ```
//! use descriptor_tree::{Descriptor, ObjectType};
//!
//! let doc = Descriptor::from_json_str(r#"{"port": 8080, "hosts": ["a", "b"]}"#).unwrap();
//! assert_eq!(doc.get("port").as_int(0), 8080);
//! assert_eq!(doc.get("hosts").object_type(), ObjectType::Array);
//!
//! let copy = Descriptor::decode(&doc.encode()).unwrap();
//! assert_eq!(copy, doc);
//! ```

pub mod arena;
pub mod cli;
mod codec;
mod descriptor;
pub mod error;
mod json;
pub mod node;
pub mod scan;
pub mod serialize;
mod tree;
pub mod xml;

pub use arena::{Arena, NodeId};
pub use descriptor::Descriptor;
pub use error::{DescriptorError, Result};
pub use node::{ObjectType, ValueType, MAX_DEPTH};
pub use serialize::{FromDescriptor, ToDescriptor};
pub use xml::{XmlElement, XmlOptions};
