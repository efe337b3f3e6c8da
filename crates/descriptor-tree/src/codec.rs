//! Binary codec.
//!
//! Nodes are written in pre-order. Each node is:
//!
//! ```text
//! name        u32 BE length + UTF-8
//! type        u8   (ObjectType tag)
//! value type  u8   (ValueType tag)
//! value       u32 BE length + UTF-8
//! child count u32 BE
//! children    child count nodes
//! ```

use descriptor_buffers::{Reader, Writer};
use tracing::debug;

use crate::arena::NodeId;
use crate::descriptor::Descriptor;
use crate::error::{DescriptorError, Result};
use crate::node::{NodeKind, ObjectType, ValueType, MAX_DEPTH};
use crate::tree::NodeTree;

impl Descriptor {
    /// Appends the subtree rooted at this node to `writer`.
    pub fn write_to(&self, writer: &mut Writer) {
        let tree = self.tree.borrow();
        write_node(&tree, self.id, writer);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.write_to(&mut writer);
        writer.flush()
    }

    /// Replaces this node's content with one encoded node read from
    /// `reader`. The node takes the decoded name as well.
    ///
    /// On error the node holds whatever was decoded before the failure.
    /// Input nested deeper than [`MAX_DEPTH`] is rejected with
    /// [`DescriptorError::InvalidStructure`].
    pub fn read_from(&self, reader: &mut Reader<'_>) -> Result<()> {
        self.read_node(reader, 0)
    }

    fn read_node(&self, reader: &mut Reader<'_>, depth: usize) -> Result<()> {
        self.clear();
        let name = reader.try_str()?;
        let object_type = reader.try_u8()?;
        let object_type =
            ObjectType::from_tag(object_type).ok_or(DescriptorError::InvalidObjectType(object_type))?;
        let value_type = reader.try_u8()?;
        let value_type =
            ValueType::from_tag(value_type).ok_or(DescriptorError::InvalidValueType(value_type))?;
        let value = reader.try_str()?;
        let count = reader.try_u32()?;

        {
            let mut tree = self.tree.borrow_mut();
            let node = tree.node_mut(self.id);
            node.name = name.to_string();
            node.kind = match object_type {
                ObjectType::Value => NodeKind::Value {
                    text: value.to_string(),
                    value_type,
                },
                other => NodeKind::empty(other),
            };
        }

        if count > 0 && !matches!(object_type, ObjectType::Object | ObjectType::Array) {
            return Err(DescriptorError::InvalidStructure(format!(
                "{object_type} node {name:?} has {count} children"
            )));
        }
        if count > 0 && depth >= MAX_DEPTH {
            return Err(DescriptorError::InvalidStructure(format!(
                "nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        for _ in 0..count {
            // `add("")` never merges, so every encoded child gets its own node.
            self.add("").read_node(reader, depth + 1)?;
        }
        Ok(())
    }

    /// Decodes a complete buffer into a new tree.
    pub fn decode(bytes: &[u8]) -> Result<Descriptor> {
        let descriptor = Descriptor::new();
        let mut reader = Reader::new(bytes);
        descriptor.read_from(&mut reader)?;
        let trailing = reader.size();
        if trailing > 0 {
            return Err(DescriptorError::TrailingBytes(trailing));
        }
        debug!(
            bytes = bytes.len(),
            nodes = descriptor.node_count(),
            "decoded descriptor"
        );
        Ok(descriptor)
    }
}

fn write_node(tree: &NodeTree, id: NodeId, writer: &mut Writer) {
    let node = tree.node(id);
    writer.str(&node.name);
    writer.u8(node.kind.object_type().tag());
    writer.u8(node.kind.value_type().tag());
    writer.str(node.kind.text().unwrap_or_default());
    let children = node.kind.children();
    // Sibling lists are bounded by the u32 arena index space.
    writer.u32(children.len() as u32);
    for &child in children {
        write_node(tree, child, writer);
    }
}
