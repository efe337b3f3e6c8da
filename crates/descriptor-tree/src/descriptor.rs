//! The [`Descriptor`] handle.
//!
//! A descriptor is a `(tree, node id)` pair. Cloning a descriptor, or
//! navigating to a child with [`Descriptor::get`], yields another handle into
//! the *same* tree: writes through one handle are visible through all of
//! them. Deep copies only happen through [`Descriptor::assign`] and
//! [`Descriptor::add_descriptor`].
//!
//! ```
//! use descriptor_tree::Descriptor;
//!
//! let doc = Descriptor::new();
//! doc.add("name").set_str("widget");
//! doc.add("tags").add("").set_str("blue");
//!
//! assert!(doc.is_object());
//! assert_eq!(doc.get("name").as_string(""), "widget");
//! assert_eq!(doc.get("tags").get_index(0).as_string(""), "blue");
//! assert!(doc.get("missing").is_null());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::arena::NodeId;
use crate::error::{DescriptorError, Result};
use crate::node::{NodeData, NodeKind, ObjectType, ValueType};
use crate::scan;
use crate::tree::NodeTree;

/// Shared handle to one node of a descriptor tree.
///
/// The tree is reference counted with `Rc`, so handles are neither `Send`
/// nor `Sync`. Using a handle whose node was removed through another handle
/// panics; check [`Descriptor::is_live`] when that can happen.
#[derive(Clone)]
pub struct Descriptor {
    pub(crate) tree: Rc<RefCell<NodeTree>>,
    pub(crate) id: NodeId,
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Descriptor {
    /// Creates a new tree whose root is an unwritten `Value` node. The first
    /// `add` decides whether it becomes an object or an array.
    pub fn new() -> Self {
        Self::with_type(ObjectType::Value)
    }

    /// Creates a new tree whose root has the given type.
    pub fn with_type(object_type: ObjectType) -> Self {
        let mut tree = NodeTree::new();
        let id = tree.nodes.insert(NodeData::new("", object_type));
        trace!(%object_type, "allocating descriptor tree");
        Self {
            tree: Rc::new(RefCell::new(tree)),
            id,
        }
    }

    /// Creates a new tree with a `Null` root. Lookups of absent members
    /// return one of these.
    pub fn null() -> Self {
        Self::with_type(ObjectType::Null)
    }

    pub(crate) fn handle(&self, id: NodeId) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&NodeData) -> R) -> R {
        let tree = self.tree.borrow();
        f(tree.node(self.id))
    }

    fn write<R>(&self, f: impl FnOnce(&mut NodeTree, NodeId) -> R) -> R {
        let mut tree = self.tree.borrow_mut();
        f(&mut tree, self.id)
    }

    /// Id of the node this handle addresses.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Whether the addressed node still exists.
    pub fn is_live(&self) -> bool {
        self.tree.borrow().nodes.contains(self.id)
    }

    /// Number of handles sharing this tree.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.tree)
    }

    /// Number of live nodes in the shared tree.
    pub fn node_count(&self) -> usize {
        self.tree.borrow().nodes.len()
    }

    /// Slots the shared arena holds before it has to grow.
    pub fn arena_capacity(&self) -> usize {
        self.tree.borrow().nodes.capacity()
    }

    /// Whether both handles address the same node of the same tree.
    pub fn same_node(&self, other: &Descriptor) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }

    /// Key under which this node is stored in its parent object.
    pub fn name(&self) -> String {
        self.read(|node| node.name.clone())
    }

    pub fn object_type(&self) -> ObjectType {
        self.read(|node| node.kind.object_type())
    }

    /// Scalar kind; `None` unless the node is a written value.
    pub fn value_type(&self) -> ValueType {
        self.read(|node| node.kind.value_type())
    }

    pub fn is_null(&self) -> bool {
        self.object_type() == ObjectType::Null
    }

    pub fn is_value(&self) -> bool {
        self.object_type() == ObjectType::Value
    }

    pub fn is_array(&self) -> bool {
        self.object_type() == ObjectType::Array
    }

    pub fn is_object(&self) -> bool {
        self.object_type() == ObjectType::Object
    }

    /// Changes the node's type. A different type clears the node first,
    /// freeing all descendants.
    pub fn set_type(&self, object_type: ObjectType) {
        self.write(|tree, id| tree.set_type(id, object_type));
    }

    /// Frees all descendants and resets the node to `Null`.
    pub fn clear(&self) {
        self.write(|tree, id| tree.clear(id));
    }

    /// Adds a `Value` child, see [`Descriptor::add_typed`].
    pub fn add(&self, name: &str) -> Descriptor {
        self.add_typed(name, ObjectType::Value)
    }

    /// Adds a child node and returns a handle to it.
    ///
    /// An unwritten `Value` (or `Null`) receiver is promoted to an object for
    /// a named child and to an array for an anonymous one. If a child named
    /// `name` already exists it is retyped in place and returned instead of
    /// adding a duplicate.
    pub fn add_typed(&self, name: &str, object_type: ObjectType) -> Descriptor {
        let child = self.write(|tree, id| tree.add(id, name, object_type));
        self.handle(child)
    }

    /// Adds a deep copy of `other` under `other`'s name (upserting like
    /// [`Descriptor::add`]) and returns the new child.
    pub fn add_descriptor(&self, other: &Descriptor) -> Descriptor {
        let snapshot = other.tree.borrow().snapshot(other.id);
        let child = self.add_typed(&snapshot.name, snapshot.object_type);
        child.write(|tree, id| tree.restore(id, &snapshot));
        child
    }

    /// Replaces this node's content with a deep copy of `other`'s type,
    /// value and descendants. The node keeps its own name.
    pub fn assign(&self, other: &Descriptor) -> Descriptor {
        let snapshot = other.tree.borrow().snapshot(other.id);
        self.write(|tree, id| tree.restore(id, &snapshot));
        self.clone()
    }

    fn set_value(&self, text: String, value_type: ValueType) -> Descriptor {
        self.write(|tree, id| tree.set_value(id, text, value_type));
        self.clone()
    }

    pub fn set_bool(&self, value: bool) -> Descriptor {
        let text = if value { "true" } else { "false" };
        self.set_value(text.to_string(), ValueType::Bool)
    }

    pub fn set_int(&self, value: i64) -> Descriptor {
        self.set_value(value.to_string(), ValueType::Int)
    }

    pub fn set_float(&self, value: f64) -> Descriptor {
        self.set_value(scan::format_float(value), ValueType::Float)
    }

    pub fn set_str(&self, value: &str) -> Descriptor {
        self.set_value(value.to_string(), ValueType::String)
    }

    /// Stores `text` with an explicit value type and no inference.
    pub fn set_text(&self, text: &str, value_type: ValueType) -> Descriptor {
        self.set_value(text.to_string(), value_type)
    }

    /// Stores `text` as an `Int`, `Float` or `Bool` when it is entirely such
    /// a literal (tried in that order), otherwise as a `String`.
    pub fn set_from_str(&self, text: &str) -> Descriptor {
        let value_type = scan::infer_value_type(text);
        self.set_value(text.to_string(), value_type)
    }

    /// Position of the first child named `name`. The empty name is never
    /// found.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.tree.borrow().find(self.id, name)
    }

    /// First child named `name`, or a detached `Null` descriptor.
    pub fn get(&self, name: &str) -> Descriptor {
        match self.find(name) {
            Some(index) => self.get_index(index),
            None => Descriptor::null(),
        }
    }

    /// Child at `index`, or a detached `Null` descriptor.
    pub fn get_index(&self, index: usize) -> Descriptor {
        let child = self.tree.borrow().child_at(self.id, index);
        match child {
            Some(child) => self.handle(child),
            None => Descriptor::null(),
        }
    }

    /// Existing child named `name`, or a newly added `Value` child.
    pub fn get_or_add(&self, name: &str) -> Descriptor {
        match self.find(name) {
            Some(index) => self.get_index(index),
            None => self.add(name),
        }
    }

    /// Removes the first child named `name` with its whole subtree.
    pub fn remove(&self, name: &str) -> bool {
        match self.find(name) {
            Some(index) => self.remove_index(index),
            None => false,
        }
    }

    /// Removes the child at `index` with its whole subtree.
    pub fn remove_index(&self, index: usize) -> bool {
        self.write(|tree, id| tree.remove_child(id, index))
    }

    pub fn member_count(&self) -> usize {
        self.read(|node| node.kind.children().len())
    }

    pub fn member_names(&self) -> Vec<String> {
        let tree = self.tree.borrow();
        tree.children(self.id)
            .iter()
            .map(|&child| tree.node(child).name.clone())
            .collect()
    }

    /// Handles to all children; empty for values and `Null`.
    pub fn members(&self) -> Vec<Descriptor> {
        let children = self.read(|node| node.kind.children().to_vec());
        children.into_iter().map(|child| self.handle(child)).collect()
    }

    fn expect_shape(&self, expected: ObjectType) -> Result<()> {
        let found = self.object_type();
        if found == expected {
            Ok(())
        } else {
            Err(DescriptorError::Shape { expected, found })
        }
    }

    /// Elements of an array node.
    pub fn elements(&self) -> Result<Vec<Descriptor>> {
        self.expect_shape(ObjectType::Array)?;
        Ok(self.members())
    }

    /// `(name, member)` pairs of an object node, in insertion order.
    pub fn entries(&self) -> Result<Vec<(String, Descriptor)>> {
        self.expect_shape(ObjectType::Object)?;
        Ok(self
            .members()
            .into_iter()
            .map(|member| (member.name(), member))
            .collect())
    }

    /// Raw value text, if the node is a value.
    pub fn value_text(&self) -> Option<String> {
        self.read(|node| node.kind.text().map(str::to_string))
    }

    pub fn as_bool(&self, default: bool) -> bool {
        self.value_text().map_or(default, |text| scan::read_bool(&text))
    }

    pub fn as_int(&self, default: i64) -> i64 {
        self.value_text().map_or(default, |text| scan::read_int(&text))
    }

    pub fn as_float(&self, default: f64) -> f64 {
        self.value_text().map_or(default, |text| scan::read_float(&text))
    }

    pub fn as_string(&self, default: &str) -> String {
        self.value_text().unwrap_or_else(|| default.to_string())
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        let left = self.tree.borrow();
        let right = other.tree.borrow();
        NodeTree::equal(&left, self.id, &right, other.id)
    }
}

struct NodeDebug<'a> {
    tree: &'a NodeTree,
    id: NodeId,
}

impl fmt::Debug for NodeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        let child = |id: NodeId| NodeDebug {
            tree: self.tree,
            id,
        };
        match &node.kind {
            NodeKind::Null => f.write_str("null"),
            NodeKind::Value {
                value_type: ValueType::None,
                ..
            } => f.write_str("<unset>"),
            NodeKind::Value {
                text,
                value_type: ValueType::String,
            } => write!(f, "{text:?}"),
            NodeKind::Value { text, .. } => f.write_str(text),
            NodeKind::Array(children) => f
                .debug_list()
                .entries(children.iter().map(|&id| child(id)))
                .finish(),
            NodeKind::Object(children) => f
                .debug_map()
                .entries(
                    children
                        .iter()
                        .map(|&id| (self.tree.node(id).name.as_str(), child(id))),
                )
                .finish(),
        }
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.borrow();
        if !tree.nodes.contains(self.id) {
            return write!(f, "Descriptor(<removed {:?}>)", self.id);
        }
        write!(f, "Descriptor({:?})", NodeDebug { tree: &tree, id: self.id })
    }
}
