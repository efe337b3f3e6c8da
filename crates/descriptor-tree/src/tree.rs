//! The shared node tree behind every descriptor handle.
//!
//! A [`NodeTree`] owns one arena of [`NodeData`]. Handles share it through
//! `Rc<RefCell<NodeTree>>`; the `Rc` strong count is the tree's reference
//! count and the arena is dropped together with the last handle.
//!
//! All recursive algorithms (clearing, subtree removal, deep copy and
//! structural equality) live here and work on ids, so a handle only needs a
//! single borrow of the tree per operation.

use tracing::trace;

use crate::arena::{Arena, NodeId};
use crate::node::{NodeData, NodeKind, ObjectType, ValueType};

#[derive(Debug, Default)]
pub(crate) struct NodeTree {
    pub(crate) nodes: Arena<NodeData>,
}

#[cold]
#[inline(never)]
fn stale(id: NodeId) -> ! {
    panic!("stale descriptor handle: node {id:?} has been removed from its tree")
}

impl NodeTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        match self.nodes.get(id) {
            Some(node) => node,
            None => stale(id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        match self.nodes.get_mut(id) {
            Some(node) => node,
            None => stale(id),
        }
    }

    pub(crate) fn object_type(&self, id: NodeId) -> ObjectType {
        self.node(id).kind.object_type()
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).kind.children()
    }

    /// Position of the first child named `name`. The empty name never
    /// matches: it is reserved for array elements.
    pub(crate) fn find(&self, parent: NodeId, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.children(parent)
            .iter()
            .position(|&child| self.node(child).name == name)
    }

    pub(crate) fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    /// Changes the node's type, clearing it first when the type differs.
    pub(crate) fn set_type(&mut self, id: NodeId, object_type: ObjectType) {
        if self.object_type(id) == object_type {
            return;
        }
        self.clear(id);
        self.node_mut(id).kind = NodeKind::empty(object_type);
    }

    /// Frees every descendant and resets the node to `Null`. The name is
    /// kept, so the node stays addressable under its parent.
    pub(crate) fn clear(&mut self, id: NodeId) {
        let old = std::mem::replace(&mut self.node_mut(id).kind, NodeKind::Null);
        for &child in old.children() {
            self.free_subtree(child);
        }
    }

    /// Frees `id` and all of its descendants back to the arena.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(next) {
                stack.extend_from_slice(node.kind.children());
            }
        }
    }

    /// Appends a child, or retypes the existing child of the same non-empty
    /// name. A `Value` or `Null` parent is first promoted to `Object` (named
    /// child) or `Array` (anonymous child).
    pub(crate) fn add(&mut self, parent: NodeId, name: &str, object_type: ObjectType) -> NodeId {
        if matches!(self.object_type(parent), ObjectType::Value | ObjectType::Null) {
            let promoted = if name.is_empty() {
                ObjectType::Array
            } else {
                ObjectType::Object
            };
            self.set_type(parent, promoted);
        }

        if let Some(index) = self.find(parent, name) {
            let existing = self.children(parent)[index];
            self.set_type(existing, object_type);
            return existing;
        }

        let child = self.nodes.insert(NodeData::new(name, object_type));
        if let Some(children) = self.node_mut(parent).kind.children_mut() {
            children.push(child);
        }
        child
    }

    /// Detaches the child at `index` and frees its subtree.
    pub(crate) fn remove_child(&mut self, parent: NodeId, index: usize) -> bool {
        let child = match self.node_mut(parent).kind.children_mut() {
            Some(children) if index < children.len() => children.remove(index),
            _ => return false,
        };
        self.free_subtree(child);
        true
    }

    /// Turns the node into a `Value` holding `text`.
    pub(crate) fn set_value(&mut self, id: NodeId, text: String, value_type: ValueType) {
        self.set_type(id, ObjectType::Value);
        self.node_mut(id).kind = NodeKind::Value { text, value_type };
    }

    /// Owned copy of the subtree rooted at `id`.
    pub(crate) fn snapshot(&self, id: NodeId) -> Snapshot {
        let node = self.node(id);
        Snapshot {
            name: node.name.clone(),
            object_type: node.kind.object_type(),
            value_type: node.kind.value_type(),
            text: node.kind.text().unwrap_or_default().to_string(),
            children: node
                .kind
                .children()
                .iter()
                .map(|&child| self.snapshot(child))
                .collect(),
        }
    }

    /// Replaces the content of `id` with the snapshot's type, value and
    /// descendants. The node's own name is left alone.
    pub(crate) fn restore(&mut self, id: NodeId, snapshot: &Snapshot) {
        self.clear(id);
        self.node_mut(id).kind = match snapshot.object_type {
            ObjectType::Value => NodeKind::Value {
                text: snapshot.text.clone(),
                value_type: snapshot.value_type,
            },
            other => NodeKind::empty(other),
        };
        for child_snapshot in &snapshot.children {
            let child = self
                .nodes
                .insert(NodeData::new(child_snapshot.name.clone(), ObjectType::Null));
            if let Some(children) = self.node_mut(id).kind.children_mut() {
                children.push(child);
            }
            self.restore(child, child_snapshot);
        }
    }

    /// Structural equality between two nodes, possibly in different trees.
    ///
    /// Arrays compare element-wise by position. Objects compare each member
    /// with the first member of the same name on the other side, so member
    /// order does not matter; an anonymous member only matches an anonymous
    /// member at the same position. Objects are checked from both sides.
    /// Values compare by text.
    pub(crate) fn equal(left: &NodeTree, l: NodeId, right: &NodeTree, r: NodeId) -> bool {
        let (ln, rn) = (left.node(l), right.node(r));
        if ln.kind.object_type() != rn.kind.object_type()
            || ln.kind.value_type() != rn.kind.value_type()
            || ln.kind.children().len() != rn.kind.children().len()
        {
            return false;
        }

        match &ln.kind {
            NodeKind::Array(lc) => lc
                .iter()
                .zip(rn.kind.children())
                .all(|(&a, &b)| Self::equal(left, a, right, b)),
            NodeKind::Object(_) => {
                Self::members_match(left, l, right, r) && Self::members_match(right, r, left, l)
            }
            _ => ln.kind.text() == rn.kind.text(),
        }
    }

    /// Whether every member of object `l` has an equal counterpart in `r`.
    fn members_match(left: &NodeTree, l: NodeId, right: &NodeTree, r: NodeId) -> bool {
        let (lc, rc) = (left.children(l), right.children(r));
        lc.iter().enumerate().all(|(index, &child)| {
            let name = &left.node(child).name;
            let pair = if name.is_empty() {
                rc.get(index)
                    .copied()
                    .filter(|&other| right.node(other).name.is_empty())
                    .map(|other| (child, other))
            } else {
                left.find(l, name)
                    .zip(right.find(r, name))
                    .map(|(li, ri)| (lc[li], rc[ri]))
            };
            match pair {
                Some((a, b)) => Self::equal(left, a, right, b),
                None => false,
            }
        })
    }
}

impl Drop for NodeTree {
    fn drop(&mut self) {
        trace!(nodes = self.nodes.len(), "releasing descriptor tree");
    }
}

/// Owned, arena-independent copy of a subtree, used for deep copies so the
/// source and destination may live in the same tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) name: String,
    pub(crate) object_type: ObjectType,
    pub(crate) value_type: ValueType,
    pub(crate) text: String,
    pub(crate) children: Vec<Snapshot>,
}
