//! External source tree abstraction.
//!
//! The hierarchy being mirrored lives outside this crate and is only ever
//! observed through [`SourceTree`]: first-child / next-sibling / parent
//! links plus an identifier and a display name per node. The core never
//! assumes a particular in-memory representation.
//!
//! Implementors guarantee the links stay consistent while the caller holds
//! the read side of the lock wrapping the source (the builder takes that
//! lock for the duration of one traversal).
//!
//! [`LinkedTree`] is the ready-made arena implementation: nodes are inserted
//! in document order and the intrusive links are materialized as indices.
//! The CLI's `/proc` scanner builds one per snapshot, and tests build them
//! literally.

use std::collections::HashMap;

/// Capability interface over the external tree being mirrored.
pub trait SourceTree {
    /// Opaque handle to one external node.
    type Node: Clone + PartialEq;

    /// The tree root.
    fn root(&self) -> Self::Node;

    /// The first child of `node`, if any.
    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

    /// The next sibling of `node`, if any. The root has none.
    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// The parent of `node`. The root is its own parent.
    fn parent(&self, node: &Self::Node) -> Self::Node;

    /// Stable numeric identifier of `node`, unique within the tree.
    fn id(&self, node: &Self::Node) -> u32;

    /// Raw display name of `node`; may contain the hierarchy separator.
    fn display_name(&self, node: &Self::Node) -> String;
}

/// Handle into a [`LinkedTree`].
///
/// Only obtainable through the tree's own traversal operations, so it always
/// indexes a valid entry. Handles are only valid for the tree that produced
/// them; passing one to a different tree indexes an unrelated entry (or
/// panics if that tree is smaller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(usize);

#[derive(Debug)]
struct Entry {
    id: u32,
    name: String,
    parent: usize,
    first_child: Option<usize>,
    last_child: Option<usize>,
    next_sibling: Option<usize>,
}

/// Arena-backed tree with intrusive first-child/next-sibling links.
///
/// Children are appended in insertion order, so a preorder walk over the
/// links visits nodes in the order they were inserted (document order).
#[derive(Debug)]
pub struct LinkedTree {
    entries: Vec<Entry>,
    by_id: HashMap<u32, usize>,
}

impl LinkedTree {
    /// Creates a tree holding only the root node.
    pub fn new(root_id: u32, root_name: &str) -> Self {
        let root = Entry {
            id: root_id,
            name: root_name.to_string(),
            parent: 0,
            first_child: None,
            last_child: None,
            next_sibling: None,
        };
        let mut by_id = HashMap::new();
        by_id.insert(root_id, 0);
        Self {
            entries: vec![root],
            by_id,
        }
    }

    /// Inserts `id` as the last child of `parent_id`.
    ///
    /// Returns `false` (and changes nothing) if the parent is unknown or the
    /// id is already present.
    pub fn insert(&mut self, id: u32, name: &str, parent_id: u32) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        let Some(&parent) = self.by_id.get(&parent_id) else {
            return false;
        };

        let index = self.entries.len();
        self.entries.push(Entry {
            id,
            name: name.to_string(),
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
        });
        self.by_id.insert(id, index);

        match self.entries[parent].last_child {
            Some(prev) => self.entries[prev].next_sibling = Some(index),
            None => self.entries[parent].first_child = Some(index),
        }
        self.entries[parent].last_child = Some(index);
        true
    }

    /// True if a node with `id` exists.
    pub fn contains(&self, id: u32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

impl SourceTree for LinkedTree {
    type Node = NodeRef;

    fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    fn first_child(&self, node: &NodeRef) -> Option<NodeRef> {
        self.entries[node.0].first_child.map(NodeRef)
    }

    fn next_sibling(&self, node: &NodeRef) -> Option<NodeRef> {
        self.entries[node.0].next_sibling.map(NodeRef)
    }

    fn parent(&self, node: &NodeRef) -> NodeRef {
        NodeRef(self.entries[node.0].parent)
    }

    fn id(&self, node: &NodeRef) -> u32 {
        self.entries[node.0].id
    }

    fn display_name(&self, node: &NodeRef) -> String {
        self.entries[node.0].name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_links() {
        let tree = LinkedTree::new(1, "root");
        let root = tree.root();
        assert_eq!(tree.id(&root), 1);
        assert_eq!(tree.display_name(&root), "root");
        assert!(tree.first_child(&root).is_none());
        assert!(tree.next_sibling(&root).is_none());
        assert_eq!(tree.parent(&root), root);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let mut tree = LinkedTree::new(1, "root");
        assert!(tree.insert(2, "x", 1));
        assert!(tree.insert(3, "y", 1));
        assert!(tree.insert(4, "z", 3));

        let root = tree.root();
        let first = tree.first_child(&root).unwrap();
        assert_eq!(tree.id(&first), 2);
        let second = tree.next_sibling(&first).unwrap();
        assert_eq!(tree.id(&second), 3);
        assert!(tree.next_sibling(&second).is_none());

        let grandchild = tree.first_child(&second).unwrap();
        assert_eq!(tree.id(&grandchild), 4);
        assert_eq!(tree.parent(&grandchild), second);
    }

    #[test]
    fn test_insert_rejects_duplicates_and_orphans() {
        let mut tree = LinkedTree::new(1, "root");
        assert!(tree.insert(2, "x", 1));
        assert!(!tree.insert(2, "again", 1));
        assert!(!tree.insert(9, "orphan", 42));
        assert_eq!(tree.len(), 2);
    }
}
