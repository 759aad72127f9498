//! Synthetic node model.
//!
//! A [`Node`] is one entry in the mirrored hierarchy. Directories own their
//! children through `Arc`s in an ordered collection; the parent link is a
//! `Weak` back-reference used only for upward traversal, never for
//! ownership, so dropping a directory drops its whole subtree.
//!
//! # Locking
//!
//! Each node carries two independent locks:
//!
//! - the **directory lock** (`lock_dir`), the per-directory exclusive lock
//!   serializing create and unlink directly under this node, and
//! - the **children lock** (`lock_children`), a short-lived lock protecting
//!   the children collection itself, held only while enumerating or
//!   splicing.
//!
//! Both are always acquired top-down (parent before any of its children),
//! which is what keeps a concurrent builder and teardown deadlock-free.
//!
//! The `live` flag flips to true once the node is linked into its parent and
//! back to false the moment an unlink begins. Any walker observing a
//! non-live node must skip it: the node is mid-removal and its sibling links
//! can no longer be trusted.

use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// The kind of a synthetic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A directory: may own children.
    Directory,
    /// A leaf: carries no data and owns nothing.
    Leaf,
}

/// One entry in the mirrored hierarchy.
#[derive(Debug)]
pub struct Node {
    name: String,
    kind: NodeKind,
    parent: Weak<Node>,
    live: AtomicBool,
    dir_lock: Mutex<()>,
    children: Mutex<Vec<Arc<Node>>>,
}

impl Node {
    /// Creates the hierarchy root: a live directory with no parent.
    pub(crate) fn new_root() -> Arc<Self> {
        Arc::new(Self {
            name: String::new(),
            kind: NodeKind::Directory,
            parent: Weak::new(),
            live: AtomicBool::new(true),
            dir_lock: Mutex::new(()),
            children: Mutex::new(Vec::new()),
        })
    }

    /// Creates a detached child of `parent`.
    ///
    /// The node starts non-live; the namespace flips the flag only after the
    /// node has been linked into the parent's children.
    pub(crate) fn new_child(parent: &Arc<Self>, name: &str, kind: NodeKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            kind,
            parent: Arc::downgrade(parent),
            live: AtomicBool::new(false),
            dir_lock: Mutex::new(()),
            children: Mutex::new(Vec::new()),
        })
    }

    /// The sanitized segment name of this node. Empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// True once the node is linked into the namespace and not yet unlinked.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub(crate) fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Release);
    }

    /// The owning directory, or `None` for the root and for nodes whose
    /// parent has already been destroyed.
    pub fn parent(&self) -> Option<Arc<Self>> {
        self.parent.upgrade()
    }

    /// Acquires this node's exclusive directory lock.
    ///
    /// Serializes create and unlink operations directly under this node.
    /// Blocking; released when the guard drops.
    pub fn lock_dir(&self) -> MutexGuard<'_, ()> {
        self.dir_lock.lock()
    }

    /// Acquires the short-lived lock over the children collection.
    ///
    /// Hold it only while enumerating or splicing; any sibling pointer noted
    /// before releasing it is invalid afterwards.
    pub fn lock_children(&self) -> MutexGuard<'_, Vec<Arc<Node>>> {
        self.children.lock()
    }

    /// True if any child is currently live.
    pub fn has_live_children(&self) -> bool {
        self.children.lock().iter().any(|c| c.is_live())
    }

    /// Number of currently live children.
    pub fn live_child_count(&self) -> usize {
        self.children.lock().iter().filter(|c| c.is_live()).count()
    }
}
