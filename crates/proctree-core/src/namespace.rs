//! In-memory namespace provider.
//!
//! Stores the synthetic hierarchy and exposes the create/link/unlink/lock
//! primitives the builder and teardown operate against. The namespace never
//! mutates structure on its own: every change goes through
//! [`create_directory`](Namespace::create_directory) /
//! [`create_leaf`](Namespace::create_leaf) /
//! [`unlink_and_destroy`](Namespace::unlink_and_destroy), each of which
//! honors the locking discipline described in [`crate::node`].
//!
//! Synthetic files carry no data: [`read`](Namespace::read) always returns
//! empty and [`write`](Namespace::write) accepts and discards the buffer.
//!
//! A namespace can be capped with [`with_capacity`](Namespace::with_capacity);
//! creation past the cap fails with [`NamespaceError::Exhausted`], which is
//! the resource-exhaustion path the builder has to survive.

use crate::node::{Node, NodeKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Errors surfaced by namespace mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    /// The node budget is spent; no further nodes can be allocated.
    #[error("namespace node capacity exhausted")]
    Exhausted,

    /// A live sibling with the same name already exists.
    #[error("entry already exists: {name}")]
    AlreadyExists {
        /// The conflicting segment name.
        name: String,
    },

    /// The supplied parent is not a directory.
    #[error("parent is not a directory")]
    NotADirectory,

    /// The supplied parent has been unlinked and can no longer take
    /// children.
    #[error("parent has been removed from the namespace")]
    Defunct,
}

/// The synthetic hierarchy and its node storage.
///
/// The root directory is created eagerly, is always live, and can never be
/// unlinked; everything underneath it is built and torn down by the
/// snapshot machinery.
#[derive(Debug)]
pub struct Namespace {
    root: Arc<Node>,
    live_nodes: AtomicUsize,
    capacity: usize,
}

impl Namespace {
    /// Creates an unbounded namespace.
    pub fn new() -> Self {
        Self::with_capacity(usize::MAX)
    }

    /// Creates a namespace that can hold at most `capacity` nodes below the
    /// root.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            root: Node::new_root(),
            live_nodes: AtomicUsize::new(0),
            capacity,
        }
    }

    /// The hierarchy root. Caller-owned: teardown drains it but never
    /// removes it.
    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Number of live nodes currently linked below the root.
    pub fn node_count(&self) -> usize {
        self.live_nodes.load(Ordering::Acquire)
    }

    /// Creates a directory named `name` under `parent`.
    ///
    /// Takes the parent's directory lock for the whole operation and the
    /// children lock around the splice. The new node becomes visible to
    /// other walkers (live) only after it is fully linked.
    pub fn create_directory(
        &self,
        parent: &Arc<Node>,
        name: &str,
    ) -> Result<Arc<Node>, NamespaceError> {
        self.create(parent, name, NodeKind::Directory)
    }

    /// Creates a data-less leaf named `name` under `parent`.
    pub fn create_leaf(&self, parent: &Arc<Node>, name: &str) -> Result<Arc<Node>, NamespaceError> {
        self.create(parent, name, NodeKind::Leaf)
    }

    fn create(
        &self,
        parent: &Arc<Node>,
        name: &str,
        kind: NodeKind,
    ) -> Result<Arc<Node>, NamespaceError> {
        if parent.kind() != NodeKind::Directory {
            return Err(NamespaceError::NotADirectory);
        }

        let _dir = parent.lock_dir();

        // Holding the directory lock keeps both checks below stable until
        // the new child is linked: nobody else can create or unlink under
        // this parent, and nobody can unlink the parent itself.
        if !parent.is_live() {
            return Err(NamespaceError::Defunct);
        }
        {
            let children = parent.lock_children();
            if children.iter().any(|c| c.is_live() && c.name() == name) {
                return Err(NamespaceError::AlreadyExists {
                    name: name.to_string(),
                });
            }
        }

        self.reserve_slot()?;

        let child = Node::new_child(parent, name, kind);
        parent.lock_children().push(Arc::clone(&child));
        child.set_live(true);
        tracing::trace!(name, ?kind, "linked node");
        Ok(child)
    }

    /// Reserves one node slot against the capacity bound.
    fn reserve_slot(&self) -> Result<(), NamespaceError> {
        self.live_nodes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| NamespaceError::Exhausted)
    }

    /// Unlinks `child` from `parent` and releases its storage.
    ///
    /// The caller must hold `parent`'s directory lock and must not hold the
    /// children lock. The node is marked non-live before it is spliced out,
    /// so a concurrent walker that still holds an `Arc` to it observes a
    /// dead node rather than freed memory; the storage itself is reclaimed
    /// when the last such reference drops.
    pub fn unlink_and_destroy(
        &self,
        child: &Arc<Node>,
        parent: &Arc<Node>,
    ) -> Result<(), NamespaceError> {
        child.set_live(false);
        let spliced = {
            let mut children = parent.lock_children();
            let before = children.len();
            children.retain(|c| !Arc::ptr_eq(c, child));
            before != children.len()
        };
        if spliced {
            self.live_nodes.fetch_sub(1, Ordering::AcqRel);
            tracing::trace!(name = child.name(), "unlinked node");
        }
        Ok(())
    }

    /// Names of the live children of `dir`, in creation order.
    ///
    /// Read-only listing needs only the children lock.
    pub fn list(&self, dir: &Arc<Node>) -> Vec<String> {
        dir.lock_children()
            .iter()
            .filter(|c| c.is_live())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Looks up a live child of `dir` by segment name.
    pub fn find(&self, dir: &Arc<Node>, name: &str) -> Option<Arc<Node>> {
        dir.lock_children()
            .iter()
            .find(|c| c.is_live() && c.name() == name)
            .cloned()
    }

    /// Reads the contents of a synthetic node: always empty.
    pub fn read(&self, node: &Node) -> Vec<u8> {
        tracing::trace!(name = node.name(), "read synthetic node");
        Vec::new()
    }

    /// Writes to a synthetic node: the data is accepted and discarded.
    ///
    /// Returns the number of bytes "written" so callers see a full write.
    pub fn write(&self, node: &Node, buf: &[u8]) -> usize {
        tracing::trace!(name = node.name(), len = buf.len(), "write discarded");
        buf.len()
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}
