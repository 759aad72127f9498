//! Lock-coupled subtree teardown.
//!
//! [`drain`] deletes every node below a given directory while other threads
//! may concurrently be building or tearing down overlapping structure. The
//! supplied root itself is caller-owned and is left in place, live and
//! empty.
//!
//! # Why not "iterate children, delete each"
//!
//! The instant the children lock is released, a concurrent actor may unlink
//! the entry a saved iterator position points at; following that pointer is
//! a use-after-free. The algorithm therefore couples the two per-directory
//! locks and **restarts the scan after every removal**: any sibling pointer
//! noted before the children lock was released is treated as invalid. The
//! restart is load-bearing for correctness, not an optimization target.
//!
//! Progress is still bounded: every successful removal strictly shrinks the
//! live node count, and the first-live-child scan makes the total work
//! amortized linear in the subtree size.
//!
//! Locks are only ever taken top-down (a directory before anything inside
//! it), and never more than one directory lock at a time, so two teardowns
//! or a teardown racing a builder cannot deadlock.

use crate::namespace::{Namespace, NamespaceError};
use crate::node::{Node, NodeKind};
use std::sync::Arc;
use thiserror::Error;

/// Fatal teardown failure.
///
/// Teardown has no tolerable failure path: skipping a removal would leave a
/// dangling live node, so a storage-layer unlink failure aborts the whole
/// call.
#[derive(Debug, Error)]
pub enum TeardownError {
    /// The namespace refused to unlink a node.
    #[error("failed to unlink node: {0}")]
    Unlink(#[from] NamespaceError),
}

/// What a single level of draining decided.
enum Step {
    /// A live, non-empty child directory was found; continue below it.
    Descend(Arc<Node>),
    /// No live children remain under the current directory.
    Drained,
}

/// Removes every node below `root`, leaving `root` itself live and empty.
///
/// Safe to run concurrently with builders and with other teardowns over
/// overlapping structure. A non-directory or already-removed `root` is a
/// no-op: the call returns `Ok(0)` without acquiring any lock.
///
/// Returns the number of nodes removed by this call (a concurrent teardown
/// over the same structure may account for the rest).
pub fn drain(ns: &Namespace, root: &Arc<Node>) -> Result<usize, TeardownError> {
    if root.kind() != NodeKind::Directory || !root.is_live() {
        return Ok(0);
    }

    let mut removed = 0;
    let mut parent = Arc::clone(root);
    loop {
        let step = drain_level(ns, &parent, &mut removed)?;
        match step {
            Step::Descend(child) => parent = child,
            Step::Drained => {
                if Arc::ptr_eq(&parent, root) {
                    tracing::debug!(removed, "subtree drained");
                    return Ok(removed);
                }
                // Climb one level and rescan: the rescan finds the directory
                // we just emptied and removes it.
                match parent.parent() {
                    Some(up) => parent = up,
                    // A concurrent teardown unlinked the level we were
                    // working under; whatever remains is its to finish.
                    None => return Ok(removed),
                }
            }
        }
    }
}

/// Drains removable entries directly under `parent`.
///
/// Holds `parent`'s directory lock for the whole level. Each pass takes the
/// children lock just long enough to find the first live entry, then either
/// descends (non-empty child), unlinks (empty child) and rescans, or reports
/// the level drained.
fn drain_level(
    ns: &Namespace,
    parent: &Arc<Node>,
    removed: &mut usize,
) -> Result<Step, TeardownError> {
    let _dir = parent.lock_dir();
    loop {
        let candidate = {
            let children = parent.lock_children();
            children
                .iter()
                .find(|c| c.is_live())
                .map(|c| (Arc::clone(c), c.has_live_children()))
        };
        match candidate {
            None => return Ok(Step::Drained),
            // Both locks release before the descent (scope drop for the
            // children lock above, guard drop on return for the directory
            // lock): the child level is locked afresh, top-down.
            Some((child, true)) => return Ok(Step::Descend(child)),
            Some((child, false)) => {
                // Children lock already released; directory lock still held,
                // which is what keeps the unlink safe against a concurrent
                // creator or remover under this parent.
                ns.unlink_and_destroy(&child, parent)?;
                *removed += 1;
                // Restart the scan. Any "next" position remembered from
                // before the unlink could name a sibling that a concurrent
                // remover has since freed.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespace;

    fn populate_sample(ns: &Namespace) -> Arc<Node> {
        // root -> a -> b -> c, plus leaves scattered at each level
        let a = ns.create_directory(ns.root(), "1.a").unwrap();
        let b = ns.create_directory(&a, "2.b").unwrap();
        let c = ns.create_directory(&b, "3.c").unwrap();
        ns.create_leaf(&a, "a.status").unwrap();
        ns.create_leaf(&b, "b.status").unwrap();
        ns.create_leaf(&c, "c.status").unwrap();
        a
    }

    #[test]
    fn test_drain_empties_root_and_keeps_it_live() {
        let ns = Namespace::new();
        populate_sample(&ns);
        assert_eq!(ns.node_count(), 6);

        let removed = drain(&ns, ns.root()).unwrap();
        assert_eq!(removed, 6);
        assert_eq!(ns.node_count(), 0);
        assert!(ns.root().is_live());
        assert!(!ns.root().has_live_children());
    }

    #[test]
    fn test_drain_keeps_subtree_root_in_place() {
        let ns = Namespace::new();
        let a = populate_sample(&ns);

        let removed = drain(&ns, &a).unwrap();
        // Everything below "1.a": 2.b, 3.c and the three status leaves.
        assert_eq!(removed, 5);
        assert!(a.is_live());
        assert!(!a.has_live_children());
        // "1.a" itself is still listed under the root.
        assert_eq!(ns.list(ns.root()), vec!["1.a"]);
    }

    #[test]
    fn test_drain_empty_root_is_noop() {
        let ns = Namespace::new();
        assert_eq!(drain(&ns, ns.root()).unwrap(), 0);
        assert!(ns.root().is_live());
    }

    #[test]
    fn test_drain_non_live_root_is_noop() {
        let ns = Namespace::new();
        let a = ns.create_directory(ns.root(), "1.a").unwrap();
        ns.create_directory(&a, "2.b").unwrap();
        {
            let _dir = ns.root().lock_dir();
            ns.unlink_and_destroy(&a, ns.root()).unwrap();
        }
        assert_eq!(drain(&ns, &a).unwrap(), 0);
    }

    #[test]
    fn test_drain_leaf_is_noop() {
        let ns = Namespace::new();
        let leaf = ns.create_leaf(ns.root(), "status").unwrap();
        assert_eq!(drain(&ns, &leaf).unwrap(), 0);
        assert!(leaf.is_live());
    }

    #[test]
    fn test_drain_wide_directory() {
        let ns = Namespace::new();
        for i in 0..100 {
            ns.create_leaf(ns.root(), &format!("{i}.leaf")).unwrap();
        }
        assert_eq!(drain(&ns, ns.root()).unwrap(), 100);
        assert_eq!(ns.node_count(), 0);
    }

    #[test]
    fn test_drain_twice_is_idempotent() {
        let ns = Namespace::new();
        populate_sample(&ns);
        drain(&ns, ns.root()).unwrap();
        assert_eq!(drain(&ns, ns.root()).unwrap(), 0);
    }
}
