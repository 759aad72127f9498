//! Snapshot builder.
//!
//! [`populate`] walks the external source tree and materializes one
//! synthetic directory per visited node, structurally isomorphic to the
//! source and in its document order.
//!
//! The walk is iterative. It rides the source tree's own
//! first-child/next-sibling/parent links and tracks the synthetic side
//! through the nodes' parent back-references, so the auxiliary state is one
//! cursor per tree and a `descending` flag — O(depth), no recursion, no
//! explicit stack. Deeply nested source trees cannot overflow the call
//! stack.

use crate::name;
use crate::namespace::{Namespace, NamespaceError};
use crate::node::Node;
use crate::source::SourceTree;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

/// Builder failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The namespace ran out of node storage mid-walk.
    ///
    /// The walk aborts immediately; the `created` nodes linked before the
    /// failure are intentionally left in place (no rollback), so the
    /// hierarchy stays valid, merely incomplete.
    #[error("namespace exhausted after creating {created} nodes")]
    Allocation {
        /// Nodes successfully created before the failure.
        created: usize,
    },

    /// The namespace rejected a creation for a reason other than
    /// exhaustion (duplicate sibling, dead or non-directory parent).
    #[error("namespace rejected node creation: {0}")]
    Namespace(NamespaceError),

    /// The synthetic cursor climbed above the build root, which means the
    /// source tree's linkage violated its contract mid-walk.
    #[error("source tree linkage is inconsistent")]
    CursorUnderflow,
}

/// Mirrors the whole source tree below `root`.
///
/// Takes the read side of `source` for the entire traversal (released on
/// every exit path) and creates one directory per source node under `root`,
/// starting with the source root itself. Returns the number of directories
/// created.
///
/// A parent directory is always created, linked and live before any of its
/// children, and siblings are created in source order.
pub fn populate<S: SourceTree>(
    ns: &Namespace,
    root: &Arc<Node>,
    source: &RwLock<S>,
) -> Result<usize, BuildError> {
    let src = source.read();
    let ext_root = src.root();

    let mut ext = ext_root.clone();
    let mut dir = Arc::clone(root);
    let mut descending = true;
    let mut created = 0usize;

    loop {
        if descending {
            let segment = name::segment(src.id(&ext), &src.display_name(&ext));
            let child = match ns.create_directory(&dir, &segment) {
                Ok(child) => child,
                Err(NamespaceError::Exhausted) => {
                    tracing::debug!(created, "source walk aborted: namespace exhausted");
                    return Err(BuildError::Allocation { created });
                }
                Err(err) => return Err(BuildError::Namespace(err)),
            };
            created += 1;
            dir = child;
        }

        if descending && let Some(child) = src.first_child(&ext) {
            ext = child;
        } else if let Some(sibling) = src.next_sibling(&ext) {
            ext = sibling;
            descending = true;
            // Up one synthetic level so the next creation lands as a
            // sibling, not a grandchild.
            dir = dir.parent().ok_or(BuildError::CursorUnderflow)?;
        } else {
            ext = src.parent(&ext);
            descending = false;
            dir = dir.parent().ok_or(BuildError::CursorUnderflow)?;
        }

        if ext == ext_root && !descending {
            tracing::debug!(created, "source walk complete");
            return Ok(created);
        }
    }
}
