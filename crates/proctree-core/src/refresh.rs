//! Refresh orchestration.
//!
//! A [`Refresher`] owns the namespace and the locked source tree and turns
//! the "(re)populate now" trigger into the two-phase operation: tear down
//! the existing snapshot, then rebuild from the source.
//!
//! The two phases are not atomic with respect to external readers: a reader
//! may observe an empty root between them. That is documented behavior, not
//! a defect — each phase individually leaves the hierarchy valid.
//!
//! Refreshes themselves are serialized through an internal mutex, so a storm
//! of open events collapses into back-to-back rebuilds instead of a builder
//! racing the teardown of its own snapshot. Readers and listers are never
//! blocked by that mutex.

use crate::builder::{self, BuildError};
use crate::namespace::Namespace;
use crate::source::SourceTree;
use crate::teardown::{self, TeardownError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use thiserror::Error;

/// Refresh failure.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Teardown of the previous snapshot failed; the old hierarchy is
    /// partially removed but every remaining node is valid.
    #[error("teardown failed: {0}")]
    Teardown(#[from] TeardownError),

    /// Rebuild failed for a reason other than resource exhaustion
    /// (exhaustion is reported as a partial success, not an error).
    #[error("rebuild failed: {0}")]
    Build(BuildError),
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Nodes removed while tearing down the previous snapshot.
    pub removed: usize,
    /// Directories created by the rebuild.
    pub created: usize,
    /// False if the rebuild ran out of namespace capacity partway; the
    /// created nodes are kept (no rollback) and the hierarchy is valid but
    /// incomplete.
    pub complete: bool,
}

/// Orchestrates teardown-then-rebuild against one namespace and one source.
pub struct Refresher<S: SourceTree> {
    namespace: Arc<Namespace>,
    source: Arc<RwLock<S>>,
    refresh_lock: Mutex<()>,
}

impl<S: SourceTree> Refresher<S> {
    /// Creates a refresher over `namespace`, mirroring `source`.
    pub fn new(namespace: Arc<Namespace>, source: Arc<RwLock<S>>) -> Self {
        Self {
            namespace,
            source,
            refresh_lock: Mutex::new(()),
        }
    }

    /// The namespace this refresher maintains.
    pub fn namespace(&self) -> &Arc<Namespace> {
        &self.namespace
    }

    /// The trigger hook: called when a consumer opens the hierarchy root
    /// (and once at startup). Equivalent to [`refresh`](Self::refresh).
    pub fn on_open(&self) -> Result<RefreshReport, RefreshError> {
        self.refresh()
    }

    /// Tears down the existing snapshot, then rebuilds it from the source.
    pub fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let _serialize = self.refresh_lock.lock();
        let root = self.namespace.root();

        let removed = if root.has_live_children() {
            teardown::drain(&self.namespace, root)?
        } else {
            0
        };

        let report = match builder::populate(&self.namespace, root, &self.source) {
            Ok(created) => RefreshReport {
                removed,
                created,
                complete: true,
            },
            Err(BuildError::Allocation { created }) => {
                tracing::warn!(created, "rebuild incomplete: namespace exhausted");
                RefreshReport {
                    removed,
                    created,
                    complete: false,
                }
            }
            Err(err) => return Err(RefreshError::Build(err)),
        };
        tracing::debug!(
            removed = report.removed,
            created = report.created,
            complete = report.complete,
            "refresh finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LinkedTree;

    fn scenario_tree() -> LinkedTree {
        let mut tree = LinkedTree::new(1, "root");
        tree.insert(2, "x", 1);
        tree.insert(3, "y", 1);
        tree.insert(4, "z", 3);
        tree
    }

    fn refresher(tree: LinkedTree, capacity: usize) -> Refresher<LinkedTree> {
        Refresher::new(
            Arc::new(Namespace::with_capacity(capacity)),
            Arc::new(RwLock::new(tree)),
        )
    }

    #[test]
    fn test_first_refresh_populates() {
        let r = refresher(scenario_tree(), usize::MAX);
        let report = r.on_open().unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.created, 4);
        assert!(report.complete);
        assert_eq!(r.namespace().node_count(), 4);
    }

    #[test]
    fn test_refresh_is_repeatable() {
        let r = refresher(scenario_tree(), usize::MAX);
        r.refresh().unwrap();
        let ns = r.namespace();
        let first = snapshot_paths(ns);

        let report = r.refresh().unwrap();
        assert_eq!(report.removed, 4);
        assert_eq!(report.created, 4);
        assert_eq!(snapshot_paths(ns), first);
    }

    #[test]
    fn test_partial_rebuild_reported_not_fatal() {
        let r = refresher(scenario_tree(), 2);
        let report = r.refresh().unwrap();
        assert!(!report.complete);
        assert_eq!(report.created, 2);
        // The partial hierarchy is valid and listable.
        let top = r.namespace().find(r.namespace().root(), "1.root").unwrap();
        assert_eq!(r.namespace().list(&top), vec!["2.x"]);
    }

    #[test]
    fn test_refresh_after_partial_build_starts_clean() {
        let r = refresher(scenario_tree(), 2);
        assert!(!r.refresh().unwrap().complete);
        // Same capacity, so still partial, but the second pass tears the
        // remnant down first instead of colliding with it.
        let report = r.refresh().unwrap();
        assert_eq!(report.removed, 2);
        assert_eq!(report.created, 2);
    }

    /// Flattens the hierarchy into sorted "a/b/c" paths for comparison.
    fn snapshot_paths(ns: &Namespace) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(Arc::clone(ns.root()), String::new())];
        while let Some((dir, prefix)) = stack.pop() {
            for name in ns.list(&dir) {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                if let Some(child) = ns.find(&dir, &name) {
                    stack.push((child, path.clone()));
                }
                out.push(path);
            }
        }
        out.sort();
        out
    }
}
