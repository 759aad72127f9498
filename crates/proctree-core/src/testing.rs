//! Test support: source-tree generators and mirror assertions.
//!
//! Shared by the crate's own tests, the integration tests and the
//! benchmarks. Kept in the library (not a `tests/` helper) so downstream
//! source-tree implementations can reuse the conformance check.

use crate::name;
use crate::namespace::Namespace;
use crate::source::{LinkedTree, SourceTree};
use std::sync::Arc;

/// The worked scenario: `1 (root) -> [2, 3]`, `3 -> [4]`, display names
/// `root`, `x`, `y`, `z`.
pub fn sample_tree() -> LinkedTree {
    let mut tree = LinkedTree::new(1, "root");
    tree.insert(2, "x", 1);
    tree.insert(3, "y", 1);
    tree.insert(4, "z", 3);
    tree
}

/// A single chain `0 -> 1 -> 2 -> ...` of the given depth below the root.
pub fn chain_tree(depth: u32) -> LinkedTree {
    let mut tree = LinkedTree::new(0, "root");
    for id in 1..=depth {
        tree.insert(id, "link", id - 1);
    }
    tree
}

/// A root with `width` direct children and nothing deeper.
pub fn flat_tree(width: u32) -> LinkedTree {
    let mut tree = LinkedTree::new(0, "root");
    for id in 1..=width {
        tree.insert(id, "child", 0);
    }
    tree
}

/// A uniform tree: every node down to `depth` has `fanout` children.
pub fn balanced_tree(depth: u32, fanout: u32) -> LinkedTree {
    let mut tree = LinkedTree::new(0, "root");
    let mut next_id = 1u32;
    let mut level = vec![0u32];
    for _ in 0..depth {
        let mut next_level = Vec::with_capacity(level.len() * fanout as usize);
        for &parent in &level {
            for _ in 0..fanout {
                tree.insert(next_id, "node", parent);
                next_level.push(next_id);
                next_id += 1;
            }
        }
        level = next_level;
    }
    tree
}

/// Asserts that `ns` mirrors `src` exactly: one directory per source node,
/// same parent/child structure, same sibling order, correct segment names.
///
/// # Panics
///
/// Panics (test-style) on the first structural mismatch.
pub fn assert_mirrors<S: SourceTree>(ns: &Namespace, src: &S) {
    let ext_root = src.root();
    let synthetic = ns
        .find(
            ns.root(),
            &name::segment(src.id(&ext_root), &src.display_name(&ext_root)),
        )
        .expect("source root has no mirrored directory");
    assert_subtree_mirrors(ns, src, &ext_root, &synthetic);
    assert_eq!(
        ns.list(ns.root()).len(),
        1,
        "hierarchy root must hold exactly the mirrored source root"
    );
}

fn assert_subtree_mirrors<S: SourceTree>(
    ns: &Namespace,
    src: &S,
    ext: &S::Node,
    dir: &Arc<crate::node::Node>,
) {
    let mut expected = Vec::new();
    let mut cursor = src.first_child(ext);
    while let Some(child) = cursor {
        expected.push(child.clone());
        cursor = src.next_sibling(&child);
    }

    let listed = ns.list(dir);
    let expected_names: Vec<String> = expected
        .iter()
        .map(|c| name::segment(src.id(c), &src.display_name(c)))
        .collect();
    assert_eq!(
        listed,
        expected_names,
        "children of {} diverge from the source",
        dir.name()
    );

    for (child, segment) in expected.iter().zip(&expected_names) {
        let sub = ns
            .find(dir, segment)
            .expect("listed child disappeared mid-check");
        assert_subtree_mirrors(ns, src, child, &sub);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder;
    use parking_lot::RwLock;

    #[test]
    fn test_generators_have_expected_sizes() {
        assert_eq!(sample_tree().len(), 4);
        assert_eq!(chain_tree(10).len(), 11);
        assert_eq!(flat_tree(10).len(), 11);
        // 1 + 3 + 9 + 27
        assert_eq!(balanced_tree(3, 3).len(), 40);
    }

    #[test]
    fn test_assert_mirrors_accepts_correct_mirror() {
        let ns = Namespace::new();
        let tree = balanced_tree(3, 3);
        let source = RwLock::new(tree);
        builder::populate(&ns, &Arc::clone(ns.root()), &source).unwrap();
        assert_mirrors(&ns, &*source.read());
    }

    #[test]
    #[should_panic(expected = "diverge from the source")]
    fn test_assert_mirrors_rejects_missing_node() {
        let ns = Namespace::new();
        let source = RwLock::new(sample_tree());
        builder::populate(&ns, &Arc::clone(ns.root()), &source).unwrap();

        // Knock one directory out.
        let top = ns.find(ns.root(), "1.root").unwrap();
        let victim = ns.find(&top, "2.x").unwrap();
        {
            let _dir = top.lock_dir();
            ns.unlink_and_destroy(&victim, &top).unwrap();
        }
        assert_mirrors(&ns, &*source.read());
    }
}
