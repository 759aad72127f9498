//! `ptree info` — summary statistics for the mirrored hierarchy.

use anyhow::Result;
use proctree_core::{Namespace, Node, NodeKind, RefreshReport};
use std::sync::Arc;

/// Arguments for the info command.
#[derive(Debug, clap::Args)]
pub struct Args {}

/// Prints refresh and shape statistics.
pub fn run(ns: &Namespace, report: RefreshReport, _args: &Args) -> Result<()> {
    let (nodes, max_depth, max_fanout) = measure(ns);

    println!("processes mirrored: {nodes}");
    println!("deepest chain:      {max_depth}");
    println!("widest sibling set: {max_fanout}");
    println!(
        "last refresh:       removed {}, created {}{}",
        report.removed,
        report.created,
        if report.complete { "" } else { " (incomplete)" }
    );
    Ok(())
}

/// Walks the hierarchy and returns (node count, max depth, max fanout).
fn measure(ns: &Namespace) -> (usize, usize, usize) {
    let mut nodes = 0usize;
    let mut max_depth = 0usize;
    let mut max_fanout = 0usize;

    let mut stack: Vec<(Arc<Node>, usize)> = vec![(Arc::clone(ns.root()), 0)];
    while let Some((dir, depth)) = stack.pop() {
        let names = ns.list(&dir);
        max_fanout = max_fanout.max(names.len());
        for name in names {
            let Some(child) = ns.find(&dir, &name) else {
                continue;
            };
            nodes += 1;
            max_depth = max_depth.max(depth + 1);
            if child.kind() == NodeKind::Directory {
                stack.push((child, depth + 1));
            }
        }
    }
    (nodes, max_depth, max_fanout)
}
