//! `ptree tree` — render the mirrored hierarchy.

use anyhow::Result;
use proctree_core::{Namespace, Node, NodeKind};
use std::sync::Arc;

/// Arguments for the tree command.
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Limit rendering to this many levels below the root
    #[arg(long, value_name = "LEVELS")]
    pub max_depth: Option<usize>,
}

/// Prints the hierarchy as an indented tree, one segment per line.
pub fn run(ns: &Namespace, args: &Args) -> Result<()> {
    println!("/");
    let max_depth = args.max_depth.unwrap_or(usize::MAX);

    // Iterative DFS; directories are pushed in reverse so siblings print in
    // namespace order.
    let mut stack: Vec<(Arc<Node>, usize)> = Vec::new();
    push_children(ns, ns.root(), 1, &mut stack);

    while let Some((node, depth)) = stack.pop() {
        println!("{}{}", "  ".repeat(depth), node.name());
        if node.kind() == NodeKind::Directory && depth < max_depth {
            push_children(ns, &node, depth + 1, &mut stack);
        }
    }
    Ok(())
}

fn push_children(ns: &Namespace, dir: &Arc<Node>, depth: usize, stack: &mut Vec<(Arc<Node>, usize)>) {
    let mut children: Vec<Arc<Node>> = ns
        .list(dir)
        .iter()
        .filter_map(|name| ns.find(dir, name))
        .collect();
    children.reverse();
    for child in children {
        stack.push((child, depth));
    }
}
