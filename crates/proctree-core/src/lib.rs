//! Snapshot hierarchy manager for mirrored process trees.
//!
//! This crate mirrors a live, externally-mutable hierarchical resource — in
//! practice the operating system's process tree — into a synthetic,
//! browsable directory hierarchy. The snapshot is rebuilt on demand; the
//! previous one is torn down safely while other threads may still be
//! traversing it.
//!
//! # Components
//!
//! - [`name`] — sanitizes raw display names into safe path segments and
//!   formats the `"{id}.{name}"` boundary convention.
//! - [`Node`] / [`Namespace`] — the synthetic node model and the in-memory
//!   namespace provider storing it, with per-directory exclusive locks and
//!   short-lived children-collection locks.
//! - [`teardown`] — iterative, lock-coupled deletion of a whole subtree,
//!   correct under concurrent structural mutation by other threads.
//! - [`builder`] — iterative preorder walk of an external
//!   first-child/next-sibling tree, materializing one directory per node.
//! - [`Refresher`] — turns the "(re)populate now" trigger into
//!   teardown-then-rebuild.
//! - [`SourceTree`] / [`LinkedTree`] — the capability interface over the
//!   external tree, and an arena implementation of it.
//!
//! # Concurrency
//!
//! Any number of refresh, list and read operations may run concurrently.
//! Directory locks are only ever acquired top-down (parent before child),
//! which keeps a builder racing a teardown deadlock-free; the children
//! collections have their own short-lived locks so structural scans stay
//! cheap. See the module docs of [`node`] and [`teardown`] for the full
//! discipline.
//!
//! # Example
//!
//! ```
//! use parking_lot::RwLock;
//! use proctree_core::{LinkedTree, Namespace, Refresher};
//! use std::sync::Arc;
//!
//! let mut tree = LinkedTree::new(1, "init");
//! tree.insert(482, "worker/pool", 1);
//!
//! let refresher = Refresher::new(
//!     Arc::new(Namespace::new()),
//!     Arc::new(RwLock::new(tree)),
//! );
//! let report = refresher.on_open().unwrap();
//! assert_eq!(report.created, 2);
//!
//! let ns = refresher.namespace();
//! let init = ns.find(ns.root(), "1.init").unwrap();
//! assert_eq!(ns.list(&init), vec!["482.worker-pool"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod name;
pub mod namespace;
pub mod node;
pub mod refresh;
pub mod source;
pub mod teardown;
pub mod testing;

pub use builder::BuildError;
pub use namespace::{Namespace, NamespaceError};
pub use node::{Node, NodeKind};
pub use refresh::{RefreshError, RefreshReport, Refresher};
pub use source::{LinkedTree, NodeRef, SourceTree};
pub use teardown::TeardownError;
