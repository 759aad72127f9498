//! CLI subcommands.

pub mod info;
pub mod tree;
