//! `ptree` — snapshot the live process tree and browse it as a hierarchy.
//!
//! Enumerates processes from `/proc`, mirrors them through the snapshot
//! hierarchy manager exactly as a namespace driver would on a directory-open
//! event, and renders the result.

#![deny(unsafe_code)]

mod commands;
mod proc_source;

use anyhow::Result;
use clap::{Parser, Subcommand};
use parking_lot::RwLock;
use proctree_core::{Namespace, Refresher};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Browse the live process tree as a synthetic hierarchy
#[derive(Parser)]
#[command(name = "ptree")]
#[command(author, version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the mirrored hierarchy as an indented tree (default)
    Tree(commands::tree::Args),

    /// Show mirror statistics
    Info(commands::info::Args),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let source = Arc::new(RwLock::new(proc_source::snapshot()?));
    let refresher = Refresher::new(Arc::new(Namespace::new()), source);

    // The on-open trigger: populate before the first listing.
    let report = refresher.on_open()?;
    let ns: &Arc<Namespace> = refresher.namespace();

    match cli.command.unwrap_or(Commands::Tree(commands::tree::Args { max_depth: None })) {
        Commands::Tree(args) => commands::tree::run(ns, &args),
        Commands::Info(args) => commands::info::run(ns, report, &args),
    }
}
