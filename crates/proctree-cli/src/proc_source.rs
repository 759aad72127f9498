//! Process tree enumeration from `/proc`.
//!
//! Builds a [`LinkedTree`] snapshot of the live process tree by parsing
//! `/proc/<pid>/stat`. The kernel's idle task (pid 0, `swapper`) is
//! synthesized as the tree root, since both `init` and the kernel thread
//! daemon report it as their parent.
//!
//! Returns an empty-but-valid tree rather than failing when individual
//! processes vanish mid-scan; enumeration of a live system is inherently
//! racy and the snapshot only has to be internally consistent.

use anyhow::{Context, Result};
use proctree_core::LinkedTree;

/// One process scraped from `/proc`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProcEntry {
    pid: u32,
    comm: String,
    ppid: u32,
}

/// Takes a snapshot of the live process tree.
///
/// Only meaningful on Linux; other platforms get an error.
#[cfg(target_os = "linux")]
pub fn snapshot() -> Result<LinkedTree> {
    let mut entries = Vec::new();
    let proc_dir = std::fs::read_dir("/proc").context("failed to open /proc")?;
    for dir_entry in proc_dir {
        let Ok(dir_entry) = dir_entry else { continue };
        let name = dir_entry.file_name();
        let Some(pid) = name.to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        // The process may exit between readdir and the stat read.
        let Ok(stat) = std::fs::read_to_string(format!("/proc/{pid}/stat")) else {
            continue;
        };
        if let Some(entry) = parse_stat(&stat) {
            entries.push(entry);
        }
    }
    tracing::debug!(processes = entries.len(), "scanned /proc");
    Ok(link_entries(entries))
}

/// Stub for platforms without a `/proc` process tree.
#[cfg(not(target_os = "linux"))]
pub fn snapshot() -> Result<LinkedTree> {
    anyhow::bail!("process tree enumeration requires /proc (Linux only)")
}

/// Parses one `/proc/<pid>/stat` line: `pid (comm) state ppid ...`.
///
/// The command name may itself contain spaces and parentheses, so the comm
/// field is delimited by the first `(` and the *last* `)`.
fn parse_stat(stat: &str) -> Option<ProcEntry> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    let pid = stat[..open].trim().parse().ok()?;
    let comm = stat[open + 1..close].to_string();
    let mut rest = stat[close + 1..].split_whitespace();
    let _state = rest.next()?;
    let ppid = rest.next()?.parse().ok()?;
    Some(ProcEntry { pid, comm, ppid })
}

/// Links scraped entries into a tree rooted at the synthetic idle task.
///
/// Children end up in ascending-pid order. A parent may carry a higher pid
/// than its child (pid wrap, reparenting), so insertion runs in passes until
/// it stops making progress; survivors whose parent vanished mid-scan are
/// adopted by the root, mirroring what the kernel does with orphans.
fn link_entries(mut entries: Vec<ProcEntry>) -> LinkedTree {
    let mut tree = LinkedTree::new(0, "swapper");
    entries.sort_by_key(|e| e.pid);
    entries.retain(|e| e.pid != 0);

    loop {
        let mut remaining = Vec::new();
        let mut progressed = false;
        for entry in entries {
            if tree.contains(entry.ppid) {
                tree.insert(entry.pid, &entry.comm, entry.ppid);
                progressed = true;
            } else {
                remaining.push(entry);
            }
        }
        entries = remaining;
        if entries.is_empty() || !progressed {
            break;
        }
    }
    for orphan in &entries {
        tracing::debug!(pid = orphan.pid, ppid = orphan.ppid, "adopting orphan");
        tree.insert(orphan.pid, &orphan.comm, 0);
    }
    tree
}
