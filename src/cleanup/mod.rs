//! Disk space reclamation.
//!
//! A [`CleanupTarget`] pairs a location with one of a fixed set of
//! execution strategies; the [`engine`] runs a single target with
//! per-entry fault isolation, and the [`service`] drives a whole run,
//! folding per-target results into totals and emitting log events.

pub mod browsers;
pub mod engine;
pub mod providers;
pub mod service;

pub use engine::{CleanupEngine, RecycleBin, ShellRecycleBin};
pub use providers::{CleanupOptions, Provider, SystemPaths};
pub use service::{CleanupService, CleanupSummary, LogColor, LogEvent, LogIcon};

use std::path::PathBuf;
use std::time::Duration;

/// What kind of thing a target points at (informational)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Folder,
    Command,
}

/// How a target is reclaimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Remove every file, then every directory, under the path
    DeleteDirectoryContents,
    /// Run the target's command and count it as one reclaimed item
    ExecuteCommand,
    /// Empty the recycle bin through the OS shell
    EmptyRecycleBin,
    /// Wipe the Windows Update cache with its services paused
    WindowsUpdateCache,
    /// Wipe the cache directories of every known browser profile
    BrowserCaches,
}

/// A unit of reclaimable storage, tagged with its execution strategy
#[derive(Debug, Clone)]
pub struct CleanupTarget {
    /// Display name for this target's category
    pub category: String,
    pub path: PathBuf,
    pub kind: TargetKind,
    pub strategy: Strategy,
    /// Program to run; only meaningful for [`Strategy::ExecuteCommand`]
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl CleanupTarget {
    /// A folder target cleaned by wiping its contents
    pub fn folder(category: &str, path: PathBuf) -> Self {
        Self {
            category: category.to_string(),
            path,
            kind: TargetKind::Folder,
            strategy: Strategy::DeleteDirectoryContents,
            command: None,
            args: Vec::new(),
        }
    }
}

/// Accounting for one executed target.
///
/// `items_removed + items_ignored` never exceeds the number of entries
/// visited; `failures` counts caught faults, one per fault, independent
/// of the ignored count.
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub category: String,
    pub bytes_removed: u64,
    pub items_removed: usize,
    pub items_ignored: usize,
    pub failures: usize,
    pub duration: Duration,
}

impl CleanupResult {
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            bytes_removed: 0,
            items_removed: 0,
            items_ignored: 0,
            failures: 0,
            duration: Duration::ZERO,
        }
    }
}
