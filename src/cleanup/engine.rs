use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use walkdir::WalkDir;

use super::browsers;
use super::{CleanupResult, CleanupTarget, Strategy};
use crate::process::CommandRunner;
use crate::services::ServiceControl;

/// Services the Windows Update cache depends on. Stopped before the wipe,
/// always restarted afterwards.
const UPDATE_SERVICES: &[&str] = &["wuauserv", "bits", "cryptsvc", "msiserver"];

/// Emptying the recycle bin, as an injectable capability
pub trait RecycleBin: Send + Sync {
    fn empty(&self) -> Result<()>;
}

/// Empties the recycle bin through the OS shell, with confirmation
/// suppressed
pub struct ShellRecycleBin {
    runner: CommandRunner,
}

impl ShellRecycleBin {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

impl RecycleBin for ShellRecycleBin {
    fn empty(&self) -> Result<()> {
        let out = self.runner.run(
            "powershell",
            &[
                "-NoProfile",
                "-Command",
                "Clear-RecycleBin -Force -ErrorAction Stop",
            ],
        );
        if out.success() {
            Ok(())
        } else if !out.started {
            bail!("could not launch the shell to empty the recycle bin")
        } else if out.timed_out {
            bail!("timed out emptying the recycle bin")
        } else {
            bail!("emptying the recycle bin failed: {}", out.stderr.trim())
        }
    }
}

/// Executes a single cleanup target by dispatching on its strategy.
///
/// Pure dispatch, no state; every strategy contributes into one
/// [`CleanupResult`] and the engine records the wall-clock duration of
/// the whole invocation.
pub struct CleanupEngine<'a> {
    runner: &'a CommandRunner,
    services: &'a dyn ServiceControl,
    recycle_bin: &'a dyn RecycleBin,
}

impl<'a> CleanupEngine<'a> {
    pub fn new(
        runner: &'a CommandRunner,
        services: &'a dyn ServiceControl,
        recycle_bin: &'a dyn RecycleBin,
    ) -> Self {
        Self {
            runner,
            services,
            recycle_bin,
        }
    }

    pub fn run(&self, target: &CleanupTarget) -> CleanupResult {
        let start = Instant::now();
        let mut result = CleanupResult::new(&target.category);

        match target.strategy {
            Strategy::DeleteDirectoryContents => {
                delete_directory_contents(&target.path, &mut result)
            }
            Strategy::ExecuteCommand => self.execute_command(target, &mut result),
            Strategy::EmptyRecycleBin => match self.recycle_bin.empty() {
                Ok(()) => result.items_removed += 1,
                Err(e) => {
                    result.failures += 1;
                    tracing::warn!(error = %e, "recycle bin cleanup failed");
                }
            },
            Strategy::WindowsUpdateCache => self.cleanup_update_cache(&target.path, &mut result),
            Strategy::BrowserCaches => browsers::clean_browser_caches(&target.path, &mut result),
        }

        result.duration = start.elapsed();
        result
    }

    fn execute_command(&self, target: &CleanupTarget, result: &mut CleanupResult) {
        let command = match target.command.as_deref().filter(|c| !c.is_empty()) {
            Some(command) => command,
            None => {
                result.failures += 1;
                tracing::warn!(category = %target.category, "cleanup target has no command");
                return;
            }
        };
        let args: Vec<&str> = target.args.iter().map(String::as_str).collect();
        let out = self.runner.run(command, &args);
        if out.started {
            // The command ran; its exit code is its own business
            result.items_removed += 1;
        } else {
            result.failures += 1;
            tracing::warn!(command, "cleanup command could not be started");
        }
    }

    /// Stop the update services, wipe the cache directory, restart the
    /// services. The restart runs even when the wipe reported failures; a
    /// failed stop aborts before anything is deleted.
    fn cleanup_update_cache(&self, path: &Path, result: &mut CleanupResult) {
        let mut stopped: Vec<&str> = Vec::new();
        for name in UPDATE_SERVICES {
            match self.services.stop(name) {
                Ok(()) => stopped.push(name),
                Err(e) => {
                    result.failures += 1;
                    tracing::warn!(service = name, error = %e, "could not stop service, skipping update cache cleanup");
                    // Bring back the ones already stopped before bailing out
                    for name in &stopped {
                        if let Err(e) = self.services.start(name) {
                            result.failures += 1;
                            tracing::warn!(service = name, error = %e, "could not restart service");
                        }
                    }
                    return;
                }
            }
        }

        delete_directory_contents(path, result);

        for name in UPDATE_SERVICES {
            if let Err(e) = self.services.start(name) {
                result.failures += 1;
                tracing::warn!(service = name, error = %e, "could not restart service");
            }
        }
    }
}

/// Remove everything under `root`, leaving `root` itself in place.
///
/// All files go first; each file's size is read before deletion so the
/// byte accounting reflects what was actually removed. Directories follow,
/// longest full path first, so children are gone before their parents.
/// A missing root is a no-op. Any per-entry fault is counted and skipped;
/// the walk never aborts.
pub(crate) fn delete_directory_contents(root: &Path, result: &mut CleanupResult) {
    if !root.exists() {
        return;
    }

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                result.bytes_removed += size;
                result.items_removed += 1;
            }
            Err(e) => {
                result.items_ignored += 1;
                result.failures += 1;
                tracing::warn!(path = %entry.path().display(), error = %e, "could not remove file");
            }
        }
    }

    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();
    dirs.sort_by(|a, b| b.as_os_str().len().cmp(&a.as_os_str().len()));

    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(e) => {
                result.items_ignored += 1;
                result.failures += 1;
                tracing::warn!(path = %dir.display(), error = %e, "could not remove directory");
            }
        }
    }
}
