use anyhow::{bail, Result};

use crate::process::CommandRunner;

/// Control over OS services.
///
/// Consumed by the Windows Update cleanup strategy and by procedural
/// tweaks that pause or disable a service; injected so tests can
/// substitute a scripted implementation.
pub trait ServiceControl: Send + Sync {
    /// Stop a service, waiting until it is down
    fn stop(&self, name: &str) -> Result<()>;

    /// Start a service, waiting until it is up
    fn start(&self, name: &str) -> Result<()>;

    /// Whether the service is currently running
    fn is_running(&self, name: &str) -> Result<bool>;
}

/// Service control through the `net` and `sc` command-line tools.
///
/// The runner's timeout bounds how long a stop or start may take.
pub struct SystemServices {
    runner: CommandRunner,
}

impl SystemServices {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

impl ServiceControl for SystemServices {
    fn stop(&self, name: &str) -> Result<()> {
        let out = self.runner.run("net", &["stop", name, "/y"]);
        if out.success() {
            return Ok(());
        }
        if !out.started {
            bail!("could not launch service control to stop '{}'", name);
        }
        if out.timed_out {
            bail!("timed out waiting for '{}' to stop", name);
        }
        // A service that is not running counts as stopped
        let text = format!("{}{}", out.stdout, out.stderr);
        if text.contains("is not started") {
            return Ok(());
        }
        bail!("failed to stop '{}': {}", name, first_line(&text));
    }

    fn start(&self, name: &str) -> Result<()> {
        let out = self.runner.run("net", &["start", name]);
        if out.success() {
            return Ok(());
        }
        if !out.started {
            bail!("could not launch service control to start '{}'", name);
        }
        if out.timed_out {
            bail!("timed out waiting for '{}' to start", name);
        }
        let text = format!("{}{}", out.stdout, out.stderr);
        if text.contains("already been started") {
            return Ok(());
        }
        bail!("failed to start '{}': {}", name, first_line(&text));
    }

    fn is_running(&self, name: &str) -> Result<bool> {
        let out = self.runner.run("sc", &["query", name]);
        if !out.started {
            bail!("could not launch service query for '{}'", name);
        }
        Ok(out.stdout.contains("RUNNING"))
    }
}

fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output")
}
