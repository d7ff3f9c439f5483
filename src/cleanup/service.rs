use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::engine::CleanupEngine;
use super::providers::{CleanupOptions, Provider, SystemPaths};
use super::CleanupResult;
use crate::common::format::format_size;

/// Icon hint for a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogIcon {
    Sweep,
    Warning,
    Summary,
}

/// Status color classification for a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogColor {
    Success,
    Warning,
    Error,
}

/// One entry in the cleanup log stream. This is the only data the
/// presentation layer consumes from a cleanup run.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub message: String,
    pub icon: LogIcon,
    pub color: LogColor,
    pub bold: bool,
}

/// Totals folded over a whole cleanup run
#[derive(Debug, Clone)]
pub struct CleanupSummary {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub bytes_removed: u64,
    pub items_removed: usize,
    pub items_ignored: usize,
    pub failures: usize,
    pub duration: Duration,
    pub results: Vec<CleanupResult>,
}

impl CleanupSummary {
    fn new() -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            bytes_removed: 0,
            items_removed: 0,
            items_ignored: 0,
            failures: 0,
            duration: Duration::ZERO,
            results: Vec::new(),
        }
    }

    fn fold(&mut self, result: &CleanupResult) {
        self.bytes_removed += result.bytes_removed;
        self.items_removed += result.items_removed;
        self.items_ignored += result.items_ignored;
        self.failures += result.failures;
    }

    /// Total space freed, in megabytes
    pub fn megabytes_removed(&self) -> f64 {
        self.bytes_removed as f64 / (1024.0 * 1024.0)
    }
}

/// Drives a whole cleanup run.
///
/// Resolves options into the active providers, feeds every yielded target
/// through the engine strictly in registration/yield order (cleanup
/// strategies mutate shared OS state, so nothing runs in parallel), and
/// emits one log event per target plus a closing summary event.
pub struct CleanupService<'a> {
    engine: CleanupEngine<'a>,
    paths: SystemPaths,
    subscribers: Vec<mpsc::Sender<LogEvent>>,
}

impl<'a> CleanupService<'a> {
    pub fn new(engine: CleanupEngine<'a>, paths: SystemPaths) -> Self {
        Self {
            engine,
            paths,
            subscribers: Vec::new(),
        }
    }

    /// Register a log stream consumer. Events arrive in emission order.
    pub fn subscribe(&mut self) -> mpsc::Receiver<LogEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn run(&self, options: &CleanupOptions) -> CleanupSummary {
        let start = Instant::now();
        let mut summary = CleanupSummary::new();

        for provider in Provider::active(options) {
            for target in provider.targets(&self.paths) {
                tracing::info!(category = %target.category, "cleaning target");
                let result = self.engine.run(&target);
                self.emit(target_event(&result));
                summary.fold(&result);
                summary.results.push(result);
            }
        }

        summary.duration = start.elapsed();
        self.emit(summary_event(&summary));
        summary
    }

    fn emit(&self, event: LogEvent) {
        for tx in &self.subscribers {
            let _ = tx.send(event.clone());
        }
    }
}

fn target_event(result: &CleanupResult) -> LogEvent {
    let message = format!(
        "{}: removed {} ({}), {} skipped, {} failed",
        result.category,
        result.items_removed,
        format_size(result.bytes_removed),
        result.items_ignored,
        result.failures,
    );
    LogEvent {
        message,
        icon: if result.failures > 0 {
            LogIcon::Warning
        } else {
            LogIcon::Sweep
        },
        color: if result.failures > 0 && result.items_removed == 0 {
            LogColor::Error
        } else if result.failures > 0 {
            LogColor::Warning
        } else {
            LogColor::Success
        },
        bold: false,
    }
}

fn summary_event(summary: &CleanupSummary) -> LogEvent {
    let message = format!(
        "Freed {:.1} MB — {} removed, {} skipped, {} failed",
        summary.megabytes_removed(),
        summary.items_removed,
        summary.items_ignored,
        summary.failures,
    );
    LogEvent {
        message,
        icon: LogIcon::Summary,
        color: if summary.failures > 0 {
            LogColor::Warning
        } else {
            LogColor::Success
        },
        bold: true,
    }
}
