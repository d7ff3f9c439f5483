//! Named, reversible system configuration changes.
//!
//! A [`Tweak`] is either *declarative* (a desired value and a baseline
//! value at one store location) or *procedural* (three named operations
//! for changes that need process execution or multi-key writes). Both
//! expose the same apply/revert/check contract and derive the same
//! [`TweakStatus`]; status checks never propagate a fault, they report
//! [`TweakStatus::Unknown`] instead.

pub mod catalog;
pub mod engine;

pub use engine::{BatchReport, TweakEngine};

use serde::Serialize;
use std::fmt;

use crate::process::CommandRunner;
use crate::services::ServiceControl;
use crate::store::{ConfigStore, Scope, StoreError, StoreValue};

/// Current state of a tweak, as last derived by its own check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TweakStatus {
    /// Not checked yet, or the last check faulted
    Unknown,
    /// External state matches the not-applied baseline
    Default,
    /// External state matches the applied target
    Optimized,
    /// A value is present but matches neither side
    Modified,
    /// In-flight marker for interactive consumers; never set by the engine
    Processing,
}

impl fmt::Display for TweakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweakStatus::Unknown => write!(f, "Unknown"),
            TweakStatus::Default => write!(f, "Default"),
            TweakStatus::Optimized => write!(f, "Optimized"),
            TweakStatus::Modified => write!(f, "Modified"),
            TweakStatus::Processing => write!(f, "Processing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TweakCategory {
    Privacy,
    Performance,
    Network,
    Security,
    Appearance,
    Tweaks,
    Search,
}

impl TweakCategory {
    /// All categories in display order
    pub const ALL: &'static [TweakCategory] = &[
        TweakCategory::Privacy,
        TweakCategory::Performance,
        TweakCategory::Network,
        TweakCategory::Security,
        TweakCategory::Appearance,
        TweakCategory::Tweaks,
        TweakCategory::Search,
    ];
}

impl fmt::Display for TweakCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TweakCategory::Privacy => write!(f, "Privacy"),
            TweakCategory::Performance => write!(f, "Performance"),
            TweakCategory::Network => write!(f, "Network"),
            TweakCategory::Security => write!(f, "Security"),
            TweakCategory::Appearance => write!(f, "Appearance"),
            TweakCategory::Tweaks => write!(f, "Tweaks"),
            TweakCategory::Search => write!(f, "Search"),
        }
    }
}

/// Desired state of a stored value.
///
/// `Absent` means the state is defined by the value not existing at all,
/// not by any particular stored content.
#[derive(Debug, Clone, PartialEq)]
pub enum DesiredValue {
    Absent,
    Dword(u32),
    Text(String),
}

impl DesiredValue {
    /// Whether a stored value's string form matches this desired value.
    /// `Absent` never matches a present value.
    fn matches(&self, stored: &str) -> bool {
        match self {
            DesiredValue::Absent => false,
            DesiredValue::Dword(n) => stored == n.to_string(),
            DesiredValue::Text(t) => stored == t.as_str(),
        }
    }
}

/// A declarative change: one store location, a target value, a baseline
#[derive(Debug, Clone)]
pub struct ConfigChange {
    /// Full path including the `HKLM\` or `HKCU\` scope prefix
    pub path: &'static str,
    pub value_name: &'static str,
    pub optimized: DesiredValue,
    pub default: DesiredValue,
}

/// Capabilities a tweak operation may use
pub struct TweakContext<'a> {
    pub store: &'a dyn ConfigStore,
    pub runner: &'a CommandRunner,
    pub services: &'a dyn ServiceControl,
}

/// One procedural tweak operation. Returns whether the action (or, for a
/// check, the optimized condition) holds; errors are caught by the caller.
pub type TweakOp = fn(&TweakContext) -> anyhow::Result<bool>;

/// The three named operations of a procedural tweak
#[derive(Clone, Copy)]
pub struct TweakOps {
    pub apply: TweakOp,
    pub revert: TweakOp,
    pub check: TweakOp,
}

#[derive(Clone)]
enum TweakKind {
    Config(ConfigChange),
    Custom(TweakOps),
}

/// A single named, reversible configuration change
pub struct Tweak {
    pub id: &'static str,
    pub category: TweakCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub status: TweakStatus,
    kind: TweakKind,
}

/// Result of applying or reverting a single tweak
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
}

impl ActionReport {
    fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Which side of a change a write targets
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Optimized,
    Default,
}

impl Tweak {
    pub fn config(
        id: &'static str,
        category: TweakCategory,
        title: &'static str,
        description: &'static str,
        change: ConfigChange,
    ) -> Self {
        Self {
            id,
            category,
            title,
            description,
            status: TweakStatus::Unknown,
            kind: TweakKind::Config(change),
        }
    }

    pub fn custom(
        id: &'static str,
        category: TweakCategory,
        title: &'static str,
        description: &'static str,
        ops: TweakOps,
    ) -> Self {
        Self {
            id,
            category,
            title,
            description,
            status: TweakStatus::Unknown,
            kind: TweakKind::Custom(ops),
        }
    }

    /// Apply the tweak and re-derive its status
    pub fn apply(&mut self, ctx: &TweakContext) -> ActionReport {
        match self.kind.clone() {
            TweakKind::Config(change) => {
                let result = write_side(&change, ctx.store, Side::Optimized);
                self.check_status(ctx);
                match result {
                    Ok(()) => ActionReport::ok(format!("'{}' applied", self.title)),
                    Err(e) => {
                        ActionReport::fail(format!("'{}' could not be applied: {}", self.title, e))
                    }
                }
            }
            TweakKind::Custom(ops) => {
                let run = (ops.apply)(ctx);
                let status = self.check_status(ctx);
                self.custom_report(run, status, TweakStatus::Optimized, "applied")
            }
        }
    }

    /// Revert the tweak and re-derive its status
    pub fn revert(&mut self, ctx: &TweakContext) -> ActionReport {
        match self.kind.clone() {
            TweakKind::Config(change) => {
                let result = write_side(&change, ctx.store, Side::Default);
                self.check_status(ctx);
                match result {
                    Ok(()) => ActionReport::ok(format!("'{}' reverted", self.title)),
                    Err(e) => {
                        ActionReport::fail(format!("'{}' could not be reverted: {}", self.title, e))
                    }
                }
            }
            TweakKind::Custom(ops) => {
                let run = (ops.revert)(ctx);
                let status = self.check_status(ctx);
                self.custom_report(run, status, TweakStatus::Default, "reverted")
            }
        }
    }

    /// Derive the current status from external state.
    ///
    /// Never propagates: any fault in the backing store or in a check
    /// operation yields [`TweakStatus::Unknown`].
    pub fn check_status(&mut self, ctx: &TweakContext) -> TweakStatus {
        self.status = match &self.kind {
            TweakKind::Config(change) => match derive_config_status(change, ctx.store) {
                Ok(status) => status,
                Err(e) => {
                    tracing::debug!(tweak = self.id, error = %e, "status check failed");
                    TweakStatus::Unknown
                }
            },
            TweakKind::Custom(ops) => match (ops.check)(ctx) {
                Ok(true) => TweakStatus::Optimized,
                Ok(false) => TweakStatus::Default,
                Err(e) => {
                    tracing::debug!(tweak = self.id, error = %e, "status check failed");
                    TweakStatus::Unknown
                }
            },
        };
        self.status
    }

    /// Build the report for a procedural apply/revert, separating "the
    /// action failed" from "the action ran but the state did not verify"
    fn custom_report(
        &self,
        run: anyhow::Result<bool>,
        status: TweakStatus,
        wanted: TweakStatus,
        verb: &str,
    ) -> ActionReport {
        match run {
            Err(e) => ActionReport::fail(format!("'{}' failed: {}", self.title, e)),
            Ok(false) => ActionReport::fail(format!("'{}' action did not complete", self.title)),
            Ok(true) if status == wanted => {
                ActionReport::ok(format!("'{}' {}", self.title, verb))
            }
            Ok(true) => ActionReport::fail(format!(
                "'{}' ran but the change could not be verified",
                self.title
            )),
        }
    }
}

/// Resolve the textual scope prefix of a store path.
/// Unrecognized prefixes fall back to the machine-wide scope.
fn split_scope(path: &str) -> (Scope, &str) {
    let (prefix, rest) = match path.split_once('\\') {
        Some((prefix, rest)) => (prefix, rest),
        None => (path, ""),
    };
    match prefix.to_ascii_uppercase().as_str() {
        "HKCU" | "HKEY_CURRENT_USER" => (Scope::CurrentUser, rest),
        "HKLM" | "HKEY_LOCAL_MACHINE" => (Scope::Machine, rest),
        _ => (Scope::Machine, rest),
    }
}

fn derive_config_status(
    change: &ConfigChange,
    store: &dyn ConfigStore,
) -> Result<TweakStatus, StoreError> {
    let (scope, path) = split_scope(change.path);

    let absent_status = if change.optimized == DesiredValue::Absent {
        TweakStatus::Optimized
    } else {
        TweakStatus::Default
    };

    if !store.path_exists(scope, path)? {
        return Ok(absent_status);
    }
    let stored = match store.get(scope, path, change.value_name)? {
        None => return Ok(absent_status),
        Some(value) => value.to_string(),
    };

    if change.optimized.matches(&stored) {
        Ok(TweakStatus::Optimized)
    } else if change.default.matches(&stored) {
        Ok(TweakStatus::Default)
    } else {
        Ok(TweakStatus::Modified)
    }
}

fn write_side(
    change: &ConfigChange,
    store: &dyn ConfigStore,
    side: Side,
) -> Result<(), StoreError> {
    let (scope, path) = split_scope(change.path);
    let desired = match side {
        Side::Optimized => &change.optimized,
        Side::Default => &change.default,
    };
    let value = match desired {
        DesiredValue::Absent => {
            return store.delete_value(scope, path, change.value_name);
        }
        DesiredValue::Dword(n) => StoreValue::Dword(*n),
        DesiredValue::Text(t) => StoreValue::Text(t.clone()),
    };
    // A missing path on revert means there is nothing to restore
    if side == Side::Default && !store.path_exists(scope, path)? {
        return Ok(());
    }
    store.set(scope, path, change.value_name, &value)
}
