//! Hierarchical key-value configuration store.
//!
//! Tweaks never touch the Windows registry directly; they go through the
//! [`ConfigStore`] trait so the whole tweak engine can run against an
//! in-memory store in tests. The real registry backend lives in
//! [`registry`] and only compiles on Windows.

pub mod memory;
#[cfg(windows)]
pub mod registry;

pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Root scope a store path is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Machine-wide configuration (HKEY_LOCAL_MACHINE)
    Machine,
    /// Per-user configuration (HKEY_CURRENT_USER)
    CurrentUser,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Machine => write!(f, "HKLM"),
            Scope::CurrentUser => write!(f, "HKCU"),
        }
    }
}

/// A typed value held in the configuration store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Dword(u32),
    Text(String),
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Dword(n) => write!(f, "{}", n),
            StoreValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("access denied at {scope}\\{path}")]
    AccessDenied { scope: Scope, path: String },

    #[error("store error at {scope}\\{path}: {source}")]
    Io {
        scope: Scope,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported value kind for '{name}' at {scope}\\{path}")]
    UnsupportedKind {
        scope: Scope,
        path: String,
        name: String,
    },
}

/// Access to a hierarchical, externally persisted key-value store.
///
/// Missing values and missing paths are not errors: `get` returns
/// `Ok(None)` and `delete_value` is idempotent. Errors are reserved for
/// genuine access faults (permissions, I/O).
pub trait ConfigStore: Send + Sync {
    /// Read a value, `None` if the value or its path does not exist
    fn get(&self, scope: Scope, path: &str, name: &str) -> Result<Option<StoreValue>, StoreError>;

    /// Write a value, creating the path if necessary
    fn set(
        &self,
        scope: Scope,
        path: &str,
        name: &str,
        value: &StoreValue,
    ) -> Result<(), StoreError>;

    /// Remove a value; succeeds if the value or path is already gone
    fn delete_value(&self, scope: Scope, path: &str, name: &str) -> Result<(), StoreError>;

    /// Whether the path itself exists
    fn path_exists(&self, scope: Scope, path: &str) -> Result<bool, StoreError>;
}

/// The live system store for this platform
#[cfg(windows)]
pub fn system_store() -> anyhow::Result<Arc<dyn ConfigStore>> {
    Ok(Arc::new(RegistryStore))
}

/// The live system store for this platform
#[cfg(not(windows))]
pub fn system_store() -> anyhow::Result<Arc<dyn ConfigStore>> {
    anyhow::bail!("the system configuration store is only available on Windows")
}
