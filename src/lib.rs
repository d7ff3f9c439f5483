//! # TidyWin
//!
//! A Windows tweak and disk cleanup utility.
//!
//! TidyWin toggles named system configuration tweaks (privacy, performance,
//! network, security, appearance, search) and reclaims disk space from
//! caches, temp locations, and update leftovers. It features:
//!
//! - **Reversible Tweaks**: every tweak knows how to apply itself, revert
//!   itself, and report whether it is currently active
//! - **Status at a Glance**: the whole catalog is checked in parallel
//!   without modifying anything
//! - **Fault-Isolated Cleanup**: a locked file or stubborn directory never
//!   aborts a cleanup run; it is counted and skipped
//! - **Service-Aware**: the Windows Update cache is cleaned with its
//!   dependent services stopped and always restarted afterwards
//! - **CLI as Unix Citizen**: JSON output, pipe-friendly, scriptable
//! - **100% Offline**: zero telemetry, no accounts, no cloud

pub mod cleanup;
pub mod cli;
pub mod common;
pub mod process;
pub mod services;
pub mod store;
pub mod tweaks;
