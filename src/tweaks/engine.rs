use rayon::prelude::*;

use super::catalog;
use super::{ActionReport, Tweak, TweakContext};

/// Aggregate outcome of applying or reverting a selection of tweaks
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Message of the most recent failure, if any
    pub last_error: Option<String>,
    /// Whether the selection touched a tweak that needs a reboot
    pub reboot_required: bool,
}

/// Owns the tweak catalog and drives bulk operations over it.
///
/// Status refresh fans out in parallel (checks only read); apply and
/// revert of a selection run sequentially in catalog order so tweaks
/// sharing a service or key behave deterministically.
#[derive(Default)]
pub struct TweakEngine {
    tweaks: Vec<Tweak>,
}

impl TweakEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine over an explicit set of tweaks
    pub fn with_tweaks(tweaks: Vec<Tweak>) -> Self {
        Self { tweaks }
    }

    /// Populate the catalog from the fixed registration list.
    ///
    /// Idempotent: a second call clears and rebuilds. Catalog construction
    /// touches no external state, so it either fully succeeds or panics on
    /// a programming error; there are no partial catalogs.
    pub fn load_catalog(&mut self) {
        self.tweaks = catalog::registered_tweaks();
    }

    pub fn tweaks(&self) -> &[Tweak] {
        &self.tweaks
    }

    pub fn find(&self, id: &str) -> Option<&Tweak> {
        self.tweaks.iter().find(|t| t.id == id)
    }

    /// Re-derive the status of every tweak in the catalog.
    ///
    /// Checks run unordered in parallel; each entry is fault-isolated (a
    /// failing check yields `Unknown` for that entry only). Returns once
    /// every check has completed.
    pub fn refresh_all_statuses(&mut self, ctx: &TweakContext) {
        self.tweaks.par_iter_mut().for_each(|tweak| {
            tweak.check_status(ctx);
        });
    }

    /// Apply every selected tweak, in catalog order
    pub fn apply_selected(&mut self, ids: &[&str], ctx: &TweakContext) -> BatchReport {
        self.run_selected(ids, ctx, Tweak::apply)
    }

    /// Revert every selected tweak, in catalog order
    pub fn revert_selected(&mut self, ids: &[&str], ctx: &TweakContext) -> BatchReport {
        self.run_selected(ids, ctx, Tweak::revert)
    }

    fn run_selected(
        &mut self,
        ids: &[&str],
        ctx: &TweakContext,
        action: fn(&mut Tweak, &TweakContext) -> ActionReport,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for tweak in &mut self.tweaks {
            if !ids.contains(&tweak.id) {
                continue;
            }
            if catalog::requires_reboot(tweak.id) {
                report.reboot_required = true;
            }
            let outcome = action(tweak, ctx);
            if outcome.success {
                report.succeeded += 1;
                tracing::info!(tweak = tweak.id, "{}", outcome.message);
            } else {
                report.failed += 1;
                tracing::warn!(tweak = tweak.id, "{}", outcome.message);
                report.last_error = Some(outcome.message);
            }
        }
        report
    }
}
