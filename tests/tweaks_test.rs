use std::time::Duration;

use anyhow::Result;

use tidywin::process::CommandRunner;
use tidywin::services::ServiceControl;
use tidywin::store::{ConfigStore, MemoryStore, Scope, StoreError, StoreValue};
use tidywin::tweaks::{
    catalog, ConfigChange, DesiredValue, Tweak, TweakCategory, TweakContext, TweakEngine,
    TweakOps, TweakStatus,
};

// ─── Test doubles ─────────────────────────────────────────────────────────────

struct NoopServices;

impl ServiceControl for NoopServices {
    fn stop(&self, _name: &str) -> Result<()> {
        Ok(())
    }
    fn start(&self, _name: &str) -> Result<()> {
        Ok(())
    }
    fn is_running(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }
}

/// A store where every access faults
struct FailingStore;

impl ConfigStore for FailingStore {
    fn get(&self, scope: Scope, path: &str, _name: &str) -> Result<Option<StoreValue>, StoreError> {
        Err(StoreError::AccessDenied {
            scope,
            path: path.to_string(),
        })
    }
    fn set(
        &self,
        scope: Scope,
        path: &str,
        _name: &str,
        _value: &StoreValue,
    ) -> Result<(), StoreError> {
        Err(StoreError::AccessDenied {
            scope,
            path: path.to_string(),
        })
    }
    fn delete_value(&self, scope: Scope, path: &str, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::AccessDenied {
            scope,
            path: path.to_string(),
        })
    }
    fn path_exists(&self, scope: Scope, path: &str) -> Result<bool, StoreError> {
        Err(StoreError::AccessDenied {
            scope,
            path: path.to_string(),
        })
    }
}

fn runner() -> CommandRunner {
    CommandRunner::new(Duration::from_millis(200))
}

fn dword_tweak(id: &'static str, optimized: u32, default: u32) -> Tweak {
    Tweak::config(
        id,
        TweakCategory::Privacy,
        "Test Tweak",
        "a tweak under test",
        ConfigChange {
            path: "HKLM\\Software\\TidyWinTest",
            value_name: "Value",
            optimized: DesiredValue::Dword(optimized),
            default: DesiredValue::Dword(default),
        },
    )
}

// ─── Status derivation ────────────────────────────────────────────────────────

#[test]
fn test_status_starts_unknown() {
    let tweak = dword_tweak("t", 1, 0);
    assert_eq!(tweak.status, TweakStatus::Unknown);
}

#[test]
fn test_missing_path_is_default_for_plain_value() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Default);
}

#[test]
fn test_missing_value_is_optimized_for_delete_sentinel() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = Tweak::config(
        "t",
        TweakCategory::Privacy,
        "Test Tweak",
        "",
        ConfigChange {
            path: "HKLM\\Software\\TidyWinTest",
            value_name: "Value",
            optimized: DesiredValue::Absent,
            default: DesiredValue::Dword(5),
        },
    );
    // Missing path and missing value both count as the absent state
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Optimized);

    store.create_path(Scope::Machine, "Software\\TidyWinTest");
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Optimized);
}

#[test]
fn test_value_matching_neither_side_is_modified() {
    let store = MemoryStore::new();
    store
        .set(
            Scope::Machine,
            "Software\\TidyWinTest",
            "Value",
            &StoreValue::Dword(7),
        )
        .unwrap();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Modified);
}

#[test]
fn test_check_never_propagates_faults() {
    let store = FailingStore;
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Unknown);
}

#[test]
fn test_apply_on_faulting_store_reports_failure() {
    let store = FailingStore;
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    let report = tweak.apply(&ctx);
    assert!(!report.success);
    assert_eq!(tweak.status, TweakStatus::Unknown);
}

// ─── Apply / revert ───────────────────────────────────────────────────────────

#[test]
fn test_apply_writes_and_verifies() {
    let store = MemoryStore::new();
    store
        .set(
            Scope::Machine,
            "Software\\TidyWinTest",
            "Value",
            &StoreValue::Dword(0),
        )
        .unwrap();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    let report = tweak.apply(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Optimized);
    assert_eq!(
        store
            .get(Scope::Machine, "Software\\TidyWinTest", "Value")
            .unwrap(),
        Some(StoreValue::Dword(1))
    );
}

#[test]
fn test_delete_sentinel_roundtrip() {
    let store = MemoryStore::new();
    store
        .set(
            Scope::Machine,
            "Software\\TidyWinTest",
            "Value",
            &StoreValue::Dword(5),
        )
        .unwrap();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = Tweak::config(
        "t",
        TweakCategory::Privacy,
        "Test Tweak",
        "",
        ConfigChange {
            path: "HKLM\\Software\\TidyWinTest",
            value_name: "Value",
            optimized: DesiredValue::Absent,
            default: DesiredValue::Dword(5),
        },
    );

    let report = tweak.apply(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Optimized);
    assert_eq!(
        store
            .get(Scope::Machine, "Software\\TidyWinTest", "Value")
            .unwrap(),
        None
    );

    let report = tweak.revert(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Default);
    assert_eq!(
        store
            .get(Scope::Machine, "Software\\TidyWinTest", "Value")
            .unwrap(),
        Some(StoreValue::Dword(5))
    );
}

#[test]
fn test_revert_with_missing_path_is_already_reverted() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    let report = tweak.revert(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Default);
    // Nothing was created by the no-op revert
    assert!(!store
        .path_exists(Scope::Machine, "Software\\TidyWinTest")
        .unwrap());
}

#[test]
fn test_apply_is_idempotent() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = dword_tweak("t", 1, 0);
    let first = tweak.apply(&ctx);
    let second = tweak.apply(&ctx);
    assert!(first.success && second.success);
    assert_eq!(tweak.status, TweakStatus::Optimized);
}

#[test]
fn test_scope_prefix_selects_user_scope() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = Tweak::config(
        "t",
        TweakCategory::Privacy,
        "Test Tweak",
        "",
        ConfigChange {
            path: "HKCU\\Software\\TidyWinTest",
            value_name: "Value",
            optimized: DesiredValue::Dword(1),
            default: DesiredValue::Dword(0),
        },
    );
    assert!(tweak.apply(&ctx).success);

    assert_eq!(
        store
            .get(Scope::CurrentUser, "Software\\TidyWinTest", "Value")
            .unwrap(),
        Some(StoreValue::Dword(1))
    );
    assert_eq!(
        store
            .get(Scope::Machine, "Software\\TidyWinTest", "Value")
            .unwrap(),
        None
    );
}

#[test]
fn test_unrecognized_scope_prefix_goes_machine_wide() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = Tweak::config(
        "t",
        TweakCategory::Privacy,
        "Test Tweak",
        "",
        ConfigChange {
            path: "HKXX\\Software\\TidyWinTest",
            value_name: "Value",
            optimized: DesiredValue::Dword(1),
            default: DesiredValue::Dword(0),
        },
    );
    assert!(tweak.apply(&ctx).success);
    assert_eq!(
        store
            .get(Scope::Machine, "Software\\TidyWinTest", "Value")
            .unwrap(),
        Some(StoreValue::Dword(1))
    );
}

#[test]
fn test_text_values_compare_by_string() {
    let store = MemoryStore::new();
    store
        .set(
            Scope::Machine,
            "Software\\TidyWinTest",
            "Mode",
            &StoreValue::Text("Allow".into()),
        )
        .unwrap();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = Tweak::config(
        "t",
        TweakCategory::Privacy,
        "Test Tweak",
        "",
        ConfigChange {
            path: "HKLM\\Software\\TidyWinTest",
            value_name: "Mode",
            optimized: DesiredValue::Text("Deny".into()),
            default: DesiredValue::Text("Allow".into()),
        },
    );
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Default);
    assert!(tweak.apply(&ctx).success);
    assert_eq!(tweak.status, TweakStatus::Optimized);
}

// ─── Procedural tweaks ────────────────────────────────────────────────────────

fn flag_on(ctx: &TweakContext) -> Result<bool> {
    ctx.store.set(
        Scope::Machine,
        "Software\\TidyWinState",
        "On",
        &StoreValue::Dword(1),
    )?;
    Ok(true)
}

fn flag_off(ctx: &TweakContext) -> Result<bool> {
    ctx.store.set(
        Scope::Machine,
        "Software\\TidyWinState",
        "On",
        &StoreValue::Dword(0),
    )?;
    Ok(true)
}

fn flag_check(ctx: &TweakContext) -> Result<bool> {
    let on = ctx
        .store
        .get(Scope::Machine, "Software\\TidyWinState", "On")?;
    Ok(on == Some(StoreValue::Dword(1)))
}

fn refuses(_ctx: &TweakContext) -> Result<bool> {
    Ok(false)
}

fn claims_success(_ctx: &TweakContext) -> Result<bool> {
    Ok(true)
}

fn explodes(_ctx: &TweakContext) -> Result<bool> {
    anyhow::bail!("boom")
}

fn custom(ops: TweakOps) -> Tweak {
    Tweak::custom(
        "custom-t",
        TweakCategory::Performance,
        "Custom Tweak",
        "a procedural tweak under test",
        ops,
    )
}

#[test]
fn test_custom_apply_and_revert() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = custom(TweakOps {
        apply: flag_on,
        revert: flag_off,
        check: flag_check,
    });

    let report = tweak.apply(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Optimized);

    let report = tweak.revert(&ctx);
    assert!(report.success, "{}", report.message);
    assert_eq!(tweak.status, TweakStatus::Default);
}

#[test]
fn test_custom_apply_distinguishes_action_failure() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = custom(TweakOps {
        apply: refuses,
        revert: flag_off,
        check: flag_check,
    });
    let report = tweak.apply(&ctx);
    assert!(!report.success);
    assert!(
        report.message.contains("did not complete"),
        "unexpected message: {}",
        report.message
    );
}

#[test]
fn test_custom_apply_distinguishes_verification_failure() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    // The action claims success but never flips the flag
    let mut tweak = custom(TweakOps {
        apply: claims_success,
        revert: flag_off,
        check: flag_check,
    });
    let report = tweak.apply(&ctx);
    assert!(!report.success);
    assert!(
        report.message.contains("could not be verified"),
        "unexpected message: {}",
        report.message
    );
}

#[test]
fn test_custom_apply_catches_op_errors() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = custom(TweakOps {
        apply: explodes,
        revert: flag_off,
        check: flag_check,
    });
    let report = tweak.apply(&ctx);
    assert!(!report.success);
    assert!(report.message.contains("boom"));
}

#[test]
fn test_custom_check_error_sets_unknown() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut tweak = custom(TweakOps {
        apply: flag_on,
        revert: flag_off,
        check: explodes,
    });
    assert_eq!(tweak.check_status(&ctx), TweakStatus::Unknown);
}

// ─── Catalog & engine ─────────────────────────────────────────────────────────

#[test]
fn test_load_catalog_is_idempotent() {
    let mut engine = TweakEngine::new();
    engine.load_catalog();
    let first = engine.tweaks().len();
    assert!(first > 0);

    engine.load_catalog();
    assert_eq!(engine.tweaks().len(), first);
}

#[test]
fn test_catalog_ids_are_unique() {
    let mut engine = TweakEngine::new();
    engine.load_catalog();

    let mut ids: Vec<&str> = engine.tweaks().iter().map(|t| t.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total, "duplicate tweak ids in the catalog");
}

#[test]
fn test_catalog_covers_every_category() {
    let mut engine = TweakEngine::new();
    engine.load_catalog();

    for category in TweakCategory::ALL {
        assert!(
            engine.tweaks().iter().any(|t| t.category == *category),
            "no tweaks registered under {}",
            category
        );
    }
}

#[test]
fn test_reboot_set_names_registered_tweaks() {
    let mut engine = TweakEngine::new();
    engine.load_catalog();

    for id in catalog::REBOOT_REQUIRED {
        assert!(
            engine.find(id).is_some(),
            "reboot-required id '{}' is not in the catalog",
            id
        );
    }
}

#[test]
fn test_refresh_all_statuses_completes_and_isolates_faults() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut engine = TweakEngine::new();
    engine.load_catalog();
    engine.refresh_all_statuses(&ctx);

    // Every entry got a derived status; nothing is left in-flight
    for tweak in engine.tweaks() {
        assert_ne!(tweak.status, TweakStatus::Processing);
    }
}

#[test]
fn test_end_to_end_three_tweak_scenario() {
    let store = MemoryStore::new();
    // A is currently at its default, C is already optimized, B is absent
    store
        .set(Scope::Machine, "Software\\A", "Value", &StoreValue::Dword(0))
        .unwrap();
    store
        .set(Scope::Machine, "Software\\C", "Value", &StoreValue::Dword(1))
        .unwrap();

    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let tweaks = vec![
        Tweak::config(
            "a",
            TweakCategory::Privacy,
            "A",
            "",
            ConfigChange {
                path: "HKLM\\Software\\A",
                value_name: "Value",
                optimized: DesiredValue::Dword(1),
                default: DesiredValue::Dword(0),
            },
        ),
        Tweak::config(
            "b",
            TweakCategory::Privacy,
            "B",
            "",
            ConfigChange {
                path: "HKLM\\Software\\B",
                value_name: "Value",
                optimized: DesiredValue::Absent,
                default: DesiredValue::Dword(5),
            },
        ),
        Tweak::config(
            "c",
            TweakCategory::Privacy,
            "C",
            "",
            ConfigChange {
                path: "HKLM\\Software\\C",
                value_name: "Value",
                optimized: DesiredValue::Dword(1),
                default: DesiredValue::Dword(0),
            },
        ),
    ];
    let mut engine = TweakEngine::with_tweaks(tweaks);

    engine.refresh_all_statuses(&ctx);
    let statuses: Vec<TweakStatus> = engine.tweaks().iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        vec![
            TweakStatus::Default,
            TweakStatus::Optimized,
            TweakStatus::Optimized
        ]
    );

    let report = engine.apply_selected(&["a", "b", "c"], &ctx);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    for tweak in engine.tweaks() {
        assert_eq!(tweak.status, TweakStatus::Optimized);
    }
}

#[test]
fn test_batch_counts_failures_and_keeps_last_message() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let tweaks = vec![
        custom(TweakOps {
            apply: explodes,
            revert: flag_off,
            check: flag_check,
        }),
        dword_tweak("good", 1, 0),
    ];
    let mut engine = TweakEngine::with_tweaks(tweaks);

    let report = engine.apply_selected(&["custom-t", "good"], &ctx);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert!(report.last_error.as_deref().unwrap_or("").contains("boom"));
}

#[test]
fn test_batch_flags_reboot_required_tweaks() {
    let store = MemoryStore::new();
    let run = runner();
    let services = NoopServices;
    let ctx = TweakContext {
        store: &store,
        runner: &run,
        services: &services,
    };

    let mut engine = TweakEngine::new();
    engine.load_catalog();

    let report = engine.apply_selected(&["disable-telemetry"], &ctx);
    assert!(report.reboot_required);

    let report = engine.apply_selected(&["show-file-extensions"], &ctx);
    assert!(!report.reboot_required);
}
