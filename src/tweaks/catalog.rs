//! The fixed tweak registration list.
//!
//! Static configuration data: every tweak the engine knows about, grouped
//! by category. IDs are stable and unique across the whole catalog.

use anyhow::Result;

use super::{ConfigChange, DesiredValue, Tweak, TweakCategory, TweakContext, TweakOps};
use crate::store::{Scope, StoreValue};

/// Tweaks that only take full effect after a reboot.
/// Every entry must name a registered tweak id.
pub const REBOOT_REQUIRED: &[&str] = &[
    "disable-telemetry",
    "disable-telemetry-services",
    "disable-superfetch",
    "disable-smb1",
    "increase-irp-stack-size",
    "disable-cortana",
];

pub fn requires_reboot(id: &str) -> bool {
    REBOOT_REQUIRED.contains(&id)
}

/// Build the full catalog, grouped by category
pub fn registered_tweaks() -> Vec<Tweak> {
    let mut tweaks = Vec::new();

    // ─── Privacy ──────────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "disable-telemetry",
        TweakCategory::Privacy,
        "Disable Telemetry",
        "Stops Windows from sending diagnostic and usage data to Microsoft",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection",
            value_name: "AllowTelemetry",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-advertising-id",
        TweakCategory::Privacy,
        "Disable Advertising ID",
        "Prevents apps from using the advertising ID for personalized ads",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\AdvertisingInfo",
            value_name: "Enabled",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "disable-activity-history",
        TweakCategory::Privacy,
        "Disable Activity History",
        "Stops publishing user activities to the timeline feed",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\System",
            value_name: "PublishUserActivities",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-location-access",
        TweakCategory::Privacy,
        "Disable Location Access",
        "Denies apps access to the device location",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\CapabilityAccessManager\\ConsentStore\\location",
            value_name: "Value",
            optimized: DesiredValue::Text("Deny".into()),
            default: DesiredValue::Text("Allow".into()),
        },
    ));
    tweaks.push(Tweak::config(
        "disable-tailored-experiences",
        TweakCategory::Privacy,
        "Disable Tailored Experiences",
        "Stops Microsoft from using diagnostic data for personalized tips",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Privacy",
            value_name: "TailoredExperiencesWithDiagnostics",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "disable-online-speech",
        TweakCategory::Privacy,
        "Disable Online Speech Recognition",
        "Keeps speech recognition data on the device",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Speech_OneCore\\Settings\\OnlineSpeechPrivacy",
            value_name: "HasAccepted",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "disable-feedback-requests",
        TweakCategory::Privacy,
        "Disable Feedback Requests",
        "Stops Windows from asking for feedback",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Siuf\\Rules",
            value_name: "NumberOfSIUFInPeriod",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::custom(
        "disable-telemetry-services",
        TweakCategory::Privacy,
        "Disable Telemetry Services",
        "Stops and disables the telemetry collection services",
        TweakOps {
            apply: telemetry_services_apply,
            revert: telemetry_services_revert,
            check: telemetry_services_check,
        },
    ));

    // ─── Performance ──────────────────────────────────────────────────────

    tweaks.push(Tweak::custom(
        "disable-superfetch",
        TweakCategory::Performance,
        "Disable Superfetch",
        "Stops and disables the SysMain prefetching service",
        TweakOps {
            apply: superfetch_apply,
            revert: superfetch_revert,
            check: superfetch_check,
        },
    ));
    tweaks.push(Tweak::custom(
        "disable-hibernation",
        TweakCategory::Performance,
        "Disable Hibernation",
        "Turns hibernation off and frees the hiberfile",
        TweakOps {
            apply: hibernation_apply,
            revert: hibernation_revert,
            check: hibernation_check,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-power-throttling",
        TweakCategory::Performance,
        "Disable Power Throttling",
        "Prevents Windows from throttling background processes",
        ConfigChange {
            path: "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Power\\PowerThrottling",
            value_name: "PowerThrottlingOff",
            optimized: DesiredValue::Dword(1),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "remove-startup-delay",
        TweakCategory::Performance,
        "Remove Startup App Delay",
        "Launches startup apps without the artificial delay",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Serialize",
            value_name: "StartupDelayInMSec",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-game-dvr",
        TweakCategory::Performance,
        "Disable Game DVR",
        "Stops background game recording and broadcasting",
        ConfigChange {
            path: "HKCU\\System\\GameConfigStore",
            value_name: "GameDVR_Enabled",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));

    // ─── Network ──────────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "increase-irp-stack-size",
        TweakCategory::Network,
        "Increase IRP Stack Size",
        "Raises the I/O request packet stack size for faster transfers",
        ConfigChange {
            path: "HKLM\\SYSTEM\\CurrentControlSet\\Services\\LanmanServer\\Parameters",
            value_name: "IRPStackSize",
            optimized: DesiredValue::Dword(32),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "raise-default-ttl",
        TweakCategory::Network,
        "Raise Default TTL",
        "Sets the default packet time-to-live to 64 hops",
        ConfigChange {
            path: "HKLM\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters",
            value_name: "DefaultTTL",
            optimized: DesiredValue::Dword(64),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "unlimit-reservable-bandwidth",
        TweakCategory::Network,
        "Unlimit Reservable Bandwidth",
        "Removes the bandwidth share reserved for QoS traffic",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\Psched",
            value_name: "NonBestEffortLimit",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::custom(
        "disable-tcp-autotuning",
        TweakCategory::Network,
        "Disable TCP Auto-Tuning",
        "Fixes the TCP receive window for unstable connections",
        TweakOps {
            apply: autotuning_apply,
            revert: autotuning_revert,
            check: autotuning_check,
        },
    ));

    // ─── Security ─────────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "disable-smb1",
        TweakCategory::Security,
        "Disable SMBv1",
        "Turns off the legacy SMBv1 file sharing protocol",
        ConfigChange {
            path: "HKLM\\SYSTEM\\CurrentControlSet\\Services\\LanmanServer\\Parameters",
            value_name: "SMB1",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "disable-autorun",
        TweakCategory::Security,
        "Disable AutoRun",
        "Stops removable media from running programs automatically",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Policies\\Explorer",
            value_name: "NoDriveTypeAutoRun",
            optimized: DesiredValue::Dword(255),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-remote-assistance",
        TweakCategory::Security,
        "Disable Remote Assistance",
        "Prevents remote assistance connections to this machine",
        ConfigChange {
            path: "HKLM\\SYSTEM\\CurrentControlSet\\Control\\Remote Assistance",
            value_name: "fAllowToGetHelp",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));

    // ─── Appearance ───────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "show-file-extensions",
        TweakCategory::Appearance,
        "Show File Extensions",
        "Always shows file name extensions in Explorer",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Advanced",
            value_name: "HideFileExt",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "enable-dark-mode",
        TweakCategory::Appearance,
        "Enable Dark Mode",
        "Switches apps to the dark theme",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize",
            value_name: "AppsUseLightTheme",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));
    tweaks.push(Tweak::config(
        "snappy-menus",
        TweakCategory::Appearance,
        "Snappy Menus",
        "Removes the delay before menus open",
        ConfigChange {
            path: "HKCU\\Control Panel\\Desktop",
            value_name: "MenuShowDelay",
            optimized: DesiredValue::Text("0".into()),
            default: DesiredValue::Text("400".into()),
        },
    ));

    // ─── Tweaks ───────────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "enable-verbose-startup",
        TweakCategory::Tweaks,
        "Verbose Startup Messages",
        "Shows detailed status messages during startup and shutdown",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Policies\\System",
            value_name: "VerboseStatus",
            optimized: DesiredValue::Dword(1),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::custom(
        "restore-classic-context-menu",
        TweakCategory::Tweaks,
        "Restore Classic Context Menu",
        "Brings back the full right-click menu on Windows 11",
        TweakOps {
            apply: classic_menu_apply,
            revert: classic_menu_revert,
            check: classic_menu_check,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-game-bar-tips",
        TweakCategory::Tweaks,
        "Disable Game Bar Tips",
        "Stops the Game Bar startup panel from appearing",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\GameBar",
            value_name: "ShowStartupPanel",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));

    // ─── Search ───────────────────────────────────────────────────────────

    tweaks.push(Tweak::config(
        "disable-bing-search",
        TweakCategory::Search,
        "Disable Bing in Search",
        "Removes web suggestions from the search box",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Policies\\Microsoft\\Windows\\Explorer",
            value_name: "DisableSearchBoxSuggestions",
            optimized: DesiredValue::Dword(1),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-cortana",
        TweakCategory::Search,
        "Disable Cortana",
        "Turns Cortana off in Windows Search",
        ConfigChange {
            path: "HKLM\\SOFTWARE\\Policies\\Microsoft\\Windows\\Windows Search",
            value_name: "AllowCortana",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Absent,
        },
    ));
    tweaks.push(Tweak::config(
        "disable-web-search",
        TweakCategory::Search,
        "Disable Web Results",
        "Keeps Start menu search local to this machine",
        ConfigChange {
            path: "HKCU\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Search",
            value_name: "BingSearchEnabled",
            optimized: DesiredValue::Dword(0),
            default: DesiredValue::Dword(1),
        },
    ));

    tweaks
}

// ─── Procedural operations ────────────────────────────────────────────────

const TELEMETRY_SERVICES: &[&str] = &["DiagTrack", "dmwapppushservice"];

const SERVICE_START_AUTO: u32 = 2;
const SERVICE_START_DISABLED: u32 = 4;

fn service_key(name: &str) -> String {
    format!("SYSTEM\\CurrentControlSet\\Services\\{}", name)
}

fn telemetry_services_apply(ctx: &TweakContext) -> Result<bool> {
    for name in TELEMETRY_SERVICES {
        ctx.services.stop(name)?;
        ctx.store.set(
            Scope::Machine,
            &service_key(name),
            "Start",
            &StoreValue::Dword(SERVICE_START_DISABLED),
        )?;
    }
    Ok(true)
}

fn telemetry_services_revert(ctx: &TweakContext) -> Result<bool> {
    for name in TELEMETRY_SERVICES {
        ctx.store.set(
            Scope::Machine,
            &service_key(name),
            "Start",
            &StoreValue::Dword(SERVICE_START_AUTO),
        )?;
        ctx.services.start(name)?;
    }
    Ok(true)
}

fn telemetry_services_check(ctx: &TweakContext) -> Result<bool> {
    for name in TELEMETRY_SERVICES {
        let start = ctx.store.get(Scope::Machine, &service_key(name), "Start")?;
        if start != Some(StoreValue::Dword(SERVICE_START_DISABLED)) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn superfetch_apply(ctx: &TweakContext) -> Result<bool> {
    ctx.services.stop("SysMain")?;
    ctx.store.set(
        Scope::Machine,
        &service_key("SysMain"),
        "Start",
        &StoreValue::Dword(SERVICE_START_DISABLED),
    )?;
    Ok(true)
}

fn superfetch_revert(ctx: &TweakContext) -> Result<bool> {
    ctx.store.set(
        Scope::Machine,
        &service_key("SysMain"),
        "Start",
        &StoreValue::Dword(SERVICE_START_AUTO),
    )?;
    ctx.services.start("SysMain")?;
    Ok(true)
}

fn superfetch_check(ctx: &TweakContext) -> Result<bool> {
    let start = ctx
        .store
        .get(Scope::Machine, &service_key("SysMain"), "Start")?;
    Ok(start == Some(StoreValue::Dword(SERVICE_START_DISABLED)))
}

const POWER_KEY: &str = "SYSTEM\\CurrentControlSet\\Control\\Power";

fn hibernation_apply(ctx: &TweakContext) -> Result<bool> {
    Ok(ctx.runner.run("powercfg", &["/hibernate", "off"]).success())
}

fn hibernation_revert(ctx: &TweakContext) -> Result<bool> {
    Ok(ctx.runner.run("powercfg", &["/hibernate", "on"]).success())
}

fn hibernation_check(ctx: &TweakContext) -> Result<bool> {
    let enabled = ctx.store.get(Scope::Machine, POWER_KEY, "HibernateEnabled")?;
    Ok(enabled == Some(StoreValue::Dword(0)))
}

const CLASSIC_MENU_KEY: &str =
    "Software\\Classes\\CLSID\\{86ca1aa0-34aa-4e8b-a509-50c905bae2a2}\\InprocServer32";

fn classic_menu_apply(ctx: &TweakContext) -> Result<bool> {
    ctx.store.set(
        Scope::CurrentUser,
        CLASSIC_MENU_KEY,
        "",
        &StoreValue::Text(String::new()),
    )?;
    restart_explorer(ctx);
    Ok(true)
}

fn classic_menu_revert(ctx: &TweakContext) -> Result<bool> {
    ctx.store.delete_value(Scope::CurrentUser, CLASSIC_MENU_KEY, "")?;
    restart_explorer(ctx);
    Ok(true)
}

fn classic_menu_check(ctx: &TweakContext) -> Result<bool> {
    let value = ctx.store.get(Scope::CurrentUser, CLASSIC_MENU_KEY, "")?;
    Ok(value == Some(StoreValue::Text(String::new())))
}

/// Explorer only picks the menu change up on restart. Launched detached;
/// the status check reads the store, not the shell.
fn restart_explorer(ctx: &TweakContext) {
    ctx.runner.run_detached(
        "cmd",
        &["/c", "taskkill /f /im explorer.exe && start explorer.exe"],
    );
}

fn autotuning_apply(ctx: &TweakContext) -> Result<bool> {
    Ok(ctx
        .runner
        .run(
            "netsh",
            &["int", "tcp", "set", "global", "autotuninglevel=disabled"],
        )
        .success())
}

fn autotuning_revert(ctx: &TweakContext) -> Result<bool> {
    Ok(ctx
        .runner
        .run(
            "netsh",
            &["int", "tcp", "set", "global", "autotuninglevel=normal"],
        )
        .success())
}

fn autotuning_check(ctx: &TweakContext) -> Result<bool> {
    let out = ctx.runner.run("netsh", &["int", "tcp", "show", "global"]);
    if !out.started || out.timed_out {
        anyhow::bail!("could not query the TCP global settings");
    }
    Ok(out.stdout.to_ascii_lowercase().contains("disabled"))
}
