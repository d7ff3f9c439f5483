use std::fs;
use std::path::{Path, PathBuf};

use super::engine::delete_directory_contents;
use super::CleanupResult;

/// Chromium-family user-data roots relative to the local app data
/// directory
const CHROMIUM_ROOTS: &[(&str, &str)] = &[
    ("Google/Chrome/User Data", "Google Chrome"),
    ("Microsoft/Edge/User Data", "Microsoft Edge"),
    ("BraveSoftware/Brave-Browser/User Data", "Brave"),
    ("Vivaldi/User Data", "Vivaldi"),
    ("Opera Software/Opera Stable", "Opera"),
    ("Chromium/User Data", "Chromium"),
];

/// Cache locations inside a Chromium profile
const CHROMIUM_CACHE_DIRS: &[&str] = &[
    "Cache",
    "Cache/Cache_Data",
    "Code Cache",
    "GPUCache",
    "Media Cache",
    "Service Worker/CacheStorage",
    "Service Worker/ScriptCache",
];

const FIREFOX_PROFILES: &str = "Mozilla/Firefox/Profiles";
const FIREFOX_CACHE_DIR: &str = "cache2";

/// Wipe the cache directories of every known browser profile under
/// `app_data_root`.
///
/// A browser that is not installed is silently skipped, and a failure in
/// one profile never stops the others; the per-entry accounting comes
/// from the shared directory walker.
pub(crate) fn clean_browser_caches(app_data_root: &Path, result: &mut CleanupResult) {
    for (rel, name) in CHROMIUM_ROOTS {
        let base = app_data_root.join(rel);
        if !base.exists() {
            continue;
        }
        let profiles = chromium_profiles(&base);
        tracing::debug!(browser = name, profiles = profiles.len(), "cleaning browser caches");
        for profile in profiles {
            for cache_rel in CHROMIUM_CACHE_DIRS {
                delete_directory_contents(&profile.join(cache_rel), result);
            }
        }
    }

    // Firefox names its profile directories freely; every directory under
    // the profiles root is one
    let firefox = app_data_root.join(FIREFOX_PROFILES);
    if firefox.exists() {
        if let Ok(entries) = fs::read_dir(&firefox) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_dir() {
                    delete_directory_contents(&path.join(FIREFOX_CACHE_DIR), result);
                }
            }
        }
    }
}

/// Profile directories inside a Chromium user-data root: `Default`,
/// anything named like a profile, or anything carrying the `Preferences`
/// marker file
fn chromium_profiles(base: &Path) -> Vec<PathBuf> {
    let mut profiles = Vec::new();
    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(_) => return profiles,
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == "Default" || name.contains("Profile") || path.join("Preferences").exists() {
            profiles.push(path);
        }
    }
    profiles
}
