use std::env;
use std::path::PathBuf;

use super::{CleanupTarget, Strategy, TargetKind};

/// Base directories cleanup targets are derived from.
///
/// Detected from the environment in production; tests point this at a
/// temporary tree instead.
#[derive(Debug, Clone)]
pub struct SystemPaths {
    pub windows_dir: PathBuf,
    pub system_temp: PathBuf,
    pub user_temp: PathBuf,
    pub local_app_data: PathBuf,
    pub program_data: PathBuf,
}

impl SystemPaths {
    pub fn detect() -> Self {
        let windows_dir = env::var_os("WINDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:/Windows"));
        Self {
            system_temp: windows_dir.join("Temp"),
            user_temp: env::temp_dir(),
            local_app_data: dirs::data_local_dir().unwrap_or_else(env::temp_dir),
            program_data: env::var_os("ProgramData")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("C:/ProgramData")),
            windows_dir,
        }
    }
}

/// Which cleanup providers take part in a run. Purely a filter.
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    pub system_temp: bool,
    pub user_temp: bool,
    pub prefetch: bool,
    pub error_reports: bool,
    pub crash_dumps: bool,
    pub recycle_bin: bool,
    pub update_cache: bool,
    pub browser_caches: bool,
    pub dns_cache: bool,
}

impl CleanupOptions {
    /// Enable every provider
    pub fn all() -> Self {
        Self {
            system_temp: true,
            user_temp: true,
            prefetch: true,
            error_reports: true,
            crash_dumps: true,
            recycle_bin: true,
            update_cache: true,
            browser_caches: true,
            dns_cache: true,
        }
    }

    /// Whether any provider is selected at all
    pub fn any(&self) -> bool {
        self.system_temp
            || self.user_temp
            || self.prefetch
            || self.error_reports
            || self.crash_dumps
            || self.recycle_bin
            || self.update_cache
            || self.browser_caches
            || self.dns_cache
    }
}

/// Sources of cleanup targets. One provider per option flag; a provider
/// may yield several targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    SystemTemp,
    UserTemp,
    Prefetch,
    ErrorReports,
    CrashDumps,
    RecycleBin,
    UpdateCache,
    BrowserCaches,
    DnsCache,
}

impl Provider {
    /// The providers selected by `options`, in their fixed registration
    /// order. Runs walk this list front to back.
    pub fn active(options: &CleanupOptions) -> Vec<Provider> {
        let registered = [
            (options.system_temp, Provider::SystemTemp),
            (options.user_temp, Provider::UserTemp),
            (options.prefetch, Provider::Prefetch),
            (options.error_reports, Provider::ErrorReports),
            (options.crash_dumps, Provider::CrashDumps),
            (options.recycle_bin, Provider::RecycleBin),
            (options.update_cache, Provider::UpdateCache),
            (options.browser_caches, Provider::BrowserCaches),
            (options.dns_cache, Provider::DnsCache),
        ];
        registered
            .into_iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, provider)| provider)
            .collect()
    }

    /// The targets this provider yields for the given base paths
    pub fn targets(&self, paths: &SystemPaths) -> Vec<CleanupTarget> {
        match self {
            Provider::SystemTemp => {
                vec![CleanupTarget::folder("System Temp", paths.system_temp.clone())]
            }
            Provider::UserTemp => {
                vec![CleanupTarget::folder("User Temp", paths.user_temp.clone())]
            }
            Provider::Prefetch => vec![CleanupTarget::folder(
                "Prefetch",
                paths.windows_dir.join("Prefetch"),
            )],
            Provider::ErrorReports => vec![
                CleanupTarget::folder(
                    "Error Reports",
                    paths.program_data.join("Microsoft/Windows/WER/ReportQueue"),
                ),
                CleanupTarget::folder(
                    "Error Reports",
                    paths.program_data.join("Microsoft/Windows/WER/ReportArchive"),
                ),
            ],
            Provider::CrashDumps => vec![
                CleanupTarget::folder("Crash Dumps", paths.local_app_data.join("CrashDumps")),
                CleanupTarget::folder("Crash Dumps", paths.windows_dir.join("Minidump")),
            ],
            Provider::RecycleBin => vec![CleanupTarget {
                category: "Recycle Bin".to_string(),
                path: PathBuf::new(),
                kind: TargetKind::File,
                strategy: Strategy::EmptyRecycleBin,
                command: None,
                args: Vec::new(),
            }],
            Provider::UpdateCache => vec![CleanupTarget {
                category: "Windows Update Cache".to_string(),
                path: paths.windows_dir.join("SoftwareDistribution/Download"),
                kind: TargetKind::Folder,
                strategy: Strategy::WindowsUpdateCache,
                command: None,
                args: Vec::new(),
            }],
            Provider::BrowserCaches => vec![CleanupTarget {
                category: "Browser Caches".to_string(),
                path: paths.local_app_data.clone(),
                kind: TargetKind::Folder,
                strategy: Strategy::BrowserCaches,
                command: None,
                args: Vec::new(),
            }],
            Provider::DnsCache => vec![CleanupTarget {
                category: "DNS Cache".to_string(),
                path: PathBuf::new(),
                kind: TargetKind::Command,
                strategy: Strategy::ExecuteCommand,
                command: Some("ipconfig".to_string()),
                args: vec!["/flushdns".to_string()],
            }],
        }
    }
}
