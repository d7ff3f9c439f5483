use clap::{Parser, Subcommand, ValueEnum};

/// TidyWin — a Windows tweak and disk cleanup utility
#[derive(Parser, Debug)]
#[command(
    name = "tidywin",
    version,
    about = "A Windows tweak and cleanup utility",
    long_about = "TidyWin toggles named system tweaks (privacy, performance, network,\n\
                   security, appearance, search) and reclaims disk space from caches,\n\
                   temp locations, and update leftovers.",
    after_help = "EXAMPLES:\n  \
        tidywin tweaks list                    Show the tweak catalog\n  \
        tidywin tweaks status                  Check what is currently active\n  \
        tidywin tweaks apply disable-telemetry Apply one tweak by id\n  \
        tidywin tweaks apply --category privacy  Apply a whole category\n  \
        tidywin tweaks revert --all            Put everything back\n  \
        tidywin clean --user-temp --dns-cache  Clean selected targets\n  \
        tidywin clean --all -y                 Clean everything, no prompt\n  \
        tidywin status                         Show configuration overview"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and toggle system tweaks
    Tweaks {
        #[command(subcommand)]
        action: TweaksAction,
    },

    /// Reclaim disk space from caches and temp locations
    Clean {
        /// Clean the Windows temp directory
        #[arg(long)]
        system_temp: bool,

        /// Clean the current user's temp directory
        #[arg(long)]
        user_temp: bool,

        /// Clean the prefetch directory
        #[arg(long)]
        prefetch: bool,

        /// Clean queued and archived error reports
        #[arg(long)]
        error_reports: bool,

        /// Clean crash dump files
        #[arg(long)]
        crash_dumps: bool,

        /// Empty the recycle bin
        #[arg(long)]
        recycle_bin: bool,

        /// Clean the Windows Update download cache
        #[arg(long)]
        update_cache: bool,

        /// Clean browser caches for every detected profile
        #[arg(long)]
        browser_caches: bool,

        /// Flush the DNS resolver cache
        #[arg(long)]
        dns_cache: bool,

        /// Clean every target
        #[arg(long)]
        all: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show catalog and configuration overview
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TweaksAction {
    /// List the tweak catalog
    List {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Check the current status of every tweak
    Status,

    /// Apply tweaks
    Apply {
        /// Tweak ids to apply
        ids: Vec<String>,

        /// Apply every tweak in a category
        #[arg(long)]
        category: Option<String>,

        /// Apply the whole catalog
        #[arg(long)]
        all: bool,
    },

    /// Revert tweaks
    Revert {
        /// Tweak ids to revert
        ids: Vec<String>,

        /// Revert every tweak in a category
        #[arg(long)]
        category: Option<String>,

        /// Revert the whole catalog
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize the TidyWin data directory and default config
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
