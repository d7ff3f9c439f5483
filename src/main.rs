use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use tidywin::cli::args::{Cli, Commands, ConfigAction, OutputFormat, TweaksAction};
use tidywin::cli::output;
use tidywin::cleanup::{
    CleanupEngine, CleanupOptions, CleanupService, ShellRecycleBin, SystemPaths,
};
use tidywin::common::config::Config;
use tidywin::common::format;
use tidywin::process::CommandRunner;
use tidywin::services::SystemServices;
use tidywin::store;
use tidywin::tweaks::{catalog, Tweak, TweakCategory, TweakContext, TweakEngine};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("tidywin=debug")
            .init();
    }

    match cli.command {
        Commands::Tweaks { ref action } => cmd_tweaks(&cli, action),

        Commands::Clean {
            system_temp,
            user_temp,
            prefetch,
            error_reports,
            crash_dumps,
            recycle_bin,
            update_cache,
            browser_caches,
            dns_cache,
            all,
            yes,
        } => {
            let options = if all {
                CleanupOptions::all()
            } else {
                CleanupOptions {
                    system_temp,
                    user_temp,
                    prefetch,
                    error_reports,
                    crash_dumps,
                    recycle_bin,
                    update_cache,
                    browser_caches,
                    dns_cache,
                }
            };
            cmd_clean(&cli, options, yes)
        }

        Commands::Config { ref action } => cmd_config(action),
        Commands::Status => cmd_status(),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                tidywin::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                tidywin::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                tidywin::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
                tidywin::cli::args::CompletionShell::Powershell => clap_complete::Shell::PowerShell,
            };
            clap_complete::generate(shell, &mut cmd, "tidywin", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ─── Tweaks ───────────────────────────────────────────────────────────────────

fn cmd_tweaks(cli: &Cli, action: &TweaksAction) -> Result<()> {
    let mut engine = TweakEngine::new();
    engine.load_catalog();

    match action {
        TweaksAction::List { category } => {
            let category = parse_category_arg(category.as_deref())?;
            let tweaks: Vec<&Tweak> = engine
                .tweaks()
                .iter()
                .filter(|t| category.map_or(true, |c| t.category == c))
                .collect();

            match cli.format {
                OutputFormat::Human => output::print_tweak_list(&tweaks, false),
                OutputFormat::Json => output::print_tweak_json(&tweaks),
                OutputFormat::Quiet => output::print_tweak_quiet(&tweaks),
            }
            Ok(())
        }

        TweaksAction::Status => {
            let config = Config::load()?;
            let store = store::system_store()?;
            let runner = CommandRunner::new(config.command_timeout());
            let services = SystemServices::new(CommandRunner::new(config.service_wait()));
            let ctx = TweakContext {
                store: store.as_ref(),
                runner: &runner,
                services: &services,
            };

            engine.refresh_all_statuses(&ctx);

            let tweaks: Vec<&Tweak> = engine.tweaks().iter().collect();
            match cli.format {
                OutputFormat::Human => output::print_tweak_list(&tweaks, true),
                OutputFormat::Json => output::print_tweak_json(&tweaks),
                OutputFormat::Quiet => output::print_tweak_quiet(&tweaks),
            }
            Ok(())
        }

        TweaksAction::Apply { ids, category, all } => {
            let selection = resolve_selection(&engine, ids, category.as_deref(), *all)?;
            run_batch(cli, &mut engine, &selection, true)
        }

        TweaksAction::Revert { ids, category, all } => {
            let selection = resolve_selection(&engine, ids, category.as_deref(), *all)?;
            run_batch(cli, &mut engine, &selection, false)
        }
    }
}

/// Work out which tweak ids a list/apply/revert invocation selects
fn resolve_selection(
    engine: &TweakEngine,
    ids: &[String],
    category: Option<&str>,
    all: bool,
) -> Result<Vec<&'static str>> {
    if all {
        return Ok(engine.tweaks().iter().map(|t| t.id).collect());
    }
    if let Some(name) = category {
        let category = parse_category(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: '{}'", name))?;
        return Ok(engine
            .tweaks()
            .iter()
            .filter(|t| t.category == category)
            .map(|t| t.id)
            .collect());
    }
    let mut selection = Vec::new();
    for id in ids {
        let tweak = engine
            .find(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown tweak id: '{}'", id))?;
        selection.push(tweak.id);
    }
    Ok(selection)
}

fn run_batch(
    cli: &Cli,
    engine: &mut TweakEngine,
    selection: &[&str],
    apply: bool,
) -> Result<()> {
    if selection.is_empty() {
        println!();
        println!("  No tweaks selected. Pass ids, --category <name>, or --all.");
        println!();
        return Ok(());
    }

    let config = Config::load()?;
    let store = store::system_store()?;
    let runner = CommandRunner::new(config.command_timeout());
    let services = SystemServices::new(CommandRunner::new(config.service_wait()));
    let ctx = TweakContext {
        store: store.as_ref(),
        runner: &runner,
        services: &services,
    };

    let report = if apply {
        engine.apply_selected(selection, &ctx)
    } else {
        engine.revert_selected(selection, &ctx)
    };

    match cli.format {
        OutputFormat::Human => {
            output::print_batch_report(&report, if apply { "Applied" } else { "Reverted" });
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "succeeded": report.succeeded,
                "failed": report.failed,
                "last_error": report.last_error,
                "reboot_required": report.reboot_required,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => {
            println!("{}  {}", report.succeeded, report.failed);
        }
    }
    Ok(())
}

fn parse_category(name: &str) -> Option<TweakCategory> {
    TweakCategory::ALL
        .iter()
        .copied()
        .find(|c| c.to_string().eq_ignore_ascii_case(name))
}

fn parse_category_arg(name: Option<&str>) -> Result<Option<TweakCategory>> {
    match name {
        None => Ok(None),
        Some(name) => parse_category(name)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("Unknown category: '{}'", name)),
    }
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli, options: CleanupOptions, yes: bool) -> Result<()> {
    if !options.any() {
        println!();
        println!("  {} Reclaim disk space from caches and temp locations", "🧹");
        println!();
        println!("  Usage:");
        println!("    {} Selected targets", "tidywin clean --user-temp --dns-cache".cyan());
        println!("    {} Everything", "tidywin clean --all".cyan());
        println!();
        return Ok(());
    }

    if !yes {
        print!("  {} Clean the selected targets now? [y/N] ", "❓");
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let config = Config::load()?;
    let runner = CommandRunner::new(config.command_timeout());
    let services = SystemServices::new(CommandRunner::new(config.service_wait()));
    let recycle_bin = ShellRecycleBin::new(runner.clone());
    let engine = CleanupEngine::new(&runner, &services, &recycle_bin);
    let mut service = CleanupService::new(engine, SystemPaths::detect());

    let show_live = !cli.quiet && matches!(cli.format, OutputFormat::Human);
    let events = service.subscribe();

    let spinner = if show_live {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Cleaning...");
        Some(pb)
    } else {
        None
    };

    let printer_pb = spinner.clone();
    let printer = std::thread::spawn(move || {
        for event in events {
            if let Some(ref pb) = printer_pb {
                pb.set_message(format::truncate(&event.message, 48));
                pb.suspend(|| output::print_log_event(&event));
            }
        }
    });

    let summary = service.run(&options);

    // Closing the service closes the event stream and ends the printer
    drop(service);
    let _ = printer.join();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match cli.format {
        OutputFormat::Human => output::print_cleanup_summary(&summary),
        OutputFormat::Json => output::print_cleanup_json(&summary),
        OutputFormat::Quiet => output::print_cleanup_quiet(&summary),
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let config = Config::default();
            config.save()?;
            println!("  {} TidyWin initialized at ~/.tidywin", "✓".green());
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "command_timeout_ms" => config.command_timeout_ms = value.parse()?,
                "service_wait_secs" => config.service_wait_secs = value.parse()?,
                _ => anyhow::bail!("Unknown config key: {}", key),
            }
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}

// ─── Status ───────────────────────────────────────────────────────────────────

fn cmd_status() -> Result<()> {
    let config = Config::load()?;

    let mut engine = TweakEngine::new();
    engine.load_catalog();

    println!();
    println!("  {} TidyWin Status", "📊");
    println!("{}", "─".repeat(60).dimmed());
    println!();

    println!("  {} Command timeout: {} ms", "⚙️", config.command_timeout_ms);
    println!("  {} Service wait: {} s", "⚙️", config.service_wait_secs);
    println!();

    println!("  {} Catalog: {} tweaks", "🔧", engine.tweaks().len());
    for category in TweakCategory::ALL {
        let count = engine
            .tweaks()
            .iter()
            .filter(|t| t.category == *category)
            .count();
        println!("    {} {:<12} {}", "•".dimmed(), category.to_string(), count);
    }
    println!(
        "  {} {} tweaks need a reboot to take full effect",
        "↻",
        catalog::REBOOT_REQUIRED.len()
    );
    println!();

    Ok(())
}
