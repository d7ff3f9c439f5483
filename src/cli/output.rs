use colored::*;

use crate::cleanup::{CleanupSummary, LogColor, LogEvent, LogIcon};
use crate::common::format::{format_duration, format_size, format_size_colored};
use crate::tweaks::{BatchReport, Tweak, TweakCategory, TweakStatus};

/// Print the tweak catalog grouped by category
pub fn print_tweak_list(tweaks: &[&Tweak], with_status: bool) {
    println!();
    println!("{}  TidyWin Tweaks", "🔧");
    println!("{}", "─".repeat(60).dimmed());
    println!();

    for category in TweakCategory::ALL {
        let in_category: Vec<&&Tweak> =
            tweaks.iter().filter(|t| t.category == *category).collect();
        if in_category.is_empty() {
            continue;
        }
        println!("  {}", category.to_string().bold());
        for tweak in in_category {
            if with_status {
                println!(
                    "    {} {:<32} {:<10} {}",
                    status_dot(tweak.status),
                    tweak.id,
                    format_status(tweak.status),
                    tweak.title.dimmed()
                );
            } else {
                println!(
                    "    {} {:<32} {}",
                    "•".dimmed(),
                    tweak.id,
                    tweak.title.dimmed()
                );
            }
        }
        println!();
    }
}

/// Print the catalog as JSON
pub fn print_tweak_json(tweaks: &[&Tweak]) {
    let json: Vec<_> = tweaks
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "category": t.category,
                "title": t.title,
                "description": t.description,
                "status": t.status,
            })
        })
        .collect();
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Print the catalog in quiet, pipe-friendly form
pub fn print_tweak_quiet(tweaks: &[&Tweak]) {
    for tweak in tweaks {
        println!("{}  {}  {}", tweak.id, tweak.category, tweak.status);
    }
}

/// Print the aggregate result of a batch apply/revert
pub fn print_batch_report(report: &BatchReport, verb: &str) {
    println!();
    if report.failed == 0 {
        println!(
            "  {} {} {} tweak{}",
            "✓".green(),
            verb,
            report.succeeded,
            if report.succeeded == 1 { "" } else { "s" }
        );
    } else {
        println!(
            "  {} {} {}, {} failed",
            "⚠".yellow(),
            verb,
            report.succeeded,
            report.failed
        );
        if let Some(ref message) = report.last_error {
            println!("    {} {}", "→".dimmed(), message.dimmed());
        }
    }
    if report.reboot_required {
        println!("  {} A reboot is needed for some changes to take effect", "↻".cyan());
    }
    println!();
}

/// Render one cleanup log event
pub fn print_log_event(event: &LogEvent) {
    let icon = match event.icon {
        LogIcon::Sweep => "🧹",
        LogIcon::Warning => "⚠",
        LogIcon::Summary => "💾",
    };
    let message = match event.color {
        LogColor::Success => event.message.green(),
        LogColor::Warning => event.message.yellow(),
        LogColor::Error => event.message.red(),
    };
    let message = if event.bold { message.bold() } else { message };
    println!("  {} {}", icon, message);
}

/// Print the cleanup run summary
pub fn print_cleanup_summary(summary: &CleanupSummary) {
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} Freed {} across {} target{} in {}",
        "💾",
        format_size_colored(summary.bytes_removed),
        summary.results.len(),
        if summary.results.len() == 1 { "" } else { "s" },
        format_duration(summary.duration).cyan()
    );
    if summary.items_ignored > 0 || summary.failures > 0 {
        println!(
            "  {} {} skipped, {} failed — locked or in-use entries are left alone",
            "⚠".yellow(),
            summary.items_ignored,
            summary.failures
        );
    }
    println!();
}

/// Print the cleanup run summary as JSON
pub fn print_cleanup_json(summary: &CleanupSummary) {
    let json = serde_json::json!({
        "timestamp": summary.timestamp.to_rfc3339(),
        "bytes_removed": summary.bytes_removed,
        "items_removed": summary.items_removed,
        "items_ignored": summary.items_ignored,
        "failures": summary.failures,
        "duration_secs": summary.duration.as_secs_f64(),
        "targets": summary.results.iter().map(|r| {
            serde_json::json!({
                "category": r.category,
                "bytes_removed": r.bytes_removed,
                "items_removed": r.items_removed,
                "items_ignored": r.items_ignored,
                "failures": r.failures,
                "duration_secs": r.duration.as_secs_f64(),
            })
        }).collect::<Vec<_>>(),
    });
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error: {}", e),
    }
}

/// Print the cleanup run summary in quiet form
pub fn print_cleanup_quiet(summary: &CleanupSummary) {
    println!(
        "{}  {}  {}  {}",
        format_size(summary.bytes_removed),
        summary.items_removed,
        summary.items_ignored,
        summary.failures
    );
}

fn status_dot(status: TweakStatus) -> ColoredString {
    match status {
        TweakStatus::Optimized => "●".green(),
        TweakStatus::Default => "●".white(),
        TweakStatus::Modified => "●".yellow(),
        TweakStatus::Unknown => "●".dimmed(),
        TweakStatus::Processing => "●".cyan(),
    }
}

fn format_status(status: TweakStatus) -> ColoredString {
    match status {
        TweakStatus::Optimized => "Optimized".green(),
        TweakStatus::Default => "Default".white(),
        TweakStatus::Modified => "Modified".yellow(),
        TweakStatus::Unknown => "Unknown".dimmed(),
        TweakStatus::Processing => "Processing".cyan(),
    }
}
