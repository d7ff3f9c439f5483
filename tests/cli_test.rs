use assert_cmd::Command;
use predicates::prelude::*;

fn tidywin() -> Command {
    Command::cargo_bin("tidywin").unwrap()
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    tidywin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("tweak"))
        .stdout(predicate::str::contains("tweaks"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version_flag() {
    tidywin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tidywin"));
}

// ─── Tweaks command ──────────────────────────────────────────────────────────

#[test]
fn test_tweaks_list() {
    tidywin()
        .args(["tweaks", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disable-telemetry"))
        .stdout(predicate::str::contains("Privacy"))
        .stdout(predicate::str::contains("Search"));
}

#[test]
fn test_tweaks_list_json() {
    tidywin()
        .args(["tweaks", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["))
        .stdout(predicate::str::contains("disable-cortana"))
        .stdout(predicate::str::contains("\"status\""));
}

#[test]
fn test_tweaks_list_quiet() {
    tidywin()
        .args(["tweaks", "list", "--format", "quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disable-superfetch"));
}

#[test]
fn test_tweaks_list_filters_by_category() {
    tidywin()
        .args(["tweaks", "list", "--category", "privacy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disable-telemetry"))
        .stdout(predicate::str::contains("disable-cortana").not());
}

#[test]
fn test_tweaks_list_unknown_category_fails() {
    tidywin()
        .args(["tweaks", "list", "--category", "nonsense_xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_tweaks_apply_unknown_id_fails() {
    tidywin()
        .args(["tweaks", "apply", "no-such-tweak-xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown tweak id"));
}

#[test]
fn test_tweaks_apply_with_no_selection_explains() {
    tidywin()
        .args(["tweaks", "apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tweaks selected"));
}

#[cfg(not(windows))]
#[test]
fn test_tweaks_status_requires_windows() {
    tidywin()
        .args(["tweaks", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only available on Windows"));
}

// ─── Clean command ───────────────────────────────────────────────────────────

#[test]
fn test_clean_with_no_flags_shows_usage() {
    tidywin()
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("tidywin clean --all"));
}

// ─── Status command ──────────────────────────────────────────────────────────

#[test]
fn test_status() {
    tidywin()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("TidyWin Status"))
        .stdout(predicate::str::contains("tweaks"));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tidywin()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tidywin"));
}

// ─── Invalid invocations ─────────────────────────────────────────────────────

#[test]
fn test_no_subcommand_shows_usage() {
    tidywin()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
