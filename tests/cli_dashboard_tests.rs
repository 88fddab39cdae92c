//! End-to-end tests for the `dashgrid` commands.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

mod fixtures;
use fixtures::*;

/// Path to the dashgrid binary
fn dashgrid_bin() -> String {
    std::env::var("CARGO_BIN_EXE_dashgrid").unwrap_or_else(|_| "target/debug/dashgrid".to_string())
}

/// Runs a command against an isolated config directory.
fn run(args: &[&str], config_dir: &Path) -> Output {
    Command::new(dashgrid_bin())
        .env("DASHGRID_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn assert_success(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(0),
        "Command should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Content tags reported by `show --json`.
fn shown_tags(config_dir: &Path) -> Vec<String> {
    let output = run(&["show", "--json"], config_dir);
    assert_success(&output);
    let json: Value = serde_json::from_slice(&output.stdout).expect("show prints JSON");
    json["grid"]
        .as_array()
        .expect("grid is an array")
        .iter()
        .map(|widget| widget["slots"][0]["tag"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ============================================================================
// Show / Types
// ============================================================================

#[test]
fn test_show_builtin_configuration() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["show", "--json"], dir.path());
    assert_success(&output);

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "trio");
    assert_eq!(shown_tags(dir.path()), ["test-a", "test-b", "test-c"]);
    assert!(!custom_record_path(dir.path()).exists(), "show must not save");
}

#[test]
fn test_show_human_readable() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["show"], dir.path());
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Trio"));
    assert!(stdout.contains("0: test-a [square-small]"));
}

#[test]
fn test_show_uses_bundled_catalog_without_config() {
    let dir = temp_config_dir();

    let output = run(&["show", "--json"], dir.path());
    assert_success(&output);

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "standard");
}

#[test]
fn test_types_lists_fields() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["types", "--json"], dir.path());
    assert_success(&output);

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["tag"], "test-gauge");
    assert_eq!(json[0]["fields"][0]["name"], "limit");
    assert_eq!(json[0]["fields"][0]["default"], "100");
    assert_eq!(json[0]["fields"][1]["target"], "slot");
}

// ============================================================================
// Editing commands
// ============================================================================

#[test]
fn test_add_appends_and_persists() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["add", "test-gauge", "--set", "title=Pressure"], dir.path());
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("position 3"));

    assert!(custom_record_path(dir.path()).exists());
    assert_eq!(
        shown_tags(dir.path()),
        ["test-a", "test-b", "test-c", "test-gauge"]
    );
}

#[test]
fn test_add_with_size_override() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    assert_success(&run(&["add", "test-gauge", "--size", "column-large"], dir.path()));

    let output = run(&["show", "--json"], dir.path());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["grid"][3]["attributes"]["class"], "column-large");
}

#[test]
fn test_add_rejects_bad_input() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let unknown = run(&["add", "test-radar"], dir.path());
    assert_eq!(unknown.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Unknown widget type"));

    let bad_number = run(&["add", "test-gauge", "--set", "limit=lots"], dir.path());
    assert_eq!(bad_number.status.code(), Some(1));

    let bad_size = run(&["add", "test-gauge", "--size", "huge"], dir.path());
    assert_eq!(bad_size.status.code(), Some(1));

    assert!(!custom_record_path(dir.path()).exists());
}

#[test]
fn test_move_reorders() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    assert_success(&run(&["move", "0", "2"], dir.path()));
    assert_eq!(shown_tags(dir.path()), ["test-b", "test-c", "test-a"]);

    assert_success(&run(&["move", "2", "1"], dir.path()));
    assert_eq!(shown_tags(dir.path()), ["test-b", "test-a", "test-c"]);

    let out_of_range = run(&["move", "0", "7"], dir.path());
    assert_eq!(out_of_range.status.code(), Some(1));
}

#[test]
fn test_resize_persists_new_class() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["resize", "1", "row-small"], dir.path());
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("test-b [row-small]"));

    let output = run(&["show", "--json"], dir.path());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "custom");
    assert_eq!(json["grid"][1]["attributes"]["class"], "row-small");
    assert_eq!(json["grid"][1]["attributes"]["size"], "row-small");
    assert_eq!(shown_tags(dir.path()), ["test-a", "test-b", "test-c"]);
}

#[test]
fn test_resize_rejects_bad_input() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    assert_eq!(run(&["resize", "9", "row-small"], dir.path()).status.code(), Some(1));
    assert_eq!(run(&["resize", "0", "huge"], dir.path()).status.code(), Some(1));
    assert!(!custom_record_path(dir.path()).exists());
}

#[test]
fn test_resize_limited_by_column_count() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());
    assert_success(&run(&["config", "set", "--columns", "2"], dir.path()));

    let wide = run(&["resize", "0", "row-small"], dir.path());
    assert_eq!(wide.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&wide.stderr).contains("column-large"));

    assert_success(&run(&["resize", "0", "column-large"], dir.path()));
}

#[test]
fn test_remove_and_reset() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    assert_success(&run(&["remove", "1"], dir.path()));
    assert_eq!(shown_tags(dir.path()), ["test-a", "test-c"]);

    assert_eq!(run(&["remove", "9"], dir.path()).status.code(), Some(1));

    assert_success(&run(&["reset"], dir.path()));
    assert!(!custom_record_path(dir.path()).exists());
    assert_eq!(shown_tags(dir.path()), ["test-a", "test-b", "test-c"]);
}

#[test]
fn test_malformed_custom_record_falls_back() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());
    let record = custom_record_path(dir.path());
    std::fs::create_dir_all(record.parent().unwrap()).unwrap();
    std::fs::write(&record, "{ definitely not json").unwrap();

    assert_eq!(shown_tags(dir.path()), ["test-a", "test-b", "test-c"]);
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_show_defaults_without_file() {
    let dir = temp_config_dir();

    let output = run(&["config", "show"], dir.path());
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("defaults"));
    assert!(!dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_keeps_other_values() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    assert_success(&run(
        &["config", "set", "--autosave-interval", "30", "--autosave", "false"],
        dir.path(),
    ));

    let output = run(&["config", "show", "--json"], dir.path());
    assert_success(&output);
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["autosave"]["interval_secs"], 30);
    assert_eq!(json["autosave"]["enabled"], false);
    assert_eq!(json["grid"]["config_id"], "trio");

    let watch = run(&["watch", "--seconds", "1"], dir.path());
    assert_eq!(watch.status.code(), Some(1));
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());
    let before = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();

    assert_eq!(run(&["config", "set"], dir.path()).status.code(), Some(1));
    assert_eq!(
        run(&["config", "set", "--columns", "0"], dir.path()).status.code(),
        Some(1)
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("config.toml")).unwrap(),
        before
    );
}

// ============================================================================
// Watch
// ============================================================================

#[test]
fn test_watch_autosaves() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["watch", "--seconds", "2", "--interval", "1"], dir.path());
    assert_success(&output);

    assert!(String::from_utf8_lossy(&output.stdout).contains("autosaves"));
    assert!(custom_record_path(dir.path()).exists());
}

#[test]
fn test_watch_rejects_zero_interval() {
    let dir = temp_config_dir();
    write_trio_config(dir.path());

    let output = run(&["watch", "--seconds", "1", "--interval", "0"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}
