//! CLI integration tests
//!
//! These run the built binary against temporary config files. No test
//! reaches a real provider: every configured provider points at an API key
//! variable that is removed from the child environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const UNSET_KEY: &str = "TOOLHARVEST_TEST_NEVER_SET_KEY";

fn toolharvest_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_toolharvest"))
}

fn write_config(dir: &TempDir) -> PathBuf {
    let config = format!(
        r#"providers:
  deepseek:
    env_key: {key}
    default_base_url: https://api.deepseek.com/v1/
    default_model: deepseek-chat
  kimi:
    env_key: {key}
    default_base_url: https://api.moonshot.cn/v1/
    default_model: moonshot-v1-8k
crawler:
  max_content_length: 2000
  request_timeout: 30
  log_level: warn
data:
  data_dir: data
  tools_file: tools.json
"#,
        key = UNSET_KEY
    );
    let path = dir.path().join("toolharvest.yaml");
    fs::write(&path, config).expect("Failed to write config");
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(toolharvest_bin())
        .args(args)
        .current_dir(dir)
        .env_remove(UNSET_KEY)
        .env_remove("TOOLHARVEST_CONFIG")
        .env_remove("TOOLHARVEST_PROVIDERS")
        .env_remove("TOOLHARVEST_CONTENT")
        .env_remove("TOOLHARVEST_DATA_DIR")
        .env_remove("TOOLHARVEST_TOOLS_FILE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute toolharvest")
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("toolharvest"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("providers"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_subcommand() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["harvest-everything"]);
    assert!(!output.status.success());
}

#[test]
fn test_providers_lists_unavailable_in_config_order() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(
        dir.path(),
        &["providers", "--config", config.to_str().unwrap(), "--format", "json"],
    );

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("providers output is JSON");
    assert_eq!(value[0]["name"], "deepseek");
    assert_eq!(value[1]["name"], "kimi");
    assert_eq!(value[0]["available"], false);
    assert_eq!(value[0]["model"], "deepseek-chat");
}

#[test]
fn test_providers_without_config_file() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["providers"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No providers configured"));
}

#[test]
fn test_config_command_resolves_data_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(
        dir.path(),
        &["config", "--config", config.to_str().unwrap(), "--format", "yaml"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("max_content_length: '2000'"));
    assert!(stdout.contains("tools.json"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["config", "--config", "does-not-exist.yaml"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_run_without_available_providers_keeps_dataset() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    let dataset = r#"[{"name": "Kimi", "url": "https://kimi.moonshot.cn"}]"#;
    fs::write(data_dir.join("tools.json"), dataset).unwrap();

    let output = run(
        dir.path(),
        &["run", "--config", config.to_str().unwrap(), "--format", "json"],
    );

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("run summary is JSON");
    assert_eq!(summary["existing"], 1);
    assert_eq!(summary["extracted"], 0);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("tools.json")).unwrap()).unwrap();
    assert_eq!(saved[0]["name"], "Kimi");
}

#[test]
fn test_run_with_unconfigured_named_provider_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(
        dir.path(),
        &[
            "run",
            "--config",
            config.to_str().unwrap(),
            "--providers",
            "kimi",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(UNSET_KEY));
}

#[test]
fn test_run_with_unknown_provider_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(
        dir.path(),
        &[
            "run",
            "--config",
            config.to_str().unwrap(),
            "--providers",
            "openrouter",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown provider"));
}
