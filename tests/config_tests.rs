//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides

mod common;

use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{invalid_config_fixture, regisena_cmd, valid_config_fixture};

/// Test fixture for configuration testing
struct ConfigFixture {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        Self {
            temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }

    fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_empty_config_uses_defaults() {
    let fixture = ConfigFixture::new();
    fixture.write_config("");

    regisena_cmd()
        .args(["config", "show", "--config", fixture.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_slice = \"personas\""))
        .stdout(predicate::str::contains("level = \"warn\""));
}

#[test]
fn test_valid_fixture() {
    regisena_cmd()
        .args(["config", "validate", "--config"])
        .arg(valid_config_fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_full_config() {
    let fixture = ConfigFixture::new();
    let catalog = fixture.dir().join("catalog.toml");
    fs::write(
        &catalog,
        "[[entries]]\nid = 7\ncode = \"ZX-7\"\nname = \"Zebra Scanner\"\n",
    )
    .unwrap();
    fixture.write_config(&format!(
        r#"
[session]
default_slice = "equipos"
prompt = "admin> "
echo_commands = false

[catalog]
file = "{}"

[logging]
level = "info"
max_file_size_mb = 5
max_files = 2
json_format = true
"#,
        catalog.display()
    ));

    regisena_cmd()
        .args(["config", "show", "--config", fixture.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("prompt = \"admin> \""))
        .stdout(predicate::str::contains("json_format = true"));

    regisena_cmd()
        .args(["catalog", "--config", fixture.path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Zebra Scanner"));
}

#[test]
fn test_catalog_from_config_used_by_session() {
    let fixture = ConfigFixture::new();
    let catalog = fixture.dir().join("catalog.toml");
    fs::write(
        &catalog,
        "[[entries]]\nid = 7\ncode = \"ZX-7\"\nname = \"Zebra Scanner\"\n",
    )
    .unwrap();
    fixture.write_config(&format!("[catalog]\nfile = \"{}\"\n", catalog.display()));

    regisena_cmd()
        .args(["session", "--config", fixture.path()])
        .write_stdin("new\nselect 1 7\nsave\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ZX-7 - Zebra Scanner"))
        .stdout(predicate::str::contains("Saved."));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_fixture() {
    regisena_cmd()
        .args(["config", "validate", "--config"])
        .arg(invalid_config_fixture())
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_invalid_log_level() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[logging]\nlevel = \"chatty\"\n");

    regisena_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Invalid log level"));
}

#[test]
fn test_empty_prompt() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[session]\nprompt = \"\"\n");

    regisena_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Prompt cannot be empty"));
}

#[test]
fn test_unknown_slice() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[session]\ndefault_slice = \"vehicles\"\n");

    regisena_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[session\nprompt = ");

    regisena_cmd()
        .args(["config", "validate", "--config", fixture.path()])
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Failed to parse configuration"));
}

// ─────────────────────────────────────────────────────────────────
// Environment Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_file() {
    regisena_cmd()
        .args(["config", "show", "--config"])
        .arg(valid_config_fixture())
        .env("REGISENA_DEFAULT_SLICE", "personas")
        .env("REGISENA_LOG_LEVEL", "debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("default_slice = \"personas\""))
        .stdout(predicate::str::contains("level = \"debug\""));
}

#[test]
fn test_env_invalid_log_level() {
    regisena_cmd()
        .args(["config", "validate"])
        .env("REGISENA_LOG_LEVEL", "nope")
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_config_env_var_selects_file() {
    regisena_cmd()
        .args(["session"])
        .env("REGISENA_CONFIG", valid_config_fixture())
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Serial"));
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let fixture = ConfigFixture::new();
    let target = fixture.dir().join("nested").join("regisena.toml");

    regisena_cmd()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    let content = fs::read_to_string(&target).unwrap();
    assert!(content.contains("[session]"));
    assert!(content.contains("[logging]"));

    regisena_cmd()
        .args(["config", "validate", "--config"])
        .arg(&target)
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let fixture = ConfigFixture::new();
    fixture.write_config("# keep me\n");

    regisena_cmd()
        .args(["config", "init", "--path", fixture.path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(fixture.path()).unwrap(), "# keep me\n");

    regisena_cmd()
        .args(["config", "init", "--force", "--path", fixture.path()])
        .assert()
        .success();
}
