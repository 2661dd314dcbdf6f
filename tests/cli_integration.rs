//! CLI integration tests for pj
//!
//! Each test runs the binary against a catalog inside a temp directory and
//! a config path that does not exist, so the user's real files are never
//! touched.

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn catalog(&self) -> PathBuf {
        self.dir.path().join("data").join("catalog.yaml")
    }

    /// Creates a project directory under the temp root
    fn project_dir(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("code").join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("pj"));
        cmd.env("PJ_CATALOG", self.catalog())
            .env("PJ_CONFIG", self.dir.path().join("no-config.toml"))
            .env_remove("EDITOR");
        cmd
    }

    fn add(&self, path: &Path) {
        self.cmd().arg("add").arg(path).assert().success();
    }
}

// =============================================================================
// Add
// =============================================================================

#[test]
fn test_add_registers_directory() {
    let env = Env::new();
    let path = env.project_dir("rocket");
    fs::write(path.join("Cargo.toml"), "[package]\nname = \"rocket\"\n").unwrap();

    env.cmd()
        .arg("add")
        .arg(&path)
        .args(["--tag", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: rocket"));

    let content = fs::read_to_string(env.catalog()).unwrap();
    assert!(content.contains("version: 1"));
    assert!(content.contains("name: rocket"));
    assert!(content.contains("rust"));
    assert!(content.contains("work"));
}

#[test]
fn test_add_with_custom_name_and_status() {
    let env = Env::new();
    let path = env.project_dir("dir-name");

    env.cmd()
        .arg("add")
        .arg(&path)
        .args(["--name", "Pretty Name", "--status", "archived"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added: Pretty Name"));

    env.cmd()
        .args(["list", "--status", "archived", "--names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pretty Name"));
}

#[test]
fn test_add_same_path_twice_fails() {
    let env = Env::new();
    let path = env.project_dir("twice");
    env.add(&path);

    env.cmd()
        .arg("add")
        .arg(&path)
        .args(["--name", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_add_missing_path_fails() {
    let env = Env::new();

    env.cmd()
        .arg("add")
        .arg(env.dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(!env.catalog().exists());
}

#[test]
fn test_add_file_path_fails() {
    let env = Env::new();
    let file = env.dir.path().join("plain.txt");
    fs::write(&file, "hi").unwrap();

    env.cmd()
        .arg("add")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_add_invalid_status_rejected() {
    let env = Env::new();
    let path = env.project_dir("bad-status");

    env.cmd()
        .arg("add")
        .arg(&path)
        .args(["--status", "paused"])
        .assert()
        .failure();
}

// =============================================================================
// List and search
// =============================================================================

#[test]
fn test_list_empty_catalog() {
    let env = Env::new();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_list_sorted_by_name() {
    let env = Env::new();
    env.add(&env.project_dir("zeta"));
    env.add(&env.project_dir("Alpha"));
    env.add(&env.project_dir("mid"));

    let out = env
        .cmd()
        .args(["list", "--names"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out).unwrap(), "Alpha\nmid\nzeta\n");

    let out = env
        .cmd()
        .args(["list", "--names", "--desc"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out).unwrap(), "zeta\nmid\nAlpha\n");
}

#[test]
fn test_list_filters_by_type_and_tag() {
    let env = Env::new();
    let go = env.project_dir("gopher");
    fs::write(go.join("go.mod"), "module gopher\n").unwrap();
    env.cmd()
        .arg("add")
        .arg(&go)
        .args(["-t", "tools"])
        .assert()
        .success();
    env.add(&env.project_dir("plain"));

    env.cmd()
        .args(["list", "--type", "go", "--names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gopher"))
        .stdout(predicate::str::contains("plain").not());

    env.cmd()
        .args(["list", "--tag", "tools", "--names"])
        .assert()
        .success()
        .stdout("gopher\n");
}

#[test]
fn test_list_json_output() {
    let env = Env::new();
    env.add(&env.project_dir("jsonny"));

    let out = env
        .cmd()
        .args(["--format", "json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let projects: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let arr = projects.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "jsonny");
    assert_eq!(arr[0]["status"], "active");
    assert!(arr[0]["id"].as_str().unwrap().starts_with("p-"));
}

#[test]
fn test_search_is_case_insensitive() {
    let env = Env::new();
    env.add(&env.project_dir("WebServer"));
    env.add(&env.project_dir("cli-tool"));

    env.cmd()
        .args(["search", "webserv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WebServer"))
        .stdout(predicate::str::contains("cli-tool").not());

    env.cmd()
        .args(["search", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

// =============================================================================
// Show, edit, touch, rm
// =============================================================================

#[test]
fn test_show_path_only() {
    let env = Env::new();
    let path = env.project_dir("showme");
    env.add(&path);

    env.cmd()
        .args(["show", "showme", "--path"])
        .assert()
        .success()
        .stdout(format!("{}\n", path.display()));
}

#[test]
fn test_show_unknown_project_fails() {
    let env = Env::new();

    env.cmd()
        .args(["show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project found"));
}

#[test]
fn test_show_ambiguous_fragment_fails() {
    let env = Env::new();
    env.add(&env.project_dir("api-users"));
    env.add(&env.project_dir("api-orders"));

    env.cmd()
        .args(["show", "api"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("multiple projects match"))
        .stderr(predicate::str::contains("api-users"))
        .stderr(predicate::str::contains("api-orders"));
}

#[test]
fn test_edit_updates_fields() {
    let env = Env::new();
    env.add(&env.project_dir("editable"));

    env.cmd()
        .args([
            "edit",
            "editable",
            "--name",
            "renamed",
            "--status",
            "abandoned",
            "--add-tag",
            "old",
            "--notes",
            "gone quiet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated: renamed"));

    env.cmd()
        .args(["show", "renamed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abandoned"))
        .stdout(predicate::str::contains("old"))
        .stdout(predicate::str::contains("gone quiet"));
}

#[test]
fn test_edit_path_conflict_fails() {
    let env = Env::new();
    let first = env.project_dir("first");
    env.add(&first);
    env.add(&env.project_dir("second"));

    env.cmd()
        .args(["edit", "second", "--path"])
        .arg(&first)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    env.cmd()
        .args(["show", "second", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("second"));
}

#[test]
fn test_touch_moves_project_to_top_of_recent() {
    let env = Env::new();
    env.add(&env.project_dir("older"));
    env.add(&env.project_dir("newer"));

    env.cmd()
        .args(["touch", "older"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Touched: older"));

    let out = env
        .cmd()
        .args(["list", "--recent", "--names"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.lines().next(), Some("older"));
}

#[test]
fn test_rm_removes_project() {
    let env = Env::new();
    let path = env.project_dir("doomed");
    env.add(&path);

    env.cmd()
        .args(["rm", "doomed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed: doomed"));

    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));

    // Directory itself is untouched
    assert!(path.is_dir());
}

// =============================================================================
// Open
// =============================================================================

#[test]
fn test_open_runs_editor() {
    let env = Env::new();
    env.add(&env.project_dir("openme"));

    env.cmd()
        .env("EDITOR", "true")
        .args(["open", "openme"])
        .assert()
        .success();
}

#[test]
fn test_open_failing_editor_reports_error() {
    let env = Env::new();
    env.add(&env.project_dir("openfail"));

    env.cmd()
        .env("EDITOR", "false")
        .args(["open", "openfail"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exited with"));
}

#[test]
fn test_open_missing_directory_fails() {
    let env = Env::new();
    let path = env.project_dir("vanished");
    env.add(&path);
    fs::remove_dir_all(&path).unwrap();

    env.cmd()
        .env("EDITOR", "true")
        .args(["open", "vanished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer exists"));
}

// =============================================================================
// Catalog file handling
// =============================================================================

#[test]
fn test_corrupt_catalog_reports_path() {
    let env = Env::new();
    fs::create_dir_all(env.catalog().parent().unwrap()).unwrap();
    fs::write(env.catalog(), "projects: [ {{{").unwrap();

    env.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog.yaml"));
}

#[test]
fn test_blank_catalog_is_empty() {
    let env = Env::new();
    fs::create_dir_all(env.catalog().parent().unwrap()).unwrap();
    fs::write(env.catalog(), "# nothing yet\n\n").unwrap();

    env.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found."));
}

#[test]
fn test_config_sets_default_sort_and_format() {
    let env = Env::new();
    let config = env.dir.path().join("config.toml");
    fs::write(&config, "default_format = \"json\"\ndefault_sort = \"path\"\n").unwrap();
    env.add(&env.project_dir("b-proj"));
    env.add(&env.project_dir("a-proj"));

    let out = env
        .cmd()
        .env("PJ_CONFIG", &config)
        .arg("list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let projects: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let names: Vec<_> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a-proj", "b-proj"]);
}

#[test]
fn test_explicit_catalog_flag_wins() {
    let env = Env::new();
    let other = env.dir.path().join("other.yaml");
    let path = env.project_dir("flagged");

    env.cmd()
        .arg("--catalog")
        .arg(&other)
        .arg("add")
        .arg(&path)
        .assert()
        .success();

    assert!(other.is_file());
    assert!(!env.catalog().exists());
}
