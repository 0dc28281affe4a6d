//! CLI smoke tests for up.
//!
//! These tests verify argument handling, error reporting, and a full
//! generation run against a mock artifact repository.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the up binary.
fn up_cmd() -> Command {
  cargo_bin_cmd!("up")
}

/// Create a temp workspace with one origin declaring the given content.
fn temp_workspace(origin: &str, content: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  let dir = temp.path().join(origin);
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(dir.join("up.lua"), content).unwrap();
  temp
}

const APP_DECLS: &str = r#"
up.sources({ name = "app" })
up.library_jar({ name = "guava", coords = "com.google.guava:guava:31.0" })
"#;

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  up_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  up_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("up"));
}

#[test]
fn missing_origins_fail() {
  up_cmd().assert().failure();
}

// =============================================================================
// Error handling
// =============================================================================

#[test]
fn missing_declaration_file_fails() {
  let temp = TempDir::new().unwrap();

  up_cmd()
    .current_dir(temp.path())
    .arg("nowhere")
    .assert()
    .failure()
    .stderr(predicate::str::contains("nowhere/up.lua"));
}

#[test]
fn invalid_lua_syntax_fails() {
  let temp = temp_workspace("app", "this is not lua {{{");

  up_cmd().current_dir(temp.path()).arg("app").assert().failure();
}

#[test]
fn invalid_coords_name_the_failing_input() {
  let temp = temp_workspace(
    "app",
    r#"up.library_jar({ name = "broken", coords = "only:two" })"#,
  );

  up_cmd()
    .current_dir(temp.path())
    .arg("app")
    .assert()
    .failure()
    .stderr(predicate::str::contains("only:two"));
}

#[test]
#[serial]
fn unreachable_repository_fails() {
  let temp = temp_workspace("app", APP_DECLS);

  up_cmd()
    .current_dir(temp.path())
    .arg("app")
    .env("UP_REPO_URL", "http://127.0.0.1:1/")
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot download"));
}

// =============================================================================
// End-to-end generation
// =============================================================================

#[test]
#[serial]
fn full_generation_run() {
  let temp = temp_workspace("app", APP_DECLS);

  let mut server = mockito::Server::new();
  server
    .mock("GET", "/com/google/guava/guava/31.0/guava-31.0.jar.sha1")
    .with_body("jarsha1digest")
    .create();
  server
    .mock("GET", "/com/google/guava/guava/31.0/guava-31.0-sources.jar.sha1")
    .with_body("srcsha1digest")
    .create();

  up_cmd()
    .current_dir(temp.path())
    .arg("app")
    .env("UP_REPO_URL", format!("{}/", server.url()))
    .assert()
    .success()
    .stdout(predicate::str::contains("buck fetch //lib/..."));

  assert!(temp.path().join("lib/BUCK").is_file());
  assert!(temp.path().join("lib/DEFS").is_file());
  assert!(temp.path().join(".link/readme.md").is_file());
  assert!(temp.path().join(".link/lib/guava-31.0.jar").symlink_metadata().is_ok());
  assert!(temp.path().join(".idea/libraries/lib_guava.xml").is_file());
  assert!(temp.path().join(".classpath").is_file());

  let buck = std::fs::read_to_string(temp.path().join("lib/BUCK")).unwrap();
  assert!(buck.contains("sha1 = 'jarsha1digest'"));
}
