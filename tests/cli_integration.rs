//! CLI integration tests for Slipway.
//!
//! These tests verify the full workflow from a project description to
//! generated build scripts and back to a clean tree.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the slipway binary command.
fn slipway() -> Command {
    Command::cargo_bin("slipway").unwrap()
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Lay out a two-package project with sources on disk.
fn write_demo_project(root: &Path) {
    fs::write(
        root.join("Slipway.toml"),
        r#"
name = "Demo"
bindir = "bin"

configs = ["Debug", "Release"]

[[packages]]
name = "engine"
language = "c++"
kind = "lib"
files = ["src/*.cpp"]
defines = ["ENGINE"]

[[packages]]
name = "game"
language = "c++"
kind = "exe"
files = ["main.cpp"]
links = ["engine"]
"#,
    )
    .unwrap();

    fs::create_dir_all(root.join("engine/src")).unwrap();
    fs::write(root.join("engine/src/core.cpp"), "void core() {}").unwrap();
    fs::create_dir_all(root.join("game")).unwrap();
    fs::write(root.join("game/main.cpp"), "int main() {}").unwrap();
}

// ============================================================================
// slipway generate
// ============================================================================

#[test]
fn test_generate_gnu_makefiles() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    slipway()
        .args(["generate", "--target", "gnu", "--os", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Makefile"));

    assert!(tmp.path().join("Makefile").is_file());
    assert!(tmp.path().join("engine/Makefile").is_file());
    assert!(tmp.path().join("game/Makefile").is_file());

    let master = fs::read_to_string(tmp.path().join("Makefile")).unwrap();
    assert!(master.contains("all: engine game"));
    assert!(master.contains("game: engine"));

    let engine = fs::read_to_string(tmp.path().join("engine/Makefile")).unwrap();
    assert!(engine.contains("TARGET := libengine.a"));
    assert!(engine.contains("ifeq ($(CONFIG),Release)"));
}

#[test]
fn test_generate_vs_solution() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    slipway()
        .args(["generate", "--target", "vs2003"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("Demo.sln").is_file());
    assert!(tmp.path().join("engine/engine.vcproj").is_file());
    assert!(tmp.path().join("game/game.vcproj").is_file());

    let sln = fs::read_to_string(tmp.path().join("Demo.sln")).unwrap();
    assert!(sln.contains("engine\\engine.vcproj"));

    // The solution and project files agree on each package's GUID.
    let vcproj = fs::read_to_string(tmp.path().join("game/game.vcproj")).unwrap();
    let guid_line = vcproj
        .lines()
        .find(|l| l.contains("ProjectGUID"))
        .unwrap()
        .trim()
        .to_string();
    let guid = guid_line
        .trim_start_matches("ProjectGUID=\"{")
        .trim_end_matches("}\"");
    assert!(sln.contains(guid));
}

#[test]
fn test_generate_unknown_format_fails() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    slipway()
        .args(["generate", "--target", "xcode"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("xcode"));
}

#[test]
fn test_generate_without_manifest_fails() {
    let tmp = temp_dir();

    slipway()
        .args(["generate"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Slipway.toml"));
}

#[test]
fn test_generate_rejects_duplicate_packages() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("Slipway.toml"),
        r#"
name = "Demo"
[[packages]]
name = "game"
[[packages]]
name = "game"
"#,
    )
    .unwrap();

    slipway()
        .args(["generate"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate package name"));

    // Nothing was written before the model failed validation.
    assert!(!tmp.path().join("Makefile").exists());
}

#[test]
fn test_generate_dump_outputs_json() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    let output = slipway()
        .args(["generate", "--dump", "--os", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let model: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(model["name"], "Demo");
    assert_eq!(model["packages"][0]["configs"][0]["target"], "libengine.a");
}

// ============================================================================
// slipway clean
// ============================================================================

#[test]
fn test_generate_then_clean_round_trip() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    slipway()
        .args(["generate", "--os", "linux"])
        .current_dir(tmp.path())
        .assert()
        .success();

    slipway()
        .args(["clean"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(!tmp.path().join("Makefile").exists());
    assert!(!tmp.path().join("engine/Makefile").exists());
    // Sources and the manifest are untouched.
    assert!(tmp.path().join("Slipway.toml").is_file());
    assert!(tmp.path().join("engine/src/core.cpp").is_file());
}

// ============================================================================
// slipway targets
// ============================================================================

#[test]
fn test_targets_lists_formats_and_packages() {
    let tmp = temp_dir();
    write_demo_project(tmp.path());

    slipway()
        .args(["targets"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("gnu"))
        .stdout(predicate::str::contains("vs2003"))
        .stdout(predicate::str::contains("engine"));
}
