//! CLI integration tests for the `nsresolve` binary.
//!
//! Every test builds its own project in a temp directory and passes
//! absolute paths, so results do not depend on the working directory.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRATCH: &str = "(ns a.b)\n(def x 1)\n(in-ns 'c.d)\n(def y 2)\n";

fn nsresolve() -> Command {
    let mut cmd = cargo_bin_cmd!("nsresolve");
    cmd.env_remove("NSRESOLVE_LOG");
    cmd
}

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// A project with `src` as its source root and one well-named file.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "nsresolve.toml", "source_paths = [\"src\"]\n");
    write(
        tmp.path(),
        "src/my_app/core.clj",
        "(ns my-app.core\n  (:require [clojure.string :as str]))\n\n(defn f [] 1)\n",
    );
    tmp
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.output().unwrap();
    serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    nsresolve()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Namespace resolution for Clojure source files",
        ));
}

#[test]
fn version_exits_0() {
    nsresolve()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nsresolve"));
}

// ──────────────────────────────────────────────
// 2. at
// ──────────────────────────────────────────────

#[test]
fn at_defaults_to_end_of_file() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .arg("at")
        .arg(&file)
        .assert()
        .success()
        .stdout("c.d\n");
}

#[test]
fn at_offset_inside_first_region() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .args(["at", "--offset", "12"])
        .arg(&file)
        .assert()
        .success()
        .stdout("a.b\n");
}

#[test]
fn at_line_and_column() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .args(["at", "--line", "4", "--column", "3"])
        .arg(&file)
        .assert()
        .success()
        .stdout("c.d\n");
    nsresolve()
        .args(["at", "--line", "2", "--column", "3"])
        .arg(&file)
        .assert()
        .success()
        .stdout("a.b\n");
}

#[test]
fn at_without_declaration_fails_in_text_mode() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "bare.clj", "(def x 1)\n");
    nsresolve()
        .arg("at")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no namespace declaration"));
}

#[test]
fn at_without_declaration_reports_null_in_json() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "bare.clj", "(def x 1)\n");
    let mut cmd = nsresolve();
    cmd.args(["--output", "json", "at"]).arg(&file);
    cmd.assert().success();
    let json = stdout_json(&mut cmd);
    assert!(json["namespace"].is_null());
    assert!(json["declaration"].is_null());
    assert_eq!(json["offset"], 10);
}

#[test]
fn at_json_includes_declaration_location() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    let json = stdout_json(nsresolve().args(["--output", "json", "at"]).arg(&file));
    assert_eq!(json["namespace"], "c.d");
    assert_eq!(json["declaration"]["kind"], "in-ns");
    assert_eq!(json["declaration"]["line"], 3);
    assert_eq!(json["declaration"]["offset"], 19);
}

#[test]
fn at_offset_past_end_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .args(["at", "--offset", "9999"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("past the end"));
}

#[test]
fn at_missing_line_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .args(["at", "--line", "40", "--column", "1"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 40 does not exist"));
}

#[test]
fn at_offset_conflicts_with_line() {
    let tmp = TempDir::new().unwrap();
    let file = write(tmp.path(), "scratch.clj", SCRATCH);
    nsresolve()
        .args(["at", "--offset", "1", "--line", "1", "--column", "1"])
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn at_missing_file_reports_read_error() {
    let tmp = TempDir::new().unwrap();
    nsresolve()
        .arg("at")
        .arg(tmp.path().join("nope.clj"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn errors_are_json_in_json_mode() {
    let tmp = TempDir::new().unwrap();
    let out = nsresolve()
        .args(["--output", "json", "at"])
        .arg(tmp.path().join("nope.clj"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    let err: serde_json::Value = serde_json::from_slice(&out.stderr).expect("stderr is JSON");
    assert!(err["error"].as_str().unwrap().contains("nope.clj"));
}

#[test]
fn quiet_suppresses_error_output() {
    let tmp = TempDir::new().unwrap();
    nsresolve()
        .args(["--quiet", "at"])
        .arg(tmp.path().join("nope.clj"))
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. path
// ──────────────────────────────────────────────

#[test]
fn path_with_source_path_flag() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    nsresolve()
        .arg("path")
        .arg(src.join("my_app/web_handler.clj"))
        .arg("--source-path")
        .arg(&src)
        .assert()
        .success()
        .stdout("my-app.web-handler\n");
}

#[test]
fn path_uses_discovered_config() {
    let tmp = project();
    nsresolve()
        .arg("path")
        .arg(tmp.path().join("src/my_app/core.clj"))
        .assert()
        .success()
        .stdout("my-app.core\n");
}

#[test]
fn path_config_applies_to_files_that_do_not_exist_yet() {
    let tmp = project();
    nsresolve()
        .arg("path")
        .arg(tmp.path().join("src/my_app/new_dir/thing.cljc"))
        .assert()
        .success()
        .stdout("my-app.new-dir.thing\n");
}

#[test]
fn path_outside_roots_falls_back_to_file_name() {
    let tmp = project();
    nsresolve()
        .arg("path")
        .arg(tmp.path().join("scripts/build_all.clj"))
        .assert()
        .success()
        .stdout("build-all\n");
}

#[test]
fn path_json_reports_matched_root() {
    let tmp = project();
    let json = stdout_json(
        nsresolve()
            .args(["--output", "json", "path"])
            .arg(tmp.path().join("src/my_app/core.clj")),
    );
    assert_eq!(json["namespace"], "my-app.core");
    let root = json["source_root"].as_str().unwrap();
    assert!(root.ends_with("src"), "unexpected root {}", root);
}

#[test]
fn explicit_config_flag_overrides_discovery() {
    let tmp = project();
    let alt = write(tmp.path(), "alt/nsresolve.toml", "source_paths = [\"../src/my_app\"]\n");
    nsresolve()
        .arg("--config")
        .arg(&alt)
        .arg("path")
        .arg(tmp.path().join("src/my_app/core.clj"))
        .assert()
        .success()
        .stdout("core\n");
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "nsresolve.toml", "source_paths = 3\n");
    nsresolve()
        .arg("path")
        .arg(tmp.path().join("src/a.clj"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse"));
}

#[test]
fn debug_logging_goes_to_stderr() {
    let tmp = project();
    nsresolve()
        .env("NSRESOLVE_LOG", "debug")
        .arg("path")
        .arg(tmp.path().join("src/my_app/core.clj"))
        .assert()
        .success()
        .stdout("my-app.core\n")
        .stderr(predicate::str::contains("source roots"));
}

// ──────────────────────────────────────────────
// 4. check
// ──────────────────────────────────────────────

#[test]
fn check_passes_for_well_named_project() {
    let tmp = project();
    nsresolve()
        .arg("check")
        .arg(tmp.path().join("src"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "checked 1 file(s): 0 mismatch(es), 0 missing declaration(s)",
        ));
}

#[test]
fn check_reports_mismatch_with_suggestion() {
    let tmp = project();
    write(tmp.path(), "src/my_app/util.clj", "(ns my-app.utils)\n");
    nsresolve()
        .arg("check")
        .arg(tmp.path().join("src"))
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "declares my-app.utils but its path implies my-app.util",
        ))
        .stdout(predicate::str::contains("my_app/utils.clj"));
}

#[test]
fn check_reports_missing_declaration() {
    let tmp = project();
    let file = write(tmp.path(), "src/my_app/data.clj", "{:a 1}\n");
    nsresolve()
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stdout(predicate::str::contains("no namespace declaration (expected my-app.data)"));
}

#[test]
fn check_skips_hidden_dirs_and_other_extensions() {
    let tmp = project();
    write(tmp.path(), "src/.cache/wrong.clj", "(ns totally.wrong)\n");
    write(tmp.path(), "src/my_app/README.md", "# notes\n");
    nsresolve()
        .arg("check")
        .arg(tmp.path().join("src"))
        .assert()
        .success()
        .stdout(predicate::str::contains("checked 1 file(s)"));
}

#[test]
fn check_json_summarizes_results() {
    let tmp = project();
    write(tmp.path(), "src/my_app/util.clj", "\n(ns my-app.utils)\n");
    let mut cmd = nsresolve();
    cmd.args(["--output", "json", "check"]).arg(tmp.path().join("src"));
    cmd.assert().failure();

    let json = stdout_json(&mut cmd);
    assert_eq!(json["mismatches"], 1);
    assert_eq!(json["missing"], 0);
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "ok");
    assert_eq!(files[1]["status"], "mismatch");
    assert_eq!(files[1]["declared"], "my-app.utils");
    assert_eq!(files[1]["expected"], "my-app.util");
    assert_eq!(files[1]["line"], 2);
}

#[test]
fn check_requires_a_path() {
    nsresolve().arg("check").assert().failure();
}
