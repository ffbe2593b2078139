//! Integration tests for the apidiff CLI
//!
//! Tests end-to-end command behavior using the CLI binary.
//! Uses tempfile for isolated test directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Run apidiff with the given args in the specified directory
fn run_apidiff(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_apidiff"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute apidiff command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const BEFORE_LIB: &str = r#"{
    "name": "Lib.dll",
    "namespaces": [
        {
            "name": "N",
            "symbol": { "kind": "namespace" },
            "children": [
                {
                    "name": "C",
                    "symbol": { "kind": "type", "type_kind": "class" },
                    "children": [
                        { "name": "Hidden", "symbol": { "kind": "method" } }
                    ]
                }
            ]
        }
    ]
}"#;

const AFTER_LIB: &str = r#"{
    "name": "Lib.dll",
    "namespaces": [
        {
            "name": "N",
            "symbol": { "kind": "namespace" },
            "children": [
                {
                    "name": "C",
                    "symbol": { "kind": "type", "type_kind": "class" },
                    "children": [
                        { "name": "M", "symbol": { "kind": "method" } }
                    ]
                }
            ]
        }
    ]
}"#;

/// Create `before/` and `after/` module directories in the temp directory
fn setup_versions(dir: &Path) {
    fs::create_dir_all(dir.join("before")).unwrap();
    fs::create_dir_all(dir.join("after")).unwrap();
    fs::write(dir.join("before/Lib.dll.json"), BEFORE_LIB).unwrap();
    fs::write(dir.join("after/Lib.dll.json"), AFTER_LIB).unwrap();
}

const EXPECTED_LIB: &str = "# Lib

```diff
  namespace N
  {
      public class C
      {
-         public void Hidden() { }
+         public void M() { }
      }
  }
```
";

// ============================================================================
// Diff Command Tests
// ============================================================================

#[test]
fn test_diff_prints_markdown() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());

    let output = run_apidiff(
        temp_dir.path(),
        &["diff", "before", "after", "--format", "markdown"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), EXPECTED_LIB);
}

#[test]
fn test_diff_json_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());

    let output = run_apidiff(temp_dir.path(), &["diff", "before", "after", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
    assert_eq!(json["contents"]["Lib.dll"], EXPECTED_LIB);
    assert_eq!(json["summary"]["members_added"], 1);
    assert_eq!(json["summary"]["members_removed"], 1);
}

#[test]
fn test_diff_writes_documents_and_index() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());

    let output = run_apidiff(
        temp_dir.path(),
        &["diff", "before", "after", "-o", "out", "--title", "release"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = temp_dir.path().join("out");
    assert_eq!(
        fs::read_to_string(out.join("release_Lib.dll.md")).unwrap(),
        EXPECTED_LIB
    );
    assert_eq!(
        fs::read_to_string(out.join("release.md")).unwrap(),
        "# release\n\n- [Lib.dll](release_Lib.dll.md)\n"
    );
    assert!(stdout(&output).contains("SUMMARY:"));
}

#[test]
fn test_diff_exclude_api_hides_member() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());
    fs::write(
        temp_dir.path().join("exclusions.txt"),
        "# internal surface\nM:N.C.Hidden\n",
    )
    .unwrap();

    let output = run_apidiff(
        temp_dir.path(),
        &[
            "diff",
            "before",
            "after",
            "--format",
            "markdown",
            "--exclude-api-file",
            "exclusions.txt",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    assert!(!text.contains("Hidden"));
    assert!(text.contains("+         public void M() { }"));
}

#[test]
fn test_identical_versions_produce_no_documents() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());

    let output = run_apidiff(
        temp_dir.path(),
        &["diff", "before", "before", "--format", "markdown"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_invalid_module_fails_run_but_keeps_others() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());
    fs::write(temp_dir.path().join("after/Broken.dll.json"), "{ nope").unwrap();

    let output = run_apidiff(
        temp_dir.path(),
        &["diff", "before", "after", "--format", "markdown"],
    );

    assert!(!output.status.success(), "a broken module must fail the run");
    assert!(stdout(&output).contains("# Lib"));
    assert!(stderr(&output).contains("1 module(s) failed to diff"));
}

#[test]
fn test_missing_input_directory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let output = run_apidiff(temp_dir.path(), &["diff", "nowhere", "nothere"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to open before modules"));
}

#[test]
fn test_config_file_sets_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_versions(temp_dir.path());
    fs::write(
        temp_dir.path().join(".apidiffrc.toml"),
        "[diff]\nadd_partial_modifier = true\n\n[output]\nformat = \"markdown\"\n",
    )
    .unwrap();

    let output = run_apidiff(temp_dir.path(), &["diff", "before", "after"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("      public partial class C"));
}
