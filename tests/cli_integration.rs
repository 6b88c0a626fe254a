//! CLI integration tests for native-model.
//!
//! Every project written here disables host probing, so the output only
//! depends on the manifest.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the native-model binary command, isolated from the user's config.
fn native_model(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("native-model").unwrap();
    cmd.env("HOME", home);
    cmd
}

/// Create a project with `manifest` and probing disabled.
fn project(manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("Model.toml"), manifest).unwrap();
    fs::create_dir_all(tmp.path().join(".native-model")).unwrap();
    fs::write(
        tmp.path().join(".native-model/config.toml"),
        "[probe]\nenabled = false\n",
    )
    .unwrap();
    tmp
}

const CROSS_MANIFEST: &str = r#"
flavors = ["free", "paid"]

[[platform]]
name = "x86"
architecture = "i386"
os = "linux"

[[platform]]
name = "sparc"
architecture = "sparc64"
os = "solaris"

[[toolchain]]
name = "gcc"
family = "gcc"
cc = "/opt/gcc/bin/gcc"

[[toolchain.target]]
architecture = "x86"
"#;

// ============================================================================
// native-model binaries
// ============================================================================

#[test]
fn test_binaries_lists_variants() {
    let tmp = project(CROSS_MANIFEST);

    native_model(tmp.path())
        .arg("binaries")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("x86DebugFree"))
        .stdout(predicate::str::contains("x86ReleasePaid"))
        .stdout(predicate::str::contains("4 binaries"))
        .stdout(predicate::str::contains("sparc").not());
}

#[test]
fn test_binaries_json() {
    let tmp = project(CROSS_MANIFEST);

    let output = native_model(tmp.path())
        .args(["binaries", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let binaries = json["binaries"].as_array().unwrap();
    assert_eq!(binaries.len(), 4);
    assert_eq!(binaries[0]["name"], "x86DebugFree");
    assert_eq!(binaries[0]["platform"]["architecture"], "x86");
    assert_eq!(binaries[0]["tool_chain"]["name"], "gcc");
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 16);
}

#[test]
fn test_binaries_fingerprint_is_stable() {
    let tmp = project(CROSS_MANIFEST);

    let run = || {
        native_model(tmp.path())
            .args(["binaries", "--json"])
            .current_dir(tmp.path())
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_binaries_from_subdirectory() {
    let tmp = project(CROSS_MANIFEST);
    let nested = tmp.path().join("src/lib");
    fs::create_dir_all(&nested).unwrap();

    native_model(tmp.path())
        .arg("binaries")
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("x86DebugFree"));
}

#[test]
fn test_binaries_without_tool_chain_warns() {
    let tmp = project("flavors = [\"free\"]\n");

    native_model(tmp.path())
        .arg("binaries")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("no binaries"))
        .stderr(predicate::str::contains("--> "))
        .stderr(predicate::str::contains("Model.toml"))
        .stderr(predicate::str::contains("[[toolchain]]"));
}

#[test]
fn test_config_default_names() {
    let tmp = project(
        r#"
[[toolchain]]
name = "gcc"
family = "gcc"
"#,
    );
    fs::write(
        tmp.path().join(".native-model/config.toml"),
        "[probe]\nenabled = false\n\n[defaults]\nplatform = \"native\"\nbuild-types = [\"release\"]\n",
    )
    .unwrap();

    native_model(tmp.path())
        .arg("binaries")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nativeReleaseDefault"))
        .stdout(predicate::str::contains("Debug").not());
}

// ============================================================================
// native-model tasks
// ============================================================================

#[test]
fn test_tasks_plan() {
    let tmp = project(CROSS_MANIFEST);

    native_model(tmp.path())
        .arg("tasks")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("compileX86DebugFree [compile]"))
        .stdout(predicate::str::contains(
            "linkX86DebugFree [link] <- compileX86DebugFree",
        ))
        .stdout(predicate::str::contains("assemble <- x86DebugFree"));
}

#[test]
fn test_tasks_json() {
    let tmp = project(CROSS_MANIFEST);

    let output = native_model(tmp.path())
        .args(["tasks", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = json["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 12);
    assert_eq!(tasks[2]["kind"], "lifecycle");
}

// ============================================================================
// native-model model / toolchain
// ============================================================================

#[test]
fn test_model_shows_axes() {
    let tmp = project(
        r#"
build-types = ["debug"]

[[toolchain]]
name = "gcc"
family = "gcc"

[[toolchain.target]]
architecture = "x86"

[[repository]]
name = "vendor"

[[repository.library]]
name = "zlib"
headers = ["vendor/zlib/include"]
"#,
    );

    native_model(tmp.path())
        .arg("model")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("gcc (gcc) -> x86"))
        .stdout(predicate::str::contains("Build types: debug"))
        .stdout(predicate::str::contains("Flavors: default"))
        .stdout(predicate::str::contains("vendor (prebuilt)"));
}

#[test]
fn test_model_without_manifest() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join(".native-model")).unwrap();
    fs::write(
        tmp.path().join(".native-model/config.toml"),
        "[probe]\nenabled = false\n",
    )
    .unwrap();

    native_model(tmp.path())
        .arg("model")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("no Model.toml found"))
        .stdout(predicate::str::contains("Build types: debug, release"))
        .stdout(predicate::str::contains("Binaries: 0"));
}

#[test]
fn test_toolchain_with_probe_disabled() {
    let tmp = project("");

    native_model(tmp.path())
        .arg("toolchain")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Host:"))
        .stderr(predicate::str::contains("no tool chain found"));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_manifest_fails() {
    let tmp = project("[[platform]]\narchitecture = \"x86\"\n");

    native_model(tmp.path())
        .arg("binaries")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("Model.toml"));
}

#[test]
fn test_duplicate_declaration_reports_diagnostic() {
    let tmp = project("flavors = [\"free\", \"free\"]\n");

    native_model(tmp.path())
        .args(["--no-color", "binaries"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: flavor `free` is declared more than once",
        ))
        .stderr(predicate::str::contains("help: consider:"));
}

#[test]
fn test_unknown_repository_kind_fails() {
    let tmp = project("[[repository]]\nname = \"central\"\nkind = \"maven\"\n");

    native_model(tmp.path())
        .arg("model")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("maven"));
}

// ============================================================================
// native-model completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    native_model(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("native-model"));
}

#[test]
fn test_colliding_variant_names_fail() {
    let tmp = project(
        r#"
[[platform]]
name = "Linux"
architecture = "x86"
os = "linux"

[[platform]]
name = "linux"
architecture = "x86"
os = "linux"

[[toolchain]]
name = "gcc"
family = "gcc"

[[toolchain.target]]
architecture = "x86"
"#,
    );

    native_model(tmp.path())
        .args(["--no-color", "binaries"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "two variants are both named `linuxDebugDefault`",
        ));
}
