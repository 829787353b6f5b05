// CLI integration tests for probe/init flows.
use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_vlc-bootstrap");
    let mut command = Command::new(exe);
    command.env("RUST_LOG", "warn");
    command
}

fn parse_json(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    serde_json::from_str(text.trim()).expect("valid json")
}

fn last_json_line(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text.lines().last().expect("json line");
    serde_json::from_str(line).expect("valid json")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn probe_prefers_custom_layout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let custom = temp.path().join("vlc");
    let app = temp.path().join("app");
    fs::create_dir_all(custom.join("plugins")).expect("mkdir");
    fs::create_dir_all(custom.join("lib")).expect("mkdir");
    fs::create_dir_all(app.join("vlc").join("lib")).expect("mkdir");

    let probe = cmd()
        .args([
            "probe",
            "--vlc-path",
            path_str(&custom),
            "--exe-dir",
            path_str(&app),
        ])
        .output()
        .expect("probe");
    assert!(probe.status.success());

    let report = parse_json(&probe.stdout);
    assert_eq!(
        report["library_dir"].as_str(),
        Some(path_str(&custom.join("lib")))
    );
    assert_eq!(
        report["plugin_dir"].as_str(),
        Some(path_str(&custom.join("plugins")))
    );
    let libraries = report["libraries"].as_array().expect("libraries");
    assert_eq!(libraries[0]["description"], "custom lib");
    assert_eq!(libraries[0]["found"], true);
    assert_eq!(libraries[1]["description"], "custom root");
    assert_eq!(libraries[1]["found"], false);
    assert_eq!(libraries[2]["description"], "embedded lib");
    assert_eq!(libraries[2]["found"], true);
}

#[test]
fn probe_uses_embedded_copy_without_custom_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let app = temp.path().join("app");
    fs::create_dir_all(app.join("vlc").join("plugins")).expect("mkdir");
    fs::create_dir_all(app.join("vlc").join("lib")).expect("mkdir");

    let probe = cmd()
        .args(["probe", "--exe-dir", path_str(&app)])
        .output()
        .expect("probe");
    assert!(probe.status.success());

    let report = parse_json(&probe.stdout);
    assert!(report["custom_path"].is_null());
    assert_eq!(
        report["library_dir"].as_str(),
        Some(path_str(&app.join("vlc").join("lib")))
    );
    assert_eq!(
        report["plugin_dir"].as_str(),
        Some(path_str(&app.join("vlc").join("plugins")))
    );
}

#[test]
fn init_reports_missing_binary_as_init_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let custom = temp.path().join("vlc");
    fs::create_dir_all(custom.join("lib")).expect("mkdir");

    let init = cmd()
        .args([
            "init",
            "--vlc-path",
            path_str(&custom),
            "--exe-dir",
            path_str(&temp.path().join("app")),
        ])
        .output()
        .expect("init");
    assert_eq!(init.status.code(), Some(3));
    assert!(init.stdout.is_empty());

    let err = last_json_line(&init.stderr);
    assert_eq!(err["error"]["kind"], "Init");
    assert_eq!(
        err["error"]["path"].as_str(),
        Some(path_str(&custom.join("lib")))
    );
    assert!(err["error"]["hint"].is_string());
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let out = cmd().args(["probe", "--bogus"]).output().expect("run");
    assert_eq!(out.status.code(), Some(2));
    let err = last_json_line(&out.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn help_exits_cleanly() {
    let out = cmd().arg("--help").output().expect("run");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("probe"));
    assert!(text.contains("init"));
}
