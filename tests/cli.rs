/*!
 * Integration tests for the dirdoc binary
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::tempdir;

fn settings_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config.json")
}

fn dirdoc(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dirdoc"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_documents_directory() {
    let temp_dir = tempdir().unwrap();
    let repo = temp_dir.path().join("repo");
    fs::create_dir_all(repo.join("node_modules").join("pkg")).unwrap();
    fs::create_dir_all(repo.join(".git")).unwrap();
    let mut file = File::create(repo.join("a.txt")).unwrap();
    write!(file, "hi").unwrap();
    File::create(repo.join("node_modules").join("pkg").join("index.js")).unwrap();
    File::create(repo.join(".git").join("config")).unwrap();
    File::create(repo.join("logo.png")).unwrap();

    let settings = settings_path();
    let output = dirdoc(
        &[
            "--config",
            settings.to_str().unwrap(),
            "-r",
            "repo",
            "-o",
            "repo/out.txt",
            "--exclude-dir",
            "node_modules",
            "--quiet",
        ],
        temp_dir.path(),
    );
    assert!(output.status.success(), "{:?}", output);

    let artifact = fs::read_to_string(repo.join("out.txt")).unwrap();
    assert!(artifact.starts_with("Repository Documentation\n"));
    assert!(artifact.contains("repo/\n└── a.txt\n"));
    assert!(artifact.contains("[File Begins] a.txt\nhi\n[File Ends] a.txt\n"));
    assert!(!artifact.contains("logo.png"));
    assert!(!artifact.contains("node_modules"));
    assert!(!artifact.contains("out.txt"));
}

#[test]
fn test_ignore_types_none_keeps_every_extension() {
    let temp_dir = tempdir().unwrap();
    File::create(temp_dir.path().join("logo.png")).unwrap();
    let out_dir = tempdir().unwrap();
    let out = out_dir.path().join("out.txt");

    let settings = settings_path();
    let output = dirdoc(
        &[
            "--config",
            settings.to_str().unwrap(),
            "--ignore-types",
            "none",
            "-o",
            out.to_str().unwrap(),
            "-q",
        ],
        temp_dir.path(),
    );
    assert!(output.status.success(), "{:?}", output);

    let artifact = fs::read_to_string(&out).unwrap();
    assert!(artifact.contains("[File Begins] logo.png"));
}

#[test]
fn test_invalid_root_fails_without_artifact() {
    let temp_dir = tempdir().unwrap();
    let settings = settings_path();

    let output = dirdoc(
        &[
            "--config",
            settings.to_str().unwrap(),
            "-r",
            "does-not-exist",
            "-o",
            "out.txt",
        ],
        temp_dir.path(),
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does-not-exist"));
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_missing_settings_is_fatal() {
    let temp_dir = tempdir().unwrap();

    let output = dirdoc(
        &["--config", "missing.json", "-o", "out.txt"],
        temp_dir.path(),
    );

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_malformed_settings_is_fatal() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("config.json"), "{ not json").unwrap();

    let output = dirdoc(&["-o", "out.txt"], temp_dir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config.json"));
    assert!(!temp_dir.path().join("out.txt").exists());
}

#[test]
fn test_generate_completions() {
    let temp_dir = tempdir().unwrap();

    let output = dirdoc(&["--generate", "bash"], temp_dir.path());

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("dirdoc"));
}
