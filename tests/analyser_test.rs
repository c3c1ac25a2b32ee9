//! Runs the real process-backed analyser against small shell substitutes.

#![cfg(unix)]

use knowl_docgen::analyser::ProcessAnalyser;
use knowl_docgen::contract::{AnalyseRequest, Analyser, AnalyserError};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, body).expect("write script");
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

fn request(dir: &Path) -> AnalyseRequest {
    AnalyseRequest {
        target_dir: dir.to_path_buf(),
        result_dir: dir.join("knowl_results"),
    }
}

#[tokio::test]
async fn zero_exit_classifies_as_success() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("analyser");
    write_script(&script, "#!/bin/sh\nexit 0\n");

    let analyser = ProcessAnalyser::new(false, script);
    let outcome = analyser.run(request(dir.path())).await.expect("outcome");

    assert!(outcome.success);
    assert_eq!(outcome.exit_code, Some(0));
}

#[tokio::test]
async fn nonzero_exit_carries_the_code() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("analyser");
    write_script(&script, "#!/bin/sh\nexit 2\n");

    let analyser = ProcessAnalyser::new(false, script);
    let outcome = analyser.run(request(dir.path())).await.expect("outcome");

    assert!(!outcome.success);
    assert_eq!(outcome.exit_code, Some(2));
}

#[tokio::test]
async fn positional_arguments_are_target_then_result() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("analyser");
    // Record the argv this substitute was called with.
    write_script(&script, "#!/bin/sh\necho \"$1|$2\" > \"$(dirname \"$0\")/argv\"\n");

    let analyser = ProcessAnalyser::new(false, script);
    let req = request(dir.path());
    analyser.run(req.clone()).await.expect("outcome");

    let argv = std::fs::read_to_string(dir.path().join("argv")).unwrap();
    let expected = format!(
        "{}|{}\n",
        req.target_dir.display(),
        req.result_dir.display()
    );
    assert_eq!(argv, expected);
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    let dir = tempdir().expect("tempdir");
    let analyser = ProcessAnalyser::new(false, dir.path().join("no_such_binary"));

    let err = analyser
        .run(request(dir.path()))
        .await
        .expect_err("spawn must fail");
    assert!(matches!(err, AnalyserError::Spawn(_)));
}

#[tokio::test]
async fn deadline_kills_a_hung_analyser() {
    let dir = tempdir().expect("tempdir");
    let script = dir.path().join("analyser");
    write_script(&script, "#!/bin/sh\nsleep 30\n");

    let analyser =
        ProcessAnalyser::new(false, script).with_deadline(Duration::from_millis(200));

    let err = analyser
        .run(request(dir.path()))
        .await
        .expect_err("deadline must trip");
    assert!(matches!(err, AnalyserError::TimedOut(_)));
}
