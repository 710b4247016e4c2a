//! Driving the shell binary the way a user would, one line at a time on
//! standard input.

use std::io::Write as _;
use std::process::{Command, Stdio};

fn run_script(script: &str) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_psh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // keep prompt noise predictable
        .env("PS1", "$ ")
        .spawn()
        .expect("spawn shell");
    child
        .stdin
        .as_mut()
        .expect("child stdin")
        .write_all(script.as_bytes())
        .expect("write script");
    let out = child.wait_with_output().expect("wait for shell");
    (
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

#[test]
fn pipeline_output_reaches_stdout() {
    let (out, _err) = run_script("echo hello | tr h H\nexit\n");
    assert!(out.contains("Hello"), "stdout was: {out:?}");
}

#[test]
fn unknown_command_is_diagnosed_and_the_shell_survives() {
    let (out, err) = run_script("definitely-not-a-command-123\necho still-here\nexit\n");
    assert!(err.contains("command not found"), "stderr was: {err:?}");
    assert!(out.contains("still-here"), "stdout was: {out:?}");
}

#[test]
fn redirection_round_trips_through_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.txt");
    let script = format!("echo hi > {p}\ncat < {p}\nexit\n", p = path.display());
    let (out, _err) = run_script(&script);
    assert_eq!(std::fs::read_to_string(&path).expect("file"), "hi\n");
    assert!(out.contains("hi"), "stdout was: {out:?}");
}

#[test]
fn semicolons_separate_top_level_commands() {
    let (out, _err) = run_script("echo one; echo two\nexit\n");
    assert!(out.contains("one"), "stdout was: {out:?}");
    assert!(out.contains("two"), "stdout was: {out:?}");
}

#[test]
fn malformed_pipelines_are_reported_not_fatal() {
    let (out, err) = run_script("echo a | | cat\necho alive\nexit\n");
    assert!(err.contains("empty stage"), "stderr was: {err:?}");
    assert!(out.contains("alive"), "stdout was: {out:?}");
}

#[test]
fn cd_to_a_bad_path_keeps_the_shell_alive() {
    let (out, err) = run_script("cd /definitely/not/here\necho alive\nexit\n");
    assert!(err.contains("cd"), "stderr was: {err:?}");
    assert!(out.contains("alive"), "stdout was: {out:?}");
}
