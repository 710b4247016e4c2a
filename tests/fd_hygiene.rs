//! The orchestrator must not leak descriptors across a run: the number
//! of open descriptors after a pipeline completes equals the number
//! before it started.
//!
//! This lives in its own test binary so that no sibling test opens or
//! closes files while the counts are taken.

#![cfg(target_os = "linux")]

use std::fs;
use std::os::fd::AsFd;
use std::path::PathBuf;

use psh::exec::run_pipeline;
use psh::parser::Pipeline;

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

fn open_fds() -> usize {
    fs::read_dir("/proc/self/fd").expect("read fd dir").count()
}

#[test]
fn descriptor_count_is_stable_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = fs::File::create(dir.path().join("out")).expect("capture file");
    let stdin = std::io::stdin();

    // one warm-up run so any lazily created descriptors exist before the
    // baseline is taken
    let warm = Pipeline::parse("echo warm | cat", &home()).expect("parse");
    run_pipeline(warm, stdin.as_fd(), out.as_fd(), "psh").expect("warm-up run");

    let before = open_fds();
    for _ in 0..3 {
        let p = Pipeline::parse("echo hello | tr h H | cat", &home()).expect("parse");
        run_pipeline(p, stdin.as_fd(), out.as_fd(), "psh").expect("run");
    }
    assert_eq!(open_fds(), before);

    let redirected = format!(
        "echo hi > {} | cat",
        dir.path().join("ignored.txt").display()
    );
    let p = Pipeline::parse(&redirected, &home()).expect("parse");
    run_pipeline(p, stdin.as_fd(), out.as_fd(), "psh").expect("run");
    assert_eq!(open_fds(), before);
}
