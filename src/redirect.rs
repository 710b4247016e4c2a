//! Input/output redirection for a single pipeline stage.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;

use thiserror::Error;

/// Mode bits for files created by `>`: owner read/write, group and other
/// read.
const CREATE_MODE: u32 = 0o644;

/// Resolved redirections for one stage. `None` means "inherit the
/// caller's stream".
#[derive(Debug, Default)]
pub struct Redirection {
    pub input: Option<File>,
    pub output: Option<File>,
}

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("missing target after `{0}`")]
    MissingTarget(char),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Scan `argv` left to right for the first `<` or `>` token, open its
/// target and strip both the operator and the path from `argv` so the
/// spawned program never sees them.
///
/// Scanning stops at the first operator found, so one call resolves at
/// most one redirection; any later operator tokens stay in `argv` as
/// ordinary arguments. A missing target or a failed open aborts the
/// command instead of handing back an unusable descriptor.
pub fn resolve(argv: &mut Vec<String>) -> Result<Redirection, RedirectError> {
    let mut redir = Redirection::default();
    for i in 0..argv.len() {
        let op = match argv[i].as_str() {
            "<" => '<',
            ">" => '>',
            _ => continue,
        };
        let path = argv
            .get(i + 1)
            .cloned()
            .ok_or(RedirectError::MissingTarget(op))?;
        let file = open_target(op, &path).map_err(|source| RedirectError::Open {
            path: path.clone(),
            source,
        })?;
        match op {
            '<' => redir.input = Some(file),
            _ => redir.output = Some(file),
        }
        argv.drain(i..=i + 1);
        break;
    }
    Ok(redir)
}

fn open_target(op: char, path: &str) -> io::Result<File> {
    match op {
        '<' => File::open(path),
        _ => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(CREATE_MODE)
            .open(path),
    }
}
