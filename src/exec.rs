//! Process orchestration: spawning a pipeline's stages and wiring the
//! pipes between them.
//!
//! The orchestrator owns every descriptor it creates. Pipe ends and
//! redirection files live in [`OwnedFd`]/[`File`] handles, so each one
//! closes exactly once on every path out of [`run_pipeline`], including
//! the error paths.

use std::ffi::CString;
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::process;

use anyhow::{Result, anyhow};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::libc;
use nix::sys::wait::waitpid;
use nix::unistd::{self, ForkResult, Pid};

use crate::parser::Pipeline;
use crate::redirect;

/// Where a stage's standard input or output comes from: the caller's
/// stream, borrowed, or a pipe end / redirection file that closes when
/// the handle drops.
enum Handle {
    Inherit(RawFd),
    Owned(OwnedFd),
}

impl Handle {
    fn raw(&self) -> RawFd {
        match self {
            Handle::Inherit(fd) => *fd,
            Handle::Owned(fd) => fd.as_raw_fd(),
        }
    }
}

/// Execute every stage of `pipeline` as a separate process, connected in
/// order by pipes, and return once all of them have terminated.
///
/// Redirections are honored on the first stage (input side) and the last
/// stage (output side) only; `<`/`>` on interior stages are stripped but
/// have no effect, matching the interpreter's historical behavior. Stage
/// exit statuses are not inspected: a stage that exits non-zero neither
/// aborts its siblings nor surfaces as an error here.
pub fn run_pipeline(
    mut pipeline: Pipeline,
    input: BorrowedFd<'_>,
    output: BorrowedFd<'_>,
    shell_name: &str,
) -> Result<()> {
    let n = pipeline.stages.len();
    if n == 0 {
        return Ok(());
    }
    let mut children: Vec<Pid> = Vec::with_capacity(n);

    // Stage 0 decides the pipeline's input; for a single-stage pipeline
    // the same resolution also supplies the output.
    let mut redir = redirect::resolve(&mut pipeline.stages[0].argv)?;
    let mut src = match redir.input.take() {
        Some(file) => Handle::Owned(OwnedFd::from(file)),
        None => Handle::Inherit(input.as_raw_fd()),
    };

    let mut failed: Option<anyhow::Error> = None;

    for i in 0..n - 1 {
        let (read_end, write_end) = match unistd::pipe2(OFlag::O_CLOEXEC) {
            Ok(ends) => ends,
            Err(e) => {
                failed = Some(anyhow!("failed to create pipe: {e}"));
                break;
            }
        };
        match spawn_stage(
            &pipeline.stages[i].argv,
            src.raw(),
            write_end.as_raw_fd(),
            shell_name,
        ) {
            Ok(pid) => children.push(pid),
            Err(e) => eprintln!("{shell_name}: {e}"),
        }
        // The orchestrator's copy of the write end must close as soon as
        // the stage holds its own: downstream stages only see EOF once
        // every write end is gone.
        drop(write_end);
        src = Handle::Owned(read_end);
    }

    if failed.is_none() && n > 1 {
        match redirect::resolve(&mut pipeline.stages[n - 1].argv) {
            Ok(r) => redir = r,
            Err(e) => failed = Some(e.into()),
        }
    }
    if failed.is_none() {
        let sink = match redir.output.take() {
            Some(file) => Handle::Owned(OwnedFd::from(file)),
            None => Handle::Inherit(output.as_raw_fd()),
        };
        match spawn_stage(&pipeline.stages[n - 1].argv, src.raw(), sink.raw(), shell_name) {
            Ok(pid) => children.push(pid),
            Err(e) => eprintln!("{shell_name}: {e}"),
        }
    }
    // Closes the last pipe's read end; when the final stage never
    // started this is what lets its upstream writer terminate.
    drop(src);

    // Every stage actually spawned is waited on before returning, even
    // when a later stage failed to start.
    for pid in children {
        wait_retry(pid);
    }
    match failed {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Fork one stage. The parent returns the child's pid immediately; the
/// child wires its standard streams, closes the now-redundant originals
/// and replaces itself with the target program. The child never returns
/// to interpreter logic: on any failure it reports to stderr and exits
/// non-zero.
fn spawn_stage(argv: &[String], input: RawFd, output: RawFd, shell_name: &str) -> Result<Pid> {
    debug_assert!(!argv.is_empty());
    match unsafe { unistd::fork() }.map_err(|e| anyhow!("failed to fork: {e}"))? {
        ForkResult::Parent { child } => Ok(child),
        ForkResult::Child => {
            let errno = exec_stage(argv, input, output);
            match errno {
                Errno::ENOENT => eprintln!("{shell_name}: {}: command not found", argv[0]),
                other => eprintln!("{shell_name}: {}: {other}", argv[0]),
            }
            process::exit(1);
        }
    }
}

/// Runs in the forked child. Only ever returns an error: on success
/// `execvp` has replaced the process image.
fn exec_stage(argv: &[String], input: RawFd, output: RawFd) -> Errno {
    if input != libc::STDIN_FILENO {
        if let Err(e) = unistd::dup2(input, libc::STDIN_FILENO) {
            return e;
        }
        let _ = unistd::close(input);
    }
    if output != libc::STDOUT_FILENO {
        if let Err(e) = unistd::dup2(output, libc::STDOUT_FILENO) {
            return e;
        }
        let _ = unistd::close(output);
    }
    let args = match argv
        .iter()
        .map(|a| CString::new(a.as_str()))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(args) => args,
        Err(_) => return Errno::EINVAL,
    };
    match unistd::execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(e) => e,
    }
}

/// Wait for one specific child, retrying when a signal interrupts the
/// wait. The exit status itself is deliberately ignored.
pub(crate) fn wait_retry(pid: Pid) {
    loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => continue,
            _ => return,
        }
    }
}
