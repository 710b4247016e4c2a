use std::env as stdenv;
use std::path::PathBuf;

use nix::unistd::{self, Uid};

/// Default prompt template: bold colored `user@host cwd $`, using the
/// same escapes a `PS1` override understands.
pub const DEFAULT_PROMPT: &str =
    "\x1b[1m\x1b[31m\\u\x1b[32m@\x1b[34m\\h \x1b[35m\\w\x1b[0m\x1b[33m $\x1b[0m ";

/// Interpreter-level configuration and mutable session state.
///
/// Everything the engine would otherwise pull out of process environment
/// variables is captured here once at startup and threaded through the
/// interpreter explicitly, so no component re-reads the environment at
/// runtime.
///
/// Note: fields are public for simplicity to keep the crate small.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Name used to prefix diagnostics, conventionally `argv[0]`.
    pub shell_name: String,
    /// Prompt template with `\u`/`\h`/`\w` escapes.
    pub prompt_template: String,
    /// Login name of the invoking user.
    pub user: String,
    /// Hostname shown by the prompt; empty when the lookup fails.
    pub hostname: String,
    /// Home directory of the invoking user.
    pub home: PathBuf,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the process state into a new `Environment`.
    ///
    /// The prompt template comes from `prompt_override`, then `$PS1`,
    /// then [`DEFAULT_PROMPT`]. The user name is `$USER`, `$LOGNAME`, or
    /// the passwd entry for the current uid, in that order.
    pub fn new(shell_name: String, prompt_override: Option<String>) -> Self {
        let prompt_template = prompt_override
            .or_else(|| stdenv::var("PS1").ok())
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        let user = stdenv::var("USER")
            .or_else(|_| stdenv::var("LOGNAME"))
            .ok()
            .or_else(passwd_name)
            .unwrap_or_else(|| "unknown".to_string());
        let hostname = unistd::gethostname()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default();
        let home = dirs::home_dir()
            .or_else(|| stdenv::var_os("HOME").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("/"));
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            shell_name,
            prompt_template,
            user,
            hostname,
            home,
            current_dir,
            should_exit: false,
        }
    }
}

fn passwd_name() -> Option<String> {
    unistd::User::from_uid(Uid::current())
        .ok()
        .flatten()
        .map(|u| u.name)
}
