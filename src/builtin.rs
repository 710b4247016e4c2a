//! Commands the interpreter handles in-process instead of spawning.
//!
//! Builtins are parsed with [`argh`] (`FromArgs`) just like the
//! interpreter's own startup flags; a usage error prints argh's output
//! and still counts as a handled command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};

use crate::env::Environment;
use crate::signals;

/// Conventional process exit code type: 0 indicates success.
pub type ExitCode = i32;

/// A command executed directly against interpreter state.
trait BuiltinCommand: FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Execute the command. Shell conventions apply to the returned
    /// code: 0 for success, non-zero for failure.
    fn execute(self, env: &mut Environment) -> Result<ExitCode>;
}

/// Try to handle `argv` as a builtin. Returns `None` when the first word
/// names no builtin, so the caller can run it as an external pipeline
/// instead.
pub fn dispatch(argv: &[String], env: &mut Environment) -> Option<ExitCode> {
    if argv.is_empty() {
        return None;
    }
    try_run::<Exit>(argv, env)
        .or_else(|| try_run::<Cd>(argv, env))
        .or_else(|| try_run::<Alarm>(argv, env))
}

fn try_run<T: BuiltinCommand>(argv: &[String], env: &mut Environment) -> Option<ExitCode> {
    if argv[0] != T::name() {
        return None;
    }
    let args: Vec<&str> = argv[1..].iter().map(String::as_str).collect();
    Some(match T::from_args(&[T::name()], &args) {
        Ok(cmd) => match cmd.execute(env) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}: {}: {e}", env.shell_name, T::name());
                1
            }
        },
        Err(EarlyExit { output, status }) => {
            if status.is_err() {
                eprintln!("{output}");
                1
            } else {
                println!("{output}");
                0
            }
        }
    })
}

#[derive(FromArgs)]
/// Leave the shell.
struct Exit {
    #[argh(positional, greedy)]
    /// ignored; stage exit codes are not propagated.
    _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
struct Cd {
    #[argh(positional)]
    /// directory to switch to; defaults to the home directory when
    /// omitted.
    target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<ExitCode> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => env.home.clone(),
        };
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };
        let canonical = fs::canonicalize(&new_dir)
            .with_context(|| format!("{}: no such directory", new_dir.display()))?;
        std::env::set_current_dir(&canonical)
            .with_context(|| format!("cannot chdir to {}", canonical.display()))?;
        env.current_dir = canonical;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Arm a shell-terminating alarm, or disarm a pending one with 0.
struct Alarm {
    #[argh(positional)]
    /// seconds until the alarm fires; 0 cancels a pending alarm.
    seconds: u32,
}

impl BuiltinCommand for Alarm {
    fn name() -> &'static str {
        "alarm"
    }

    fn execute(self, _env: &mut Environment) -> Result<ExitCode> {
        if self.seconds == 0 {
            println!("Alarm off!");
        } else {
            println!("Alarm set! {} secs", self.seconds);
        }
        signals::arm_alarm(self.seconds);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env() -> Environment {
        Environment::new("psh".to_string(), None)
    }

    #[test]
    fn unknown_names_are_not_builtins() {
        let mut env = test_env();
        let argv = vec!["ls".to_string()];
        assert!(dispatch(&argv, &mut env).is_none());
    }

    #[test]
    fn exit_flags_the_loop() {
        let mut env = test_env();
        let argv = vec!["exit".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(0));
        assert!(env.should_exit);
    }

    #[test]
    fn exit_ignores_trailing_arguments() {
        let mut env = test_env();
        let argv = vec!["exit".to_string(), "now".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(0));
        assert!(env.should_exit);
    }

    #[test]
    fn cd_changes_the_tracked_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut env = test_env();
        let argv = vec!["cd".to_string(), dir.path().display().to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(0));
        assert_eq!(env.current_dir, fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn cd_without_a_target_goes_home() {
        let mut env = test_env();
        let argv = vec!["cd".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(0));
        assert_eq!(env.current_dir, fs::canonicalize(&env.home).unwrap());
    }

    #[test]
    fn cd_to_a_bad_path_reports_and_keeps_cwd() {
        let mut env = test_env();
        let before = env.current_dir.clone();
        let argv = vec!["cd".to_string(), "/definitely/not/here".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(1));
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn alarm_zero_disarms_without_error() {
        let mut env = test_env();
        let argv = vec!["alarm".to_string(), "0".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(0));
    }

    #[test]
    fn alarm_rejects_a_non_numeric_argument() {
        let mut env = test_env();
        let argv = vec!["alarm".to_string(), "soon".to_string()];
        assert_eq!(dispatch(&argv, &mut env), Some(1));
    }
}
