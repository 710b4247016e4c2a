//! The interactive read-eval loop.

use std::os::fd::AsFd;
use std::process;

use anyhow::Result;
use nix::unistd::{self, ForkResult};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::builtin::{self, ExitCode};
use crate::env::Environment;
use crate::exec;
use crate::lexer;
use crate::parser::Pipeline;
use crate::prompt;
use crate::signals::SignalGate;

/// Printed when an interrupt arrives instead of letting it kill the
/// shell.
const INTERRUPT_NOTE: &str = "interrupted (use \"exit\" or Ctrl-D to leave)";

/// A line-oriented command interpreter.
///
/// Each line read from the user splits on `;` into top-level commands.
/// A command is either a builtin, handled in-process, or a pipeline of
/// external programs executed by [`exec::run_pipeline`] inside a forked
/// child of the loop.
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// Read and execute lines until `exit` or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let gate = SignalGate::install()?;
        let mut rl = DefaultEditor::new()?;
        while !self.env.should_exit {
            match rl.readline(&prompt::render(&self.env)) {
                Ok(line) => {
                    for command in line.split(';') {
                        self.execute(command);
                        if self.env.should_exit {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{INTERRUPT_NOTE}");
                }
                Err(ReadlineError::Eof) => {
                    println!("\nexit");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
            if gate.take_interrupt() {
                // delivered outside line editing, e.g. while a pipeline
                // was running; the next readline shows a fresh prompt
                println!("{INTERRUPT_NOTE}");
            }
        }
        Ok(())
    }

    /// Run one semicolon-delimited command.
    ///
    /// Builtins run in-process. Anything else executes in a forked child
    /// so that glob expansion, redirection descriptors and any state the
    /// pipeline touches cannot outlive the command; the loop waits for
    /// that specific child and deliberately ignores its status, since
    /// stage failures already reported themselves on stderr.
    pub fn execute(&mut self, command: &str) {
        let words: Vec<String> = lexer::split_tokens(command, lexer::WHITESPACE)
            .into_iter()
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return;
        }
        if builtin::dispatch(&words, &mut self.env).is_some() {
            return;
        }
        match unsafe { unistd::fork() } {
            Ok(ForkResult::Child) => {
                let code = self.run_pipeline_command(command);
                process::exit(code);
            }
            Ok(ForkResult::Parent { child }) => exec::wait_retry(child),
            Err(e) => eprintln!("{}: failed to fork: {e}", self.env.shell_name),
        }
    }

    /// Runs in the forked child: build the pipeline (glob expansion sees
    /// the child's working directory) and drive it to completion.
    fn run_pipeline_command(&self, command: &str) -> ExitCode {
        let pipeline = match Pipeline::parse(command, &self.env.home) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{}: {e}", self.env.shell_name);
                return 1;
            }
        };
        if pipeline.is_empty() {
            return 0;
        }
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        match exec::run_pipeline(pipeline, stdin.as_fd(), stdout.as_fd(), &self.env.shell_name) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}: {e}", self.env.shell_name);
                1
            }
        }
    }
}
