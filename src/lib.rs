//! A small interactive shell built around real process pipelines.
//!
//! This crate provides the pieces of a line-oriented command
//! interpreter: tokenizing command text, expanding filename patterns,
//! resolving `<`/`>` redirections, and executing `|`-connected stages as
//! separate OS processes wired together with pipes. It is intentionally
//! small and easy to read, suitable for experiments with process
//! management and file-descriptor plumbing.
//!
//! The interactive loop lives in [`Interpreter`]; the execution engine
//! is usable on its own through [`parser::Pipeline`] and
//! [`exec::run_pipeline`].

mod builtin;
pub mod env;
pub mod exec;
mod expand;
mod interpreter;
mod lexer;
pub mod parser;
mod prompt;
mod redirect;
mod signals;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
