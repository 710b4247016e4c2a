use std::path::Path;

use anyhow::Result;
use argh::FromArgs;

use psh::Interpreter;
use psh::env::Environment;

#[derive(FromArgs)]
/// An interactive pipeline shell.
struct Args {
    /// prompt template override; defaults to $PS1 or a built-in prompt.
    #[argh(option)]
    prompt: Option<String>,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let shell_name = std::env::args()
        .next()
        .map(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| arg0.clone())
        })
        .unwrap_or_else(|| "psh".to_string());
    let env = Environment::new(shell_name, args.prompt);
    Interpreter::new(env).repl()
}
