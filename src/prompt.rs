//! Prompt template rendering.
//!
//! Templates use a tiny escape language: `\u` is the user name, `\h` the
//! hostname and `\w` the working directory with the home prefix
//! shortened to `~`. Everything else, ANSI sequences included, is copied
//! through verbatim.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::env::Environment;

fn escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\([uhw])").expect("escape pattern is valid"))
}

/// Render the environment's prompt template into the string shown before
/// each line of input.
pub fn render(env: &Environment) -> String {
    let cwd = display_dir(env);
    escape_re()
        .replace_all(&env.prompt_template, |caps: &Captures| match &caps[1] {
            "u" => env.user.clone(),
            "h" => env.hostname.clone(),
            _ => cwd.clone(),
        })
        .into_owned()
}

/// Working directory with the home prefix abbreviated to `~`.
fn display_dir(env: &Environment) -> String {
    match env.current_dir.strip_prefix(&env.home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => env.current_dir.display().to_string(),
    }
}
