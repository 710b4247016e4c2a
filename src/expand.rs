//! Filename pattern expansion for stage arguments.

use std::path::Path;

use glob::glob;

/// Expand every token of one command, concatenating all matches into a
/// single flattened argument list in token order.
pub fn expand_all<S: AsRef<str>>(tokens: &[S], home: &Path) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        out.extend(expand_token(token.as_ref(), home));
    }
    out
}

/// Expand a single token against the filesystem.
///
/// A leading `~` becomes the invoking user's home directory before any
/// matching happens. A token with no pattern characters passes through
/// untouched. A pattern that matches nothing (or cannot be walked at
/// all) is kept as a literal argument instead of vanishing.
fn expand_token(token: &str, home: &Path) -> Vec<String> {
    let expanded = expand_tilde(token, home);
    if !has_pattern(&expanded) {
        return vec![expanded];
    }
    match glob(&expanded) {
        // glob yields matches in sorted order; unreadable entries are
        // skipped rather than failing the whole token
        Ok(paths) => {
            let matches: Vec<String> = paths
                .filter_map(|p| p.ok())
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            if matches.is_empty() {
                vec![expanded]
            } else {
                matches
            }
        }
        Err(_) => vec![expanded],
    }
}

fn has_pattern(token: &str) -> bool {
    token.contains('*') || token.contains('?') || token.contains('[')
}

/// `~` and `~/path` refer to the invoking user's home directory; other
/// uses of `~` (including `~name`) are left alone.
fn expand_tilde(token: &str, home: &Path) -> String {
    if token == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = token.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        token.to_string()
    }
}
