//! Splitting command text into words.

/// Delimiters that separate words within one pipeline stage.
pub const WHITESPACE: &[char] = &[' ', '\t', '\n'];

/// Split `input` into non-empty tokens on any character in `delimiters`.
///
/// Runs of consecutive delimiters count as a single separator, so the
/// result never contains empty tokens. The output grows as needed; there
/// is no cap on how many tokens one command may carry.
pub fn split_tokens<'a>(input: &'a str, delimiters: &[char]) -> Vec<&'a str> {
    input
        .split(|c: char| delimiters.contains(&c))
        .filter(|token| !token.is_empty())
        .collect()
}
