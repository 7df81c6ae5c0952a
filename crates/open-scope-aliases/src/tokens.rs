//! Whitespace tokenization of command text.

/// Split text into whitespace-delimited tokens, dropping empty entries.
///
/// Quoting is not interpreted; quote characters stay inside their tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Join tokens back into a single line with single-space separators.
pub fn join(tokens: &[String]) -> String {
    tokens.join(" ")
}
