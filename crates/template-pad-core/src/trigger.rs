//! Detection of an open `{{` sequence in front of the caret.

/// Opening delimiter of a template variable.
pub const OPEN: &str = "{{";
/// Closing delimiter of a template variable.
pub const CLOSE: &str = "}}";

/// An unterminated `{{` before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Char offset of the `{{`.
    pub offset: usize,
    /// Text typed between the `{{` and the caret.
    pub query: String,
}

/// Looks for an open trigger ending at `caret` (a char offset, clamped to
/// the content length).
///
/// Only the last `{{` before the caret counts. If a `}}` follows it inside
/// the prefix, that pair is already closed and there is no trigger.
pub fn detect(content: &str, caret: usize) -> Option<Trigger> {
    let prefix = char_prefix(content, caret);
    let open_byte = prefix.rfind(OPEN)?;
    let after = &prefix[open_byte + OPEN.len()..];
    if after.contains(CLOSE) {
        return None;
    }
    Some(Trigger {
        offset: prefix[..open_byte].chars().count(),
        query: after.to_string(),
    })
}

/// Returns true when typing `typed` at `caret` should close an active
/// session early: a `}` typed right after another `}` is taken as a
/// deliberate close.
pub fn closes_session(content: &str, caret: usize, typed: char) -> bool {
    typed == '}' && char_prefix(content, caret).ends_with('}')
}

/// The first `chars` characters of `content`.
fn char_prefix(content: &str, chars: usize) -> &str {
    match content.char_indices().nth(chars) {
        Some((byte, _)) => &content[..byte],
        None => content,
    }
}
