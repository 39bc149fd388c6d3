//! Inline text helpers: emphasis markers and length-capped excerpts.

use std::borrow::Cow;

/// Suffix appended to text cut by [`truncate_chars`].
const ELLIPSIS: &str = "...";

/// Wrap text in `**bold**` markers.
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

/// Wrap text in `_italic_` markers.
pub fn italic(text: &str) -> String {
    format!("_{text}_")
}

/// Keep the first `max_chars` characters of `text`, appending `...`
/// only when something was cut.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
