//! Whitespace cleanup for serializer output.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize line endings and blank lines of generated markdown.
pub fn normalize_markdown(markdown: &str) -> String {
    let unified = markdown
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{a0}', " ");
    let stripped = TRAILING_SPACE.replace_all(&unified, "\n");
    let collapsed = EXTRA_NEWLINES.replace_all(&stripped, "\n\n");
    collapsed.trim().to_string()
}
