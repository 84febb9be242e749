//! Line-level cleanup applied to every extracted element.

use std::sync::LazyLock;

use regex::Regex;

/// Stock lead-ins a backend prepends to its output: `Here are the hashtags:`,
/// `Summary:`, `Tweet 2/3:`, `Key takeaway -`, ...
static META_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:here\s+(?:is|are)\b[^:\n]*:|(?:summary|tweet|(?:key\s+)?takeaways?|hashtags?)\b(?:[ \t]*\d+(?:/\d+)?)?[ \t]*[:\-]?)",
    )
    .unwrap()
});

/// Bullets and list numbering: `- `, `* `, `• `, `1. `, `2) `, `1/ `, `1/3 `
static LIST_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*•+‣▪]|\d+[.)]|\d+/\d*)\s+").unwrap());

fn is_enclosing(c: char) -> bool {
    c == '"' || c == '\'' || c.is_whitespace()
}

/// Strips a leading boilerplate meta-phrase and any enclosing quotes or whitespace.
///
/// Both steps are repeated until neither changes the text, so the result is a
/// fixed point: `clean(&clean(s)) == clean(s)` for every `s`.
pub fn clean(line: &str) -> String {
    let mut current = line;
    loop {
        let stripped = META_PHRASE_RE
            .find(current)
            .map_or(current, |m| &current[m.end()..]);
        let trimmed = stripped.trim_matches(is_enclosing);

        // `trimmed` is a subslice of `current`
        if trimmed.len() == current.len() {
            return current.to_string();
        }
        current = trimmed;
    }
}

/// Removes list markers and bold emphasis from a single line.
pub fn strip_decoration(line: &str) -> String {
    let line = LIST_MARKER_RE.replace(line, "");
    line.replace("**", "")
        .trim_matches(|c: char| matches!(c, '-' | '*' | '•') || c.is_whitespace())
        .to_string()
}
