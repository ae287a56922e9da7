use std::borrow::Cow;

/// Escapes text for HTML output. Quotes are only escaped inside attribute
/// values.
pub(crate) fn escape(value: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = value
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>') || (quotes && c == '"'));
    if !needs_escape {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
