//! Escaping for user-supplied text, plus the `**bold**` emphasis markup.
//!
//! Rich text is always escaped first and only then scanned for `**` pairs, so
//! the emphasis tags we inject are never escaped and user text can never
//! inject tags of its own.

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escapes `text`, then turns each closed `**...**` pair into `<strong>`.
/// An unmatched `**` or an empty `****` pair stays literal.
pub fn render_rich_text(text: &str) -> String {
    apply_bold(&escape_html(text))
}

fn apply_bold(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len() + 16);
    let mut rest = escaped;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        match after_open.find("**") {
            // `****` is kept as text and scanning carries on after it.
            Some(0) => {
                out.push_str(&rest[..open + 4]);
                rest = &after_open[2..];
            }
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push_str("<strong>");
                out.push_str(&after_open[..close]);
                out.push_str("</strong>");
                rest = &after_open[close + 2..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
