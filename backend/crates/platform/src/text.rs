//! Text sanitization helpers

/// Escape the five HTML-special characters
///
/// `<`, `>`, `&`, `'` and `"` become `&lt;`, `&gt;`, `&amp;`, `&#39;` and
/// `&#34;`. Everything else passes through untouched, so the result is safe
/// to embed both in HTML text and in Telegram's HTML parse mode.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            other => out.push(other),
        }
    }
    out
}
