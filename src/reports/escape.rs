//! Escaping and layout helpers for report output.
//!
//! Source lines are untrusted text: they may hold markup, control
//! characters or tabs. Everything embedded in HTML goes through
//! [`escape_html`]; everything rendered in columns goes through
//! [`expand_tabs`].

use crate::filter::{COMMENT_END, COMMENT_START};
use unicode_width::UnicodeWidthChar;

/// Escape a string for safe inclusion in HTML content.
///
/// Escapes the following characters:
/// - `&` -> `&amp;`
/// - `<` -> `&lt;`
/// - `>` -> `&gt;`
/// - `"` -> `&quot;`
/// - `'` -> `&#x27;`
///
/// # Examples
///
/// ```
/// use loc_diff::reports::escape::escape_html;
///
/// assert_eq!(escape_html("if (a < b && c > d)"), "if (a &lt; b &amp;&amp; c &gt; d)");
/// assert_eq!(escape_html("safe text"), "safe text");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Turn a file path into a value usable as an HTML `id`.
///
/// Characters outside `[A-Za-z0-9_-]` become `-`.
#[must_use]
pub fn anchor_id(path: &str) -> String {
    let body: String = path
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("file-{body}")
}

/// Replace tabs with spaces up to the next multiple of `tab_width`.
///
/// Columns are counted in display cells, so wide characters take two.
/// Comment markers occupy no columns.
#[must_use]
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    let mut expanded = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_width - column % tab_width;
            expanded.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else if c == COMMENT_START || c == COMMENT_END {
            expanded.push(c);
        } else {
            expanded.push(c);
            column += c.width().unwrap_or(0);
        }
    }
    expanded
}

/// Render one marked source line as HTML.
///
/// Tabs are expanded, text is escaped, and comment markers become
/// `<span class="comment">` elements.
#[must_use]
pub fn render_marked_line(line: &str, tab_width: usize) -> String {
    let escaped = escape_html(&expand_tabs(line, tab_width));
    let mut html = String::with_capacity(escaped.len() + 32);
    for c in escaped.chars() {
        match c {
            COMMENT_START => html.push_str("<span class=\"comment\">"),
            COMMENT_END => html.push_str("</span>"),
            _ => html.push(c),
        }
    }
    html
}
