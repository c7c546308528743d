//! COBOL-style filter for column-oriented sources.
//!
//! Fixed-format lines carry a six-column sequence area, an indicator column
//! and an identification area past column 72. The sequence and identification
//! areas are never compared, a `*` or `/` indicator makes the whole line a
//! comment, and `*>` starts an inline comment.

use super::{FilterOptions, LanguageFilter};
use std::borrow::Cow;
use std::ops::Range;

const SEQUENCE_COLUMNS: usize = 6;
const LAST_CODE_COLUMN: usize = 72;

/// Filter for COBOL and copybooks.
#[derive(Debug)]
pub struct CobolFilter {
    endings: Vec<String>,
}

impl CobolFilter {
    pub const NAME: &'static str = "cobol";

    #[must_use]
    pub fn new() -> Self {
        Self {
            endings: [".cbl", ".cob", ".cpy", ".cobol"]
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }
}

impl Default for CobolFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether columns 1 to 6 hold only digits and blanks and an indicator
/// column follows.
fn has_fixed_margin(line: &str) -> bool {
    let mut chars = line.chars();
    let area: Vec<char> = chars.by_ref().take(SEQUENCE_COLUMNS).collect();
    area.len() == SEQUENCE_COLUMNS
        && chars.next().is_some()
        && area.iter().all(|c| c.is_ascii_digit() || *c == ' ')
}

/// Whether a line carries sequence numbers that must not be compared.
fn has_sequence_area(line: &str) -> bool {
    has_fixed_margin(line) && line.chars().take(SEQUENCE_COLUMNS).any(|c| c.is_ascii_digit())
}

/// Byte offset of the character at `column` (0-based), or the line length.
fn byte_offset_of_column(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(offset, _)| offset)
}

/// Find an inline `*>` comment outside of string literals.
fn inline_comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut iter = line.char_indices().peekable();
    while let Some((offset, c)) = iter.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '*' && iter.peek().is_some_and(|(_, next)| *next == '>') => {
                return Some(offset);
            }
            None => {}
        }
    }
    None
}

fn line_comment(line: &str) -> Option<Range<usize>> {
    if has_fixed_margin(line) {
        let indicator = line.chars().nth(SEQUENCE_COLUMNS);
        if matches!(indicator, Some('*' | '/')) {
            let start = byte_offset_of_column(line, SEQUENCE_COLUMNS);
            return Some(start..line.len());
        }
    }
    inline_comment_start(line).map(|start| start..line.len())
}

impl LanguageFilter for CobolFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn file_endings(&self) -> &[String] {
        &self.endings
    }

    fn first_line_matches(&self, first_line: &str) -> bool {
        let upper = first_line.to_ascii_uppercase();
        upper.contains("IDENTIFICATION DIVISION") || upper.contains("CBL ")
    }

    fn comment_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut line_start = 0;
        for line in text.split('\n') {
            if let Some(span) = line_comment(line.trim_end_matches('\r')) {
                spans.push(line_start + span.start..line_start + span.end);
            }
            line_start += line.len() + 1;
        }
        spans
    }

    fn comparison_text<'l>(&self, line: &'l str) -> Cow<'l, str> {
        if !has_sequence_area(line) {
            return Cow::Borrowed(line);
        }
        // Skip the indicator column too; a blank or `-` there is not code.
        let start = byte_offset_of_column(line, SEQUENCE_COLUMNS + 1);
        let end = byte_offset_of_column(line, LAST_CODE_COLUMN);
        Cow::Borrowed(&line[start..end.max(start)])
    }

    fn is_significant(&self, code: &str, options: &FilterOptions) -> bool {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed == "." {
            return options.count_solitary_period;
        }
        let upper = trimmed.to_ascii_uppercase();
        if upper.starts_with("END-") {
            return options.count_end;
        }
        let exit_word = upper
            .strip_prefix("EXIT")
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '.']));
        if exit_word {
            return options.count_exit;
        }
        true
    }
}
