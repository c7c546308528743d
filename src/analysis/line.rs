//! Lines and versions: the tokenized form of a file revision.

use crate::filter::{mark_comments, FilterOptions, LanguageFilter};
use std::ops::Range;

/// One line of a version, with its comparison data precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number within its version
    pub number: usize,
    text: String,
    key: String,
    display_key: String,
    significant: bool,
    comment_spans: Vec<Range<usize>>,
}

impl Line {
    /// Build a line, deriving its keys with `filter`.
    ///
    /// `comment_spans` are byte ranges within `text`.
    #[must_use]
    pub fn new(
        number: usize,
        text: &str,
        comment_spans: Vec<Range<usize>>,
        filter: &dyn LanguageFilter,
        options: &FilterOptions,
    ) -> Self {
        let code = blank_comments(text, &comment_spans);
        let code_view = filter.comparison_text(&code);
        let key = collapse_whitespace(&code_view);
        let significant = filter.is_significant(&code_view, options);
        let display_key = collapse_whitespace(&filter.comparison_text(text));

        Self {
            number,
            text: text.to_string(),
            key,
            display_key,
            significant,
            comment_spans,
        }
    }

    /// Raw text without the line terminator.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-normalized text with comments removed. Lines with equal
    /// keys are the same line for diffing.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whitespace-normalized text with comments kept.
    #[must_use]
    pub fn display_key(&self) -> &str {
        &self.display_key
    }

    #[must_use]
    pub const fn is_significant(&self) -> bool {
        self.significant
    }

    #[must_use]
    pub fn comment_spans(&self) -> &[Range<usize>] {
        &self.comment_spans
    }

    /// Text with comment markers inserted.
    #[must_use]
    pub fn marked_text(&self) -> String {
        mark_comments(&self.text, &self.comment_spans)
    }
}

/// One revision of a file, as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    label: String,
    lines: Vec<Line>,
    exists: bool,
}

impl Version {
    /// Split decoded text into lines using `filter`.
    ///
    /// A trailing newline does not start an extra empty line.
    #[must_use]
    pub fn tokenize(
        label: impl Into<String>,
        text: &str,
        filter: &dyn LanguageFilter,
        options: &FilterOptions,
    ) -> Self {
        let spans = filter.comment_spans(text);
        let mut next_span = 0;
        let mut lines = Vec::new();
        let mut line_start = 0;

        for (index, raw) in text.split_terminator('\n').enumerate() {
            let line_end = line_start + raw.len();
            while next_span < spans.len() && spans[next_span].end <= line_start {
                next_span += 1;
            }
            let local_spans: Vec<Range<usize>> = spans[next_span..]
                .iter()
                .take_while(|span| span.start < line_end)
                .map(|span| span.start.max(line_start) - line_start..span.end.min(line_end) - line_start)
                .filter(|span| !span.is_empty())
                .collect();

            lines.push(Line::new(index + 1, raw, local_spans, filter, options));
            line_start = line_end + 1;
        }

        Self {
            label: label.into(),
            lines,
            exists: true,
        }
    }

    /// A version that has no lines because the file is absent from it.
    #[must_use]
    pub fn absent(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lines: Vec::new(),
            exists: false,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// False for the stand-in used when a file is missing from a version.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    #[must_use]
    pub fn significant_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.is_significant()).count()
    }
}

/// Replace comment characters with spaces, keeping column positions.
fn blank_comments(text: &str, spans: &[Range<usize>]) -> String {
    if spans.is_empty() {
        return text.to_string();
    }
    text.char_indices()
        .map(|(offset, c)| {
            if spans.iter().any(|span| span.contains(&offset)) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
