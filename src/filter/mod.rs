//! Language filters: what counts as a line of code, and where comments are.
//!
//! A [`LanguageFilter`] answers three questions about a file:
//! - does it apply to a given file name
//! - where are the comments in its text
//! - is a given line (with comments removed) significant for counting
//!
//! Filters are collected in a [`FilterRegistry`] that is built once at
//! startup and shared read-only afterwards.

mod cobol;
mod generic;
mod registry;
mod syntax;

pub use cobol::CobolFilter;
pub use generic::GenericFilter;
pub use registry::FilterRegistry;
pub use syntax::{
    CommentSyntax, FilterDefinition, IgnoreLineRule, IgnoreMatch, StringSyntax, SyntaxFilter,
};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Marker character inserted before comment text by [`mark_comments`].
pub const COMMENT_START: char = '\u{2}';
/// Marker character inserted after comment text by [`mark_comments`].
pub const COMMENT_END: char = '\u{3}';

/// Per-request switches consulted by filters when deciding significance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Count `END-xxx` scope terminators as code
    pub count_end: bool,
    /// Count `EXIT` statements as code
    pub count_exit: bool,
    /// Count lines holding a lone period as code
    pub count_solitary_period: bool,
    /// Free-form option names, compared case-insensitively
    pub extra: Vec<String>,
}

impl FilterOptions {
    /// Whether a free-form option was given.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let name = name.trim_start_matches(['-', '+']);
        self.extra
            .iter()
            .any(|opt| opt.trim_start_matches(['-', '+']).eq_ignore_ascii_case(name))
    }
}

/// Capability shared by every language filter.
pub trait LanguageFilter: Send + Sync + fmt::Debug {
    /// Unique, case-insensitive name used by `-lang=`.
    fn name(&self) -> &str;

    /// File name endings this filter accepts (e.g. `.c`, `Makefile`).
    fn file_endings(&self) -> &[String];

    /// Whether this filter applies to a file name.
    fn file_name_matches(&self, file_name: &str) -> bool {
        ends_with_any(file_name, self.file_endings())
    }

    /// Whether the first line of a file identifies this language.
    fn first_line_matches(&self, _first_line: &str) -> bool {
        false
    }

    /// Byte ranges of comment text within a whole decoded file.
    ///
    /// Ranges are ordered, disjoint and never include a trailing newline.
    fn comment_spans(&self, _text: &str) -> Vec<Range<usize>> {
        Vec::new()
    }

    /// The first comment span within a single line, if any.
    fn comment_span_of(&self, line: &str) -> Option<Range<usize>> {
        self.comment_spans(line).into_iter().next()
    }

    /// The part of a line that takes part in comparison and counting.
    ///
    /// Column-oriented languages drop their sequence areas here. The input
    /// has comment characters already blanked out, so columns line up with
    /// the raw text.
    fn comparison_text<'l>(&self, line: &'l str) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }

    /// Whether a line of code (comments removed) counts toward totals.
    fn is_significant(&self, code: &str, _options: &FilterOptions) -> bool {
        !code.trim().is_empty()
    }
}

/// Case-insensitive suffix match against a list of endings.
pub(crate) fn ends_with_any(file_name: &str, endings: &[String]) -> bool {
    let lower = file_name.to_ascii_lowercase();
    endings
        .iter()
        .any(|ending| lower.ends_with(&ending.to_ascii_lowercase()))
}

/// Insert [`COMMENT_START`]/[`COMMENT_END`] around each span of `text`.
///
/// Spans must be ordered, disjoint and on character boundaries.
#[must_use]
pub fn mark_comments(text: &str, spans: &[Range<usize>]) -> String {
    let mut marked = String::with_capacity(text.len() + spans.len() * 2);
    let mut pos = 0;
    for span in spans {
        marked.push_str(&text[pos..span.start]);
        marked.push(COMMENT_START);
        marked.push_str(&text[span.start..span.end]);
        marked.push(COMMENT_END);
        pos = span.end;
    }
    marked.push_str(&text[pos..]);
    marked
}
