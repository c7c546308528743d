//! Table-driven filter for languages described by their comment and string syntax.
//!
//! A [`FilterDefinition`] is plain data (it can live in a YAML file); a
//! [`SyntaxFilter`] is the compiled, ready-to-use form.

use super::{FilterOptions, LanguageFilter};
use crate::error::{FilterErrorKind, LocDiffError, Result};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A comment delimiter pair. A missing `end` means "to end of line".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommentSyntax {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl CommentSyntax {
    #[must_use]
    pub fn line(start: &str) -> Self {
        Self {
            start: start.to_string(),
            end: None,
        }
    }

    #[must_use]
    pub fn block(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: Some(end.to_string()),
        }
    }
}

/// A string literal syntax. Comment delimiters inside strings are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StringSyntax {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<String>,
    /// Whether the literal may continue past a newline
    #[serde(default)]
    pub multiline: bool,
}

impl StringSyntax {
    #[must_use]
    pub fn quoted(quote: &str, escape: Option<&str>) -> Self {
        Self {
            start: quote.to_string(),
            end: quote.to_string(),
            escape: escape.map(str::to_string),
            multiline: false,
        }
    }
}

/// How an [`IgnoreLineRule`] pattern is compared against a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreMatch {
    Containing,
    BeginningWith,
    EndingWith,
    EqualTo,
    Regex,
}

/// Lines matching the rule are not counted, optionally only when an option
/// is (or is not) present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IgnoreLineRule {
    #[serde(rename = "match")]
    pub kind: IgnoreMatch,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_option: Option<String>,
}

/// Declarative description of a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterDefinition {
    pub name: String,
    #[serde(default)]
    pub file_endings: Vec<String>,
    #[serde(default)]
    pub comments: Vec<CommentSyntax>,
    #[serde(default)]
    pub strings: Vec<StringSyntax>,
    /// Regular expressions tried against the first line of a file
    #[serde(default)]
    pub first_line_patterns: Vec<String>,
    #[serde(default)]
    pub ignore_lines: Vec<IgnoreLineRule>,
}

fn endings(list: &[&str]) -> Vec<String> {
    list.iter().map(|e| (*e).to_string()).collect()
}

impl FilterDefinition {
    /// C and the languages that borrowed its comment syntax.
    #[must_use]
    pub fn c_family() -> Self {
        Self {
            name: "c".to_string(),
            file_endings: endings(&[
                ".c", ".h", ".cc", ".cpp", ".cxx", ".hh", ".hpp", ".hxx", ".java", ".cs", ".js",
                ".jsx", ".ts", ".tsx", ".go", ".kt", ".kts", ".scala", ".swift", ".m", ".php",
            ]),
            comments: vec![CommentSyntax::line("//"), CommentSyntax::block("/*", "*/")],
            strings: vec![
                StringSyntax::quoted("\"", Some("\\")),
                StringSyntax::quoted("'", Some("\\")),
            ],
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        }
    }

    /// Rust. A `'` starts a lifetime as often as a char literal, so only
    /// double-quoted strings hide comment markers.
    #[must_use]
    pub fn rust() -> Self {
        Self {
            name: "rust".to_string(),
            file_endings: endings(&[".rs"]),
            comments: vec![CommentSyntax::line("//"), CommentSyntax::block("/*", "*/")],
            strings: vec![
                // Char literals holding a double quote.
                StringSyntax {
                    end: "'".to_string(),
                    ..StringSyntax::quoted("'\"", None)
                },
                StringSyntax {
                    end: "'".to_string(),
                    ..StringSyntax::quoted("'\\\"", None)
                },
                StringSyntax {
                    multiline: true,
                    ..StringSyntax::quoted("\"", Some("\\"))
                },
            ],
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        }
    }

    /// Hash-comment scripting languages.
    #[must_use]
    pub fn shell_family() -> Self {
        Self {
            name: "shell".to_string(),
            file_endings: endings(&[
                ".sh", ".bash", ".zsh", ".ksh", ".py", ".rb", ".pl", ".pm", ".r", ".yaml", ".yml",
                ".toml", ".mk", "Makefile", ".cmake", "CMakeLists.txt", ".properties",
            ]),
            comments: vec![CommentSyntax::line("#")],
            strings: vec![
                StringSyntax::quoted("\"", Some("\\")),
                StringSyntax::quoted("'", None),
            ],
            first_line_patterns: vec![
                r"^#!.*\b(ba|z|k)?sh\b".to_string(),
                r"^#!.*\b(python|ruby|perl)".to_string(),
            ],
            ignore_lines: Vec::new(),
        }
    }

    /// SQL dialects.
    #[must_use]
    pub fn sql() -> Self {
        Self {
            name: "sql".to_string(),
            file_endings: endings(&[".sql", ".ddl", ".pls", ".pks", ".pkb"]),
            comments: vec![CommentSyntax::line("--"), CommentSyntax::block("/*", "*/")],
            strings: vec![StringSyntax::quoted("'", None)],
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        }
    }

    /// Markup languages with `<!-- -->` comments.
    #[must_use]
    pub fn markup() -> Self {
        Self {
            name: "html".to_string(),
            file_endings: endings(&[".html", ".htm", ".xml", ".xsl", ".xsd", ".svg", ".jsp"]),
            comments: vec![CommentSyntax::block("<!--", "-->")],
            strings: Vec::new(),
            first_line_patterns: vec![r"^\s*<(\?xml|!DOCTYPE|html)".to_string()],
            ignore_lines: Vec::new(),
        }
    }

    /// Pascal and Delphi.
    #[must_use]
    pub fn pascal() -> Self {
        Self {
            name: "pascal".to_string(),
            file_endings: endings(&[".pas", ".pp", ".dpr", ".inc"]),
            comments: vec![
                CommentSyntax::block("{", "}"),
                CommentSyntax::block("(*", "*)"),
                CommentSyntax::line("//"),
            ],
            strings: vec![StringSyntax::quoted("'", None)],
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        }
    }

    /// Definitions shipped with the tool, in selection order.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::c_family(),
            Self::rust(),
            Self::shell_family(),
            Self::sql(),
            Self::markup(),
            Self::pascal(),
        ]
    }

    /// Structural problems with this definition, as messages.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("filter name must not be empty".to_string());
        }
        if self.file_endings.is_empty() && self.first_line_patterns.is_empty() {
            problems.push(format!(
                "filter '{}' needs at least one file ending or first-line pattern",
                self.name
            ));
        }
        if self.comments.iter().any(|c| c.start.is_empty()) {
            problems.push(format!("filter '{}' has an empty comment delimiter", self.name));
        }
        if self.strings.iter().any(|s| {
            s.start.is_empty() || s.end.is_empty() || s.escape.as_deref() == Some("")
        }) {
            problems.push(format!("filter '{}' has an empty string delimiter", self.name));
        }
        problems
    }
}

#[derive(Debug)]
enum RuleMatcher {
    Text(IgnoreMatch, String),
    Pattern(Regex),
}

#[derive(Debug)]
struct CompiledRule {
    matcher: RuleMatcher,
    if_option: Option<String>,
    unless_option: Option<String>,
}

impl CompiledRule {
    fn applies(&self, options: &FilterOptions) -> bool {
        self.if_option.as_deref().map_or(true, |opt| options.has(opt))
            && !self.unless_option.as_deref().is_some_and(|opt| options.has(opt))
    }

    fn matches(&self, code: &str) -> bool {
        match &self.matcher {
            RuleMatcher::Text(IgnoreMatch::Containing, p) => code.contains(p.as_str()),
            RuleMatcher::Text(IgnoreMatch::BeginningWith, p) => code.starts_with(p.as_str()),
            RuleMatcher::Text(IgnoreMatch::EndingWith, p) => code.ends_with(p.as_str()),
            RuleMatcher::Text(_, p) => code == p,
            RuleMatcher::Pattern(re) => re.is_match(code),
        }
    }
}

fn compile_regex(filter: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        LocDiffError::filter(
            format!("compiling filter '{filter}'"),
            FilterErrorKind::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            },
        )
    })
}

/// Compiled form of a [`FilterDefinition`].
#[derive(Debug)]
pub struct SyntaxFilter {
    definition: FilterDefinition,
    first_line: Vec<Regex>,
    rules: Vec<CompiledRule>,
}

impl SyntaxFilter {
    /// Validate and compile a definition.
    pub fn new(definition: FilterDefinition) -> Result<Self> {
        let problems = definition.problems();
        if !problems.is_empty() {
            return Err(LocDiffError::filter(
                format!("loading filter '{}'", definition.name),
                FilterErrorKind::InvalidDefinition(problems.join("; ")),
            ));
        }

        let first_line = definition
            .first_line_patterns
            .iter()
            .map(|p| compile_regex(&definition.name, p))
            .collect::<Result<Vec<_>>>()?;

        let rules = definition
            .ignore_lines
            .iter()
            .map(|rule| {
                let matcher = match rule.kind {
                    IgnoreMatch::Regex => {
                        RuleMatcher::Pattern(compile_regex(&definition.name, &rule.pattern)?)
                    }
                    kind => RuleMatcher::Text(kind, rule.pattern.clone()),
                };
                Ok(CompiledRule {
                    matcher,
                    if_option: rule.if_option.clone(),
                    unless_option: rule.unless_option.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            definition,
            first_line,
            rules,
        })
    }

    #[must_use]
    pub const fn definition(&self) -> &FilterDefinition {
        &self.definition
    }

    /// End of the string literal whose body starts at `from`.
    fn skip_string(text: &str, from: usize, syntax: &StringSyntax) -> usize {
        let mut pos = from;
        while pos < text.len() {
            let rest = &text[pos..];
            if let Some(escape) = syntax.escape.as_deref().filter(|e| rest.starts_with(*e)) {
                pos += escape.len();
                pos += text[pos..].chars().next().map_or(0, char::len_utf8);
            } else if rest.starts_with(syntax.end.as_str()) {
                return pos + syntax.end.len();
            } else if rest.starts_with('\n') && !syntax.multiline {
                return pos;
            } else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        text.len()
    }

    /// End of the comment whose body starts at `from` (exclusive of a newline).
    fn comment_end(text: &str, from: usize, syntax: &CommentSyntax) -> usize {
        match syntax.end.as_deref() {
            None | Some("\n") => text[from..].find('\n').map_or(text.len(), |i| from + i),
            Some(end) => text[from..]
                .find(end)
                .map_or(text.len(), |i| from + i + end.len()),
        }
    }
}

impl LanguageFilter for SyntaxFilter {
    fn name(&self) -> &str {
        &self.definition.name
    }

    fn file_endings(&self) -> &[String] {
        &self.definition.file_endings
    }

    fn first_line_matches(&self, first_line: &str) -> bool {
        self.first_line.iter().any(|re| re.is_match(first_line))
    }

    fn comment_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            let rest = &text[pos..];
            if let Some(comment) = self
                .definition
                .comments
                .iter()
                .find(|c| rest.starts_with(c.start.as_str()))
            {
                let end = Self::comment_end(text, pos + comment.start.len(), comment);
                spans.push(pos..end);
                pos = end;
            } else if let Some(string) = self
                .definition
                .strings
                .iter()
                .find(|s| rest.starts_with(s.start.as_str()))
            {
                pos = Self::skip_string(text, pos + string.start.len(), string);
            } else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        spans
    }

    fn is_significant(&self, code: &str, options: &FilterOptions) -> bool {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return false;
        }
        !self
            .rules
            .iter()
            .any(|rule| rule.applies(options) && rule.matches(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_filter() -> SyntaxFilter {
        SyntaxFilter::new(FilterDefinition::c_family()).expect("builtin definition compiles")
    }

    fn spans_text(filter: &SyntaxFilter, text: &str) -> Vec<String> {
        filter
            .comment_spans(text)
            .into_iter()
            .map(|r| text[r].to_string())
            .collect()
    }

    #[test]
    fn test_line_and_block_comments() {
        let filter = c_filter();
        let text = "int a; // counter\n/* block\n spans */ int b;\n";
        assert_eq!(
            spans_text(&filter, text),
            vec!["// counter", "/* block\n spans */"]
        );
    }

    #[test]
    fn test_comment_markers_inside_strings_are_ignored() {
        let filter = c_filter();
        let text = r#"puts("// not a comment /* nor this"); // real"#;
        assert_eq!(spans_text(&filter, text), vec!["// real"]);
    }

    #[test]
    fn test_rust_lifetimes_do_not_open_strings() {
        let filter =
            SyntaxFilter::new(FilterDefinition::rust()).expect("builtin definition compiles");
        let text = concat!(
            "fn f<'a>(x: &str) // note\n",
            "let q = '\"'; // quote\n",
            "let s = \"// no\n\"; /* yes */\n",
        );
        assert_eq!(
            spans_text(&filter, text),
            vec!["// note", "// quote", "/* yes */"]
        );
        assert!(filter.file_name_matches("src/lib.rs"));
        assert!(!c_filter().file_name_matches("src/lib.rs"));
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        let filter = c_filter();
        let text = r#"s = "a \" // b"; /* c */"#;
        assert_eq!(spans_text(&filter, text), vec!["/* c */"]);
    }

    #[test]
    fn test_unterminated_block_runs_to_end() {
        let filter = c_filter();
        let text = "x;\n/* never closed\ny;";
        assert_eq!(spans_text(&filter, text), vec!["/* never closed\ny;"]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let filter = c_filter();
        let text = "c = '\n// comment";
        assert_eq!(spans_text(&filter, text), vec!["// comment"]);
    }

    #[test]
    fn test_ignore_line_rules_with_options() {
        let mut definition = FilterDefinition::c_family();
        definition.ignore_lines = vec![
            IgnoreLineRule {
                kind: IgnoreMatch::EqualTo,
                pattern: "{".to_string(),
                if_option: None,
                unless_option: Some("countBraces".to_string()),
            },
            IgnoreLineRule {
                kind: IgnoreMatch::Regex,
                pattern: r"^#(include|import)\b".to_string(),
                if_option: Some("skipIncludes".to_string()),
                unless_option: None,
            },
        ];
        let filter = SyntaxFilter::new(definition).expect("valid definition");

        let plain = FilterOptions::default();
        assert!(!filter.is_significant("  {  ", &plain));
        assert!(filter.is_significant("#include <stdio.h>", &plain));

        let opts = FilterOptions {
            extra: vec!["-countbraces".to_string(), "-SKIPINCLUDES".to_string()],
            ..Default::default()
        };
        assert!(filter.is_significant("{", &opts));
        assert!(!filter.is_significant("#include <stdio.h>", &opts));
    }

    #[test]
    fn test_invalid_definition_rejected() {
        let definition = FilterDefinition {
            name: "broken".to_string(),
            file_endings: vec![".x".to_string()],
            comments: vec![CommentSyntax::line("")],
            strings: Vec::new(),
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        };
        assert!(SyntaxFilter::new(definition).is_err());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut definition = FilterDefinition::sql();
        definition.first_line_patterns = vec!["(unclosed".to_string()];
        let err = SyntaxFilter::new(definition).expect_err("bad regex");
        assert!(err.to_string().contains("sql"), "{err}");
    }

    #[test]
    fn test_first_line_hint() {
        let filter =
            SyntaxFilter::new(FilterDefinition::shell_family()).expect("builtin definition compiles");
        assert!(filter.first_line_matches("#!/usr/bin/env bash"));
        assert!(filter.first_line_matches("#!/usr/bin/python3"));
        assert!(!filter.first_line_matches("int main() {"));
    }

    #[test]
    fn test_definition_yaml() {
        let yaml = r#"
name: lisp
file_endings: [".lisp", ".el"]
comments:
  - start: ";"
strings:
  - start: '"'
    end: '"'
    escape: '\'
ignore_lines:
  - match: equal_to
    pattern: ")"
"#;
        let definition: FilterDefinition = serde_yaml::from_str(yaml).expect("valid yaml");
        let filter = SyntaxFilter::new(definition).expect("valid definition");
        assert_eq!(spans_text(&filter, "(car x) ; head"), vec!["; head"]);
        assert!(!filter.is_significant(")", &FilterOptions::default()));
    }
}
