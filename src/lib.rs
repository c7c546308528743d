//! **Multi-version line-of-code diff and accounting.**
//!
//! `loc-diff` compares two or three versions of source files, or whole
//! source trees, and accounts for every significant line: how much of the
//! old code survived (Base), how much was Deleted, Modified or Added, and
//! the resulting Total. Blank lines and comments never count, but comment
//! changes still show up in the redlines.
//!
//! ## Core Concepts & Modules
//!
//! - **[`diff`]**: The sequence diff engine ([`diff::diff`], a Myers
//!   shortest-edit-script diff) and the three-way merger ([`diff::merge`]).
//!   Both are generic over the element type and an equality predicate.
//! - **[`filter`]**: Language filters decide which text is a comment and
//!   which lines are significant. The [`FilterRegistry`] picks one per file
//!   by name ending, first-line pattern or an explicit `-lang=` option.
//! - **[`analysis`]**: The [`DiffAnalyzer`] decodes and tokenizes versions,
//!   aligns them and folds the alignment into a [`DiffResult`] with counts
//!   per [`AccountingType`] and redline [`DiffFragment`]s.
//! - **[`aggregate`]**: Commutative totals across many files, and the
//!   [`Comparison`] of a whole run.
//! - **[`pipeline`]**: Source tree collection, parallel analysis and report
//!   output used by the command-line tool.
//! - **[`reports`]**: Summary, count, JSON, plain-text and HTML redline
//!   reports.
//!
//! ## Getting Started
//!
//! ```
//! use loc_diff::{AccountingType, AnalysisOptions, DiffAnalyzer, FilterRegistry, VersionInput};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = FilterRegistry::builtin()?;
//!     let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
//!
//!     let result = analyzer
//!         .analyze_file(
//!             "lib.c",
//!             &[
//!                 VersionInput::new("before", "int a;\nint b; // old\n"),
//!                 VersionInput::new("after", "int a;\nint c;\nint d;\n"),
//!             ],
//!         )?
//!         .expect("the versions differ");
//!
//!     assert_eq!(result.count(AccountingType::Base), 1);
//!     assert_eq!(result.count(AccountingType::Modified), 1);
//!     assert_eq!(result.count(AccountingType::Added), 1);
//!     assert_eq!(result.count(AccountingType::Total), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `loc_diff` library crate. The `loc-diff`
//! binary wraps it with `diff`, `diff3` and `count` subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // self is kept for API consistency across reporter impls
    clippy::unused_self,
    // `before`/`after`, `base`/`a`/`b` are clear in context
    clippy::similar_names
)]

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use aggregate::{aggregate, AggregateCounts, Comparison, FileOutcome, FileTally};
pub use analysis::{
    analyze, AccountingType, AnalysisOptions, DiffAnalyzer, DiffFragment, DiffResult,
    FileChangeType, LocCounts, TextEncoding, Version, VersionInput,
};
pub use config::{AppConfig, AppConfigBuilder, CompareConfig, ConfigError, Validatable};
pub use diff::{merge, AlignmentEntry, AlignmentTag, MergeClass, MergedItem};
pub use error::{DecodeError, ErrorContext, LocDiffError, Result};
pub use filter::{FilterDefinition, FilterOptions, FilterRegistry, LanguageFilter};
pub use reports::{ReportFormat, ReportGenerator};
