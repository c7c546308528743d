//! Line-of-code analysis of file versions.
//!
//! Bytes are decoded with a [`TextEncoding`], split into [`Line`]s by a
//! language filter, and compared by [`DiffAnalyzer`] to produce a
//! [`DiffResult`]: per-type line counts plus redline fragments.

mod analyzer;
mod encoding;
mod line;
mod options;
mod result;

pub use analyzer::{analyze, DiffAnalyzer, VersionInput};
pub use encoding::TextEncoding;
pub use line::{Line, Version};
pub use options::{AnalysisOptions, DEFAULT_TAB_WIDTH};
pub use result::{AccountingType, DiffFragment, DiffResult, FileChangeType, LocCounts};
