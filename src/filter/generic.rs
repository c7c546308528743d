//! Fallback filter for files no other filter claims.

use super::LanguageFilter;

/// Every non-blank line is significant; there are no comments.
#[derive(Debug, Default)]
pub struct GenericFilter {
    endings: Vec<String>,
}

impl GenericFilter {
    pub const NAME: &'static str = "generic";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            endings: Vec::new(),
        }
    }
}

impl LanguageFilter for GenericFilter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn file_endings(&self) -> &[String] {
        &self.endings
    }
}
