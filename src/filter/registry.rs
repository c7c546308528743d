//! Registry of language filters, keyed by file name ending.

use super::{CobolFilter, FilterDefinition, GenericFilter, LanguageFilter, SyntaxFilter};
use crate::error::{ErrorContext, Result};
use std::path::Path;
use std::sync::Arc;

fn as_filter(filter: &Arc<dyn LanguageFilter>) -> &dyn LanguageFilter {
    filter.as_ref()
}

/// Ordered, immutable set of filters with a generic fallback.
///
/// Build it once, then share it (it is cheap to clone) with every analysis.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: Vec<Arc<dyn LanguageFilter>>,
    generic: Arc<dyn LanguageFilter>,
}

impl FilterRegistry {
    /// Registry with only the built-in filters.
    pub fn builtin() -> Result<Self> {
        Self::with_definitions(Vec::new())
    }

    /// Registry with extra definitions ahead of the built-in filters.
    ///
    /// Extra definitions are consulted first, so they win over built-ins
    /// that claim the same endings or name.
    pub fn with_definitions(definitions: Vec<FilterDefinition>) -> Result<Self> {
        let mut filters: Vec<Arc<dyn LanguageFilter>> = Vec::new();
        for definition in definitions {
            filters.push(Arc::new(SyntaxFilter::new(definition)?));
        }
        filters.push(Arc::new(CobolFilter::new()));
        for definition in FilterDefinition::builtin() {
            filters.push(Arc::new(SyntaxFilter::new(definition)?));
        }

        tracing::debug!("Registered {} language filters", filters.len());
        Ok(Self {
            filters,
            generic: Arc::new(GenericFilter::new()),
        })
    }

    /// Read a YAML list of filter definitions.
    pub fn load_definitions(path: &Path) -> Result<Vec<FilterDefinition>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading filter definitions {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing filter definitions {}", path.display()))
    }

    /// The fallback filter.
    #[must_use]
    pub fn generic(&self) -> &dyn LanguageFilter {
        self.generic.as_ref()
    }

    /// Look a filter up by name, case-insensitively.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn LanguageFilter> {
        if name.eq_ignore_ascii_case(GenericFilter::NAME) {
            return Some(self.generic());
        }
        self.filters
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .map(as_filter)
    }

    /// Choose the filter for a file.
    ///
    /// A forced name wins when it is known. Otherwise the first filter whose
    /// endings match the file name is used, then the first whose first-line
    /// pattern matches, then the generic filter.
    #[must_use]
    pub fn select(
        &self,
        file_name: &str,
        first_line: Option<&str>,
        forced: Option<&str>,
    ) -> &dyn LanguageFilter {
        if let Some(name) = forced {
            match self.by_name(name) {
                Some(filter) => return filter,
                None => tracing::warn!("Unknown language '{}', selecting by file name", name),
            }
        }

        if let Some(filter) = self.filters.iter().find(|f| f.file_name_matches(file_name)) {
            return as_filter(filter);
        }

        first_line
            .and_then(|line| self.filters.iter().find(|f| f.first_line_matches(line)))
            .map_or_else(|| self.generic(), as_filter)
    }

    /// All registered filters in selection order, generic last.
    pub fn iter(&self) -> impl Iterator<Item = &dyn LanguageFilter> {
        self.filters
            .iter()
            .map(as_filter)
            .chain(std::iter::once(self.generic()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len() + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CommentSyntax;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn registry() -> FilterRegistry {
        FilterRegistry::builtin().expect("builtin filters compile")
    }

    #[test]
    fn test_select_by_ending() {
        let registry = registry();
        assert_eq!(registry.select("src/lib.rs", None, None).name(), "rust");
        assert_eq!(registry.select("src/main.cpp", None, None).name(), "c");
        assert_eq!(registry.select("PAYROLL.CBL", None, None).name(), "cobol");
        assert_eq!(registry.select("build.sh", None, None).name(), "shell");
        assert_eq!(registry.select("schema.SQL", None, None).name(), "sql");
    }

    #[test]
    fn test_unknown_ending_falls_back_to_generic() {
        let registry = registry();
        assert_eq!(registry.select("notes.txt", None, None).name(), "generic");
    }

    #[test]
    fn test_first_line_hint_used_without_ending() {
        let registry = registry();
        let filter = registry.select("configure", Some("#!/bin/sh"), None);
        assert_eq!(filter.name(), "shell");
    }

    #[test]
    fn test_forced_language() {
        let registry = registry();
        assert_eq!(registry.select("main.c", None, Some("COBOL")).name(), "cobol");
        assert_eq!(registry.select("main.c", None, Some("generic")).name(), "generic");
        // Unknown names are not an error.
        assert_eq!(registry.select("main.c", None, Some("klingon")).name(), "c");
    }

    #[test]
    fn test_extra_definitions_take_priority() {
        let custom = FilterDefinition {
            name: "proc-c".to_string(),
            file_endings: vec![".pc".to_string(), ".c".to_string()],
            comments: vec![CommentSyntax::block("/*", "*/")],
            strings: Vec::new(),
            first_line_patterns: Vec::new(),
            ignore_lines: Vec::new(),
        };
        let registry = FilterRegistry::with_definitions(vec![custom]).expect("valid definition");
        assert_eq!(registry.select("main.c", None, None).name(), "proc-c");
        assert_eq!(registry.len(), registry.iter().count());
    }

    #[test]
    fn test_load_definitions_from_yaml() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "- name: ada\n  file_endings: [\".adb\", \".ads\"]\n  comments:\n    - start: \"--\""
        )
        .expect("write");

        let definitions = FilterRegistry::load_definitions(file.path()).expect("valid yaml");
        let registry = FilterRegistry::with_definitions(definitions).expect("valid definition");
        let filter = registry.select("main.adb", None, None);
        assert_eq!(filter.name(), "ada");
        assert_eq!(filter.comment_span_of("X := 1; -- set"), Some(8..14));
    }
}
