//! Unified error types for loc-diff.
//!
//! Per-file failures (undecodable or binary content) are ordinary values that
//! callers record and move past; only request-level problems abort a run.

use thiserror::Error;

/// Main error type for loc-diff operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LocDiffError {
    /// A version's bytes could not be turned into text
    #[error("Failed to decode {context}")]
    Decode {
        context: String,
        #[source]
        source: DecodeError,
    },

    /// The analysis request itself is malformed
    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    /// Errors building or loading language filters
    #[error("Language filter error: {context}")]
    Filter {
        context: String,
        #[source]
        source: FilterErrorKind,
    },

    /// IO errors with context
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Reasons a version's content could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("binary content (NUL byte at offset {offset})")]
    Binary { offset: usize },

    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("unsupported character encoding: {0}")]
    UnsupportedEncoding(String),
}

impl DecodeError {
    /// Whether the content was rejected for being binary rather than malformed text.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }
}

/// Specific language filter error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FilterErrorKind {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid filter definition: {0}")]
    InvalidDefinition(String),

    #[error("Failed to parse filter definitions: {0}")]
    Yaml(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for loc-diff operations
pub type Result<T> = std::result::Result<T, LocDiffError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl LocDiffError {
    /// Create a decode error with context
    pub fn decode(context: impl Into<String>, source: DecodeError) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a filter error with context
    pub fn filter(context: impl Into<String>, source: FilterErrorKind) -> Self {
        Self::Filter {
            context: context.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The decode failure behind this error, if any.
    #[must_use]
    pub const fn as_decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for LocDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for LocDiffError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::filter("YAML deserialization", FilterErrorKind::Yaml(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain, so the final message reads from the outermost
/// operation inwards.
///
/// # Example
///
/// ```ignore
/// use loc_diff::error::ErrorContext;
///
/// fn load(path: &Path) -> Result<Vec<FilterDefinition>> {
///     let content = std::fs::read_to_string(path).context("reading filter definitions")?;
///     serde_yaml::from_str(&content)
///         .with_context(|| format!("parsing {}", path.display()))
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// The context string is prepended to the error's existing context.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<LocDiffError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: LocDiffError, new_ctx: &str) -> LocDiffError {
    match err {
        LocDiffError::Decode {
            context: existing,
            source,
        } => LocDiffError::Decode {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LocDiffError::Filter {
            context: existing,
            source,
        } => LocDiffError::Filter {
            context: chain_context(new_ctx, &existing),
            source,
        },
        LocDiffError::Io { message, source } => LocDiffError::Io {
            message: chain_context(new_ctx, &message),
            source,
        },
        LocDiffError::InvalidRequest(msg) => {
            LocDiffError::InvalidRequest(chain_context(new_ctx, &msg))
        }
        LocDiffError::Config(msg) => LocDiffError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = LocDiffError::decode("src/main.c", DecodeError::Binary { offset: 12 });
        let display = err.to_string();
        assert!(display.contains("src/main.c"), "{display}");
        assert!(err.as_decode_error().is_some_and(DecodeError::is_binary));
    }

    #[test]
    fn test_invalid_request_is_not_decode() {
        let err = LocDiffError::invalid_request("need at least two versions");
        assert!(err.as_decode_error().is_none());
        assert!(err.to_string().contains("two versions"));
    }

    #[test]
    fn test_io_error_takes_context() {
        let result: Result<String> =
            std::fs::read_to_string("/nonexistent/filters.yaml").context("reading filters.yaml");

        match result {
            Err(LocDiffError::Io { message, .. }) => {
                assert!(message.starts_with("reading filters.yaml: "), "{message}");
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(LocDiffError::decode(
                "base",
                DecodeError::InvalidUtf8 { offset: 3 },
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(LocDiffError::Decode { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(LocDiffError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
