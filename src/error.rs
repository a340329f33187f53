//! Unified error types for board2kconf.
//!
//! Parse and comparison failures are always surfaced to the immediate caller
//! as typed errors. Ordering between values that cannot be ordered is not an
//! error: it resolves to `false` at the comparison site.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for version parsing and requirement evaluation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum VersionError {
    /// Input does not match the expected version grammar
    #[error("Malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    /// The compatible-release operator was requested
    #[error("The compatible release operator '{operator}' is not supported")]
    UnsupportedOperator { operator: String },

    /// Operator token outside the recognized set
    #[error("Unknown requirement operator '{operator}'")]
    UnknownOperator { operator: String },

    /// Firmware comparison against a comparand form with no defined rule
    #[error("Cannot compare firmware version {version} for {relation} against {comparand}")]
    UnsupportedComparand {
        version: String,
        relation: &'static str,
        comparand: String,
    },

    /// No firmware checkout could be located
    #[error("Could not find a firmware checkout (searched: {searched})")]
    InstallationNotFound { searched: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for board2kconf operations
pub type Result<T> = std::result::Result<T, VersionError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl VersionError {
    /// Create a malformed version error
    pub fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        Self::UnknownOperator {
            operator: operator.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from bad input text rather than a caller mistake.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedVersion { .. })
    }
}

impl From<std::io::Error> for VersionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context is chained onto the message-bearing field of the error so the
/// final message reads outermost first.
///
/// ```
/// use board2kconf::error::{ErrorContext, Result};
/// use board2kconf::VersionNumber;
///
/// fn installed(text: &str) -> Result<VersionNumber> {
///     text.parse::<VersionNumber>()
///         .with_context(|| format!("reading installed version of {}", "urwid"))
/// }
///
/// assert!(installed("not a version").is_err());
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<VersionError>> ErrorContext<T> for std::result::Result<T, E> {
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

fn add_context_to_error(err: VersionError, new_ctx: &str) -> VersionError {
    match err {
        VersionError::MalformedVersion { input, reason } => VersionError::MalformedVersion {
            input,
            reason: chain_context(new_ctx, &reason),
        },
        VersionError::Io {
            path,
            message,
            source,
        } => VersionError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        VersionError::Config(msg) => VersionError::Config(chain_context(new_ctx, &msg)),
        // Operator and comparand errors name a caller mistake; extra context adds nothing
        other => other,
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
