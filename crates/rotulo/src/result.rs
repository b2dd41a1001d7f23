//! Result and error types for Rótulo.
//!
//! Test scenarios only ever observe this vocabulary: driver failures are
//! caught at the boundary, logged at debug level and converted into one of
//! the variants below.

use thiserror::Error;

/// Result type for Rótulo operations
pub type RotuloResult<T> = Result<T, RotuloError>;

/// Coarse classification of a [`RotuloError`], used by reporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Title has no matching element, action or page
    NotFound,
    /// Page could not be instantiated, or no current page exists
    InitializationFailure,
    /// A synchronization wait exceeded its budget
    Timeout,
    /// A checked UI expectation did not hold
    AssertionFailure,
    /// An action was found but its invocation failed
    ActionFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NotFound => "not-found",
            Self::InitializationFailure => "initialization-failure",
            Self::Timeout => "timeout",
            Self::AssertionFailure => "assertion-failure",
            Self::ActionFailed => "action-failed",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur in Rótulo
#[derive(Debug, Error)]
pub enum RotuloError {
    /// Title has no matching element/action/page
    #[error("{what} '{title}' not found on page '{page}'")]
    NotFound {
        /// Kind of thing looked up ("element", "action", "block")
        what: &'static str,
        /// Requested title
        title: String,
        /// Title of the page that was searched
        page: String,
    },

    /// Page could not be instantiated, or no current page exists yet
    #[error("Initialization failed: {message}")]
    InitializationFailure {
        /// Error message
        message: String,
    },

    /// A synchronization wait exceeded its budget
    #[error("Timed out after {ms}ms waiting for {waited_for} (page '{page}')")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the awaited condition
        waited_for: String,
        /// Current page title, empty when unknown
        page: String,
    },

    /// A checked UI expectation did not hold
    #[error("Assertion failed: {message}")]
    AssertionFailure {
        /// Error message
        message: String,
    },

    /// Action invocation failed (wrong arity, failing body)
    #[error("Action '{title}' on page '{page}' failed: {source}")]
    ActionFailed {
        /// Action title as requested
        title: String,
        /// Current page title
        page: String,
        /// Underlying failure
        #[source]
        source: Box<RotuloError>,
    },
}

impl RotuloError {
    /// Build a `NotFound` error
    #[must_use]
    pub fn not_found(what: &'static str, title: impl Into<String>, page: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            title: title.into(),
            page: page.into(),
        }
    }

    /// Build an `InitializationFailure` error
    #[must_use]
    pub fn init(message: impl Into<String>) -> Self {
        Self::InitializationFailure {
            message: message.into(),
        }
    }

    /// Build an `AssertionFailure` error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailure {
            message: message.into(),
        }
    }

    /// Build a `Timeout` error without page context
    #[must_use]
    pub fn timeout(ms: u64, waited_for: impl Into<String>) -> Self {
        Self::Timeout {
            ms,
            waited_for: waited_for.into(),
            page: String::new(),
        }
    }

    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InitializationFailure { .. } => ErrorKind::InitializationFailure,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::AssertionFailure { .. } => ErrorKind::AssertionFailure,
            Self::ActionFailed { .. } => ErrorKind::ActionFailed,
        }
    }

    /// Attach the current page title to errors that carry one and lack it
    #[must_use]
    pub fn on_page(mut self, title: &str) -> Self {
        match &mut self {
            Self::Timeout { page, .. } | Self::NotFound { page, .. } if page.is_empty() => {
                *page = title.to_string();
            }
            _ => {}
        }
        self
    }

    /// Whether a caller may reasonably recover (e.g. fallback lookup)
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
