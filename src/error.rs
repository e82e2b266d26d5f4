use thiserror::Error;

/// Unified error type for git-fixversion operations
#[derive(Error, Debug)]
pub enum FixVersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid commit pattern: {0}")]
    Pattern(String),

    #[error("Could not find tag: {0}")]
    TagNotFound(String),

    #[error("Tracker error: {0}")]
    Tracker(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-fixversion
pub type Result<T> = std::result::Result<T, FixVersionError>;

impl FixVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        FixVersionError::Config(msg.into())
    }

    /// Create a pattern compilation error with context
    pub fn pattern(msg: impl Into<String>) -> Self {
        FixVersionError::Pattern(msg.into())
    }

    /// Create a tag resolution error for the given expression
    pub fn tag_not_found(expression: impl Into<String>) -> Self {
        FixVersionError::TagNotFound(expression.into())
    }

    /// Create a tracker error with context
    pub fn tracker(msg: impl Into<String>) -> Self {
        FixVersionError::Tracker(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        FixVersionError::Remote(msg.into())
    }

    /// Whether this error happened before any external call was made.
    ///
    /// Configuration and pattern errors are raised while building the run
    /// configuration, so the caller can report them as usage problems.
    pub fn is_configuration(&self) -> bool {
        matches!(self, FixVersionError::Config(_) | FixVersionError::Pattern(_))
    }
}
