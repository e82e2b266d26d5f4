use std::fmt;

/// Canonical issue identifier, e.g. `CORE-123`.
///
/// Keys are trimmed and uppercased on construction so `core-1` and ` CORE-1`
/// compare equal and land in the same commit group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueKey(String);

impl IssueKey {
    /// Normalize a raw key extracted from a commit subject
    pub fn new(raw: impl AsRef<str>) -> Self {
        IssueKey(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fix version already attached to an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFixVersion {
    pub id: String,
    pub name: String,
}

/// Snapshot of an issue as reported by the tracker at validation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    pub key: IssueKey,
    pub status: String,
    pub fix_versions: Vec<ExistingFixVersion>,
}

/// Why an issue cannot receive the new fix version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The tracker has no issue with this key
    NotFound,
    /// The lookup returned a status other than 200 or 404
    UnexpectedStatus(u16),
    /// The lookup never produced a usable response (timeout, transport, bad body)
    LookupFailed(String),
    /// The issue is not in the configured done status
    WrongStatus { expected: String, actual: String },
    /// The issue already carries a fix version; holds the first existing name
    AlreadyHasFixVersion(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NotFound => write!(f, "Ticket not found"),
            InvalidReason::UnexpectedStatus(code) => {
                write!(f, "Unexpected status code during lookup: {}", code)
            }
            InvalidReason::LookupFailed(reason) => write!(f, "Lookup failed: {}", reason),
            InvalidReason::WrongStatus { expected, actual } => {
                write!(f, "Invalid status, expected '{}' found '{}'", expected, actual)
            }
            InvalidReason::AlreadyHasFixVersion(name) => {
                write!(f, "Already contains a fix version: {}", name)
            }
        }
    }
}

/// Result of validating one issue key together with the commits that referenced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid {
        key: IssueKey,
        commits: Vec<String>,
    },
    Invalid {
        key: IssueKey,
        commits: Vec<String>,
        reason: InvalidReason,
    },
}

impl ValidationOutcome {
    pub fn key(&self) -> &IssueKey {
        match self {
            ValidationOutcome::Valid { key, .. } | ValidationOutcome::Invalid { key, .. } => key,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }
}
