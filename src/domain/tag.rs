use std::fmt;

use git2::Oid;

/// A repository tag peeled to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    /// Commit the tag resolves to (annotated tags are peeled)
    pub oid: Oid,
    /// Committer time of that commit, seconds since the epoch
    pub commit_time: i64,
}

impl TagInfo {
    pub fn new(name: impl Into<String>, oid: Oid, commit_time: i64) -> Self {
        TagInfo {
            name: name.into(),
            oid,
            commit_time,
        }
    }
}

/// One end of the commit range for a release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RevisionRef {
    /// No tag expression was given; use the repository HEAD
    Head,
    /// A concrete tag resolved from an expression
    Tag { name: String, oid: Oid },
}

impl fmt::Display for RevisionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionRef::Head => write!(f, "HEAD"),
            RevisionRef::Tag { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Both ends of the release range, resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub release: RevisionRef,
    pub previous: RevisionRef,
}

impl fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ... {}", self.release, self.previous)
    }
}
