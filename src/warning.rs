use std::fmt;

/// Non-fatal problems noticed during a release that should be reported to the user
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The revision range contains no commits at all
    NoCommitsInRange { release: String, previous: String },
    /// Some commit subjects did not reference an issue
    UnparsedCommits { count: usize },
    /// The fix version could not be added to one issue
    AttachFailed { key: String, reason: String },
    /// The release tag could not be created or pushed after the tracker was updated
    TagNotPublished { tag: String, reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NoCommitsInRange { release, previous } => {
                write!(f, "No commits found in range {} ... {}", release, previous)
            }
            ReleaseWarning::UnparsedCommits { count } => {
                let noun = if *count == 1 { "commit" } else { "commits" };
                write!(f, "{} {} could not be parsed", count, noun)
            }
            ReleaseWarning::AttachFailed { key, reason } => {
                write!(f, "Failure setting fix version for {}: {}", key, reason)
            }
            ReleaseWarning::TagNotPublished { tag, reason } => {
                write!(
                    f,
                    "Tracker was updated but tag '{}' was not published: {}",
                    tag, reason
                )
            }
        }
    }
}
