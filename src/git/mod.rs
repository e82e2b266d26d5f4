//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! capabilities a release needs: tag enumeration by commit time, commit
//! subjects between two revisions, and creating plus pushing a release tag.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//! - [resolver::RevisionRangeResolver]: Turns tag expressions into a [RevisionRange]
//!
//! ```rust
//! # use git_fixversion::git::{Repository, RevisionRangeResolver};
//! # fn example<R: Repository>(repo: &R) -> git_fixversion::Result<()> {
//! let range = RevisionRangeResolver::new(repo).resolve_range(None, Some("app-*"))?;
//! let subjects = repo.commits_between(&range.release, &range.previous)?;
//! # Ok(())
//! # }
//! ```
//!
//! [RevisionRange]: crate::domain::RevisionRange

pub mod mock;
pub mod repository;
pub mod resolver;

pub use mock::MockRepository;
pub use repository::Git2Repository;
pub use resolver::RevisionRangeResolver;

use crate::domain::{RevisionRef, TagInfo};
use crate::error::Result;

/// Version-control operations used by a release run
///
/// All methods return [crate::error::Result<T>]; implementations map
/// underlying errors (like `git2::Error`) to [crate::error::FixVersionError].
pub trait Repository: Send {
    /// All tags in the repository, most recent commit time first
    ///
    /// Tags that share a commit time are ordered by name, descending, so the
    /// result is deterministic.
    fn tags_by_commit_time(&self) -> Result<Vec<TagInfo>>;

    /// Commit subjects that are reachable from exactly one of the two revisions
    ///
    /// Equivalent to `git log --format=%s first...second`: one subject per
    /// commit, newest first. Identical revisions yield an empty list.
    fn commits_between(&self, first: &RevisionRef, second: &RevisionRef) -> Result<Vec<String>>;

    /// Create an annotated tag at the current HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push a single tag to the named remote
    fn push_tag(&self, remote: &str, name: &str) -> Result<()>;
}

/// Sort tags newest first, breaking commit-time ties by name, descending
pub(crate) fn sort_by_commit_time(tags: &mut [TagInfo]) {
    tags.sort_by(|a, b| {
        b.commit_time
            .cmp(&a.commit_time)
            .then_with(|| b.name.cmp(&a.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Oid;

    #[test]
    fn test_sort_by_commit_time() {
        let oid = Oid::from_bytes(&[1; 20]).unwrap();
        let mut tags = vec![
            TagInfo::new("old", oid, 100),
            TagInfo::new("new-a", oid, 300),
            TagInfo::new("mid", oid, 200),
            TagInfo::new("new-b", oid, 300),
        ];
        sort_by_commit_time(&mut tags);
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["new-b", "new-a", "mid", "old"]);
    }
}
