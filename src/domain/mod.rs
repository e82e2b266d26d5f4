//! Domain logic - pure release bookkeeping types independent of git and the tracker

pub mod commit;
pub mod fix_version;
pub mod issue;
pub mod pattern;
pub mod tag;

pub use commit::{CommitGroup, IssueCommits};
pub use fix_version::{ApplicationResult, FixVersionRecord, VersionId};
pub use issue::{ExistingFixVersion, InvalidReason, IssueKey, IssueRecord, ValidationOutcome};
pub use pattern::{PatternMatcher, DEFAULT_COMMIT_PATTERN};
pub use tag::{RevisionRange, RevisionRef, TagInfo};
