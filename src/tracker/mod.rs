//! Issue tracker abstraction
//!
//! The release pipeline only needs three tracker capabilities: look an issue
//! up, create a fix version, and attach that version to an issue.
//! [jira::JiraClient] talks to a Jira-compatible REST API;
//! [mock::MockTracker] records calls for tests.

pub mod jira;
pub mod mock;

pub use jira::JiraClient;
pub use mock::{MockTracker, TrackerCall};

use crate::domain::{FixVersionRecord, IssueKey, IssueRecord, VersionId};
use crate::error::Result;

/// Outcome of looking an issue up
///
/// Every lookup failure is a value here, not an error, so one bad key never
/// aborts validation of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLookup {
    Found(IssueRecord),
    NotFound,
    /// Any HTTP status other than success or not-found
    UnexpectedStatus(u16),
    /// No usable response: timeout, connection error or an unreadable body
    Failed(String),
}

pub trait IssueTracker: Send + Sync {
    /// Fetch the current snapshot of an issue
    fn get_issue(&self, key: &IssueKey) -> IssueLookup;

    /// Create a fix version and return the id the tracker assigned to it
    fn create_fix_version(&self, record: &FixVersionRecord) -> Result<VersionId>;

    /// Add an existing fix version to an issue
    fn attach_fix_version(&self, key: &IssueKey, version: &VersionId) -> Result<()>;
}
