use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::domain::{ExistingFixVersion, FixVersionRecord, IssueKey, IssueRecord, VersionId};
use crate::error::{FixVersionError, Result};
use crate::tracker::{IssueLookup, IssueTracker};

/// A call made against [MockTracker], in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    GetIssue(IssueKey),
    CreateFixVersion(String),
    AttachFixVersion(IssueKey, VersionId),
}

/// In-memory tracker for tests
///
/// Unknown keys are reported as not found. Every call is recorded.
#[derive(Default)]
pub struct MockTracker {
    issues: HashMap<IssueKey, IssueLookup>,
    version_id: Option<String>,
    create_failure: Option<String>,
    attach_failures: HashSet<IssueKey>,
    calls: Mutex<Vec<TrackerCall>>,
}

impl MockTracker {
    pub fn new() -> Self {
        MockTracker {
            version_id: Some("10000".to_string()),
            ..Self::default()
        }
    }

    /// Register an issue in `status` with the given existing fix version names
    pub fn add_issue(&mut self, key: &str, status: &str, fix_versions: &[&str]) {
        let key = IssueKey::new(key);
        let record = IssueRecord {
            key: key.clone(),
            status: status.to_string(),
            fix_versions: fix_versions
                .iter()
                .enumerate()
                .map(|(i, name)| ExistingFixVersion {
                    id: (i + 1).to_string(),
                    name: name.to_string(),
                })
                .collect(),
        };
        self.issues.insert(key, IssueLookup::Found(record));
    }

    /// Make the lookup of `key` return an arbitrary result
    pub fn set_lookup(&mut self, key: &str, lookup: IssueLookup) {
        self.issues.insert(IssueKey::new(key), lookup);
    }

    /// Id returned by a successful create call
    pub fn set_version_id(&mut self, id: impl Into<String>) {
        self.version_id = Some(id.into());
    }

    /// Make fix version creation fail with `reason`
    pub fn fail_create(&mut self, reason: impl Into<String>) {
        self.create_failure = Some(reason.into());
    }

    /// Make attaching the fix version to `key` fail
    pub fn fail_attach(&mut self, key: &str) {
        self.attach_failures.insert(IssueKey::new(key));
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.lock_calls().clone()
    }

    /// Number of create and attach calls, i.e. calls that would mutate a real tracker
    pub fn mutation_count(&self) -> usize {
        self.lock_calls()
            .iter()
            .filter(|call| !matches!(call, TrackerCall::GetIssue(_)))
            .count()
    }

    /// Keys an attach was attempted for, in call order
    pub fn attach_attempts(&self) -> Vec<IssueKey> {
        self.lock_calls()
            .iter()
            .filter_map(|call| match call {
                TrackerCall::AttachFixVersion(key, _) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<TrackerCall>> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IssueTracker for MockTracker {
    fn get_issue(&self, key: &IssueKey) -> IssueLookup {
        self.lock_calls().push(TrackerCall::GetIssue(key.clone()));
        self.issues
            .get(key)
            .cloned()
            .unwrap_or(IssueLookup::NotFound)
    }

    fn create_fix_version(&self, record: &FixVersionRecord) -> Result<VersionId> {
        self.lock_calls()
            .push(TrackerCall::CreateFixVersion(record.name.clone()));

        if let Some(reason) = &self.create_failure {
            return Err(FixVersionError::tracker(reason.clone()));
        }
        self.version_id
            .clone()
            .map(VersionId::new)
            .ok_or_else(|| FixVersionError::tracker("No version id configured"))
    }

    fn attach_fix_version(&self, key: &IssueKey, version: &VersionId) -> Result<()> {
        self.lock_calls()
            .push(TrackerCall::AttachFixVersion(key.clone(), version.clone()));

        if self.attach_failures.contains(key) {
            return Err(FixVersionError::tracker(format!(
                "Failed to add fix version to {}. Expected status 204, received 400",
                key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_issue_is_not_found() {
        let tracker = MockTracker::new();
        assert_eq!(
            tracker.get_issue(&IssueKey::new("CORE-1")),
            IssueLookup::NotFound
        );
        assert_eq!(
            tracker.calls(),
            vec![TrackerCall::GetIssue(IssueKey::new("CORE-1"))]
        );
        assert_eq!(tracker.mutation_count(), 0);
    }

    #[test]
    fn test_registered_issue() {
        let mut tracker = MockTracker::new();
        tracker.add_issue("core-2", "Done", &["1.0"]);
        match tracker.get_issue(&IssueKey::new("CORE-2")) {
            IssueLookup::Found(record) => {
                assert_eq!(record.status, "Done");
                assert_eq!(record.fix_versions[0].name, "1.0");
            }
            other => panic!("expected found, got {:?}", other),
        }
    }

    #[test]
    fn test_attach_failure_is_per_key() {
        let mut tracker = MockTracker::new();
        tracker.fail_attach("CORE-2");
        let id = VersionId::new("1");
        assert!(tracker.attach_fix_version(&IssueKey::new("CORE-1"), &id).is_ok());
        assert!(tracker.attach_fix_version(&IssueKey::new("CORE-2"), &id).is_err());
        assert_eq!(tracker.mutation_count(), 2);
    }
}
