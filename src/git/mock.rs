use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{RevisionRef, TagInfo};
use crate::error::{FixVersionError, Result};
use crate::git::Repository;

/// Mock repository for testing without actual git operations
///
/// Commit subjects are registered per revision pair; tags created or pushed
/// are recorded so tests can assert on them.
#[derive(Default)]
pub struct MockRepository {
    tags: Vec<TagInfo>,
    ranges: HashMap<(RevisionRef, RevisionRef), Vec<String>>,
    push_failure: Option<String>,
    created_tags: Mutex<Vec<(String, String)>>,
    pushed_tags: Mutex<Vec<(String, String)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; ordering by commit time happens on read
    pub fn add_tag(&mut self, tag: TagInfo) {
        self.tags.push(tag);
    }

    /// Register the commit subjects returned for `first...second`
    pub fn set_commits_between(
        &mut self,
        first: RevisionRef,
        second: RevisionRef,
        subjects: Vec<String>,
    ) {
        self.ranges.insert((first, second), subjects);
    }

    /// Make every push fail with `reason`
    pub fn fail_push(&mut self, reason: impl Into<String>) {
        self.push_failure = Some(reason.into());
    }

    /// Tags created so far as `(name, message)`
    pub fn created_tags(&self) -> Vec<(String, String)> {
        lock(&self.created_tags).clone()
    }

    /// Tags pushed so far as `(remote, name)`
    pub fn pushed_tags(&self) -> Vec<(String, String)> {
        lock(&self.pushed_tags).clone()
    }
}

impl Repository for MockRepository {
    fn tags_by_commit_time(&self) -> Result<Vec<TagInfo>> {
        let mut tags = self.tags.clone();
        super::sort_by_commit_time(&mut tags);
        Ok(tags)
    }

    fn commits_between(&self, first: &RevisionRef, second: &RevisionRef) -> Result<Vec<String>> {
        let key = (first.clone(), second.clone());
        Ok(self.ranges.get(&key).cloned().unwrap_or_default())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let mut created = lock(&self.created_tags);
        if created.iter().any(|(existing, _)| existing == name) {
            return Err(FixVersionError::remote(format!("Tag '{}' already exists", name)));
        }
        created.push((name.to_string(), message.to_string()));
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if let Some(reason) = &self.push_failure {
            return Err(FixVersionError::remote(reason.clone()));
        }
        lock(&self.pushed_tags).push((remote.to_string(), name.to_string()));
        Ok(())
    }
}
