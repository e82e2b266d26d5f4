use std::collections::HashMap;

use crate::domain::IssueKey;

/// All message fragments that referenced one issue key, in commit traversal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCommits {
    pub key: IssueKey,
    pub messages: Vec<String>,
}

/// Mapping from issue key to the fragments of the commits that referenced it.
///
/// Groups keep the order in which their key was first seen, and each group
/// keeps its fragments in insertion order. One key never owns two groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitGroup {
    groups: Vec<IssueCommits>,
    index: HashMap<IssueKey, usize>,
}

impl CommitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment to the group for `key`, creating the group on first use
    pub fn push(&mut self, key: IssueKey, message: impl Into<String>) {
        let message = message.into();
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].messages.push(message),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(IssueCommits {
                    key,
                    messages: vec![message],
                });
            }
        }
    }

    pub fn get(&self, key: &IssueKey) -> Option<&[String]> {
        self.index
            .get(key)
            .map(|&slot| self.groups[slot].messages.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &IssueKey> {
        self.groups.iter().map(|group| &group.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IssueCommits> {
        self.groups.iter()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of fragments across all keys
    pub fn commit_count(&self) -> usize {
        self.groups.iter().map(|group| group.messages.len()).sum()
    }
}
