use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{CommitGroup, InvalidReason, IssueKey, IssueRecord, ValidationOutcome};
use crate::tracker::{IssueLookup, IssueTracker};

/// Rules an issue has to satisfy before it can receive the new fix version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Status name an issue must be in, e.g. `Done`
    pub done_status: String,
    /// Accept issues that already carry a fix version
    pub allow_multiple_fix_versions: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy {
            done_status: "Done".to_string(),
            allow_multiple_fix_versions: false,
        }
    }
}

impl ValidationPolicy {
    /// Apply the policy to a fetched issue snapshot
    pub fn check(&self, record: &IssueRecord) -> Result<(), InvalidReason> {
        if record.status != self.done_status {
            return Err(InvalidReason::WrongStatus {
                expected: self.done_status.clone(),
                actual: record.status.clone(),
            });
        }

        if !self.allow_multiple_fix_versions {
            if let Some(existing) = record.fix_versions.first() {
                return Err(InvalidReason::AlreadyHasFixVersion(existing.name.clone()));
            }
        }

        Ok(())
    }

    /// Apply the policy to any lookup result; only a found issue can pass
    pub fn evaluate(&self, lookup: &IssueLookup) -> Result<(), InvalidReason> {
        match lookup {
            IssueLookup::Found(record) => self.check(record),
            IssueLookup::NotFound => Err(InvalidReason::NotFound),
            IssueLookup::UnexpectedStatus(code) => Err(InvalidReason::UnexpectedStatus(*code)),
            IssueLookup::Failed(reason) => Err(InvalidReason::LookupFailed(reason.clone())),
        }
    }
}

/// An issue that failed validation together with the commits that referenced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIssue {
    pub commits: Vec<String>,
    pub reason: InvalidReason,
}

/// Validated and invalid issues keyed by issue key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: BTreeMap<IssueKey, Vec<String>>,
    pub invalid: BTreeMap<IssueKey, InvalidIssue>,
}

impl ValidationReport {
    /// Fold individual outcomes into the two mappings
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = ValidationOutcome>) -> Self {
        let mut report = ValidationReport::default();
        for outcome in outcomes {
            match outcome {
                ValidationOutcome::Valid { key, commits } => {
                    report.valid.insert(key, commits);
                }
                ValidationOutcome::Invalid {
                    key,
                    commits,
                    reason,
                } => {
                    report.invalid.insert(key, InvalidIssue { commits, reason });
                }
            }
        }
        report
    }

    pub fn has_valid(&self) -> bool {
        !self.valid.is_empty()
    }

    /// Invalid issues ordered by the text of their reason, then by key
    pub fn invalid_by_reason(&self) -> Vec<(&IssueKey, &InvalidIssue)> {
        let mut entries: Vec<(String, &IssueKey, &InvalidIssue)> = self
            .invalid
            .iter()
            .map(|(key, issue)| (issue.reason.to_string(), key, issue))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        entries
            .into_iter()
            .map(|(_, key, issue)| (key, issue))
            .collect()
    }
}

/// Checks each referenced issue against the tracker
pub struct IssueValidator<'a, T: IssueTracker + ?Sized> {
    tracker: &'a T,
    policy: ValidationPolicy,
}

impl<'a, T: IssueTracker + ?Sized> IssueValidator<'a, T> {
    pub fn new(tracker: &'a T, policy: ValidationPolicy) -> Self {
        IssueValidator { tracker, policy }
    }

    /// Validate one key. Lookup failures downgrade the key to invalid and
    /// never abort the caller.
    pub fn validate(&self, key: &IssueKey, commits: &[String]) -> ValidationOutcome {
        let lookup = self.tracker.get_issue(key);
        match self.policy.evaluate(&lookup) {
            Ok(()) => {
                debug!(%key, "issue is ready for release");
                ValidationOutcome::Valid {
                    key: key.clone(),
                    commits: commits.to_vec(),
                }
            }
            Err(reason) => {
                if matches!(
                    reason,
                    InvalidReason::UnexpectedStatus(_) | InvalidReason::LookupFailed(_)
                ) {
                    warn!(%key, %reason, "issue lookup did not succeed");
                }
                ValidationOutcome::Invalid {
                    key: key.clone(),
                    commits: commits.to_vec(),
                    reason,
                }
            }
        }
    }

    /// Validate every distinct key of a commit group
    pub fn validate_all(&self, groups: &CommitGroup) -> ValidationReport {
        ValidationReport::from_outcomes(
            groups
                .iter()
                .map(|group| self.validate(&group.key, &group.messages)),
        )
    }
}
