use tracing::{info, warn};

use crate::analyzer::ValidationReport;
use crate::domain::{ApplicationResult, FixVersionRecord, IssueKey, VersionId};
use crate::error::Result;
use crate::git::Repository;
use crate::tracker::IssueTracker;

/// Prompt shown before the tracker is modified
pub const CONFIRM_PROMPT: &str = "Would you like to continue tagging valid tickets?";

/// Flags that gate and shape the mutation phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePolicy {
    /// Report only; never create or attach anything
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    /// Create and push a tag named after the release once issues are processed
    pub create_tag: bool,
    pub remote: String,
    pub tag_message: String,
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        ReleasePolicy {
            dry_run: true,
            assume_yes: false,
            create_tag: false,
            remote: "origin".to_string(),
            tag_message: "Automated tag.".to_string(),
        }
    }
}

/// Where a reconciliation run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePhase {
    /// Validation finished, no mutation decision yet
    Collecting,
    /// Mutation was confirmed (interactively or with assume-yes)
    Confirmed,
    /// Tracker is being modified
    Reconciling,
    /// Terminal, also reached when creating the fix version failed
    Done,
}

/// What happened to the release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    NotRequested,
    Pushed { name: String, remote: String },
    /// Tag creation or push failed after the tracker was already updated
    Failed { name: String, reason: String },
}

/// Result of a completed mutating run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub version_id: VersionId,
    /// One entry per valid issue, in key order
    pub results: Vec<(IssueKey, ApplicationResult)>,
    pub tag: TagOutcome,
}

impl ReleaseSummary {
    pub fn applied_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, result)| result.is_applied())
            .count()
    }

    /// Issues whose attach call failed, with the failure reason
    pub fn failures(&self) -> Vec<(&IssueKey, &str)> {
        self.results
            .iter()
            .filter_map(|(key, result)| match result {
                ApplicationResult::Failed(reason) => Some((key, reason.as_str())),
                ApplicationResult::Applied => None,
            })
            .collect()
    }
}

/// Terminal states of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Validation left nothing to release
    NoValidIssues,
    /// Dry run: reported, nothing created
    DryRunComplete,
    /// The user declined the confirmation prompt
    Declined,
    Completed(ReleaseSummary),
}

impl ReleaseOutcome {
    /// Process exit code: zero only for a completed mutating run
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseOutcome::Completed(_) => 0,
            _ => 1,
        }
    }
}

/// Drives the Collecting → Confirmed → Reconciling → Done state machine
pub struct ReleaseReconciler<'a, T: IssueTracker + ?Sized, R: Repository + ?Sized> {
    tracker: &'a T,
    repo: &'a R,
    policy: ReleasePolicy,
    phase: ReleasePhase,
}

impl<'a, T: IssueTracker + ?Sized, R: Repository + ?Sized> ReleaseReconciler<'a, T, R> {
    pub fn new(tracker: &'a T, repo: &'a R, policy: ReleasePolicy) -> Self {
        ReleaseReconciler {
            tracker,
            repo,
            policy,
            phase: ReleasePhase::Collecting,
        }
    }

    pub fn phase(&self) -> ReleasePhase {
        self.phase
    }

    /// Decide whether to mutate, then create and attach the fix version.
    ///
    /// `confirm` is only called when the run is not a dry run, there is at
    /// least one valid issue and `assume_yes` is off.
    ///
    /// # Returns
    /// * `Ok(ReleaseOutcome)` - A terminal outcome; per-issue attach failures live in the summary
    /// * `Err` - Fix version creation failed (no attach was attempted) or the prompt failed
    pub fn run<F>(
        &mut self,
        fix_version: &FixVersionRecord,
        report: &ValidationReport,
        confirm: F,
    ) -> Result<ReleaseOutcome>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        if !report.has_valid() {
            info!("no valid issues to release");
            return Ok(self.finish(ReleaseOutcome::NoValidIssues));
        }

        if self.policy.dry_run {
            info!(release = %fix_version.name, "dry run, leaving tracker untouched");
            return Ok(self.finish(ReleaseOutcome::DryRunComplete));
        }

        if !self.policy.assume_yes && !confirm(CONFIRM_PROMPT)? {
            info!("release declined");
            return Ok(self.finish(ReleaseOutcome::Declined));
        }
        self.phase = ReleasePhase::Confirmed;

        match self.reconcile(fix_version, report) {
            Ok(summary) => Ok(self.finish(ReleaseOutcome::Completed(summary))),
            Err(e) => {
                self.phase = ReleasePhase::Done;
                Err(e)
            }
        }
    }

    fn reconcile(
        &mut self,
        fix_version: &FixVersionRecord,
        report: &ValidationReport,
    ) -> Result<ReleaseSummary> {
        self.phase = ReleasePhase::Reconciling;

        let version_id = self.tracker.create_fix_version(fix_version)?;
        info!(release = %fix_version.name, id = %version_id, "created fix version");

        let results = report
            .valid
            .keys()
            .map(|key| {
                let result = match self.tracker.attach_fix_version(key, &version_id) {
                    Ok(()) => ApplicationResult::Applied,
                    Err(e) => {
                        warn!(%key, error = %e, "failed to set fix version");
                        ApplicationResult::Failed(e.to_string())
                    }
                };
                (key.clone(), result)
            })
            .collect();

        let tag = if self.policy.create_tag && report.has_valid() {
            self.tag_release(&fix_version.name)
        } else {
            TagOutcome::NotRequested
        };

        Ok(ReleaseSummary {
            version_id,
            results,
            tag,
        })
    }

    /// Tag failures are reported, not raised: the tracker is already updated
    fn tag_release(&self, name: &str) -> TagOutcome {
        let remote = &self.policy.remote;
        let pushed = self
            .repo
            .create_annotated_tag(name, &self.policy.tag_message)
            .and_then(|()| self.repo.push_tag(remote, name));

        match pushed {
            Ok(()) => {
                info!(tag = name, remote = %remote, "pushed release tag");
                TagOutcome::Pushed {
                    name: name.to_string(),
                    remote: remote.clone(),
                }
            }
            Err(e) => {
                warn!(tag = name, error = %e, "release tag was not published");
                TagOutcome::Failed {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn finish(&mut self, outcome: ReleaseOutcome) -> ReleaseOutcome {
        self.phase = ReleasePhase::Done;
        outcome
    }
}
