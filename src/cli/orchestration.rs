//! Main workflow orchestration logic
//!
//! Wires the pipeline together: resolve the range, classify commit subjects,
//! validate issues, then hand the report to the reconciler. The workflow is
//! generic over the repository and tracker so it can run against mocks.

use chrono::NaiveDate;
use tracing::info;

use crate::analyzer::{Classification, CommitClassifier, IssueValidator, ValidationReport};
use crate::config::RunConfig;
use crate::domain::RevisionRange;
use crate::error::Result;
use crate::git::{Repository, RevisionRangeResolver};
use crate::release::{ReleaseOutcome, ReleaseReconciler};
use crate::tracker::IssueTracker;
use crate::ui;
use crate::warning::ReleaseWarning;

/// Everything a release run produced, for reporting and exit codes
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub range: RevisionRange,
    pub classification: Classification,
    pub report: ValidationReport,
    pub outcome: ReleaseOutcome,
}

impl WorkflowResult {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// Main release workflow
///
/// Invalid tickets and unparsed commits are always reported before the
/// mutation decision is made.
///
/// # Arguments
///
/// * `config` - Immutable run configuration
/// * `repo` - Version control collaborator
/// * `tracker` - Issue tracker collaborator
/// * `release_date` - Date recorded on the fix version
/// * `confirm` - Asked before mutating unless `assume_yes` is set
///
/// # Returns
///
/// The full result, or an error when the range cannot be resolved or the
/// fix version cannot be created
pub fn run_release_workflow<R, T, F>(
    config: &RunConfig,
    repo: &R,
    tracker: &T,
    release_date: NaiveDate,
    confirm: F,
) -> Result<WorkflowResult>
where
    R: Repository + ?Sized,
    T: IssueTracker + ?Sized,
    F: FnOnce(&str) -> Result<bool>,
{
    let range = RevisionRangeResolver::new(repo)
        .resolve_range(config.release_tag.as_deref(), config.previous_tag.as_deref())?;
    ui::display_range(&range);

    ui::display_status(&format!("Looking up unique issues in range: {}", range));
    let subjects = repo.commits_between(&range.release, &range.previous)?;
    if subjects.is_empty() {
        ui::display_warning(&ReleaseWarning::NoCommitsInRange {
            release: range.release.to_string(),
            previous: range.previous.to_string(),
        });
    }

    let classification = CommitClassifier::new(&config.matcher).classify(subjects.as_slice());
    if !classification.unmatched.is_empty() {
        ui::display_warning(&ReleaseWarning::UnparsedCommits {
            count: classification.unmatched.len(),
        });
    }
    ui::display_unmatched_commits(&classification.unmatched);

    ui::display_validation_start(classification.groups.keys());
    let report = IssueValidator::new(tracker, config.validation.clone())
        .validate_all(&classification.groups);
    info!(
        valid = report.valid.len(),
        invalid = report.invalid.len(),
        "validation finished"
    );
    ui::display_validation_report(&report);

    let fix_version = config.fix_version(release_date);
    let outcome = ReleaseReconciler::new(tracker, repo, config.release.clone()).run(
        &fix_version,
        &report,
        confirm,
    )?;
    ui::display_outcome(&outcome, &config.release_name);

    Ok(WorkflowResult {
        range,
        classification,
        report,
        outcome,
    })
}
