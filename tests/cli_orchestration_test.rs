// tests/cli_orchestration_test.rs
use chrono::{NaiveDate, TimeZone, Utc};
use git2::Oid;
use pretty_assertions::assert_eq;

use git_fixversion::cli::orchestration::run_release_workflow;
use git_fixversion::config::{Config, ReleaseArgs, RunConfig};
use git_fixversion::domain::{ApplicationResult, InvalidReason, IssueKey, RevisionRef, TagInfo};
use git_fixversion::git::MockRepository;
use git_fixversion::release::{ReleaseOutcome, TagOutcome};
use git_fixversion::tracker::{IssueLookup, MockTracker, TrackerCall};
use git_fixversion::FixVersionError;

fn oid(byte: u8) -> Oid {
    Oid::from_bytes(&[byte; 20]).unwrap()
}

fn release_args() -> ReleaseArgs {
    ReleaseArgs {
        repo_path: ".".to_string(),
        release_name: Some("v1.0".to_string()),
        previous_tag: Some("api-*".to_string()),
        base_url: Some("https://tracker.example.com".to_string()),
        username: Some("bot".to_string()),
        password: Some("secret".to_string()),
        assume_yes: true,
        dry_run: false,
        ..ReleaseArgs::default()
    }
}

fn run_config(args: &ReleaseArgs) -> RunConfig {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    RunConfig::from_sources(args, &Config::default(), now).unwrap()
}

fn previous_tag() -> RevisionRef {
    RevisionRef::Tag {
        name: "api-2024-02".to_string(),
        oid: oid(2),
    }
}

/// Repository with two `api-*` tags and three subjects since the newest one
fn setup_repo() -> MockRepository {
    let mut repo = MockRepository::new();
    repo.add_tag(TagInfo::new("api-2024-01", oid(1), 100));
    repo.add_tag(TagInfo::new("api-2024-02", oid(2), 200));
    repo.set_commits_between(
        RevisionRef::Head,
        previous_tag(),
        vec![
            "CORE-12: fix".to_string(),
            "CORE-13 add thing".to_string(),
            "core-12 - more fix".to_string(),
            "Merge branch 'main'".to_string(),
        ],
    );
    repo
}

fn release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn never_confirm(_: &str) -> git_fixversion::Result<bool> {
    panic!("confirmation must not be requested");
}

#[test]
fn test_full_release_run() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    tracker.add_issue("CORE-13", "Done", &[]);
    let config = run_config(&release_args());

    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();

    assert_eq!(result.range.previous, previous_tag());
    assert_eq!(result.range.release, RevisionRef::Head);
    assert_eq!(result.classification.groups.len(), 2);
    assert_eq!(
        result.classification.unmatched,
        vec!["Merge branch 'main'".to_string()]
    );
    assert_eq!(
        result.report.valid[&IssueKey::new("CORE-12")].len(),
        2,
        "both CORE-12 commits are grouped together"
    );
    assert_eq!(result.exit_code(), 0);

    let calls = tracker.calls();
    let creates = calls
        .iter()
        .filter(|call| matches!(call, TrackerCall::CreateFixVersion(_)))
        .count();
    assert_eq!(creates, 1);
    assert_eq!(
        tracker.attach_attempts(),
        vec![IssueKey::new("CORE-12"), IssueKey::new("CORE-13")]
    );

    match result.outcome {
        ReleaseOutcome::Completed(summary) => {
            assert_eq!(summary.version_id.as_str(), "10000");
            assert_eq!(summary.applied_count(), 2);
            assert_eq!(summary.tag, TagOutcome::NotRequested);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(repo.created_tags().is_empty());
}

#[test]
fn test_dry_run_never_mutates() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    tracker.add_issue("CORE-13", "Done", &[]);
    let mut args = release_args();
    args.dry_run = true;
    args.create_tag = true;
    let config = run_config(&args);

    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();

    assert_eq!(result.outcome, ReleaseOutcome::DryRunComplete);
    assert_eq!(result.exit_code(), 1);
    assert_eq!(tracker.mutation_count(), 0);
    assert!(repo.created_tags().is_empty());
    assert!(repo.pushed_tags().is_empty());
}

#[test]
fn test_invalid_issues_are_reported_and_skipped() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    tracker.add_issue("CORE-13", "In Progress", &[]);
    let config = run_config(&release_args());

    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();

    let invalid = &result.report.invalid[&IssueKey::new("CORE-13")];
    assert_eq!(
        invalid.reason,
        InvalidReason::WrongStatus {
            expected: "Done".to_string(),
            actual: "In Progress".to_string(),
        }
    );
    assert_eq!(tracker.attach_attempts(), vec![IssueKey::new("CORE-12")]);
    assert_eq!(result.exit_code(), 0);
}

#[test]
fn test_no_valid_issues_exits_non_zero() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &["v0.9"]);
    tracker.set_lookup("CORE-13", IssueLookup::UnexpectedStatus(500));
    let config = run_config(&release_args());

    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();

    assert_eq!(result.outcome, ReleaseOutcome::NoValidIssues);
    assert_eq!(result.exit_code(), 1);
    assert_eq!(tracker.mutation_count(), 0);
    assert_eq!(
        result.report.invalid[&IssueKey::new("CORE-13")].reason,
        InvalidReason::UnexpectedStatus(500)
    );
}

#[test]
fn test_declined_confirmation_makes_no_changes() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    let mut args = release_args();
    args.assume_yes = false;
    let config = run_config(&args);

    let mut prompted = None;
    let result = run_release_workflow(&config, &repo, &tracker, release_date(), |prompt| {
        prompted = Some(prompt.to_string());
        Ok(false)
    })
    .unwrap();

    assert_eq!(result.outcome, ReleaseOutcome::Declined);
    assert_eq!(
        prompted.as_deref(),
        Some("Would you like to continue tagging valid tickets?")
    );
    assert_eq!(tracker.mutation_count(), 0);
}

#[test]
fn test_create_failure_is_fatal_before_any_attach() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    tracker.add_issue("CORE-13", "Done", &[]);
    tracker.fail_create("status 400");
    let config = run_config(&release_args());

    let err = run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm)
        .unwrap_err();

    assert!(matches!(err, FixVersionError::Tracker(_)));
    assert!(tracker.attach_attempts().is_empty());
}

#[test]
fn test_attach_failure_does_not_stop_other_issues() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    tracker.add_issue("CORE-13", "Done", &[]);
    tracker.fail_attach("CORE-12");
    let mut args = release_args();
    args.create_tag = true;
    let config = run_config(&args);

    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();

    let summary = match result.outcome {
        ReleaseOutcome::Completed(summary) => summary,
        other => panic!("unexpected outcome: {:?}", other),
    };
    assert_eq!(summary.applied_count(), 1);
    assert!(matches!(summary.results[0].1, ApplicationResult::Failed(_)));
    assert_eq!(summary.results[1].1, ApplicationResult::Applied);
    assert_eq!(
        summary.tag,
        TagOutcome::Pushed {
            name: "v1.0".to_string(),
            remote: "origin".to_string(),
        }
    );
    assert_eq!(
        repo.pushed_tags(),
        vec![("origin".to_string(), "v1.0".to_string())]
    );
}

#[test]
fn test_unmatched_tag_expression_is_fatal() {
    let repo = setup_repo();
    let tracker = MockTracker::new();
    let mut args = release_args();
    args.previous_tag = Some("web-*".to_string());
    let config = run_config(&args);

    let err = run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm)
        .unwrap_err();

    assert!(matches!(err, FixVersionError::TagNotFound(_)));
    assert!(tracker.calls().is_empty());
}

#[test]
fn test_app_shorthand_resolves_previous_tag() {
    let repo = setup_repo();
    let mut tracker = MockTracker::new();
    tracker.add_issue("CORE-12", "Done", &[]);
    let mut args = release_args();
    args.app = Some("api".to_string());
    args.release_name = None;
    args.previous_tag = None;
    let config = run_config(&args);

    assert_eq!(config.release_name, "api-2024-03-01T12.00.00Z");
    let result =
        run_release_workflow(&config, &repo, &tracker, release_date(), never_confirm).unwrap();
    assert_eq!(result.range.previous, previous_tag());
}
