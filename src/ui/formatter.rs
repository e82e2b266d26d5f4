//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are unit tested; `display_*`
//! functions print it. Colors come from `console` and switch off
//! automatically when stdout is not a terminal.

use console::style;

use crate::analyzer::{InvalidIssue, ValidationReport};
use crate::domain::{IssueKey, RevisionRange};
use crate::release::{ReleaseOutcome, TagOutcome};
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a release warning to the user.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Boxed section title, e.g. for the unparsed commit list
pub fn format_banner(title: &str) -> String {
    let rule = "=".repeat(title.chars().count() + 4);
    format!("{}\n= {} =\n{}", rule, title, rule)
}

pub fn format_valid_ticket(key: &IssueKey, commits: &[String]) -> String {
    format!("{} is ready to tag with {} commits.", key, commits.len())
}

pub fn format_invalid_ticket(key: &IssueKey, issue: &InvalidIssue) -> String {
    format!("{} is invalid: {}", key, issue.reason)
}

/// Display the resolved commit range.
pub fn display_range(range: &RevisionRange) {
    println!("\n{}", style("Release range:").bold());
    println!("  release:  {}", style(&range.release).green());
    println!("  previous: {}", style(&range.previous).red());
}

/// Display commits that did not reference any issue.
pub fn display_unmatched_commits(unmatched: &[String]) {
    if unmatched.is_empty() {
        return;
    }

    println!(
        "\n{}\n",
        format_banner("Came across some commits which couldn't be parsed:")
    );
    for commit in unmatched {
        println!("{}", commit);
    }
}

/// Display the keys about to be checked against the tracker.
pub fn display_validation_start<'a>(keys: impl Iterator<Item = &'a IssueKey>) {
    let keys: Vec<String> = keys.map(|key| key.to_string()).collect();
    println!(
        "\nValidating {} tickets: {}",
        keys.len(),
        keys.join(", ")
    );
}

/// Display valid tickets, then invalid tickets ordered by reason.
pub fn display_validation_report(report: &ValidationReport) {
    if !report.valid.is_empty() {
        println!("\n{}\n", style("The following valid tickets were discovered:").bold());
        for (key, commits) in &report.valid {
            println!("{}", format_valid_ticket(key, commits));
        }
    }

    if !report.invalid.is_empty() {
        println!(
            "\n{}\n",
            format_banner("The following invalid tickets were discovered")
        );
        for (key, issue) in report.invalid_by_reason() {
            println!("{}", style(format_invalid_ticket(key, issue)).red());
        }
        println!();
    }
}

/// Summarize how the run ended.
pub fn display_outcome(outcome: &ReleaseOutcome, release_name: &str) {
    match outcome {
        ReleaseOutcome::NoValidIssues => {
            display_status("There were no valid tickets to release, exiting.");
        }
        ReleaseOutcome::DryRunComplete => {
            display_success(&format!("Done releasing {}! (dry run exit)", release_name));
        }
        ReleaseOutcome::Declined => {
            println!("Release cancelled by user.");
        }
        ReleaseOutcome::Completed(summary) => {
            for (key, reason) in summary.failures() {
                display_warning(&ReleaseWarning::AttachFailed {
                    key: key.to_string(),
                    reason: reason.to_string(),
                });
            }

            match &summary.tag {
                TagOutcome::NotRequested => {}
                TagOutcome::Pushed { name, remote } => {
                    display_success(&format!("Pushed tag: {} to {}", name, remote));
                }
                TagOutcome::Failed { name, reason } => {
                    display_warning(&ReleaseWarning::TagNotPublished {
                        tag: name.clone(),
                        reason: reason.clone(),
                    });
                }
            }

            display_success(&format!(
                "Done releasing {}! Fix version {} set on {} of {} tickets.",
                release_name,
                summary.version_id,
                summary.applied_count(),
                summary.results.len()
            ));
        }
    }
}
