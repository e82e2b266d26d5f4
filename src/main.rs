use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;

use git_fixversion::cli::orchestration::run_release_workflow;
use git_fixversion::config::{self, ReleaseArgs, RunConfig};
use git_fixversion::git::Git2Repository;
use git_fixversion::tracker::JiraClient;
use git_fixversion::ui;

/// Exit code for configuration, resolution and other fatal errors
const FATAL_EXIT_CODE: i32 = 2;

#[derive(clap::Parser)]
#[command(
    name = "git-fixversion",
    version,
    about = "Create a tracker fix version for the tickets referenced between two git tags"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        help = "Shorthand for --release-name <app>-<timestamp> and --previous-tag '<app>-*'"
    )]
    app: Option<String>,

    #[arg(long, default_value = ".", help = "Path to the repo being released")]
    repo_path: String,

    #[arg(long, help = "Fix version name; derived from --app or --release-tag if omitted")]
    release_name: Option<String>,

    #[arg(long, help = "Optional description for the fix version")]
    release_description: Option<String>,

    #[arg(
        long,
        help = "Tag for this release, wildcards pick the most recent match (default: HEAD)"
    )]
    release_tag: Option<String>,

    #[arg(
        long,
        help = "Tag for the last release, wildcards pick the most recent match"
    )]
    previous_tag: Option<String>,

    #[arg(long, help = "Root of the tracker, like https://example.atlassian.net")]
    jira_base_url: Option<String>,

    #[arg(long, help = "Tracker username")]
    jira_username: Option<String>,

    #[arg(long, env = "JIRA_PASSWORD", hide_env_values = true, help = "Tracker password or API token")]
    jira_password: Option<String>,

    #[arg(long, help = "Project to create the fix version in")]
    jira_project: Option<String>,

    #[arg(long, help = "Pattern grouping commits, with 'key' and 'value' groups (or groups 1 and 2)")]
    commit_pattern: Option<String>,

    #[arg(long, help = "Status a ticket must be in to be released")]
    done_status: Option<String>,

    #[arg(long, help = "Remote the release tag is pushed to")]
    remote: Option<String>,

    #[arg(short = 'y', long, help = "Do not ask before updating the tracker")]
    assume_yes: bool,

    #[arg(
        long,
        alias = "allow-multiple-versions",
        help = "Accept tickets that already have a fix version"
    )]
    allow_multiple_fix_versions: bool,

    #[arg(long, help = "Create and push a tag named after the release")]
    create_tag: bool,

    #[arg(
        long = "no-dry-run",
        visible_alias = "execute",
        help = "Actually create the fix version; without it the run only reports"
    )]
    no_dry_run: bool,

    #[arg(short, long, help = "Log debug output")]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose", help = "Only log errors")]
    quiet: bool,
}

impl Args {
    fn release_args(&self) -> ReleaseArgs {
        ReleaseArgs {
            app: self.app.clone(),
            repo_path: self.repo_path.clone(),
            release_name: self.release_name.clone(),
            release_description: self.release_description.clone(),
            release_tag: self.release_tag.clone(),
            previous_tag: self.previous_tag.clone(),
            base_url: self.jira_base_url.clone(),
            username: self.jira_username.clone(),
            password: self.jira_password.clone(),
            project: self.jira_project.clone(),
            commit_pattern: self.commit_pattern.clone(),
            done_status: self.done_status.clone(),
            remote: self.remote.clone(),
            assume_yes: self.assume_yes,
            allow_multiple_fix_versions: self.allow_multiple_fix_versions,
            create_tag: self.create_tag,
            dry_run: !self.no_dry_run,
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.quiet, args.verbose) {
        eprintln!("{}", e);
    }

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            FATAL_EXIT_CODE
        }
    };

    std::process::exit(code);
}

fn run(args: &Args) -> Result<i32> {
    let file_config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    let run_config = RunConfig::from_sources(&args.release_args(), &file_config, Utc::now())?;

    println!("\nReleasing {}", run_config.release_name);

    let repo = Git2Repository::open(&run_config.repo_path).with_context(|| {
        format!(
            "Git repository error at {}",
            run_config.repo_path.display()
        )
    })?;
    let tracker = JiraClient::new(&run_config.tracker)?;

    let result = run_release_workflow(
        &run_config,
        &repo,
        &tracker,
        Local::now().date_naive(),
        ui::confirm_action,
    )?;

    Ok(result.exit_code())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GIT_FIXVERSION_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_dry_run_is_default() {
        let args = Args::parse_from(["git-fixversion", "--app", "api"]);
        assert!(args.release_args().dry_run);

        let args = Args::parse_from(["git-fixversion", "--app", "api", "--execute"]);
        assert!(!args.release_args().dry_run);
    }

    #[test]
    fn test_allow_multiple_versions_alias() {
        let args = Args::parse_from(["git-fixversion", "--allow-multiple-versions"]);
        assert!(args.release_args().allow_multiple_fix_versions);
    }
}
