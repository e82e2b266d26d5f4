use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::ValidationPolicy;
use crate::domain::{FixVersionRecord, PatternMatcher, DEFAULT_COMMIT_PATTERN};
use crate::error::{FixVersionError, Result};
use crate::release::ReleasePolicy;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "fixversion.toml";

/// Represents the complete file configuration for git-fixversion.
///
/// Every value can be overridden on the command line. Credentials other than
/// the username are never read from the file.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub commits: CommitsConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_project() -> String {
    "CORE".to_string()
}

fn default_done_status() -> String {
    "Done".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_commit_pattern() -> String {
    DEFAULT_COMMIT_PATTERN.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_message() -> String {
    "Automated tag.".to_string()
}

/// Issue tracker connection and policy settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrackerConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// Project the fix version is created in
    #[serde(default = "default_project")]
    pub project: String,

    /// Status an issue must be in to be released
    #[serde(default = "default_done_status")]
    pub done_status: String,

    /// Per-request timeout for tracker calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            base_url: None,
            username: None,
            project: default_project(),
            done_status: default_done_status(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How commit subjects are matched to issues
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitsConfig {
    #[serde(default = "default_commit_pattern")]
    pub pattern: String,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        CommitsConfig {
            pattern: default_commit_pattern(),
        }
    }
}

/// Tagging behavior
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Remote the release tag is pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            remote: default_remote(),
            tag_message: default_tag_message(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `fixversion.toml` in current directory
/// 3. `.fixversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else if let Some(user_config) = dirs::config_dir()
        .map(|dir| dir.join(".fixversion.toml"))
        .filter(|path| path.exists())
    {
        user_config
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path)?;
    toml::from_str(&config_str).map_err(|e| {
        FixVersionError::config(format!("Cannot parse {}: {}", path.display(), e))
    })
}

/// Command line values, decoupled from clap so runs can be built programmatically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Shorthand deriving the release name and the previous tag expression
    pub app: Option<String>,
    pub repo_path: String,
    pub release_name: Option<String>,
    pub release_description: Option<String>,
    pub release_tag: Option<String>,
    pub previous_tag: Option<String>,
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub project: Option<String>,
    pub commit_pattern: Option<String>,
    pub done_status: Option<String>,
    pub remote: Option<String>,
    pub assume_yes: bool,
    pub allow_multiple_fix_versions: bool,
    pub create_tag: bool,
    pub dry_run: bool,
}

/// What the tracker client needs to connect
#[derive(Clone, PartialEq)]
pub struct TrackerSettings {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub project: String,
    pub timeout_secs: u64,
}

impl fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("project", &self.project)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Immutable configuration for one release run, built once and handed to each component
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub repo_path: PathBuf,
    pub release_name: String,
    pub release_description: Option<String>,
    /// Expression for the release end of the range; `None` means HEAD
    pub release_tag: Option<String>,
    /// Expression for the previous release
    pub previous_tag: Option<String>,
    pub tracker: TrackerSettings,
    pub matcher: PatternMatcher,
    pub validation: ValidationPolicy,
    pub release: ReleasePolicy,
}

impl RunConfig {
    /// Merge command line values over the file configuration and validate the result.
    ///
    /// Every failure is a configuration error raised before any external call.
    pub fn from_sources(args: &ReleaseArgs, file: &Config, now: DateTime<Utc>) -> Result<Self> {
        if args.app.is_some() && args.release_tag.is_some() {
            return Err(FixVersionError::config(
                "Ambiguous release tag, must not provide --app and --release-tag",
            ));
        }

        if args.app.is_none() && args.previous_tag.is_none() {
            return Err(FixVersionError::config(
                "One of --previous-tag or --app is required",
            ));
        }

        let mut release_name = args.release_name.clone();
        let mut previous_tag = args.previous_tag.clone();
        if let Some(app) = &args.app {
            if release_name.is_none() {
                release_name = Some(derive_release_name(app, now));
            }
            if previous_tag.is_none() {
                previous_tag = Some(format!("{}-*", app));
            }
        }

        // A concrete release tag doubles as the release name
        let release_name = release_name
            .or_else(|| {
                args.release_tag
                    .clone()
                    .filter(|tag| !is_tag_expression(tag))
            })
            .ok_or_else(|| {
                FixVersionError::config(
                    "Missing release name, --app, --release-name or a concrete --release-tag must be provided",
                )
            })?;

        let matcher = PatternMatcher::compile(
            args.commit_pattern
                .as_deref()
                .unwrap_or(&file.commits.pattern),
        )?;

        let tracker = TrackerSettings {
            base_url: required(
                args.base_url.as_ref().or(file.tracker.base_url.as_ref()),
                "--jira-base-url",
            )?,
            username: required(
                args.username.as_ref().or(file.tracker.username.as_ref()),
                "--jira-username",
            )?,
            password: required(args.password.as_ref(), "--jira-password")?,
            project: args
                .project
                .clone()
                .unwrap_or_else(|| file.tracker.project.clone()),
            timeout_secs: file.tracker.timeout_secs,
        };

        Ok(RunConfig {
            repo_path: PathBuf::from(&args.repo_path),
            release_name,
            release_description: args.release_description.clone(),
            release_tag: args.release_tag.clone(),
            previous_tag,
            tracker,
            matcher,
            validation: ValidationPolicy {
                done_status: args
                    .done_status
                    .clone()
                    .unwrap_or_else(|| file.tracker.done_status.clone()),
                allow_multiple_fix_versions: args.allow_multiple_fix_versions,
            },
            release: ReleasePolicy {
                dry_run: args.dry_run,
                assume_yes: args.assume_yes,
                create_tag: args.create_tag,
                remote: args
                    .remote
                    .clone()
                    .unwrap_or_else(|| file.behavior.remote.clone()),
                tag_message: file.behavior.tag_message.clone(),
            },
        })
    }

    /// The fix version this run creates, dated `release_date`
    pub fn fix_version(&self, release_date: NaiveDate) -> FixVersionRecord {
        FixVersionRecord::released(
            self.release_name.clone(),
            self.tracker.project.clone(),
            release_date,
            self.release_description.clone(),
        )
    }
}

/// `<app>-<yyyy-mm-ddThh.mm.ssZ>`, the release name used with `--app`
pub fn derive_release_name(app: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}", app, now.format("%Y-%m-%dT%H.%M.%SZ"))
}

fn is_tag_expression(tag: &str) -> bool {
    tag.contains(['*', '?', '[', '{'])
}

fn required(value: Option<&String>, flag: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or_else(|| FixVersionError::config(format!("Missing required parameter {}", flag)))
}
