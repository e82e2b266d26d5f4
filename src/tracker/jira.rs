use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::TrackerSettings;
use crate::domain::{ExistingFixVersion, FixVersionRecord, IssueKey, IssueRecord, VersionId};
use crate::error::{FixVersionError, Result};
use crate::tracker::{IssueLookup, IssueTracker};

#[derive(Deserialize)]
struct IssueResponse {
    fields: IssueFields,
}

#[derive(Deserialize)]
struct IssueFields {
    status: StatusField,
    #[serde(default, rename = "fixVersions")]
    fix_versions: Option<Vec<VersionField>>,
}

#[derive(Deserialize)]
struct StatusField {
    name: String,
}

#[derive(Deserialize)]
struct VersionField {
    #[serde(default)]
    id: String,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVersionRequest<'a> {
    name: &'a str,
    project: &'a str,
    released: bool,
    user_release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Deserialize)]
struct CreateVersionResponse {
    id: serde_json::Value,
}

/// Blocking client for the Jira REST API (v2) using basic authentication
pub struct JiraClient {
    http: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl JiraClient {
    /// Build a client with a per-request timeout
    ///
    /// The base URL must be absolute and hierarchical; it may carry a path
    /// prefix such as `https://example.com/jira`.
    pub fn new(settings: &TrackerSettings) -> Result<Self> {
        let base_url = Url::parse(settings.base_url.trim()).map_err(|e| {
            FixVersionError::config(format!(
                "Invalid tracker base URL '{}': {}",
                settings.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(FixVersionError::config(format!(
                "Invalid tracker base URL '{}': not a hierarchical URL",
                settings.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(JiraClient {
            http,
            base_url,
            username: settings.username.clone(),
            password: settings.password.clone(),
        })
    }

    /// Append REST API segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can always take path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["rest", "api", "2"])
                .extend(segments);
        }
        url
    }

    fn issue_url(&self, key: &IssueKey) -> Url {
        self.endpoint(&["issue", key.as_str()])
    }

    fn version_url(&self) -> Url {
        self.endpoint(&["version"])
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

impl IssueTracker for JiraClient {
    fn get_issue(&self, key: &IssueKey) -> IssueLookup {
        let url = self.issue_url(key);
        debug!(%key, %url, "looking up issue");

        let response = match self.authed(self.http.get(url)).send() {
            Ok(response) => response,
            Err(e) => return IssueLookup::Failed(e.to_string()),
        };

        match response.status() {
            StatusCode::OK => match response.text() {
                Ok(body) => parse_issue(key, &body),
                Err(e) => IssueLookup::Failed(e.to_string()),
            },
            StatusCode::NOT_FOUND => IssueLookup::NotFound,
            other => IssueLookup::UnexpectedStatus(other.as_u16()),
        }
    }

    fn create_fix_version(&self, record: &FixVersionRecord) -> Result<VersionId> {
        let body = create_version_body(record);
        debug!(name = %record.name, project = %record.project, "creating fix version");

        let response = self
            .authed(self.http.post(self.version_url()))
            .json(&body)
            .send()?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(FixVersionError::tracker(format!(
                "Failed to create fix version. Expected status 201, received {}",
                status.as_u16()
            )));
        }

        parse_version_id(&response.text()?)
    }

    fn attach_fix_version(&self, key: &IssueKey, version: &VersionId) -> Result<()> {
        debug!(%key, version = %version, "attaching fix version");

        let response = self
            .authed(self.http.put(self.issue_url(key)))
            .json(&attach_version_body(version))
            .send()?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(FixVersionError::tracker(format!(
                "Failed to add fix version to {}. Expected status 204, received {}",
                key,
                status.as_u16()
            )));
        }

        Ok(())
    }
}

/// Map a successful issue body to a lookup result
fn parse_issue(key: &IssueKey, body: &str) -> IssueLookup {
    match serde_json::from_str::<IssueResponse>(body) {
        Ok(issue) => IssueLookup::Found(IssueRecord {
            key: key.clone(),
            status: issue.fields.status.name,
            fix_versions: issue
                .fields
                .fix_versions
                .unwrap_or_default()
                .into_iter()
                .map(|v| ExistingFixVersion {
                    id: v.id,
                    name: v.name,
                })
                .collect(),
        }),
        Err(e) => IssueLookup::Failed(format!("Unreadable issue response: {}", e)),
    }
}

fn create_version_body(record: &FixVersionRecord) -> CreateVersionRequest<'_> {
    CreateVersionRequest {
        name: &record.name,
        project: &record.project,
        released: record.released,
        user_release_date: record.user_release_date(),
        description: record.description.as_deref(),
    }
}

fn attach_version_body(version: &VersionId) -> serde_json::Value {
    json!({
        "update": {
            "fixVersions": [
                { "add": { "id": version.as_str() } }
            ]
        }
    })
}

/// Jira returns ids as strings, but tolerate a bare number
fn parse_version_id(body: &str) -> Result<VersionId> {
    let response: CreateVersionResponse = serde_json::from_str(body)
        .map_err(|e| FixVersionError::tracker(format!("Unreadable version response: {}", e)))?;

    match response.id {
        serde_json::Value::String(id) => Ok(VersionId::new(id)),
        serde_json::Value::Number(id) => Ok(VersionId::new(id.to_string())),
        other => Err(FixVersionError::tracker(format!(
            "Unexpected fix version id: {}",
            other
        ))),
    }
}
