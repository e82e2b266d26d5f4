use std::fmt;

use chrono::NaiveDate;

/// Opaque identifier the tracker assigns to a created fix version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        VersionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fix version created once per run and attached to every valid issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixVersionRecord {
    pub name: String,
    pub project: String,
    pub released: bool,
    pub release_date: NaiveDate,
    pub description: Option<String>,
}

impl FixVersionRecord {
    /// A released version dated `release_date`
    pub fn released(
        name: impl Into<String>,
        project: impl Into<String>,
        release_date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        FixVersionRecord {
            name: name.into(),
            project: project.into(),
            released: true,
            release_date,
            description,
        }
    }

    /// Release date in the tracker's `day/MonthName/year` form, e.g. `05/March/2024`
    pub fn user_release_date(&self) -> String {
        self.release_date.format("%d/%B/%Y").to_string()
    }
}

/// Per-issue outcome of attaching the fix version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationResult {
    Applied,
    Failed(String),
}

impl ApplicationResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplicationResult::Applied)
    }
}
