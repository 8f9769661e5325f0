use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ArchiveError;

/// An issue together with its comment thread
///
/// `key` is the source's stable identifier for the issue (the API URL for
/// GitHub). Comments point back at it through [`Comment::issue_key`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub number: u64,
    pub title: String,
    /// Raw markdown body
    pub body: String,
    /// Login of the author
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// True when the tracker reports this entry as a pull request
    #[serde(default)]
    pub is_pull_request: bool,
    /// Sorted ascending by `created_at`, ties kept in arrival order
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A single comment on an issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: u64,
    /// Key of the parent issue
    pub issue_key: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// The unit of rendering: an issue viewed with its ordered comments
pub type Thread = Issue;

/// Repository coordinates in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub name: String,
}

impl RepoName {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoName {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components: Vec<&str> = s.split('/').collect();
        match &components[..] {
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(RepoName::new(*owner, *name))
            }
            _ => Err(ArchiveError::Config(format!(
                "repository must be <owner>/<name>, got '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for RepoName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
