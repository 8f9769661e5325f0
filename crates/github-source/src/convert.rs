//! Model conversions from GitHub types to archive-core types

use archive_core::{Comment, Issue};

use crate::models::*;

/// Login shown for accounts GitHub no longer knows about
const GHOST_LOGIN: &str = "ghost";

fn login(user: Option<GitHubUser>) -> String {
    user.map(|u| u.login)
        .unwrap_or_else(|| GHOST_LOGIN.to_string())
}

impl From<GitHubIssue> for Issue {
    fn from(issue: GitHubIssue) -> Self {
        let is_pull_request = issue.is_pull_request();
        Self {
            key: issue.url,
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            author: login(issue.user),
            created_at: issue.created_at,
            is_pull_request,
            comments: Vec::new(),
        }
    }
}

impl From<GitHubComment> for Comment {
    fn from(c: GitHubComment) -> Self {
        Self {
            id: c.id,
            issue_key: c.issue_url,
            body: c.body.unwrap_or_default(),
            author: login(c.user),
            created_at: c.created_at,
        }
    }
}
