//! Implementation of the archive-core issue source for GitHubClient

use archive_core::{Comment, Issue, IssueSource, Result};

use crate::client::GitHubClient;

impl IssueSource for GitHubClient {
    fn list_issues(&self, page: usize, per_page: usize) -> Result<Vec<Issue>> {
        let issues = self.list_issues("all", per_page, page)?;
        Ok(issues.into_iter().map(Issue::from).collect())
    }

    fn list_issue_comments(&self, issue: &Issue, page: usize, per_page: usize) -> Result<Vec<Comment>> {
        let comments = self.list_issue_comments(issue.number, per_page, page)?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    fn list_repo_comments(&self, page: usize, per_page: usize) -> Result<Vec<Comment>> {
        let comments = self.list_repo_comments(per_page, page)?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }
}
