use std::time::Duration;
use tracing::debug;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// GitHub REST API client
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(owner: &str, repo: &str, token: &str) -> Self {
        Self::with_base_url("https://api.github.com", owner, repo, token)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Get the owner for this client
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo for this client
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        // Detect rate limiting: 403 with x-ratelimit-remaining: 0
        if status == 403 {
            if let Some(remaining) = response.headers().get("x-ratelimit-remaining") {
                if remaining.to_str().unwrap_or("") == "0" {
                    return Err(GitHubError::RateLimited);
                }
            }
        }

        // Try to read error body
        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        // Try to parse as GitHub error response
        let message = if let Ok(error_response) = serde_json::from_str::<serde_json::Value>(&body) {
            error_response
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or(&body)
                .to_string()
        } else if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        match status {
            401 => Err(GitHubError::Unauthorized),
            404 => Err(GitHubError::RepoNotFound(format!("{}/{}", self.owner, self.repo))),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");

        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let mut response = self.check_response(response)?;
        let value: T = response.body_mut().read_json()?;
        Ok(value)
    }

    // ==================== Issue Operations ====================

    /// List one page of issues for the repository
    ///
    /// Pull requests are included; callers filter with
    /// [`GitHubIssue::is_pull_request`] after paging so short pages are not
    /// mistaken for the last one.
    pub fn list_issues(&self, state: &str, per_page: usize, page: usize) -> Result<Vec<GitHubIssue>> {
        let url = format!(
            "{}?state={}&per_page={}&page={}",
            self.repo_url("/issues"),
            urlencoding::encode(state),
            per_page,
            page
        );
        self.get_json(&url)
    }

    // ==================== Comment Operations ====================

    /// List one page of comments on an issue
    pub fn list_issue_comments(
        &self,
        number: u64,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<GitHubComment>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url(&format!("/issues/{}/comments", number)),
            per_page,
            page
        );
        self.get_json(&url)
    }

    /// List one page of comments across every issue in the repository
    pub fn list_repo_comments(&self, per_page: usize, page: usize) -> Result<Vec<GitHubComment>> {
        let url = format!(
            "{}?sort=created&direction=asc&per_page={}&page={}",
            self.repo_url("/issues/comments"),
            per_page,
            page
        );
        self.get_json(&url)
    }
}
