use crate::error::Result;
use crate::models::{Comment, Issue};

/// Read access to a repository's issue tracker
///
/// Implementations return one page per call; [`crate::fetch_all_pages`]
/// drives the paging. Returned issues carry no comments.
pub trait IssueSource {
    /// List issues in every state (open and closed)
    fn list_issues(&self, page: usize, per_page: usize) -> Result<Vec<Issue>>;

    /// List comments of a single issue
    fn list_issue_comments(&self, issue: &Issue, page: usize, per_page: usize)
        -> Result<Vec<Comment>>;

    /// List comments across the whole repository
    fn list_repo_comments(&self, page: usize, per_page: usize) -> Result<Vec<Comment>>;
}

/// Raw response of an asset download
#[derive(Debug, Clone, Default)]
pub struct AssetResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP GET capability used to download assets
pub trait AssetTransport {
    /// Fetch `url`, sending `Authorization: Bearer <token>` when a token is given
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    fn get(&self, url: &str, bearer_token: Option<&str>) -> Result<AssetResponse>;
}
