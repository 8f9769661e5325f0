use archive_core::ArchiveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for ArchiveError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::RateLimited => {
                ArchiveError::Source("GitHub API rate limit exceeded".to_string())
            }
            other => ArchiveError::Source(other.to_string()),
        }
    }
}
