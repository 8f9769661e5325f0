use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::GitHubUser;

/// GitHub issue comment
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubComment {
    pub id: u64,
    /// API URL of the issue this comment belongs to
    pub issue_url: String,
    pub body: Option<String>,
    pub user: Option<GitHubUser>,
    pub created_at: DateTime<Utc>,
}
