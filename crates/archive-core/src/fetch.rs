//! Downloading the image assets referenced by issue threads

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::asset_url::{local_asset_path, requires_auth};
use crate::embed::extract_asset_urls;
use crate::error::{ArchiveError, Result};
use crate::models::{RepoName, Thread};
use crate::traits::{AssetResponse, AssetTransport};

/// Longest error body echoed back in an error message
const MAX_ERROR_BODY: usize = 512;

/// What to do when a single asset or document fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run at the first failure
    #[default]
    Abort,
    /// Log the failure and carry on
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Downloads every image embedded in issue and comment bodies
pub struct AssetFetcher<'a> {
    transport: &'a dyn AssetTransport,
    token: String,
    repo: RepoName,
    policy: FailurePolicy,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(transport: &'a dyn AssetTransport, token: &str, repo: RepoName) -> Self {
        Self {
            transport,
            token: token.to_string(),
            repo,
            policy: FailurePolicy::Abort,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch the assets of every thread into `output_root`
    ///
    /// A URL referenced more than once is downloaded once.
    pub fn fetch_all(&self, threads: &[Thread], output_root: &Path) -> Result<FetchSummary> {
        let mut summary = FetchSummary::default();
        let mut fetched: HashSet<String> = HashSet::new();

        for thread in threads {
            let bodies = std::iter::once(thread.body.as_str())
                .chain(thread.comments.iter().map(|c| c.body.as_str()));

            for url in bodies.flat_map(extract_asset_urls) {
                if !fetched.insert(url.to_string()) {
                    continue;
                }

                match self.fetch_one(url, output_root) {
                    Ok(path) => {
                        debug!(issue = thread.number, url, path = %path.display(), "saved asset");
                        summary.written += 1;
                    }
                    Err(e) => match self.policy {
                        FailurePolicy::Abort => return Err(e.for_issue(thread.number)),
                        FailurePolicy::Skip => {
                            warn!(issue = thread.number, url, error = %e, "skipping asset");
                            summary.skipped += 1;
                        }
                    },
                }
            }
        }

        Ok(summary)
    }

    /// Download one asset and return the path it was written to
    pub fn fetch_one(&self, url: &str, output_root: &Path) -> Result<PathBuf> {
        let token = requires_auth(url)?.then_some(self.token.as_str());
        let relative = local_asset_path(url, &self.repo)?;

        let response = self.transport.get(url, token)?;
        if !response.is_success() {
            return Err(status_error(url, &response));
        }

        let mut path = output_root.join(relative);
        if let Some(ext) = response.content_type.as_deref().and_then(extension_for) {
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                let mut name = path.file_name().unwrap_or_default().to_os_string();
                name.push(".");
                name.push(ext);
                path.set_file_name(name);
            }
        }

        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        std::fs::write(&path, &response.body).map_err(|e| ArchiveError::fs("writing", &path, e))?;

        Ok(path)
    }
}

/// File extension added for a declared content type
///
/// Only PNG is recognised; other types are written as-is.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        _ => None,
    }
}

fn status_error(url: &str, response: &AssetResponse) -> ArchiveError {
    let is_html = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("text/html"));

    let detail = if is_html || response.body.is_empty() {
        String::new()
    } else {
        let body = String::from_utf8_lossy(&response.body);
        let trimmed: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
        format!(", {}", trimmed)
    };

    ArchiveError::AssetStatus {
        url: url.to_string(),
        status: response.status,
        detail,
    }
}

#[cfg(unix)]
pub(crate) fn create_dir_all(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o750)
        .create(dir)
        .map_err(|e| ArchiveError::fs("making directory", dir, e))
}

#[cfg(not(unix))]
pub(crate) fn create_dir_all(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| ArchiveError::fs("making directory", dir, e))
}
