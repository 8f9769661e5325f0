use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting, fetching, or rendering issue threads
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("source API error: {0}")]
    Source(String),

    #[error("parsing url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsafe asset path derived from '{url}'")]
    UnsafePath { url: String },

    #[error("fetching asset {url}: {message}")]
    AssetFetch { url: String, message: String },

    #[error("fetching asset {url}: got status code {status}{detail}")]
    AssetStatus {
        url: String,
        status: u16,
        detail: String,
    },

    #[error("{action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("issue {number}: {source}")]
    Issue {
        number: u64,
        #[source]
        source: Box<ArchiveError>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ArchiveError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the number of the issue being processed
    pub fn for_issue(self, number: u64) -> Self {
        ArchiveError::Issue {
            number,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
