pub mod assets;
pub mod client;
mod convert;
pub mod error;
pub mod models;
mod source;


pub use assets::HttpAssetTransport;
pub use client::GitHubClient;
pub use error::{GitHubError, Result};
pub use models::*;

// Re-export archive-core types for convenience
pub use archive_core::{ArchiveError, AssetTransport, IssueSource};
