pub mod aggregate;
pub mod archive;
pub mod asset_url;
pub mod embed;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pagination;
pub mod render;
pub mod rewrite;
pub mod sink;
pub mod traits;

pub use aggregate::aggregate;
pub use archive::{run_archive, ArchiveOptions, ArchiveSummary, CommentScope};
pub use error::{ArchiveError, Result};
pub use fetch::{AssetFetcher, FailurePolicy, FetchSummary};
pub use models::*;
pub use pagination::fetch_all_pages;
pub use render::RenderOptions;
pub use rewrite::UrlRewriter;
pub use sink::LatchedWriter;
pub use traits::{AssetResponse, AssetTransport, IssueSource};
